//! Platform abstraction layer
//!
//! Narrow ports the core talks to, so nothing in the simulation reaches for
//! browser or OS state directly:
//! - Input (level-triggered "ascend" action)
//! - Resource lookup (images by identifier, absence tolerated)
//! - Sound playback (fire-and-forget)

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Source of the single "ascend" action, polled once per tick
pub trait InputSource {
    fn is_action_active(&self) -> bool;
}

/// Held/released state written by event handlers and read by the game loop.
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct HeldAction {
    held: Rc<Cell<bool>>,
}

impl HeldAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self) {
        self.held.set(true);
    }

    pub fn release(&self) {
        self.held.set(false);
    }

    pub fn set(&self, held: bool) {
        self.held.set(held);
    }
}

impl InputSource for HeldAction {
    fn is_action_active(&self) -> bool {
        self.held.get()
    }
}

/// Lookup of loaded resources by identifier
pub trait ResourceLookup {
    type Handle;

    /// `None` while missing or still loading; callers skip the draw/play
    fn get(&self, id: &str) -> Option<&Self::Handle>;
}

/// Resource table with load tracking
#[derive(Debug, Clone)]
pub struct ResourceCache<H> {
    entries: HashMap<String, Option<H>>,
}

impl<H> Default for ResourceCache<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H> ResourceCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identifier whose handle is still loading
    pub fn request(&mut self, id: &str) {
        self.entries.entry(id.to_string()).or_insert(None);
    }

    /// Mark an identifier as loaded
    pub fn ready(&mut self, id: &str, handle: H) {
        log::debug!("Loaded resource {id}");
        self.entries.insert(id.to_string(), Some(handle));
    }

    pub fn all_ready(&self) -> bool {
        self.entries.values().all(Option::is_some)
    }
}

impl<H> ResourceLookup for ResourceCache<H> {
    type Handle = H;

    fn get(&self, id: &str) -> Option<&H> {
        self.entries.get(id).and_then(Option::as_ref)
    }
}

/// Sound cues raised by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Obstacle passed
    Point,
    /// Ran into an obstacle
    Hit,
    /// Hit the ground
    Die,
}

/// Fire-and-forget sound output
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// Silent sink for native and test builds
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl SoundSink for NullAudio {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("Sound {cue:?} (muted)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_action_is_shared_between_clones() {
        let handler_side = HeldAction::new();
        let loop_side = handler_side.clone();
        assert!(!loop_side.is_action_active());
        handler_side.press();
        assert!(loop_side.is_action_active());
        handler_side.release();
        assert!(!loop_side.is_action_active());
    }

    #[test]
    fn test_cache_hides_pending_resources() {
        let mut cache: ResourceCache<u32> = ResourceCache::new();
        cache.request("/pipe-green.png");
        assert_eq!(cache.get("/pipe-green.png"), None);
        assert!(!cache.all_ready());

        cache.ready("/pipe-green.png", 7);
        assert_eq!(cache.get("/pipe-green.png"), Some(&7));
        assert!(cache.all_ready());
        assert_eq!(cache.get("/never-requested.png"), None);
    }

    #[test]
    fn test_cache_tracks_loads_finishing_out_of_order() {
        let mut cache: ResourceCache<&str> = ResourceCache::new();
        for id in ["/base.png", "/bird/midflap.png"] {
            cache.request(id);
        }
        cache.ready("/bird/midflap.png", "bird");
        assert!(!cache.all_ready());
        assert_eq!(cache.get("/base.png"), None);

        // A late request never hides a handle that already arrived
        cache.request("/bird/midflap.png");
        assert_eq!(cache.get("/bird/midflap.png"), Some(&"bird"));

        cache.ready("/base.png", "base");
        assert!(cache.all_ready());
    }
}
