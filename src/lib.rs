//! Flap Dash - A side-scrolling gap-runner arcade game
//!
//! Core modules:
//! - `clock`: Fixed-timestep scheduler (simulation rate decoupled from display rate)
//! - `sim`: Deterministic simulation (actor physics, obstacles, collisions)
//! - `game`: Run orchestration over the clock, simulation and collaborators
//! - `renderer`: Scene building and the render surface port
//! - `platform`: Input and resource collaborator ports
//! - `highscores`: Score counter and high score persistence
//! - `settings`: Data-driven world configuration

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod clock;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use clock::SimClock;
pub use game::{Game, Services};
pub use highscores::{HighScoreStore, MemoryStore, ScoreBoard};
pub use settings::GameConfig;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Tick rate used when nothing else is configured
    pub const DEFAULT_FPS: f64 = 60.0;
    /// Slowest supported tick rate; also bounds catch-up work per frame
    pub const MIN_SUPPORTED_FPS: f64 = 20.0;
    /// Fastest supported tick rate
    pub const MAX_SUPPORTED_FPS: f64 = 144.0;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 360.0;
    pub const WORLD_HEIGHT: f32 = 480.0;
    /// Decorative ground strip below the playable area
    pub const GROUND_BAND_HEIGHT: f32 = 80.0;

    /// Actor defaults
    pub const ACTOR_START_X: f32 = 100.0;
    pub const ACTOR_START_Y: f32 = 100.0;
    pub const ACTOR_WIDTH: f32 = 34.0;
    pub const ACTOR_HEIGHT: f32 = 24.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 350.0;
    /// Jump impulse in units of gravity; applied velocity is `-GRAVITY * JUMP_FACTOR * dt`
    pub const JUMP_FACTOR: f32 = 35.0;
    /// Maximum fall speed (pixels/s)
    pub const TERMINAL_VELOCITY: f32 = 500.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 70.0;
    pub const OBSTACLE_SPEED: f32 = 100.0;
    pub const GAP_SIZE: f32 = 150.0;
    /// Minimum clearance between the gap and the top edge / floor line
    pub const GAP_MARGIN: f32 = 50.0;
    pub const FIRST_OBSTACLE_X: f32 = 400.0;

    /// Spawn pacing (pixels between obstacles, re-rolled every interval)
    pub const SPAWN_DISTANCE_MIN: f32 = 200.0;
    pub const SPAWN_DISTANCE_MAX: f32 = 300.0;
    pub const SPAWN_REROLL_INTERVAL_MS: f64 = 1000.0;
}

/// Linear interpolation, `amount` clamped to [0, 1]
#[inline]
pub fn lerp(current: f32, target: f32, amount: f32) -> f32 {
    let amount = amount.clamp(0.0, 1.0);
    current * (1.0 - amount) + target * amount
}

/// Axis-aligned rectangle in world space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_clamps_amount() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 4.0), 10.0);
        assert_eq!(lerp(2.0, 10.0, -1.0), 2.0);
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(100.0, 210.0, 34.0, 24.0);
        assert_eq!(r.right(), 134.0);
        assert_eq!(r.bottom(), 234.0);
        assert_eq!(r.center(), Vec2::new(117.0, 222.0));
    }
}
