//! Run orchestration
//!
//! `Game` ties the clock to the simulation: each delivered tick polls input,
//! advances the state, turns sim events into score and sound, and stops the
//! clock when the run ends. Collaborators are passed in explicitly through
//! `Services`; nothing here touches global state.

use std::ops::ControlFlow;

use crate::clock::{FrameHandler, SimClock};
use crate::highscores::ScoreBoard;
use crate::platform::{InputSource, SoundCue, SoundSink};
use crate::renderer::{self, RenderSurface};
use crate::settings::GameConfig;
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// External collaborators the orchestrator drives
pub struct Services {
    pub input: Box<dyn InputSource>,
    pub audio: Box<dyn SoundSink>,
}

/// One game session: state, clock, scores and collaborators
pub struct Game {
    config: GameConfig,
    state: GameState,
    clock: SimClock,
    scores: ScoreBoard,
    services: Services,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64, scores: ScoreBoard, services: Services) -> Self {
        let config = config.sanitized();
        Self {
            clock: SimClock::new(config.target_fps),
            state: GameState::new(config.clone(), seed),
            config,
            scores,
            services,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start (or resume) delivering ticks from timestamp `now`
    pub fn start(&mut self, now: f64) {
        self.clock.start(now);
    }

    /// Stop delivering ticks. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Change the simulation rate (clamped). Returns the rate applied.
    pub fn set_target_rate(&mut self, fps: f64) -> f64 {
        self.clock.set_target_rate(fps)
    }

    /// Rebuild every entity for a fresh run and restart the clock
    pub fn restart(&mut self, seed: u64, now: f64) {
        self.state = GameState::new(self.config.clone(), seed);
        self.scores.reset();
        self.clock.start(now);
        log::info!("Run restarted with seed {seed}");
    }

    /// Handle one display frame at `timestamp` (ms). Returns ticks run.
    pub fn frame<S: RenderSurface + ?Sized>(&mut self, timestamp: f64, surface: &mut S) -> u32 {
        let Self {
            state,
            clock,
            scores,
            services,
            ..
        } = self;
        let mut run = RunFrame {
            state,
            scores,
            services,
            surface,
            now_ms: clock.elapsed_at(timestamp),
        };
        clock.drive(timestamp, &mut run)
    }
}

/// Per-frame view over the pieces a tick and a render need
struct RunFrame<'a, S: ?Sized> {
    state: &'a mut GameState,
    scores: &'a mut ScoreBoard,
    services: &'a mut Services,
    surface: &'a mut S,
    /// Wall-clock ms since the run started, as of this frame
    now_ms: f64,
}

impl<S: RenderSurface + ?Sized> RunFrame<'_, S> {
    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Scored { score } => {
                if self.scores.increment() {
                    log::debug!("New high score {score}");
                }
                self.services.audio.play(SoundCue::Point);
            }
            GameEvent::HitObstacle(hit) => {
                log::info!("Hit obstacle {} ({:?})", hit.obstacle_id, hit.side);
                self.services.audio.play(SoundCue::Hit);
            }
            GameEvent::HitGround => {
                log::info!("Hit the ground");
                self.services.audio.play(SoundCue::Die);
            }
        }
    }
}

impl<S: RenderSurface + ?Sized> FrameHandler for RunFrame<'_, S> {
    fn tick(&mut self, dt: f32) -> ControlFlow<()> {
        let input = TickInput {
            ascend: self.services.input.is_action_active(),
            now_ms: self.now_ms,
        };
        if let Err(err) = tick(self.state, &input, dt) {
            // Only this tick is lost; the clock keeps running
            log::error!("Tick aborted: {err}");
        }

        for event in self.state.drain_events() {
            self.handle_event(event);
        }

        if self.state.is_running() {
            ControlFlow::Continue(())
        } else {
            log::info!(
                "Run over after {} ticks: score {}, best {}",
                self.state.time_ticks,
                self.scores.score(),
                self.scores.high_score()
            );
            ControlFlow::Break(())
        }
    }

    fn render(&mut self) {
        renderer::render(self.state, self.scores, self.surface);
    }
}
