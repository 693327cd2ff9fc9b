//! Game state and core simulation types
//!
//! Everything one run mutates lives here, owned by a single `GameState`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actor::Actor;
use super::collision::ObstacleHit;
use super::obstacle::{ObstacleField, SpawnPacing};
use crate::settings::GameConfig;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Ticks are being simulated
    Running,
    /// Run ended on a collision; only a restart leaves this phase
    Stopped,
}

/// Things that happened during a tick, for audio and bookkeeping outside the sim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Actor passed an obstacle; carries the new score
    Scored { score: u64 },
    /// Actor ran into an obstacle
    HitObstacle(ObstacleHit),
    /// Actor reached the floor line
    HitGround,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub actor: Actor,
    /// Live obstacles, left to right
    pub obstacles: ObstacleField,
    pub pacing: SpawnPacing,
    /// Obstacles passed this run
    pub score: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated time in milliseconds
    pub sim_time_ms: f64,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh run: actor at its start position, one obstacle ahead of it
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut state = Self {
            actor: Actor::from_config(&config),
            pacing: SpawnPacing::new(&config),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            obstacles: ObstacleField::new(),
            score: 0,
            phase: GamePhase::Running,
            time_ticks: 0,
            sim_time_ms: 0.0,
            events: Vec::new(),
        };

        let first_x = state.config.first_obstacle_x;
        state.obstacles.spawn(first_x, &state.config, &mut state.rng);

        state
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_seeded_with_one_obstacle() {
        let config = GameConfig::default();
        let state = GameState::new(config.clone(), 12345);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles.as_slice()[0].x, config.first_obstacle_x);
        assert_eq!(state.actor.pos, config.actor_start);
    }

    #[test]
    fn test_same_seed_same_first_gap() {
        let a = GameState::new(GameConfig::default(), 99);
        let b = GameState::new(GameConfig::default(), 99);
        assert_eq!(a.obstacles.as_slice(), b.obstacles.as_slice());
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.events.push(GameEvent::HitGround);
        assert_eq!(state.drain_events(), vec![GameEvent::HitGround]);
        assert!(state.events.is_empty());
    }
}
