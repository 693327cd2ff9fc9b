//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (obstacles left to right)
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use actor::{Actor, WingState};
pub use collision::{ObstacleHit, ObstacleSide, first_obstacle_hit, hits_ground, hits_obstacle};
pub use obstacle::{Obstacle, ObstacleField, SpawnPacing};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickError, TickInput, tick};
