//! Fixed timestep simulation tick
//!
//! Advances one run by exactly one step, in a fixed order: actor and obstacles
//! move, scoring runs against the moved actor, off-screen obstacles retire,
//! a new obstacle may spawn, then both collision predicates are evaluated.

use glam::Vec2;
use thiserror::Error;

use super::collision::{first_obstacle_hit, hits_ground};
use super::state::{GameEvent, GamePhase, GameState};

/// Input sampled once per tick (level-triggered)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Ascend action held
    pub ascend: bool,
    /// Wall-clock time (ms) since the run started; drives spawn pacing
    pub now_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TickError {
    #[error("actor state is not finite at tick {tick} (pos {pos}, vel {vel})")]
    NonFiniteActor { tick: u64, pos: Vec2, vel: Vec2 },
}

/// Advance the game state by one fixed timestep.
///
/// Does nothing once the run is stopped. On error the actor is restored to
/// its pre-tick state and the rest of the tick is skipped.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), TickError> {
    if state.phase == GamePhase::Stopped {
        return Ok(());
    }

    state.time_ticks += 1;
    state.sim_time_ms += f64::from(dt) * 1000.0;

    state
        .pacing
        .update(input.now_ms, &state.config, &mut state.rng);

    // Move entities
    let before = state.actor.clone();
    state.actor.update(input.ascend, dt, &state.config);
    if !state.actor.is_finite() {
        let err = TickError::NonFiniteActor {
            tick: state.time_ticks,
            pos: state.actor.pos,
            vel: state.actor.vel,
        };
        state.actor = before;
        return Err(err);
    }
    state.obstacles.advance(dt, state.config.obstacle_speed);

    // Score against the moved actor
    for _ in 0..state.obstacles.mark_passed(state.actor.pos.x) {
        state.score += 1;
        state.events.push(GameEvent::Scored { score: state.score });
    }

    let retired = state.obstacles.retire_offscreen();
    if retired > 0 {
        log::debug!("Retired {retired} obstacle(s) at tick {}", state.time_ticks);
    }

    if state
        .obstacles
        .wants_spawn(state.config.world_width, state.pacing.distance)
    {
        let x = state.config.world_width;
        let spawned = state.obstacles.spawn(x, &state.config, &mut state.rng);
        log::debug!(
            "Spawned obstacle {} with gap {:.0}..{:.0}",
            spawned.id,
            spawned.gap_top(),
            spawned.gap_bottom()
        );
    }

    // Collisions are terminal; the colliding tick is not rolled back
    let ground = hits_ground(&state.actor, state.config.playable_height());
    let obstacle = first_obstacle_hit(&state.actor, state.obstacles.iter());
    if ground {
        state.events.push(GameEvent::HitGround);
    }
    if let Some(hit) = obstacle {
        state.events.push(GameEvent::HitObstacle(hit));
    }
    if ground || obstacle.is_some() {
        state.phase = GamePhase::Stopped;
    }

    Ok(())
}
