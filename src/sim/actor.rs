//! The controlled actor and its per-tick physics

use glam::Vec2;

use crate::Rect;
use crate::lerp;
use crate::settings::GameConfig;

/// Presentation-only wing pose, derived from the sign of vertical velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WingState {
    /// Moving up
    Upflap,
    /// No vertical motion
    #[default]
    Midflap,
    /// Moving down
    Downflap,
}

impl WingState {
    pub fn from_velocity(vy: f32) -> Self {
        if vy > 0.0 {
            WingState::Downflap
        } else if vy < 0.0 {
            WingState::Upflap
        } else {
            WingState::Midflap
        }
    }
}

/// Nose-down tilt at full fall speed (45 degrees)
pub const MAX_DOWNWARD_TILT: f32 = std::f32::consts::FRAC_PI_4;
/// Nose-up tilt while jumping (-30 degrees)
pub const MAX_UPWARD_TILT: f32 = -std::f32::consts::FRAC_PI_6;
/// Fraction of the remaining tilt covered per tick
const TILT_EASE: f32 = 0.1;
/// Fall speed that maps to full nose-down tilt
const MAX_CONSIDERED_SPEED: f32 = 1000.0;

/// The player's actor
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Top-left corner (y grows downward)
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Derived from velocity each tick, never read by physics
    pub wing: WingState,
    /// Rotation in radians for drawing
    pub tilt: f32,
}

impl Actor {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            wing: WingState::Midflap,
            tilt: 0.0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.actor_start, config.actor_size)
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Advance one tick.
    ///
    /// While `ascend` is held the jump impulse is re-applied every tick
    /// (held-jump glide); otherwise gravity accumulates up to terminal velocity.
    pub fn update(&mut self, ascend: bool, dt: f32, config: &GameConfig) {
        if ascend {
            self.vel.y = -config.jump_impulse() * dt;
            self.tilt = MAX_UPWARD_TILT;
        } else {
            self.vel.y = (self.vel.y + config.gravity * dt).min(config.terminal_velocity);

            let normalized = (self.vel.y / MAX_CONSIDERED_SPEED).clamp(0.0, 1.0);
            self.tilt = lerp(self.tilt, normalized * MAX_DOWNWARD_TILT, TILT_EASE);
        }

        self.pos += self.vel * dt;
        self.wing = WingState::from_velocity(self.vel.y);
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn config() -> GameConfig {
        GameConfig {
            gravity: 400.0,
            terminal_velocity: 500.0,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_free_fall_matches_closed_form() {
        let config = config();
        let mut actor = Actor::new(Vec2::ZERO, Vec2::new(34.0, 24.0));
        for n in 1..=120u32 {
            actor.update(false, DT, &config);
            let expected = (n as f32 * config.gravity * DT).min(config.terminal_velocity);
            assert!(
                (actor.vel.y - expected).abs() < 1e-2,
                "tick {n}: vy {} != {expected}",
                actor.vel.y
            );
        }
        assert_eq!(actor.vel.y, config.terminal_velocity);
    }

    #[test]
    fn test_semi_implicit_position_update() {
        let config = config();
        let mut actor = Actor::new(Vec2::new(100.0, 0.0), Vec2::new(34.0, 24.0));
        actor.update(false, DT, &config);
        // Position uses the velocity already updated this tick
        assert!((actor.pos.y - config.gravity * DT * DT).abs() < 1e-6);
        assert_eq!(actor.pos.x, 100.0);
    }

    #[test]
    fn test_jump_sets_velocity_instead_of_adding() {
        let config = config();
        let mut actor = Actor::new(Vec2::new(100.0, 200.0), Vec2::new(34.0, 24.0));
        actor.vel.y = 480.0;
        actor.update(true, DT, &config);
        assert!((actor.vel.y + config.jump_impulse() * DT).abs() < 1e-4);
        assert_eq!(actor.wing, WingState::Upflap);
        assert_eq!(actor.tilt, MAX_UPWARD_TILT);
    }

    #[test]
    fn test_held_input_reapplies_impulse_every_tick() {
        let config = config();
        let mut actor = Actor::new(Vec2::new(100.0, 300.0), Vec2::new(34.0, 24.0));
        let impulse = -config.jump_impulse() * DT;
        let mut last_y = actor.pos.y;
        for _ in 0..10 {
            actor.update(true, DT, &config);
            // No gravity accumulates while held: constant rise each tick
            assert_eq!(actor.vel.y, impulse);
            assert!((actor.pos.y - (last_y + impulse * DT)).abs() < 1e-3);
            last_y = actor.pos.y;
        }
    }

    #[test]
    fn test_wing_state_follows_velocity_sign() {
        assert_eq!(WingState::from_velocity(12.0), WingState::Downflap);
        assert_eq!(WingState::from_velocity(-3.0), WingState::Upflap);
        assert_eq!(WingState::from_velocity(0.0), WingState::Midflap);

        let config = config();
        let mut actor = Actor::new(Vec2::ZERO, Vec2::new(34.0, 24.0));
        actor.update(false, DT, &config);
        assert_eq!(actor.wing, WingState::Downflap);
    }

    #[test]
    fn test_tilt_eases_toward_fall_angle() {
        let config = config();
        let mut actor = Actor::new(Vec2::ZERO, Vec2::new(34.0, 24.0));
        for _ in 0..600 {
            actor.update(false, DT, &config);
        }
        // Terminal 500 of 1000 considered speed => half of max tilt
        assert!((actor.tilt - MAX_DOWNWARD_TILT * 0.5).abs() < 1e-3);
    }
}
