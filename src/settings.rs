//! World configuration
//!
//! Every tunable the simulation depends on. Loaded from JSON (LocalStorage on
//! web, an optional file on native) and sanitized so bad values degrade to
//! something playable instead of failing.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// World constants and pacing knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation ticks per second
    pub target_fps: f64,

    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Decorative ground strip; the floor line sits this far above the bottom
    pub ground_band_height: f32,

    // === Actor ===
    pub actor_start: Vec2,
    pub actor_size: Vec2,
    pub gravity: f32,
    /// Jump impulse in units of gravity
    pub jump_factor: f32,
    pub terminal_velocity: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub obstacle_speed: f32,
    pub gap_size: f32,
    pub gap_margin: f32,
    pub first_obstacle_x: f32,
    pub spawn_distance_min: f32,
    pub spawn_distance_max: f32,
    pub spawn_reroll_interval_ms: f64,

    /// Fixed RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_FPS,

            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            ground_band_height: GROUND_BAND_HEIGHT,

            actor_start: Vec2::new(ACTOR_START_X, ACTOR_START_Y),
            actor_size: Vec2::new(ACTOR_WIDTH, ACTOR_HEIGHT),
            gravity: GRAVITY,
            jump_factor: JUMP_FACTOR,
            terminal_velocity: TERMINAL_VELOCITY,

            obstacle_width: OBSTACLE_WIDTH,
            obstacle_speed: OBSTACLE_SPEED,
            gap_size: GAP_SIZE,
            gap_margin: GAP_MARGIN,
            first_obstacle_x: FIRST_OBSTACLE_X,
            spawn_distance_min: SPAWN_DISTANCE_MIN,
            spawn_distance_max: SPAWN_DISTANCE_MAX,
            spawn_reroll_interval_ms: SPAWN_REROLL_INTERVAL_MS,

            seed: None,
        }
    }
}

/// Replace non-finite values with `fallback` and negatives with their magnitude
fn magnitude(value: f32, fallback: f32, name: &str) -> f32 {
    if !value.is_finite() {
        log::warn!("Config {name} = {value} is not finite, using {fallback}");
        fallback
    } else if value < 0.0 {
        log::warn!("Config {name} = {value} is negative, using {}", -value);
        -value
    } else {
        value
    }
}

impl GameConfig {
    /// Floor line: world height minus the ground band
    pub fn playable_height(&self) -> f32 {
        self.world_height - self.ground_band_height
    }

    /// Upward speed (pixels/s per second of tick) applied while ascending
    pub fn jump_impulse(&self) -> f32 {
        self.gravity * self.jump_factor
    }

    /// Parse and sanitize a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp everything into a playable range. Never fails.
    pub fn sanitized(mut self) -> Self {
        let defaults = GameConfig::default();

        if self.target_fps.is_nan() {
            self.target_fps = DEFAULT_FPS;
        }
        let fps = self.target_fps.clamp(MIN_SUPPORTED_FPS, MAX_SUPPORTED_FPS);
        if fps != self.target_fps {
            log::warn!("Config target_fps = {} clamped to {fps}", self.target_fps);
            self.target_fps = fps;
        }

        self.world_width = magnitude(self.world_width, defaults.world_width, "world_width");
        self.world_height = magnitude(self.world_height, defaults.world_height, "world_height");
        self.ground_band_height =
            magnitude(self.ground_band_height, defaults.ground_band_height, "ground_band_height");
        if self.ground_band_height >= self.world_height {
            log::warn!("Ground band covers the whole world, using default proportions");
            self.world_height = defaults.world_height;
            self.ground_band_height = defaults.ground_band_height;
        }

        if !self.actor_start.is_finite() {
            self.actor_start = defaults.actor_start;
        }
        if !self.actor_size.is_finite() || self.actor_size.min_element() <= 0.0 {
            self.actor_size = defaults.actor_size;
        }
        self.gravity = magnitude(self.gravity, defaults.gravity, "gravity");
        self.jump_factor = magnitude(self.jump_factor, defaults.jump_factor, "jump_factor");
        self.terminal_velocity =
            magnitude(self.terminal_velocity, defaults.terminal_velocity, "terminal_velocity");

        self.obstacle_width = magnitude(self.obstacle_width, defaults.obstacle_width, "obstacle_width");
        self.obstacle_speed = magnitude(self.obstacle_speed, defaults.obstacle_speed, "obstacle_speed");
        if !self.first_obstacle_x.is_finite() {
            self.first_obstacle_x = defaults.first_obstacle_x;
        }

        // Gap must fit between both margins
        let playable = self.playable_height();
        self.gap_margin = magnitude(self.gap_margin, defaults.gap_margin, "gap_margin");
        if self.gap_margin * 2.0 >= playable {
            self.gap_margin = playable / 4.0;
            log::warn!("Config gap_margin too large, using {}", self.gap_margin);
        }
        self.gap_size = magnitude(self.gap_size, defaults.gap_size, "gap_size");
        let max_gap = playable - self.gap_margin * 2.0;
        if self.gap_size > max_gap {
            log::warn!("Config gap_size = {} shrunk to {max_gap}", self.gap_size);
            self.gap_size = max_gap;
        }

        self.spawn_distance_min =
            magnitude(self.spawn_distance_min, defaults.spawn_distance_min, "spawn_distance_min");
        self.spawn_distance_max =
            magnitude(self.spawn_distance_max, defaults.spawn_distance_max, "spawn_distance_max");
        if self.spawn_distance_min > self.spawn_distance_max {
            std::mem::swap(&mut self.spawn_distance_min, &mut self.spawn_distance_max);
        }
        if !self.spawn_reroll_interval_ms.is_finite() || self.spawn_reroll_interval_ms < 0.0 {
            self.spawn_reroll_interval_ms = defaults.spawn_reroll_interval_ms;
        }

        self
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flap_dash_config";

    /// Environment variable naming a JSON config file (native only)
    pub const CONFIG_ENV_VAR: &'static str = "FLAP_DASH_CONFIG";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(err) => log::warn!("Ignoring stored config: {err}"),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Load config from the file named by `FLAP_DASH_CONFIG`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::from_path(&path) {
            Ok(config) => {
                log::info!("Loaded config from {path}");
                config
            }
            Err(err) => {
                log::warn!("Ignoring config {path}: {err}");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
