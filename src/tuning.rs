//! Game balance and startup configuration
//!
//! Every gameplay constant lives in [`Tuning`] so runs can be replayed or
//! rebalanced from JSON. Problems are reported once at startup, never mid-run.

use std::fmt;

use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Startup configuration failure
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Tuning file could not be read
    Io(String),
    /// Tuning JSON could not be parsed
    Parse(String),
    /// A tuning value is outside its allowed range
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    /// The OS randomness source could not produce a seed
    Entropy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "cannot read tuning file: {}", msg),
            ConfigError::Parse(msg) => write!(f, "invalid tuning JSON: {}", msg),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid tuning value `{}`: {}", field, reason)
            }
            ConfigError::Entropy(msg) => write!(f, "randomness source unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Draw a run seed from the OS randomness source
pub fn os_seed() -> Result<u64, ConfigError> {
    OsRng
        .try_next_u64()
        .map_err(|e| ConfigError::Entropy(e.to_string()))
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    pub ground_height: f32,

    // === Player ===
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Gap between the resting feet position and the ground line
    pub feet_offset: f32,
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Vertical velocity applied by a jump (negative is up)
    pub jump_velocity: f32,

    // === Spawner ===
    /// Ticks between spawn attempts
    pub spawn_interval: u64,
    pub spawn_margin: f32,
    pub obstacle_min_height: f32,
    pub obstacle_max_height: f32,
    pub obstacle_min_width: f32,
    pub obstacle_max_width: f32,

    // === Difficulty ===
    pub base_speed: f32,
    /// Score needed for each +1 speed step
    pub speed_step_score: u64,
    /// Optional difficulty ceiling (unbounded when `None`)
    pub max_speed: Option<f32>,

    // === Countdown ===
    pub countdown_step_ms: f64,
    pub countdown_go_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ground_height: GROUND_HEIGHT,

            player_x: PLAYER_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            feet_offset: PLAYER_FEET_OFFSET,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,

            spawn_interval: SPAWN_INTERVAL,
            spawn_margin: SPAWN_MARGIN,
            obstacle_min_height: OBSTACLE_MIN_HEIGHT,
            obstacle_max_height: OBSTACLE_MAX_HEIGHT,
            obstacle_min_width: OBSTACLE_MIN_WIDTH,
            obstacle_max_width: OBSTACLE_MAX_WIDTH,

            base_speed: BASE_SPEED,
            speed_step_score: SPEED_STEP_SCORE,
            max_speed: None,

            countdown_step_ms: COUNTDOWN_STEP_MS,
            countdown_go_ms: COUNTDOWN_GO_MS,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Y coordinate of the walkable surface
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.arena_height - self.ground_height
    }

    /// Lowest allowed player feet position
    #[inline]
    pub fn ground_clamp(&self) -> f32 {
        self.ground_y() - self.feet_offset
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                log::warn!("Rejected tuning: {} ({})", field, reason);
                Err(ConfigError::Invalid { field, reason })
            }
        }

        check(self.arena_width > 0.0, "arena_width", "must be positive")?;
        check(
            self.ground_height >= 0.0 && self.ground_height < self.arena_height,
            "ground_height",
            "must fit inside the arena",
        )?;
        check(
            self.player_x > 0.0 && self.player_x < self.arena_width,
            "player_x",
            "must be inside the arena",
        )?;
        check(
            self.player_width > 0.0 && self.player_height > 0.0,
            "player_width",
            "player size must be positive",
        )?;
        check(self.feet_offset >= 0.0, "feet_offset", "must not be negative")?;
        check(self.gravity > 0.0, "gravity", "must pull downward")?;
        check(self.jump_velocity < 0.0, "jump_velocity", "must point upward")?;
        check(self.spawn_interval > 0, "spawn_interval", "must be at least one tick")?;
        check(
            self.obstacle_min_height > 0.0 && self.obstacle_min_height < self.obstacle_max_height,
            "obstacle_min_height",
            "height range must be positive and non-empty",
        )?;
        check(
            self.obstacle_min_width > 0.0 && self.obstacle_min_width < self.obstacle_max_width,
            "obstacle_min_width",
            "width range must be positive and non-empty",
        )?;
        check(self.base_speed > 0.0, "base_speed", "must be positive")?;
        check(self.speed_step_score > 0, "speed_step_score", "must be at least one")?;
        if let Some(max) = self.max_speed {
            check(max >= self.base_speed, "max_speed", "must not be below base_speed")?;
        }
        check(
            self.countdown_step_ms > 0.0 && self.countdown_go_ms > 0.0,
            "countdown_step_ms",
            "countdown phases must have a duration",
        )?;
        Ok(())
    }
}
