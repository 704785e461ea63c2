//! Stickman Runner - a single-screen endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game phases)
//! - `driver`: Frame driver that steps the simulation once per display refresh
//! - `tuning`: Data-driven game balance and startup configuration errors

pub mod driver;
pub mod sim;
pub mod tuning;

pub use driver::{FixedRefresh, FrameDriver, RefreshSource, Schedule};
pub use tuning::{ConfigError, Tuning, os_seed};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Nominal display refresh (60 Hz), used by headless runs
    pub const REFRESH_INTERVAL_MS: f64 = 1000.0 / 60.0;
    /// Longest gap between refreshes fed to the countdown clock
    pub const MAX_FRAME_ELAPSED_MS: f64 = 100.0;

    /// Canvas dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 300.0;
    /// Height of the ground strip at the bottom of the canvas
    pub const GROUND_HEIGHT: f32 = 20.0;

    /// Player geometry
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_WIDTH: f32 = 18.0;
    pub const PLAYER_HEIGHT: f32 = 36.0;
    /// Feet rest this far above the ground line
    pub const PLAYER_FEET_OFFSET: f32 = 6.0;

    /// Vertical physics (pixels per tick)
    pub const GRAVITY: f32 = 0.8;
    pub const JUMP_VELOCITY: f32 = -12.0;

    /// Spawner defaults
    pub const SPAWN_INTERVAL: u64 = 90;
    /// Obstacles appear this far past the right edge
    pub const SPAWN_MARGIN: f32 = 10.0;
    pub const OBSTACLE_MIN_HEIGHT: f32 = 20.0;
    pub const OBSTACLE_MAX_HEIGHT: f32 = 60.0;
    pub const OBSTACLE_MIN_WIDTH: f32 = 18.0;
    pub const OBSTACLE_MAX_WIDTH: f32 = 38.0;

    /// Difficulty: speed = BASE_SPEED + floor(score / SPEED_STEP_SCORE)
    pub const BASE_SPEED: f32 = 4.0;
    pub const SPEED_STEP_SCORE: u64 = 10;

    /// Countdown phase durations (3, 2, 1, GO!)
    pub const COUNTDOWN_STEP_MS: f64 = 700.0;
    pub const COUNTDOWN_GO_MS: f64 = 600.0;
}

/// Axis-aligned rectangle in canvas space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Strict overlap on both axes (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}
