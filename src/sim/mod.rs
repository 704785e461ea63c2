//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per tick, no wall-clock time
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod countdown;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, check_collision};
pub use countdown::{Countdown, CountdownPhase, CountdownStep};
pub use physics::{integrate, jump};
pub use spawner::{advance, reap, score_passes, should_spawn, spawn, speed_for_score};
pub use state::{GameEvent, GamePhase, GameState, Obstacle, Player, Snapshot};
pub use tick::{Command, CommandOutcome, TickOutcome, advance_countdown, dispatch, tick};
