//! Command dispatch and the per-frame simulation step
//!
//! Start and jump share one input channel; what a press means is decided by
//! the current phase, never by which device sent it.

use super::collision::{CollisionResult, check_collision};
use super::countdown::{Countdown, CountdownPhase, CountdownStep};
use super::physics;
use super::spawner::{advance, reap, score_passes, should_spawn, spawn, speed_for_score};
use super::state::{GameEvent, GamePhase, GameState};

/// Player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Dedicated start control (start button)
    Start,
    /// Dedicated jump control
    Jump,
    /// Shared click/key channel: start when idle, jump when running
    Press,
}

/// What a command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Countdown began
    Started,
    Jumped,
    /// Not valid in the current phase; nothing changed
    Ignored,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// One frame simulated
    Stepped,
    /// Frame simulated and the run ended on this collision
    Collided(CollisionResult),
    /// Not running; nothing changed
    Frozen,
}

/// Apply a command according to the phase transition table
pub fn dispatch(state: &mut GameState, command: Command) -> CommandOutcome {
    match (state.phase, command) {
        (GamePhase::Idle, Command::Start | Command::Press) => {
            if !state.obstacles.is_empty() || state.score != 0 {
                return CommandOutcome::Ignored;
            }
            state.countdown = Some(Countdown::new(&state.tuning));
            state.set_phase(GamePhase::Countdown);
            state.events.push(GameEvent::CountdownStep(CountdownPhase::Three));
            CommandOutcome::Started
        }
        (GamePhase::Running, Command::Jump | Command::Press) => {
            if physics::jump(&mut state.player, &state.tuning) {
                state.events.push(GameEvent::Jumped);
                CommandOutcome::Jumped
            } else {
                CommandOutcome::Ignored
            }
        }
        _ => CommandOutcome::Ignored,
    }
}

/// Advance the countdown clock; enters `Running` when it completes
pub fn advance_countdown(state: &mut GameState, elapsed_ms: f64) -> CountdownStep {
    if state.phase != GamePhase::Countdown {
        return CountdownStep::Pending;
    }
    let Some(countdown) = state.countdown.as_mut() else {
        return CountdownStep::Pending;
    };

    let step = countdown.advance(elapsed_ms);
    match step {
        CountdownStep::Pending => {}
        CountdownStep::Changed(phase) => {
            state.events.push(GameEvent::CountdownStep(phase));
        }
        CountdownStep::Finished => {
            state.countdown = None;
            state.set_phase(GamePhase::Running);
        }
    }
    step
}

/// Advance the run by one frame
pub fn tick(state: &mut GameState) -> TickOutcome {
    if state.phase != GamePhase::Running {
        return TickOutcome::Frozen;
    }

    physics::integrate(&mut state.player, &state.tuning);

    if should_spawn(state.frame, state.tuning.spawn_interval) {
        let id = state.next_obstacle_id();
        let obstacle = spawn(&mut state.rng, id, &state.tuning);
        log::debug!(
            "Spawned obstacle {} ({:.1}x{:.1}) at frame {}",
            id,
            obstacle.width,
            obstacle.height,
            state.frame
        );
        state.obstacles.push(obstacle);
        state.events.push(GameEvent::ObstacleSpawned { id });
    }

    let speed = speed_for_score(state.score, &state.tuning);
    advance(&mut state.obstacles, speed);

    // Scoring before reaping: nothing leaves the set unscored
    for id in score_passes(&mut state.obstacles, state.player.x) {
        state.score += 1;
        log::debug!("Cleared obstacle {} (score {})", id, state.score);
        state.events.push(GameEvent::ObstacleCleared { id, score: state.score });
    }
    let new_speed = speed_for_score(state.score, &state.tuning);
    if new_speed > speed {
        log::info!("Speed up: {} -> {}", speed, new_speed);
        state.events.push(GameEvent::SpeedIncreased { speed: new_speed });
    }

    reap(&mut state.obstacles);
    state.frame += 1;

    if let Some(hit) = check_collision(&state.player, &state.obstacles) {
        log::info!(
            "Collision with obstacle {} at frame {}, final score {}",
            hit.obstacle_id,
            state.frame,
            state.score
        );
        state.events.push(GameEvent::Collision {
            obstacle_id: hit.obstacle_id,
            frame: state.frame,
        });
        state.set_phase(GamePhase::GameOver);
        return TickOutcome::Collided(hit);
    }

    TickOutcome::Stepped
}

impl GameState {
    /// Apply a command; see [`dispatch`]
    pub fn dispatch(&mut self, command: Command) -> CommandOutcome {
        dispatch(self, command)
    }

    /// Start command (start button)
    pub fn request_start(&mut self) -> CommandOutcome {
        dispatch(self, Command::Start)
    }

    /// Jump command
    pub fn request_jump(&mut self) -> CommandOutcome {
        dispatch(self, Command::Jump)
    }

    /// Shared click/key input
    pub fn press(&mut self) -> CommandOutcome {
        dispatch(self, Command::Press)
    }
}
