//! Frame driver
//!
//! Replaces a self-rescheduling animation callback with an explicit driver:
//! the refresh source calls [`FrameDriver::on_refresh`] once per display
//! refresh and reschedules only while it answers [`Schedule::Continue`].

use crate::consts::{MAX_FRAME_ELAPSED_MS, REFRESH_INTERVAL_MS};
use crate::sim::{CountdownStep, GamePhase, GameState, TickOutcome, advance_countdown, tick};

/// Whether the refresh source should request another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Continue,
    Stop,
}

/// Source of display refresh timestamps (milliseconds)
pub trait RefreshSource {
    /// Timestamp of the next refresh, or `None` when the source is exhausted
    fn next_refresh(&mut self) -> Option<f64>;
}

/// Simulated display clock with a fixed interval, for tests and headless runs
#[derive(Debug, Clone)]
pub struct FixedRefresh {
    interval_ms: f64,
    now_ms: f64,
    remaining: Option<u64>,
}

impl FixedRefresh {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            now_ms: 0.0,
            remaining: None,
        }
    }

    /// Nominal 60 Hz display
    pub fn sixty_hz() -> Self {
        Self::new(REFRESH_INTERVAL_MS)
    }

    /// Stop after `frames` refreshes
    pub fn limit(mut self, frames: u64) -> Self {
        self.remaining = Some(frames);
        self
    }
}

impl RefreshSource for FixedRefresh {
    fn next_refresh(&mut self) -> Option<f64> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        let now = self.now_ms;
        self.now_ms += self.interval_ms;
        Some(now)
    }
}

/// Steps a [`GameState`] once per refresh and owns the running flag
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    /// Set when the countdown finishes, cleared on collision
    running: bool,
    last_time_ms: Option<f64>,
    /// Simulation ticks performed
    ticks: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Handle one display refresh at `time_ms`.
    ///
    /// During the countdown only the countdown clock advances; the tick loop
    /// starts on the refresh after it completes. The running flag is checked
    /// before anything is touched, so a refresh that arrives after a collision
    /// never mutates the run. On the collision refresh the state holds the
    /// collision frame; render it once more, then stop scheduling.
    pub fn on_refresh(&mut self, state: &mut GameState, time_ms: f64) -> Schedule {
        let elapsed = match self.last_time_ms {
            Some(last) => (time_ms - last).clamp(0.0, MAX_FRAME_ELAPSED_MS),
            None => 0.0,
        };
        self.last_time_ms = Some(time_ms);

        if state.phase == GamePhase::Countdown {
            if advance_countdown(state, elapsed) == CountdownStep::Finished {
                log::info!("Countdown finished, loop starting");
                self.running = true;
            }
            return Schedule::Continue;
        }

        if !self.running {
            return Schedule::Stop;
        }

        match tick(state) {
            TickOutcome::Stepped => {
                self.ticks += 1;
                Schedule::Continue
            }
            TickOutcome::Collided(_) => {
                self.ticks += 1;
                self.running = false;
                Schedule::Stop
            }
            TickOutcome::Frozen => {
                self.running = false;
                Schedule::Stop
            }
        }
    }

    /// Pump refreshes from `source` until the driver stops or the source runs
    /// dry. `before_frame` runs ahead of each refresh (input goes here).
    /// Returns the number of refreshes handled.
    pub fn run<S, F>(&mut self, state: &mut GameState, source: &mut S, mut before_frame: F) -> u64
    where
        S: RefreshSource + ?Sized,
        F: FnMut(&mut GameState),
    {
        let mut refreshes = 0;
        while let Some(time_ms) = source.next_refresh() {
            before_frame(state);
            refreshes += 1;
            if self.on_refresh(state, time_ms) == Schedule::Stop {
                break;
            }
        }
        refreshes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::Obstacle;

    fn started() -> GameState {
        let mut state = GameState::new(Tuning::default(), 3).unwrap();
        state.request_start();
        state
    }

    #[test]
    fn test_idle_does_not_schedule() {
        let mut state = GameState::new(Tuning::default(), 3).unwrap();
        let mut driver = FrameDriver::new();
        assert_eq!(driver.on_refresh(&mut state, 0.0), Schedule::Stop);
        assert_eq!(state.frame, 0);
    }

    #[test]
    fn test_countdown_runs_without_ticking() {
        let mut state = started();
        let mut driver = FrameDriver::new();
        let mut t = 0.0;
        while state.phase == GamePhase::Countdown {
            assert_eq!(driver.on_refresh(&mut state, t), Schedule::Continue);
            assert!(state.phase != GamePhase::Countdown || !driver.is_running());
            assert_eq!(state.frame, 0);
            t += 50.0;
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert!(driver.is_running());
        // 2700 ms of countdown in 50 ms refreshes, the first one measuring zero
        assert_eq!(t, 2750.0);

        assert_eq!(driver.on_refresh(&mut state, t), Schedule::Continue);
        assert_eq!(state.frame, 1);
        assert_eq!(driver.ticks(), 1);
    }

    #[test]
    fn test_long_pause_is_clamped() {
        let mut state = started();
        let mut driver = FrameDriver::new();
        driver.on_refresh(&mut state, 0.0);
        driver.on_refresh(&mut state, 10_000.0);
        let remaining = state.countdown.map(|c| c.total_remaining_ms());
        assert_eq!(remaining, Some(2700.0 - MAX_FRAME_ELAPSED_MS));
    }

    #[test]
    fn test_stops_after_collision() {
        let mut state = started();
        let mut driver = FrameDriver::new();
        let mut source = FixedRefresh::sixty_hz();
        driver.run(&mut state, &mut source, |_| {});
        // FixedRefresh is unbounded; the run ends by colliding with the first obstacle
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!driver.is_running());

        let frame = state.frame;
        let snapshot = state.snapshot();
        assert_eq!(driver.on_refresh(&mut state, 1e9), Schedule::Stop);
        assert_eq!(state.frame, frame);
        assert_eq!(state.snapshot(), snapshot);
    }

    #[test]
    fn test_late_refresh_after_external_freeze() {
        let mut state = started();
        let mut driver = FrameDriver::new();
        let mut source = FixedRefresh::sixty_hz().limit(200);
        driver.run(&mut state, &mut source, |_| {});
        assert!(driver.is_running());

        // Collision frozen outside the driver; the next refresh must not tick
        let id = state.next_obstacle_id();
        state.obstacles.push(Obstacle {
            id,
            x: state.player.x - 5.0,
            y: state.tuning.ground_y() - 40.0,
            width: 20.0,
            height: 40.0,
            passed: false,
        });
        assert!(matches!(tick(&mut state), TickOutcome::Collided(_)));
        let frame = state.frame;
        assert_eq!(driver.on_refresh(&mut state, 1e6), Schedule::Stop);
        assert!(!driver.is_running());
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_fixed_refresh_limit() {
        let mut source = FixedRefresh::new(10.0).limit(3);
        assert_eq!(source.next_refresh(), Some(0.0));
        assert_eq!(source.next_refresh(), Some(10.0));
        assert_eq!(source.next_refresh(), Some(20.0));
        assert_eq!(source.next_refresh(), None);
    }
}
