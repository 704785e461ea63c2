//! Pre-run countdown (3, 2, 1, GO!)
//!
//! A timed-state object advanced by an external clock, so the sequence can be
//! stepped synchronously in tests instead of waiting on real timers.

use serde::{Deserialize, Serialize};

use crate::Tuning;

/// Visible countdown phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownPhase {
    Three,
    Two,
    One,
    Go,
}

impl CountdownPhase {
    /// Overlay text
    pub fn label(&self) -> &'static str {
        match self {
            CountdownPhase::Three => "3",
            CountdownPhase::Two => "2",
            CountdownPhase::One => "1",
            CountdownPhase::Go => "GO!",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            CountdownPhase::Three => Some(CountdownPhase::Two),
            CountdownPhase::Two => Some(CountdownPhase::One),
            CountdownPhase::One => Some(CountdownPhase::Go),
            CountdownPhase::Go => None,
        }
    }
}

/// Result of advancing the countdown clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Still in the same phase
    Pending,
    /// Entered a new phase (the last one entered, if several elapsed)
    Changed(CountdownPhase),
    /// Sequence complete
    Finished,
}

/// Countdown timer state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    phase: CountdownPhase,
    remaining_ms: f64,
    step_ms: f64,
    go_ms: f64,
}

impl Countdown {
    pub fn new(tuning: &Tuning) -> Self {
        Self::with_durations(tuning.countdown_step_ms, tuning.countdown_go_ms)
    }

    pub fn with_durations(step_ms: f64, go_ms: f64) -> Self {
        Self {
            phase: CountdownPhase::Three,
            remaining_ms: step_ms,
            step_ms,
            go_ms,
        }
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms
    }

    /// Total time left until the run starts
    pub fn total_remaining_ms(&self) -> f64 {
        let mut total = self.remaining_ms;
        let mut phase = self.phase;
        while let Some(next) = phase.next() {
            total += self.duration_of(next);
            phase = next;
        }
        total
    }

    fn duration_of(&self, phase: CountdownPhase) -> f64 {
        match phase {
            CountdownPhase::Go => self.go_ms,
            _ => self.step_ms,
        }
    }

    /// Advance by `elapsed_ms`, carrying leftover time into later phases
    pub fn advance(&mut self, elapsed_ms: f64) -> CountdownStep {
        let mut left = elapsed_ms.max(0.0);
        let mut changed = false;

        while left >= self.remaining_ms {
            left -= self.remaining_ms;
            match self.phase.next() {
                Some(next) => {
                    self.phase = next;
                    self.remaining_ms = self.duration_of(next);
                    changed = true;
                }
                None => {
                    self.remaining_ms = 0.0;
                    return CountdownStep::Finished;
                }
            }
        }
        self.remaining_ms -= left;

        if changed {
            CountdownStep::Changed(self.phase)
        } else {
            CountdownStep::Pending
        }
    }
}
