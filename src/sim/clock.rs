//! Round clock
//!
//! A session is `total_steps` equal slices of `step_duration` seconds. The
//! clock itself is stateless: callers keep the remaining time and feed it
//! back in each frame.

use serde::{Deserialize, Serialize};

use crate::consts::CLOCK_EPSILON;
use crate::error::ConfigError;
use crate::settings::validate_round;

/// Result of advancing (or sampling) the clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockReading {
    /// Seconds left in the session, never negative
    pub remaining: f64,
    /// 1-based step index
    pub current_step: u32,
    /// Seconds spent in the current step
    pub step_elapsed: f64,
    /// Remaining time has reached zero
    pub expired: bool,
}

/// Step layout of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundClock {
    total_steps: u32,
    step_duration: f64,
}

impl RoundClock {
    pub fn new(total_steps: u32, step_duration: f64) -> Result<Self, ConfigError> {
        validate_round(total_steps, step_duration)?;
        Ok(Self {
            total_steps,
            step_duration,
        })
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn step_duration(&self) -> f64 {
        self.step_duration
    }

    /// Full session length in seconds
    pub fn length(&self) -> f64 {
        self.total_steps as f64 * self.step_duration
    }

    /// Sample the clock at `remaining` seconds without advancing
    pub fn reading(&self, remaining: f64) -> ClockReading {
        let remaining = if remaining <= CLOCK_EPSILON {
            0.0
        } else {
            remaining
        };

        let slices_left = (remaining / self.step_duration).floor();
        let step = self.total_steps as f64 - slices_left;
        let current_step = step.clamp(1.0, self.total_steps as f64) as u32;

        ClockReading {
            remaining,
            current_step,
            step_elapsed: self.step_duration - remaining % self.step_duration,
            expired: remaining == 0.0,
        }
    }

    /// Advance from `remaining` by `delta` seconds (negative deltas count as 0)
    pub fn advance(&self, remaining: f64, delta: f64) -> ClockReading {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.reading((remaining - delta).max(0.0))
    }
}
