//! Fixed timestep accumulator
//!
//! Turns display refresh timestamps (ms) into a whole number of simulation
//! steps, so physics runs at the same rate on 60 Hz and 144 Hz displays.

use crate::consts::{MAX_FRAME_DELTA_MS, SIM_DT_MS};

/// Accumulates wall-clock time and hands it out in fixed steps
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step_ms: f64,
    accumulator: f64,
    last_time: Option<f64>,
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(SIM_DT_MS)
    }
}

impl FixedStepClock {
    pub fn new(step_ms: f64) -> Self {
        Self {
            step_ms,
            accumulator: 0.0,
            last_time: None,
        }
    }

    /// Feed the timestamp of the current frame and return how many steps to run
    ///
    /// The first timestamp only sets the baseline. Backwards timestamps count as
    /// zero elapsed time, and a single frame never contributes more than
    /// `MAX_FRAME_DELTA_MS`.
    pub fn advance(&mut self, timestamp_ms: f64) -> u32 {
        let delta = match self.last_time {
            Some(last) => (timestamp_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_time = Some(timestamp_ms);
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator >= self.step_ms {
            self.accumulator -= self.step_ms;
            steps += 1;
        }
        steps
    }

    /// Leftover time not yet consumed by a whole step (ms)
    pub fn accumulated(&self) -> f64 {
        self.accumulator
    }

    /// Forget the baseline, e.g. after the tab was hidden
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
}
