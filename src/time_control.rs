//! # Simulation clock
//!
//! Turns the wall-clock time elapsed between two frames into simulated seconds. The
//! frame delta is clamped so that a stalled frame never produces a huge tick, then
//! multiplied by the current entry of [`TIME_SCALE`].
//!
//! The simulated calendar time is kept as a [`hifitime::Epoch`].

use hifitime::{Duration, Epoch};
use std::fmt;

use crate::constants::Second;

/// Selectable simulation speeds (simulated seconds per real second).
pub const TIME_SCALE: [f64; 11] = [
    1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0, 3600.0,
];

/// Largest real frame delta fed into a tick, in seconds.
pub const MAX_FRAME_DELTA: Second = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    pub epoch: Epoch,
    speed: usize,
    paused: bool,
    pub max_frame_delta: Second,
}

impl SimulationClock {
    /// Clock starting at `epoch`, running at real time.
    pub fn new(epoch: Epoch) -> Self {
        SimulationClock {
            epoch,
            speed: 0,
            paused: false,
            max_frame_delta: MAX_FRAME_DELTA,
        }
    }

    /// Clock starting at a UNIX timestamp in seconds.
    pub fn from_unix_seconds(seconds: f64) -> Self {
        Self::new(Epoch::from_unix_seconds(seconds))
    }

    /// Index of the current speed in [`TIME_SCALE`].
    pub fn speed(&self) -> usize {
        self.speed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Simulated seconds per real second.
    pub fn time_scale(&self) -> f64 {
        TIME_SCALE[self.speed]
    }

    /// Consume a real frame delta and return the simulated step, advancing the epoch.
    ///
    /// Return
    /// ----------
    /// * `min(real_delta, max_frame_delta) × time_scale`, or `0` when paused or when
    ///   `real_delta` is negative or NaN.
    pub fn tick(&mut self, real_delta: Second) -> Second {
        if self.paused || !(real_delta > 0.0) {
            return 0.0;
        }
        let dt = real_delta.min(self.max_frame_delta) * self.time_scale();
        self.epoch = self.epoch + Duration::from_seconds(dt);
        dt
    }

    /// Next speed up; also resumes a paused clock. No-op at the fastest speed.
    pub fn faster(&mut self) {
        if self.speed + 1 < TIME_SCALE.len() {
            self.speed += 1;
            self.paused = false;
        }
    }

    /// Next speed down; pauses when already at the slowest speed.
    pub fn slower(&mut self) {
        if self.speed == 0 {
            self.paused = true;
        } else {
            self.speed -= 1;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::from_unix_seconds(0.0)
    }
}

impl fmt::Display for SimulationClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.paused { "paused" } else { "running" };
        write!(f, "{} (x{}, {state})", self.epoch, self.time_scale())
    }
}
