//! Tick-polled timers and tuning curves
//!
//! Timers advance only when the owning controller passes them a `dt`, so
//! every timed effect (dash decay, hitstop) is a pure function of the
//! simulation inputs.

use serde::{Deserialize, Serialize};

/// Easing shape for a normalized time value in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    #[default]
    OutQuad,
    InOutCubic,
}

impl Ease {
    /// Map t in [0, 1] to [0, 1]; monotonic non-decreasing
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// `base + slope * x`, clamped to [0, max]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCurve {
    pub base: f32,
    pub slope: f32,
    pub max: f32,
}

impl LinearCurve {
    pub fn sample(&self, x: f32) -> f32 {
        (self.base + self.slope * x).min(self.max).max(0.0)
    }
}

/// A one-shot timer measured in simulation seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timer {
    elapsed: f32,
    duration: f32,
    running: bool,
}

impl Timer {
    /// (Re)start the timer from zero
    pub fn start(&mut self, duration: f32) {
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
        self.running = true;
    }

    /// Advance by `dt`; the timer stops itself once elapsed reaches duration
    pub fn tick(&mut self, dt: f32) {
        if !self.running {
            return;
        }

        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.elapsed >= self.duration {
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Normalized progress in [0, 1]; 1 when stopped or zero-length
    pub fn progress(&self) -> f32 {
        if !self.running || self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn remaining(&self) -> f32 {
        if self.running {
            self.duration - self.elapsed
        } else {
            0.0
        }
    }
}
