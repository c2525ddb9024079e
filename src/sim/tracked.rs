//! Change tracking for per-tick values
//!
//! A [`Tracked`] keeps the value from the previous tick next to the current
//! one. Callers set it once per tick and ask whether it changed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracked<T> {
    previous: T,
    current: T,
}

impl<T: Copy + PartialEq> Tracked<T> {
    /// Start unchanged at `value`
    pub fn new(value: T) -> Self {
        Self {
            previous: value,
            current: value,
        }
    }

    /// Record this tick's value; the old current becomes previous
    pub fn set(&mut self, value: T) {
        self.previous = self.current;
        self.current = value;
    }

    pub fn get(&self) -> T {
        self.current
    }

    pub fn changed(&self) -> bool {
        self.previous != self.current
    }

    /// The new value if it changed on the last `set`
    pub fn changed_to(&self) -> Option<T> {
        self.changed().then_some(self.current)
    }
}
