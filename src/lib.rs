//! Wands - a two-player flick-and-release duel around a square arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (boundary movement, flick release, collisions)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration and join errors
//! - `bot`: Scripted input source for headless matches

pub mod bot;
pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, JoinError, ReplayError};
pub use tuning::Tuning;

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Number of agents the collision mask has room for
    pub const MAX_AGENTS: usize = 2;

    /// Number of arena walls
    pub const WALL_COUNT: usize = 4;

    /// Arena is the unit square [ARENA_MIN, ARENA_MAX]²
    pub const ARENA_MIN: f32 = 0.0;
    pub const ARENA_MAX: f32 = 1.0;

    /// Input direction that maps to progress zero (points at the (0,0) corner)
    pub const DIR_ZERO: glam::Vec2 = glam::Vec2::new(-1.0, -1.0);
}

/// Wrap `value` into [0, length)
#[inline]
pub fn repeat(value: f32, length: f32) -> f32 {
    let r = value.rem_euclid(length);
    // rem_euclid can round up to `length` for tiny negative inputs
    if r >= length { 0.0 } else { r }
}

/// Clockwise angle from `from` to `to` as a fraction of a full turn, in [0, 1)
///
/// Returns 0 when either vector is zero.
#[inline]
pub fn clockwise_turn(from: Vec2, to: Vec2) -> f32 {
    if from == Vec2::ZERO || to == Vec2::ZERO {
        return 0.0;
    }

    let ccw = from.perp_dot(to).atan2(from.dot(to));
    repeat(-ccw / std::f32::consts::TAU, 1.0)
}
