//! Progress-to-boundary mapping
//!
//! Progress is a cyclic value in [0, 1) that walks the four sides of the unit
//! square arena. Each quarter of progress is one side ("segment"); the corner
//! where the segment starts is its anchor.
//!
//! ```text
//!  (0,1) ----- (1,1)
//!    |    1      |
//!    | 0       2 |
//!    |      3    |
//!  (0,0) ----- (1,0)
//! ```

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::repeat;

/// Arena corners in progress order
pub const CORNERS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
];

/// The pair of points drawn for a progress value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoints {
    /// Corner the current segment starts from
    pub anchor: Vec2,
    /// Point one unit from the anchor, sweeping a quarter turn per segment
    pub floating: Vec2,
}

/// Which side of the arena is active, in 0..4
#[inline]
pub fn corner_index(progress: f32) -> u8 {
    let p = repeat(progress, 1.0);
    ((p * 4.0).floor() as u8).min(3)
}

/// Map progress to its anchor corner and floating point
pub fn boundary_points(progress: f32) -> BoundaryPoints {
    let p = repeat(progress, 1.0);
    let segment = corner_index(p) as f32;

    let anchor = Vec2::new(repeat(p, 1.0).round(), repeat(p + 0.25, 1.0).round());

    let a0 = TAU - segment * FRAC_PI_2;
    let theta = a0 + repeat(p, 0.25) * TAU;
    let floating = anchor + Vec2::new(theta.cos(), theta.sin());

    BoundaryPoints { anchor, floating }
}

/// The point on the arena perimeter for a progress value
///
/// Moves linearly from the segment's anchor to the next corner, so the path
/// is continuous across segments.
pub fn perimeter_point(progress: f32) -> Vec2 {
    let p = repeat(progress, 1.0);
    let segment = corner_index(p) as usize;
    let t = repeat(p, 0.25) * 4.0;

    CORNERS[segment].lerp(CORNERS[(segment + 1) % 4], t)
}
