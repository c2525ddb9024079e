//! Arena walls
//!
//! The arena is the unit square. Each wall is a half-plane just outside one
//! side; a point on or past the boundary line is in contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_MAX, ARENA_MIN};

/// A point of contact with a surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Where the contact happened
    pub point: Vec2,
    /// Unit surface normal, pointing back into the arena
    pub normal: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wall {
    Top,
    Bottom,
    Left,
    Right,
}

impl Wall {
    /// All walls in mask order
    pub const ALL: [Wall; 4] = [Wall::Top, Wall::Bottom, Wall::Left, Wall::Right];

    /// Position in [`Wall::ALL`]
    pub fn index(self) -> usize {
        match self {
            Wall::Top => 0,
            Wall::Bottom => 1,
            Wall::Left => 2,
            Wall::Right => 3,
        }
    }

    /// Normal pointing into the arena
    pub fn normal(self) -> Vec2 {
        match self {
            Wall::Top => Vec2::NEG_Y,
            Wall::Bottom => Vec2::Y,
            Wall::Left => Vec2::X,
            Wall::Right => Vec2::NEG_X,
        }
    }

    /// If the point has reached this wall
    pub fn overlaps(self, p: Vec2) -> bool {
        match self {
            Wall::Top => p.y >= ARENA_MAX,
            Wall::Bottom => p.y <= ARENA_MIN,
            Wall::Left => p.x <= ARENA_MIN,
            Wall::Right => p.x >= ARENA_MAX,
        }
    }

    /// Contact at `p` if it has reached this wall
    pub fn collide(self, p: Vec2) -> Option<Contact> {
        self.overlaps(p).then(|| Contact {
            point: p,
            normal: self.normal(),
        })
    }
}
