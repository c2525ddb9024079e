//! Flick gesture: windup and spring release
//!
//! While attached, the hand's offset follows the flick stick at a limited
//! speed (the windup). Snapping the stick back the way it came starts a
//! release: a spring pulls the offset toward an aim point past the stick
//! while drag bleeds off speed. Once the squared speed drops under the end
//! threshold the offset is absorbed into the hand's base position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::reflect_velocity;
use super::wall::Contact;
use crate::tuning::FlickTuning;

/// Number of release ticks during which a repeated snap may still re-aim
const RELEASE_AIM_TICKS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReleaseState {
    /// Offset follows the windup input
    Attached,
    /// Offset is driven by the spring toward `target`
    Releasing {
        velocity: Vec2,
        /// Aim point in offset space
        target: Vec2,
        /// Integration steps taken so far
        ticks: u32,
    },
}

/// Emitted once when a release finishes or is cancelled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReleaseEnd {
    /// Where the hand came to rest
    pub position: Vec2,
    /// Release speed at the moment it ended
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlickController {
    /// Hand position with no offset applied
    base: Vec2,
    /// Current offset in stick units
    offset: Vec2,
    /// Last stick reading
    windup: Vec2,
    state: ReleaseState,
    tuning: FlickTuning,
}

impl FlickController {
    pub fn new(tuning: &FlickTuning, base: Vec2) -> Self {
        Self {
            base,
            offset: Vec2::ZERO,
            windup: Vec2::ZERO,
            state: ReleaseState::Attached,
            tuning: tuning.clone(),
        }
    }

    /// Ingest one tick of flick-stick input
    pub fn read(&mut self, input: Vec2) {
        let prev = self.windup;
        self.windup = input;

        if !self.is_release_locked() {
            self.read_release(prev, input);
        }
    }

    /// Detect the stick snapping back against its previous direction
    fn read_release(&mut self, prev: Vec2, next: Vec2) {
        let delta = next - prev;
        let align = prev.normalize_or_zero().dot(delta.normalize_or_zero());
        if (align + 1.0).abs() > self.tuning.release_alignment {
            return;
        }

        if self.state == ReleaseState::Attached {
            log::debug!("release started from offset {:?}", self.offset);
            self.state = ReleaseState::Releasing {
                velocity: Vec2::ZERO,
                target: next,
                ticks: 0,
            };
        }

        // aim past the stick by the size of the snap
        if let ReleaseState::Releasing {
            velocity, target, ..
        } = &mut self.state
        {
            if delta.length() > velocity.length() {
                *target = next + delta;
            }
        }
    }

    /// Advance the windup or the release by `dt`
    pub fn update(&mut self, dt: f32) -> Option<ReleaseEnd> {
        match self.state {
            ReleaseState::Attached => {
                self.track_windup(dt);
                None
            }
            ReleaseState::Releasing {
                velocity,
                target,
                ticks,
            } => {
                let mut v = velocity + self.tuning.release_spring * (target - self.offset);
                v *= self.tuning.release_drag;

                if v.length_squared() <= self.tuning.release_end_speed {
                    return self.finish();
                }

                self.offset += v * dt;
                self.state = ReleaseState::Releasing {
                    velocity: v,
                    target,
                    ticks: ticks + 1,
                };
                None
            }
        }
    }

    /// Move the offset toward the stick at the windup speed
    fn track_windup(&mut self, dt: f32) {
        if self.offset == self.windup {
            return;
        }

        let dir = (self.windup - self.offset).normalize_or_zero();
        let mut next = self.offset + dir * self.tuning.windup_speed * dt;

        // snap if we overshot
        if dir.dot(self.windup - next) < 0.0 {
            next = self.windup;
        }

        self.offset = next;
    }

    /// Reflect the release off a surface and re-aim along the new heading
    ///
    /// The remaining distance from the contact to the old aim point is kept.
    /// Returns false (and does nothing) while attached.
    pub fn bounce(&mut self, contact: Contact) -> bool {
        let ReleaseState::Releasing {
            velocity,
            target,
            ticks,
        } = self.state
        else {
            return false;
        };

        let v1 = reflect_velocity(velocity, contact.normal);

        let aim = self.to_world(target);
        let dist = contact.point.distance(aim);
        let next_aim = contact.point + v1.normalize_or_zero() * dist;

        log::debug!(
            "release bounced at {:?}: velocity {:?} -> {:?}",
            contact.point,
            velocity,
            v1
        );

        self.state = ReleaseState::Releasing {
            velocity: v1,
            target: self.to_offset(next_aim),
            ticks,
        };
        true
    }

    /// Force an active release to end now; no-op while attached
    pub fn cancel(&mut self) -> Option<ReleaseEnd> {
        if self.is_releasing() {
            self.finish()
        } else {
            None
        }
    }

    /// Absorb the offset into the base and return to attached
    fn finish(&mut self) -> Option<ReleaseEnd> {
        let speed = self.speed();
        self.base = self.position();
        self.offset = Vec2::ZERO;
        self.state = ReleaseState::Attached;

        log::debug!("release ended at {:?} (speed {:.3})", self.base, speed);
        Some(ReleaseEnd {
            position: self.base,
            speed,
        })
    }

    fn to_world(&self, offset: Vec2) -> Vec2 {
        self.base + offset * self.tuning.scale
    }

    fn to_offset(&self, world: Vec2) -> Vec2 {
        (world - self.base) / self.tuning.scale
    }

    /// Hand position: base plus the scaled offset
    pub fn position(&self) -> Vec2 {
        self.to_world(self.offset)
    }

    pub fn base(&self) -> Vec2 {
        self.base
    }

    pub fn set_base(&mut self, base: Vec2) {
        self.base = base;
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn state(&self) -> ReleaseState {
        self.state
    }

    /// Pitch shift for the footsteps voice
    pub fn pitch_shift(&self) -> f32 {
        self.offset.length() * self.tuning.pitch_scale
    }

    /// Release speed, zero while attached
    pub fn speed(&self) -> f32 {
        match self.state {
            ReleaseState::Releasing { velocity, .. } => velocity.length(),
            ReleaseState::Attached => 0.0,
        }
    }

    pub fn is_releasing(&self) -> bool {
        matches!(self.state, ReleaseState::Releasing { .. })
    }

    /// If the hand is displaced from its base
    pub fn is_active(&self) -> bool {
        self.offset != Vec2::ZERO
    }

    /// Release has run long enough that new snaps no longer re-aim it
    fn is_release_locked(&self) -> bool {
        matches!(self.state, ReleaseState::Releasing { ticks, .. } if ticks > RELEASE_AIM_TICKS)
    }
}
