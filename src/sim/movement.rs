//! Boundary movement
//!
//! The move stick picks a destination progress; the agent's foot travels
//! around the arena toward it along the shorter arc. Starting from idle or
//! reversing direction triggers a dash that briefly doubles the speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pattern::{BoundaryPoints, boundary_points, corner_index, perimeter_point};
use super::timer::{Ease, Timer};
use super::tracked::Tracked;
use crate::consts::DIR_ZERO;
use crate::tuning::MoveTuning;
use crate::{clockwise_turn, repeat};

/// Number of past input directions compared against for reversals
pub const HISTORY_DEPTH: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveController {
    /// Current progress in [0, 1)
    progress: f32,
    /// Progress we are moving toward
    destination: f32,
    /// Recent input directions, newest first
    history: [Vec2; HISTORY_DEPTH],
    /// Dash boost window
    dash: Timer,
    corner: Tracked<u8>,
    speed: f32,
    dash_duration: f32,
    dash_ease: Ease,
}

impl MoveController {
    pub fn new(tuning: &MoveTuning, progress: f32) -> Self {
        let progress = repeat(progress, 1.0);
        Self {
            progress,
            destination: progress,
            history: [Vec2::ZERO; HISTORY_DEPTH],
            dash: Timer::default(),
            corner: Tracked::new(corner_index(progress)),
            speed: tuning.speed,
            dash_duration: tuning.dash_duration,
            dash_ease: tuning.dash_ease,
        }
    }

    /// Ingest one tick of move-stick input
    pub fn read(&mut self, input: Vec2) {
        if input != Vec2::ZERO && self.is_dash(input) {
            self.dash.start(self.dash_duration);
        }

        self.destination = if input == Vec2::ZERO {
            self.progress
        } else {
            clockwise_turn(DIR_ZERO, input)
        };

        self.history.rotate_right(1);
        self.history[0] = input;
    }

    /// A dash starts from idle or on any reversal against recent input
    fn is_dash(&self, input: Vec2) -> bool {
        !self.is_active() || self.history.iter().any(|prev| prev.dot(input) < 0.0)
    }

    /// Advance toward the destination
    pub fn update(&mut self, dt: f32) {
        let dist = self.destination - self.progress;

        if dist != 0.0 && dist != 1.0 {
            let d = dist.signum();
            let wraps = dist.abs() > 0.5;
            let m = if wraps { -d } else { d };
            let remaining = if wraps { 1.0 - dist.abs() } else { dist.abs() };

            let step = self.speed * (1.0 + self.dash_accel()) * dt;

            // snap instead of overshooting
            let next = if step >= remaining {
                self.destination
            } else {
                self.progress + step * m
            };

            self.progress = repeat(next, 1.0);
        }

        self.corner.set(corner_index(self.progress));
        self.dash.tick(dt);
    }

    /// Keep the current position for a tick without reporting a corner change
    pub fn hold(&mut self) {
        self.corner.set(self.corner.get());
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn destination(&self) -> f32 {
        self.destination
    }

    /// Current dash boost in [0, 1]
    pub fn dash_accel(&self) -> f32 {
        if self.dash.is_running() {
            1.0 - self.dash_ease.apply(self.dash.progress())
        } else {
            0.0
        }
    }

    pub fn points(&self) -> BoundaryPoints {
        boundary_points(self.progress)
    }

    /// The foot's position on the arena perimeter
    pub fn foot(&self) -> Vec2 {
        perimeter_point(self.progress)
    }

    pub fn corner(&self) -> u8 {
        self.corner.get()
    }

    pub fn corner_changed(&self) -> bool {
        self.corner.changed()
    }

    /// The side just entered, if the last update crossed a corner
    pub fn entered_corner(&self) -> Option<u8> {
        self.corner.changed_to()
    }

    /// If the most recent input was non-zero
    pub fn is_active(&self) -> bool {
        self.history[0] != Vec2::ZERO
    }
}
