//! Game balance tuning
//!
//! Every feel-related constant (speeds, spring, drag, gesture tolerance) lives
//! here instead of being hardcoded in the controllers. Loaded from JSON; any
//! missing field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::timer::{Ease, LinearCurve};

/// Boundary movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveTuning {
    /// Base move speed in progress per second
    pub speed: f32,
    /// Length of the dash boost in seconds
    pub dash_duration: f32,
    /// Shape of the dash decay
    pub dash_ease: Ease,
}

impl Default for MoveTuning {
    fn default() -> Self {
        Self {
            speed: 0.5,
            dash_duration: 0.3,
            dash_ease: Ease::OutQuad,
        }
    }
}

/// Flick windup and release tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickTuning {
    /// World units per unit of stick offset
    pub scale: f32,
    /// Windup tracking speed in offset units per second
    pub windup_speed: f32,
    /// Pitch shift per unit of offset
    pub pitch_scale: f32,
    /// Max distance of the windup/delta alignment from -1 that counts as a release
    pub release_alignment: f32,
    /// Spring constant pulling the release toward its target (per tick)
    pub release_spring: f32,
    /// Velocity multiplier applied each release tick
    pub release_drag: f32,
    /// Squared speed at or below which a release ends
    pub release_end_speed: f32,
}

impl Default for FlickTuning {
    fn default() -> Self {
        Self {
            scale: 0.2,
            windup_speed: 4.0,
            pitch_scale: 0.3,
            release_alignment: 0.1,
            release_spring: 0.1,
            release_drag: 0.95,
            release_end_speed: 0.05,
        }
    }
}

/// Hitbox sizes and wand length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyTuning {
    pub hand_radius: f32,
    pub foot_radius: f32,
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            hand_radius: 0.05,
            foot_radius: 0.04,
        }
    }
}

/// Freeze applied to both agents after a hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitStopTuning {
    /// Seconds of hitstop as a function of strike speed
    pub duration: LinearCurve,
}

impl Default for HitStopTuning {
    fn default() -> Self {
        Self {
            duration: LinearCurve {
                base: 0.05,
                slope: 0.05,
                max: 0.3,
            },
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub movement: MoveTuning,
    pub flick: FlickTuning,
    pub body: BodyTuning,
    pub hitstop: HitStopTuning,
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        check("movement.speed", m.speed, m.speed > 0.0, "> 0")?;
        check(
            "movement.dash_duration",
            m.dash_duration,
            m.dash_duration >= 0.0,
            ">= 0",
        )?;

        let f = &self.flick;
        check("flick.scale", f.scale, f.scale > 0.0, "> 0")?;
        check("flick.windup_speed", f.windup_speed, f.windup_speed > 0.0, "> 0")?;
        check("flick.pitch_scale", f.pitch_scale, f.pitch_scale >= 0.0, ">= 0")?;
        check(
            "flick.release_alignment",
            f.release_alignment,
            (0.0..=2.0).contains(&f.release_alignment),
            "0..=2",
        )?;
        check(
            "flick.release_spring",
            f.release_spring,
            f.release_spring >= 0.0,
            ">= 0",
        )?;
        check(
            "flick.release_drag",
            f.release_drag,
            f.release_drag > 0.0 && f.release_drag < 1.0,
            "0 < drag < 1",
        )?;
        check(
            "flick.release_end_speed",
            f.release_end_speed,
            f.release_end_speed > 0.0,
            "> 0",
        )?;

        let b = &self.body;
        check("body.hand_radius", b.hand_radius, b.hand_radius > 0.0, "> 0")?;
        check("body.foot_radius", b.foot_radius, b.foot_radius > 0.0, "> 0")?;

        let h = &self.hitstop.duration;
        check("hitstop.duration.base", h.base, h.base >= 0.0, ">= 0")?;
        check("hitstop.duration.slope", h.slope, h.slope >= 0.0, ">= 0")?;
        check("hitstop.duration.max", h.max, h.max >= h.base, ">= base")?;

        Ok(())
    }
}

/// Reject non-finite values and values failing `ok`
fn check(
    name: &'static str,
    value: f32,
    ok: bool,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if value.is_finite() && ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            expected,
        })
    }
}
