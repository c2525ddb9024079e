//! A single wand: foot on the perimeter, hand on a flick
//!
//! The hand's base is tethered to the foot by the wand length. Whenever the
//! foot moves away, the base is pulled back onto the tether; when a release
//! ends the tether is re-measured so the wand keeps its new reach.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{AgentSnapshot, HitCircle};
use super::flick::{FlickController, ReleaseEnd};
use super::movement::MoveController;
use super::pattern::BoundaryPoints;
use super::timer::Timer;
use super::wall::Contact;
use crate::error::JoinError;
use crate::tuning::{BodyTuning, Tuning};

/// How an agent enters the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Slot in the arena, also the agent's collision mask slot
    pub index: usize,
    /// Starting progress around the perimeter, in [0, 1)
    pub initial_progress: f32,
    /// Direction from the foot to the hand
    pub initial_offset_direction: Vec2,
    /// Distance from the foot to the hand, which becomes the wand length
    pub initial_offset_length: f32,
}

impl AgentConfig {
    /// Check the values that do not depend on the arena
    pub fn validate(&self) -> Result<(), JoinError> {
        let p = self.initial_progress;
        if !p.is_finite() || !(0.0..1.0).contains(&p) {
            return Err(JoinError::InvalidProgress { value: p });
        }

        let dir = self.initial_offset_direction;
        if !dir.is_finite() || dir == Vec2::ZERO {
            return Err(JoinError::InvalidDirection { x: dir.x, y: dir.y });
        }

        let len = self.initial_offset_length;
        if !len.is_finite() || len < 0.0 {
            return Err(JoinError::InvalidLength { value: len });
        }

        Ok(())
    }
}

/// Something that happened to one agent during `update`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AgentSignal {
    /// Foot moved onto another side of the arena
    CornerChanged(u8),
    /// Release came to rest on its own
    ReleaseEnded(ReleaseEnd),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    index: usize,
    movement: MoveController,
    flick: FlickController,
    /// Maximum foot-to-base distance
    length: f32,
    hitstop: Timer,
    body: BodyTuning,
}

impl Agent {
    /// Build an agent from a config that has already been validated
    pub fn new(config: &AgentConfig, tuning: &Tuning) -> Self {
        let movement = MoveController::new(&tuning.movement, config.initial_progress);
        let dir = config.initial_offset_direction.normalize_or_zero();
        let base = movement.foot() + dir * config.initial_offset_length;

        Self {
            index: config.index,
            movement,
            flick: FlickController::new(&tuning.flick, base),
            length: config.initial_offset_length,
            hitstop: Timer::default(),
            body: tuning.body.clone(),
        }
    }

    /// Ingest one tick of input
    ///
    /// Input is read even during hitstop so gestures span the freeze.
    pub fn read(&mut self, move_dir: Vec2, flick_dir: Vec2) {
        self.movement.read(move_dir);
        self.flick.read(flick_dir);
    }

    /// Advance by `dt`, returning what happened this tick
    pub fn update(&mut self, dt: f32) -> Vec<AgentSignal> {
        if self.hitstop.is_running() {
            self.hitstop.tick(dt);
            self.movement.hold();
            return Vec::new();
        }

        let mut signals = Vec::new();

        self.movement.update(dt);
        if let Some(end) = self.flick.update(dt) {
            self.sync_length();
            signals.push(AgentSignal::ReleaseEnded(end));
        }
        self.constrain();

        if let Some(corner) = self.movement.entered_corner() {
            signals.push(AgentSignal::CornerChanged(corner));
        }

        signals
    }

    /// Pull the hand's base back within the wand length of the foot
    fn constrain(&mut self) {
        let foot = self.foot();
        let dist = self.flick.base() - foot;

        if dist.length() > self.length {
            self.flick.set_base(foot + dist.normalize_or_zero() * self.length);
        }
    }

    /// Adopt the current foot-to-base distance as the wand length
    fn sync_length(&mut self) {
        self.length = self.flick.base().distance(self.foot());
    }

    /// Deflect an active release off a wall; false while attached
    pub fn bounce(&mut self, contact: Contact) -> bool {
        self.flick.bounce(contact)
    }

    /// Stop an active release after it struck something
    ///
    /// Returns where and how fast the release ended, or `None` if nothing
    /// was releasing.
    pub fn strike(&mut self) -> Option<ReleaseEnd> {
        let end = self.flick.cancel()?;
        self.sync_length();
        Some(end)
    }

    /// Freeze for `duration` seconds
    pub fn start_hitstop(&mut self, duration: f32) {
        self.hitstop.start(duration);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Hand position including the flick offset
    pub fn position(&self) -> Vec2 {
        self.flick.position()
    }

    /// Hand position without the flick offset
    pub fn base(&self) -> Vec2 {
        self.flick.base()
    }

    pub fn foot(&self) -> Vec2 {
        self.movement.foot()
    }

    pub fn progress(&self) -> f32 {
        self.movement.progress()
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn points(&self) -> BoundaryPoints {
        self.movement.points()
    }

    pub fn corner(&self) -> u8 {
        self.movement.corner()
    }

    pub fn corner_changed(&self) -> bool {
        self.movement.corner_changed()
    }

    pub fn is_attacking(&self) -> bool {
        self.flick.is_releasing()
    }

    pub fn current_speed(&self) -> f32 {
        self.flick.speed()
    }

    pub fn pitch_shift(&self) -> f32 {
        self.flick.pitch_shift()
    }

    /// Moving or winding up
    pub fn is_active(&self) -> bool {
        self.movement.is_active() || self.flick.is_active()
    }

    pub fn in_hitstop(&self) -> bool {
        self.hitstop.is_running()
    }

    pub fn movement(&self) -> &MoveController {
        &self.movement
    }

    pub fn flick(&self) -> &FlickController {
        &self.flick
    }

    pub fn hand_circle(&self) -> HitCircle {
        HitCircle::new(self.position(), self.body.hand_radius)
    }

    pub fn foot_circle(&self) -> HitCircle {
        HitCircle::new(self.foot(), self.body.foot_radius)
    }

    /// Freeze the collision-relevant state for this tick
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            hand: self.hand_circle(),
            foot: self.foot_circle(),
            releasing: self.is_attacking(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn config(progress: f32) -> AgentConfig {
        AgentConfig {
            index: 0,
            initial_progress: progress,
            initial_offset_direction: Vec2::new(1.0, 1.0),
            initial_offset_length: 0.5,
        }
    }

    fn agent(progress: f32) -> Agent {
        Agent::new(&config(progress), &Tuning::default())
    }

    /// Wind up, snap back and return the agent mid-release
    fn releasing_agent() -> Agent {
        let mut agent = agent(0.125);
        for _ in 0..60 {
            agent.read(Vec2::ZERO, Vec2::new(-1.0, 0.0));
            agent.update(DT);
        }
        agent.read(Vec2::ZERO, Vec2::new(0.2, 0.0));
        agent.update(DT);
        assert!(agent.is_attacking());
        agent
    }

    #[test]
    fn test_hand_starts_along_direction() {
        let agent = agent(0.0);
        let expected = Vec2::new(1.0, 1.0).normalize() * 0.5;
        assert!((agent.base() - expected).length() < 1e-6);
        assert_eq!(agent.position(), agent.base());
        assert_eq!(agent.length(), 0.5);
        assert!(!agent.is_active());
    }

    #[test]
    fn test_config_validation() {
        assert!(config(0.0).validate().is_ok());
        assert!(matches!(
            config(1.0).validate(),
            Err(JoinError::InvalidProgress { .. })
        ));
        assert!(matches!(
            config(f32::NAN).validate(),
            Err(JoinError::InvalidProgress { .. })
        ));

        let mut cfg = config(0.5);
        cfg.initial_offset_direction = Vec2::ZERO;
        assert!(matches!(
            cfg.validate(),
            Err(JoinError::InvalidDirection { .. })
        ));

        let mut cfg = config(0.5);
        cfg.initial_offset_length = -0.1;
        assert_eq!(
            cfg.validate(),
            Err(JoinError::InvalidLength { value: -0.1 })
        );
    }

    #[test]
    fn test_base_stays_tethered_while_moving() {
        let mut agent = agent(0.0);
        for _ in 0..240 {
            agent.read(Vec2::new(1.0, 1.0), Vec2::ZERO);
            agent.update(DT);
            let reach = agent.base().distance(agent.foot());
            assert!(reach <= agent.length() + 1e-5, "reach {reach}");
        }
    }

    #[test]
    fn test_corner_change_is_signalled() {
        let mut agent = agent(0.24);
        // up-right maps to progress 0.5, one dash step crosses 0.25
        agent.read(Vec2::new(1.0, 1.0), Vec2::ZERO);
        let signals = agent.update(DT);
        assert!(signals.contains(&AgentSignal::CornerChanged(1)));
        assert!(agent.update(DT).is_empty());
    }

    #[test]
    fn test_release_end_resyncs_length() {
        let mut agent = releasing_agent();

        let mut ended = None;
        for _ in 0..600 {
            agent.read(Vec2::ZERO, Vec2::new(0.2, 0.0));
            for signal in agent.update(DT) {
                if let AgentSignal::ReleaseEnded(end) = signal {
                    ended = Some(end);
                }
            }
            if ended.is_some() {
                break;
            }
        }

        let end = ended.expect("release should end");
        assert!(!agent.is_attacking());
        assert_eq!(agent.base(), end.position);
        assert!((agent.length() - agent.base().distance(agent.foot())).abs() < 1e-5);
    }

    #[test]
    fn test_strike_cancels_release() {
        let mut agent = releasing_agent();
        agent.update(DT);
        let speed = agent.current_speed();
        assert!(speed > 0.0);

        let end = agent.strike().expect("was releasing");
        assert_eq!(end.speed, speed);
        assert!(!agent.is_attacking());
        assert!((agent.length() - agent.base().distance(agent.foot())).abs() < 1e-5);

        // nothing left to cancel
        assert!(agent.strike().is_none());
    }

    #[test]
    fn test_hitstop_freezes_movement() {
        let mut agent = agent(0.1);
        agent.start_hitstop(0.1);

        for _ in 0..5 {
            agent.read(Vec2::new(1.0, 1.0), Vec2::ZERO);
            assert!(agent.update(DT).is_empty());
            assert_eq!(agent.progress(), 0.1);
            assert!(agent.in_hitstop());
        }

        for _ in 0..5 {
            agent.read(Vec2::new(1.0, 1.0), Vec2::ZERO);
            agent.update(DT);
        }
        assert!(!agent.in_hitstop());
        assert!(agent.progress() > 0.1);
    }

    #[test]
    fn test_snapshot_uses_hand_position() {
        let agent = releasing_agent();
        let snapshot = agent.snapshot();
        assert_eq!(snapshot.hand.center, agent.position());
        assert_eq!(snapshot.foot.center, agent.foot());
        assert!(snapshot.releasing);
        assert_eq!(snapshot.hand.radius, BodyTuning::default().hand_radius);
    }
}
