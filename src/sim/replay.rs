//! Deterministic replay of recorded matches
//!
//! A [`Recording`] holds everything needed to rebuild a match: the tuning,
//! the join configs and every (input, dt) frame. Because the simulation is a
//! pure function of those, replaying a recording reproduces the recorded
//! events and final poses exactly.
//!
//! ```
//! use glam::Vec2;
//! use wands::Tuning;
//! use wands::sim::{AgentConfig, Recorder, TickInput, replay};
//!
//! let mut recorder = Recorder::new(Tuning::default()).unwrap();
//! recorder
//!     .join(AgentConfig {
//!         index: 0,
//!         initial_progress: 0.1,
//!         initial_offset_direction: Vec2::X,
//!         initial_offset_length: 0.3,
//!     })
//!     .unwrap();
//!
//! let mut input = TickInput::default();
//! input.agents[0].move_dir = Vec2::Y;
//! for _ in 0..30 {
//!     recorder.step(&input, 1.0 / 60.0);
//! }
//!
//! let expected = recorder.outcome();
//! let outcome = replay(&recorder.finish()).unwrap();
//! assert_eq!(outcome, expected);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::agent::AgentConfig;
use super::arena::{Arena, ArenaEvent, TickInput};
use crate::error::{ConfigError, JoinError, ReplayError};
use crate::tuning::Tuning;

/// One recorded tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub input: TickInput,
    pub dt: f32,
}

/// A complete, serializable match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub tuning: Tuning,
    /// Join configs in the order they were accepted
    pub agents: Vec<AgentConfig>,
    pub frames: Vec<Frame>,
}

impl Recording {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// An event and the tick it happened on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub tick: u64,
    pub event: ArenaEvent,
}

/// Where an agent ended up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub index: usize,
    pub progress: f32,
    pub foot: Vec2,
    pub hand: Vec2,
}

/// Everything observable about a finished match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub ticks: u64,
    pub events: Vec<TimedEvent>,
    pub poses: Vec<Pose>,
}

impl ReplayOutcome {
    fn capture(arena: &Arena, events: &[TimedEvent]) -> Self {
        Self {
            ticks: arena.tick_count(),
            events: events.to_vec(),
            poses: arena
                .agents()
                .map(|agent| Pose {
                    index: agent.index(),
                    progress: agent.progress(),
                    foot: agent.foot(),
                    hand: agent.position(),
                })
                .collect(),
        }
    }
}

/// Steps an arena while recording everything that feeds it
pub struct Recorder {
    arena: Arena,
    recording: Recording,
    events: Vec<TimedEvent>,
}

impl Recorder {
    pub fn new(tuning: Tuning) -> Result<Self, ConfigError> {
        let arena = Arena::new(tuning.clone())?;
        Ok(Self {
            arena,
            recording: Recording {
                tuning,
                agents: Vec::new(),
                frames: Vec::new(),
            },
            events: Vec::new(),
        })
    }

    /// Join an agent; only accepted configs are recorded
    pub fn join(&mut self, config: AgentConfig) -> Result<usize, JoinError> {
        let index = self.arena.join(config.clone())?;
        self.recording.agents.push(config);
        Ok(index)
    }

    /// Step the arena and record the frame
    pub fn step(&mut self, input: &TickInput, dt: f32) -> Vec<ArenaEvent> {
        let events = self.arena.step(input, dt);

        let tick = self.arena.tick_count();
        self.events.extend(events.iter().map(|&event| TimedEvent { tick, event }));
        self.recording.frames.push(Frame {
            input: input.clone(),
            dt,
        });

        events
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// What has happened so far
    pub fn outcome(&self) -> ReplayOutcome {
        ReplayOutcome::capture(&self.arena, &self.events)
    }

    pub fn finish(self) -> Recording {
        log::debug!(
            "Recorded {} frames for {} agents",
            self.recording.frames.len(),
            self.recording.agents.len()
        );
        self.recording
    }
}

/// Rebuild the arena from a recording and run every frame
pub fn replay(recording: &Recording) -> Result<ReplayOutcome, ReplayError> {
    let mut arena = Arena::new(recording.tuning.clone())?;
    for config in &recording.agents {
        arena.join(config.clone())?;
    }

    let mut events = Vec::new();
    for frame in &recording.frames {
        let stepped = arena.step(&frame.input, frame.dt);
        let tick = arena.tick_count();
        events.extend(stepped.into_iter().map(|event| TimedEvent { tick, event }));
    }

    log::debug!(
        "Replayed {} frames, {} events",
        recording.frames.len(),
        events.len()
    );
    Ok(ReplayOutcome::capture(&arena, &events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn config(index: usize, progress: f32, dir: Vec2, length: f32) -> AgentConfig {
        AgentConfig {
            index,
            initial_progress: progress,
            initial_offset_direction: dir,
            initial_offset_length: length,
        }
    }

    /// A duel where agent 0 winds up, strikes agent 1, then both wander
    fn record_duel() -> Recorder {
        let mut recorder = Recorder::new(Tuning::default()).unwrap();
        recorder.join(config(0, 0.125, Vec2::X, 0.3)).unwrap();
        recorder.join(config(1, 0.625, Vec2::NEG_X, 0.5)).unwrap();

        let mut input = TickInput::default();
        input.agents[0].flick_dir = Vec2::NEG_X;
        for _ in 0..60 {
            recorder.step(&input, SIM_DT);
        }

        input.agents[0].flick_dir = Vec2::new(0.2, 0.0);
        for _ in 0..120 {
            recorder.step(&input, SIM_DT);
        }

        input.agents[0].move_dir = Vec2::new(-1.0, 1.0);
        input.agents[1].move_dir = Vec2::new(1.0, -1.0);
        for _ in 0..120 {
            recorder.step(&input, SIM_DT);
        }

        recorder
    }

    #[test]
    fn test_replay_matches_recording() {
        let recorder = record_duel();
        let expected = recorder.outcome();
        assert!(
            expected
                .events
                .iter()
                .any(|e| matches!(e.event, ArenaEvent::Hit { .. }))
        );

        let outcome = replay(&recorder.finish()).unwrap();
        assert_eq!(outcome, expected);
        assert_eq!(outcome.ticks, 300);
        assert_eq!(outcome.poses.len(), 2);
    }

    #[test]
    fn test_replays_are_identical() {
        let recording = record_duel().finish();
        assert_eq!(replay(&recording).unwrap(), replay(&recording).unwrap());
    }

    #[test]
    fn test_recording_survives_json() {
        let recorder = record_duel();
        let expected = recorder.outcome();

        let json = recorder.finish().to_json().unwrap();
        let recording = Recording::from_json(&json).unwrap();
        assert_eq!(recording.frames.len(), 300);
        assert_eq!(replay(&recording).unwrap(), expected);
    }

    #[test]
    fn test_rejected_join_is_not_recorded() {
        let mut recorder = Recorder::new(Tuning::default()).unwrap();
        recorder.join(config(0, 0.0, Vec2::X, 0.2)).unwrap();
        assert!(recorder.join(config(0, 0.5, Vec2::X, 0.2)).is_err());

        let recording = recorder.finish();
        assert_eq!(recording.agents.len(), 1);
        assert!(replay(&recording).is_ok());
    }

    #[test]
    fn test_replay_reports_bad_agent() {
        let recording = Recording {
            tuning: Tuning::default(),
            agents: vec![config(0, 0.0, Vec2::ZERO, 0.2)],
            frames: Vec::new(),
        };
        assert!(matches!(
            replay(&recording),
            Err(ReplayError::Join(JoinError::InvalidDirection { .. }))
        ));
    }

    #[test]
    fn test_replay_reports_bad_json() {
        assert!(matches!(
            Recording::from_json("{ not json"),
            Err(ReplayError::Parse(_))
        ));
    }
}
