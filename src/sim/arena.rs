//! The arena: agents stepped in lockstep
//!
//! Each tick reads input, advances every agent, then resolves collisions
//! against a snapshot taken after all agents moved. Responses to the
//! collisions (bounces, cancelled releases, hitstop) are applied only after
//! the whole snapshot has been examined.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::agent::{Agent, AgentConfig, AgentSignal};
use super::collision::{AgentSnapshot, Collision, CollisionMask, CollisionTracker};
use super::wall::{Contact, Wall};
use crate::consts::MAX_AGENTS;
use crate::error::{ConfigError, JoinError};
use crate::tuning::Tuning;

/// One agent's sticks for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentInput {
    /// Move stick, picks a destination around the perimeter
    pub move_dir: Vec2,
    /// Flick stick, winds up the hand
    pub flick_dir: Vec2,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Indexed by agent slot; unjoined slots are ignored
    pub agents: [AgentInput; MAX_AGENTS],
}

/// Something collaborators (audio, score, effects) may react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArenaEvent {
    CornerChanged {
        agent: usize,
        corner: u8,
    },
    ReleaseEnded {
        agent: usize,
    },
    Hit {
        attacker: usize,
        target: usize,
        speed: f32,
    },
    /// Both agents were releasing when they met; nobody scores
    MutualContact,
    Bounce {
        agent: usize,
        wall: Wall,
        contact: Contact,
    },
    HitStop {
        agent: usize,
        duration: f32,
    },
}

/// Receiver for arena events
pub trait EventSink {
    fn on_event(&mut self, event: &ArenaEvent);
}

impl EventSink for Vec<ArenaEvent> {
    fn on_event(&mut self, event: &ArenaEvent) {
        self.push(*event);
    }
}

/// Forward `events` to `sink` in order
pub fn dispatch(events: &[ArenaEvent], sink: &mut impl EventSink) {
    for event in events {
        sink.on_event(event);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    tuning: Tuning,
    slots: [Option<Agent>; MAX_AGENTS],
    tracker: CollisionTracker,
    tick_count: u64,
}

impl Arena {
    pub fn new(tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            slots: Default::default(),
            tracker: CollisionTracker::new(),
            tick_count: 0,
        })
    }

    /// Add an agent in the slot named by its config
    pub fn join(&mut self, config: AgentConfig) -> Result<usize, JoinError> {
        if self.slots.iter().all(Option::is_some) {
            return Err(JoinError::ArenaFull {
                capacity: MAX_AGENTS,
            });
        }

        let index = config.index;
        if index >= MAX_AGENTS {
            return Err(JoinError::IndexOutOfRange {
                index,
                capacity: MAX_AGENTS,
            });
        }

        if self.slots[index].is_some() {
            return Err(JoinError::DuplicateIndex { index });
        }

        config.validate()?;

        let agent = Agent::new(&config, &self.tuning);
        log::info!(
            "Agent {} joined at progress {:.3} (wand length {:.3})",
            index,
            config.initial_progress,
            agent.length()
        );
        self.slots[index] = Some(agent);

        Ok(index)
    }

    /// Feed one tick of input to an agent; unjoined slots are ignored
    pub fn read(&mut self, index: usize, move_dir: Vec2, flick_dir: Vec2) {
        if let Some(agent) = self.slots.get_mut(index).and_then(Option::as_mut) {
            agent.read(move_dir, flick_dir);
        }
    }

    /// Advance every agent by `dt`
    pub fn update(&mut self, dt: f32) -> Vec<ArenaEvent> {
        let mut events = Vec::new();

        for (i, agent) in self.slots.iter_mut().enumerate() {
            let Some(agent) = agent else {
                continue;
            };

            for signal in agent.update(dt) {
                events.push(match signal {
                    AgentSignal::CornerChanged(corner) => {
                        ArenaEvent::CornerChanged { agent: i, corner }
                    }
                    AgentSignal::ReleaseEnded(_) => ArenaEvent::ReleaseEnded { agent: i },
                });
            }
        }

        self.tick_count += 1;
        events
    }

    /// Detect new contacts and apply their responses
    pub fn resolve_collisions(&mut self) -> Vec<ArenaEvent> {
        let snapshots: [Option<AgentSnapshot>; MAX_AGENTS] =
            std::array::from_fn(|i| self.slots[i].as_ref().map(Agent::snapshot));

        let collisions = self.tracker.resolve(&snapshots, &Wall::ALL);

        let mut events = Vec::new();
        for collision in collisions {
            match collision {
                Collision::Strike { attacker, target } => self.hit(attacker, target, &mut events),
                Collision::Mutual => {
                    log::debug!("Mutual contact, no hit");
                    events.push(ArenaEvent::MutualContact);
                }
                Collision::Wall {
                    agent,
                    wall,
                    contact,
                } => {
                    let bounced = self.slots[agent]
                        .as_mut()
                        .is_some_and(|a| a.bounce(contact));
                    if bounced {
                        events.push(ArenaEvent::Bounce {
                            agent,
                            wall,
                            contact,
                        });
                    }
                }
            }
        }

        events
    }

    /// Cancel the attacker's release and freeze both agents
    fn hit(&mut self, attacker: usize, target: usize, events: &mut Vec<ArenaEvent>) {
        let Some(end) = self.slots[attacker].as_mut().and_then(Agent::strike) else {
            return;
        };

        let speed = end.speed;
        let duration = self.tuning.hitstop.duration.sample(speed);
        log::debug!(
            "Agent {} hit agent {} at speed {:.3} (hitstop {:.3}s)",
            attacker,
            target,
            speed,
            duration
        );

        events.push(ArenaEvent::Hit {
            attacker,
            target,
            speed,
        });
        events.push(ArenaEvent::ReleaseEnded { agent: attacker });

        for i in [attacker, target] {
            if let Some(agent) = self.slots[i].as_mut() {
                agent.start_hitstop(duration);
                events.push(ArenaEvent::HitStop { agent: i, duration });
            }
        }
    }

    /// Read, update and resolve one tick
    pub fn step(&mut self, input: &TickInput, dt: f32) -> Vec<ArenaEvent> {
        for (i, agent) in input.agents.iter().enumerate() {
            self.read(i, agent.move_dir, agent.flick_dir);
        }

        let mut events = self.update(dt);
        events.extend(self.resolve_collisions());
        events
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Joined agents in slot order
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.slots.iter().flatten()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Contacts present after the last resolve
    pub fn mask(&self) -> CollisionMask {
        self.tracker.mask()
    }
}
