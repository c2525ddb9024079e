//! Collision detection with rising-edge events
//!
//! Every tick the full contact mask is rebuilt from a snapshot of the agents.
//! An event fires only for bits that were clear on the previous tick, so two
//! shapes that stay overlapped produce a single event.
//!
//! Mask layout for two agents and four walls:
//!
//! ```text
//! bit 0      agent 0 <-> agent 1
//! bits 1..4  agent 0 <-> walls 0..3
//! bits 5..8  agent 1 <-> walls 0..3
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::wall::{Contact, Wall};
use crate::consts::{MAX_AGENTS, WALL_COUNT};

/// A circular hitbox
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitCircle {
    pub center: Vec2,
    pub radius: f32,
}

impl HitCircle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Touching counts as overlapping
    pub fn overlaps(&self, other: &HitCircle) -> bool {
        self.center.distance(other.center) <= self.radius + other.radius
    }
}

/// Collision-relevant state of one agent, frozen for the tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Hand hitbox, centered on the offset-adjusted hand position
    pub hand: HitCircle,
    pub foot: HitCircle,
    pub releasing: bool,
}

impl AgentSnapshot {
    /// A releasing hand striking the other agent's hand or foot
    pub fn strikes(&self, other: &AgentSnapshot) -> bool {
        self.releasing && (self.hand.overlaps(&other.hand) || self.hand.overlaps(&other.foot))
    }
}

/// Bitset of the contacts present on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionMask(u16);

impl CollisionMask {
    /// Agent-vs-agent bit
    pub const AGENTS: u16 = 1;

    /// Bit for `agent` touching the wall at `wall` index
    pub const fn wall_bit(agent: usize, wall: usize) -> u16 {
        1 << (1 + wall + agent * WALL_COUNT)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, bit: u16) -> bool {
        self.0 & bit != 0
    }

    pub fn insert(&mut self, bit: u16) {
        self.0 |= bit;
    }

    /// Bits set here but not in `previous`
    pub fn rising(self, previous: CollisionMask) -> CollisionMask {
        CollisionMask(self.0 & !previous.0)
    }
}

/// A new contact detected this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collision {
    /// A releasing agent struck an agent that was not releasing
    Strike { attacker: usize, target: usize },
    /// Both agents were releasing when they met
    Mutual,
    /// An agent's hand reached a wall
    Wall {
        agent: usize,
        wall: Wall,
        contact: Contact,
    },
}

/// Remembers last tick's mask so only new contacts become events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionTracker {
    previous: CollisionMask,
}

impl CollisionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask from the most recent `resolve`
    pub fn mask(&self) -> CollisionMask {
        self.previous
    }

    /// Rebuild the mask from `agents` and return the contacts that just began
    ///
    /// `agents` is indexed by slot; empty slots keep their bits clear. Only
    /// the first [`MAX_AGENTS`] slots are considered.
    pub fn resolve(&mut self, agents: &[Option<AgentSnapshot>], walls: &[Wall]) -> Vec<Collision> {
        let agents = &agents[..agents.len().min(MAX_AGENTS)];

        let mut mask = CollisionMask::default();
        let mut contacts = Vec::new();

        collide_agents(agents, &mut mask, &mut contacts);
        collide_walls(agents, walls, &mut mask, &mut contacts);

        if mask != self.previous {
            log::trace!("collision mask {:09b} -> {:09b}", self.previous.0, mask.0);
        }
        let rising = mask.rising(self.previous);
        self.previous = mask;

        contacts
            .into_iter()
            .filter(|&(bit, _)| rising.contains(bit))
            .map(|(_, collision)| collision)
            .collect()
    }
}

/// Set the agent bit, recording the contact it would report
fn collide_agents(
    agents: &[Option<AgentSnapshot>],
    mask: &mut CollisionMask,
    contacts: &mut Vec<(u16, Collision)>,
) {
    let [Some(a), Some(b)] = agents else {
        return;
    };

    // only an attack can make contact
    if !a.releasing && !b.releasing {
        return;
    }

    if !a.strikes(b) && !b.strikes(a) {
        return;
    }

    let collision = match (a.releasing, b.releasing) {
        (true, true) => Collision::Mutual,
        (true, false) => Collision::Strike {
            attacker: 0,
            target: 1,
        },
        _ => Collision::Strike {
            attacker: 1,
            target: 0,
        },
    };

    mask.insert(CollisionMask::AGENTS);
    contacts.push((CollisionMask::AGENTS, collision));
}

fn collide_walls(
    agents: &[Option<AgentSnapshot>],
    walls: &[Wall],
    mask: &mut CollisionMask,
    contacts: &mut Vec<(u16, Collision)>,
) {
    for (i, agent) in agents.iter().enumerate() {
        let Some(agent) = agent else {
            continue;
        };

        for &wall in walls {
            let Some(contact) = wall.collide(agent.hand.center) else {
                continue;
            };

            let bit = CollisionMask::wall_bit(i, wall.index());
            mask.insert(bit);
            contacts.push((
                bit,
                Collision::Wall {
                    agent: i,
                    wall,
                    contact,
                },
            ));
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: f32 = 0.05;

    fn agent(hand: Vec2, foot: Vec2, releasing: bool) -> Option<AgentSnapshot> {
        Some(AgentSnapshot {
            hand: HitCircle::new(hand, R),
            foot: HitCircle::new(foot, R),
            releasing,
        })
    }

    #[test]
    fn test_circles_overlap_when_touching() {
        let a = HitCircle::new(Vec2::ZERO, 0.5);
        let b = HitCircle::new(Vec2::new(1.0, 0.0), 0.5);
        let c = HitCircle::new(Vec2::new(1.01, 0.0), 0.5);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_wall_bits_follow_layout() {
        assert_eq!(CollisionMask::wall_bit(0, 0), 0b0_0000_0010);
        assert_eq!(CollisionMask::wall_bit(0, 3), 0b0_0001_0000);
        assert_eq!(CollisionMask::wall_bit(1, 0), 0b0_0010_0000);
        assert_eq!(CollisionMask::wall_bit(1, 3), 0b1_0000_0000);
    }

    #[test]
    fn test_rising_bits() {
        let previous = CollisionMask(0b0110);
        let current = CollisionMask(0b0011);
        assert_eq!(current.rising(previous), CollisionMask(0b0001));
    }

    #[test]
    fn test_overlap_fires_once_across_ticks() {
        let mut tracker = CollisionTracker::new();
        let walls = Wall::ALL;
        let target = agent(Vec2::new(0.7, 0.5), Vec2::new(1.0, 0.5), false);

        // apart
        let apart = [agent(Vec2::new(0.3, 0.5), Vec2::new(0.0, 0.5), true), target];
        assert!(tracker.resolve(&apart, &walls).is_empty());

        // together for five ticks
        let together = [agent(Vec2::new(0.65, 0.5), Vec2::new(0.0, 0.5), true), target];
        let mut fired = Vec::new();
        for tick in 0..5 {
            for event in tracker.resolve(&together, &walls) {
                fired.push((tick, event));
            }
        }

        assert_eq!(
            fired,
            vec![(
                0,
                Collision::Strike {
                    attacker: 0,
                    target: 1
                }
            )]
        );
        assert!(tracker.mask().contains(CollisionMask::AGENTS));
    }

    #[test]
    fn test_separating_rearms_the_event() {
        let mut tracker = CollisionTracker::new();
        let target = agent(Vec2::new(0.7, 0.5), Vec2::new(1.0, 0.5), false);
        let near = [agent(Vec2::new(0.65, 0.5), Vec2::ZERO, true), target];
        let far = [agent(Vec2::new(0.2, 0.5), Vec2::ZERO, true), target];

        assert_eq!(tracker.resolve(&near, &[]).len(), 1);
        assert!(tracker.resolve(&far, &[]).is_empty());
        assert!(!tracker.mask().contains(CollisionMask::AGENTS));
        assert_eq!(tracker.resolve(&near, &[]).len(), 1);
    }

    #[test]
    fn test_hand_can_strike_foot() {
        let mut tracker = CollisionTracker::new();
        let agents = [
            agent(Vec2::new(0.5, 0.5), Vec2::ZERO, false),
            agent(Vec2::new(0.2, 0.2), Vec2::new(0.55, 0.5), true),
        ];
        // agent 0's hand sits on agent 1's foot, but agent 0 is attached
        assert!(tracker.resolve(&agents, &[]).is_empty());

        let agents = [
            agent(Vec2::new(0.5, 0.5), Vec2::ZERO, true),
            agent(Vec2::new(0.2, 0.2), Vec2::new(0.55, 0.5), false),
        ];
        assert_eq!(
            tracker.resolve(&agents, &[]),
            vec![Collision::Strike {
                attacker: 0,
                target: 1
            }]
        );
    }

    #[test]
    fn test_attached_agents_never_collide() {
        let mut tracker = CollisionTracker::new();
        let agents = [
            agent(Vec2::new(0.5, 0.5), Vec2::ZERO, false),
            agent(Vec2::new(0.5, 0.5), Vec2::ONE, false),
        ];
        assert!(tracker.resolve(&agents, &[]).is_empty());
        assert_eq!(tracker.mask().bits(), 0);
    }

    #[test]
    fn test_both_releasing_is_mutual() {
        let mut tracker = CollisionTracker::new();
        let agents = [
            agent(Vec2::new(0.5, 0.5), Vec2::ZERO, true),
            agent(Vec2::new(0.55, 0.5), Vec2::ONE, true),
        ];
        assert_eq!(tracker.resolve(&agents, &[]), vec![Collision::Mutual]);
    }

    #[test]
    fn test_wall_contact_fires_on_entry_only() {
        let mut tracker = CollisionTracker::new();
        let walls = Wall::ALL;
        let idle = agent(Vec2::new(0.5, 0.5), Vec2::ZERO, false);

        let outside = [idle, agent(Vec2::new(1.05, 0.5), Vec2::ONE, true)];
        let events = tracker.resolve(&outside, &walls);
        assert_eq!(events.len(), 1);
        match events[0] {
            Collision::Wall {
                agent,
                wall,
                contact,
            } => {
                assert_eq!(agent, 1);
                assert_eq!(wall, Wall::Right);
                assert_eq!(contact.normal, Vec2::NEG_X);
            }
            _ => panic!("expected wall contact"),
        }
        assert!(tracker.mask().contains(CollisionMask::wall_bit(1, 3)));

        // still outside: no new event
        assert!(tracker.resolve(&outside, &walls).is_empty());
    }

    #[test]
    fn test_corner_hits_two_walls_at_once() {
        let mut tracker = CollisionTracker::new();
        let agents = [agent(Vec2::new(-0.1, -0.1), Vec2::ZERO, false)];
        let events = tracker.resolve(&agents, &Wall::ALL);
        let walls: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Collision::Wall { wall, .. } => Some(*wall),
                _ => None,
            })
            .collect();
        assert_eq!(walls, vec![Wall::Bottom, Wall::Left]);
    }

    #[test]
    fn test_empty_slot_keeps_its_bits() {
        let mut tracker = CollisionTracker::new();
        let agents = [None, agent(Vec2::new(1.2, 0.5), Vec2::ONE, true)];
        let events = tracker.resolve(&agents, &Wall::ALL);
        assert_eq!(events.len(), 1);
        assert_eq!(tracker.mask().bits(), CollisionMask::wall_bit(1, 3));
    }

    #[test]
    fn test_reflect_velocity() {
        let reflected = reflect_velocity(Vec2::new(1.0, -1.0), Vec2::new(0.0, 1.0));
        assert!((reflected - Vec2::new(1.0, 1.0)).length() < 1e-6);
        assert!((reflected.length() - 2f32.sqrt()).abs() < 1e-6);
    }
}
