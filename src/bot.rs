//! Scripted input for headless matches
//!
//! A bot cycles through three phases: wander around the perimeter, wind the
//! flick stick up, then snap it back to release. Durations and directions
//! come from a seeded RNG so a match is reproducible from its seeds.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::AgentInput;

/// Fraction of the windup the stick snaps back past the center
const SNAP_FRACTION: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Wander { remaining: f32 },
    Windup { remaining: f32 },
    Snap { remaining: f32 },
}

/// A bot driving one agent's sticks
#[derive(Debug, Clone)]
pub struct Bot {
    index: usize,
    rng: Pcg32,
    phase: Phase,
    move_dir: Vec2,
    flick_dir: Vec2,
    /// Heading of the current or most recent windup, in radians
    aim: f32,
}

impl Bot {
    pub fn new(index: usize, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let aim = rng.random_range(0.0..TAU);
        let remaining = rng.random_range(0.5..1.5);

        Self {
            index,
            rng,
            phase: Phase::Wander { remaining },
            move_dir: Vec2::ZERO,
            flick_dir: Vec2::ZERO,
            aim,
        }
    }

    /// The agent slot this bot drives
    pub fn index(&self) -> usize {
        self.index
    }

    /// Advance the script by `dt` and return this tick's sticks
    pub fn tick(&mut self, dt: f32) -> AgentInput {
        let remaining = match &mut self.phase {
            Phase::Wander { remaining }
            | Phase::Windup { remaining }
            | Phase::Snap { remaining } => {
                *remaining -= dt;
                *remaining
            }
        };

        if remaining <= 0.0 {
            self.advance();
        }

        AgentInput {
            move_dir: self.move_dir,
            flick_dir: self.flick_dir,
        }
    }

    fn advance(&mut self) {
        self.phase = match self.phase {
            Phase::Wander { .. } => {
                // swing to the far side of the last aim so moving the stick
                // there never reads as a snap
                self.aim += self.rng.random_range(0.5 * PI..1.5 * PI);
                let reach = self.rng.random_range(0.6..1.0);
                self.flick_dir = Vec2::from_angle(self.aim) * reach;
                self.move_dir = Vec2::ZERO;

                log::trace!("Bot {} winding up toward {:?}", self.index, self.flick_dir);
                Phase::Windup {
                    remaining: self.rng.random_range(0.3..0.8),
                }
            }
            Phase::Windup { .. } => {
                self.flick_dir *= -SNAP_FRACTION;

                log::trace!("Bot {} snapped to {:?}", self.index, self.flick_dir);
                Phase::Snap {
                    remaining: self.rng.random_range(0.5..1.0),
                }
            }
            Phase::Snap { .. } => {
                // idle a third of the time
                self.move_dir = if self.rng.random_bool(1.0 / 3.0) {
                    Vec2::ZERO
                } else {
                    Vec2::from_angle(self.rng.random_range(0.0..TAU))
                };

                Phase::Wander {
                    remaining: self.rng.random_range(0.5..2.0),
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{AgentConfig, Arena, ArenaEvent, TickInput};
    use crate::tuning::Tuning;

    fn run(bot: &mut Bot, ticks: usize) -> Vec<AgentInput> {
        (0..ticks).map(|_| bot.tick(SIM_DT)).collect()
    }

    #[test]
    fn test_same_seed_same_script() {
        let a = run(&mut Bot::new(0, 42), 600);
        let b = run(&mut Bot::new(0, 42), 600);
        assert_eq!(a, b);

        let c = run(&mut Bot::new(0, 43), 600);
        assert_ne!(a, c);
    }

    #[test]
    fn test_snap_reverses_windup() {
        let mut bot = Bot::new(1, 7);
        let inputs = run(&mut bot, 1200);

        let snaps: Vec<_> = inputs
            .windows(2)
            .filter(|w| {
                w[0].flick_dir != w[1].flick_dir && w[1].flick_dir.dot(w[0].flick_dir) < 0.0
            })
            .collect();
        assert!(!snaps.is_empty());

        for w in snaps {
            let expected = w[0].flick_dir * -SNAP_FRACTION;
            assert!((w[1].flick_dir - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_bots_produce_releases() {
        let mut arena = Arena::new(Tuning::default()).unwrap();
        for (index, progress) in [(0, 0.1), (1, 0.6)] {
            arena
                .join(AgentConfig {
                    index,
                    initial_progress: progress,
                    initial_offset_direction: Vec2::ONE,
                    initial_offset_length: 0.3,
                })
                .unwrap();
        }

        let mut bots = [Bot::new(0, 1), Bot::new(1, 2)];
        let mut released = 0;
        for _ in 0..2000 {
            let mut input = TickInput::default();
            for bot in &mut bots {
                input.agents[bot.index()] = bot.tick(SIM_DT);
            }
            released += arena
                .step(&input, SIM_DT)
                .iter()
                .filter(|e| matches!(e, ArenaEvent::ReleaseEnded { .. }))
                .count();
        }

        assert!(released > 0);
    }
}
