//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, timers advance by accumulated dt
//! - Stable iteration order (by agent slot)
//! - Collisions resolved from a single snapshot per tick
//! - No rendering, audio or platform dependencies

pub mod agent;
pub mod arena;
pub mod collision;
pub mod flick;
pub mod movement;
pub mod pattern;
pub mod replay;
pub mod timer;
pub mod tracked;
pub mod wall;

pub use agent::{Agent, AgentConfig, AgentSignal};
pub use arena::{AgentInput, Arena, ArenaEvent, EventSink, TickInput, dispatch};
pub use collision::{
    AgentSnapshot, Collision, CollisionMask, CollisionTracker, HitCircle, reflect_velocity,
};
pub use flick::{FlickController, ReleaseEnd, ReleaseState};
pub use movement::MoveController;
pub use pattern::{BoundaryPoints, CORNERS, boundary_points, corner_index, perimeter_point};
pub use replay::{Frame, Pose, Recorder, Recording, ReplayOutcome, TimedEvent, replay};
pub use timer::{Ease, LinearCurve, Timer};
pub use tracked::Tracked;
pub use wall::{Contact, Wall};
