//! Error types
//!
//! Everything here is raised once at startup, join time or when loading a
//! recording. The per-tick simulation itself has no failure modes.

/// A tuning value that cannot drive the simulation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A value fell outside its allowed range.
    #[error("tuning value '{name}' = {value} is out of range ({expected})")]
    OutOfRange {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },

    /// The tuning JSON could not be parsed.
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    /// The tuning file could not be read.
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons an agent is refused entry to the arena.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JoinError {
    #[error("arena is full ({capacity} agents)")]
    ArenaFull { capacity: usize },

    #[error("agent index {index} is out of range (capacity {capacity})")]
    IndexOutOfRange { index: usize, capacity: usize },

    #[error("agent index {index} has already joined")]
    DuplicateIndex { index: usize },

    #[error("initial progress {value} must be finite and in [0, 1)")]
    InvalidProgress { value: f32 },

    #[error("initial offset direction ({x}, {y}) must be finite and non-zero")]
    InvalidDirection { x: f32, y: f32 },

    #[error("initial offset length {value} must be finite and non-negative")]
    InvalidLength { value: f32 },
}

/// Why a recording could not be replayed.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("recorded tuning is invalid: {0}")]
    Config(#[from] ConfigError),

    #[error("recorded agent could not join: {0}")]
    Join(#[from] JoinError),

    #[error("recording is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
