//! Error types for turn commands, turn notation and configuration.

use thiserror::Error;

use crate::PuzzleKind;

/// A puzzle command that was rejected without touching the puzzle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// Puzzle edge length of zero.
    #[error("puzzle size must be at least 1, got {0}")]
    InvalidSize(usize),
    /// Layer index outside `0..size`.
    #[error("layer {layer} is out of range for a puzzle of size {size}")]
    LayerOutOfRange { layer: usize, size: usize },
    /// Axis character other than `x`, `y` or `z`.
    #[error("unknown axis {0:?}")]
    UnknownAxis(char),
    /// Direction other than `+1` or `-1`.
    #[error("invalid direction {0}, expected +1 or -1")]
    InvalidDirection(i32),
    /// The puzzle kind has no turning logic.
    #[error("{0} puzzles do not support turning")]
    Unsupported(PuzzleKind),
}

/// Malformed turn notation such as `y2+`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseTurnError {
    #[error("empty turn")]
    Empty,
    #[error(transparent)]
    Turn(#[from] TurnError),
    #[error("missing layer index in {0:?}")]
    MissingLayer(String),
    #[error("missing direction sign in {0:?}, expected a trailing '+' or '-'")]
    MissingDirection(String),
}

/// Failure loading [`Settings`](crate::config::Settings).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("puzzle size must be at least 1")]
    InvalidSize,
    #[error("drag threshold must be a non-negative number, got {0}")]
    InvalidDragThreshold(f32),
}
