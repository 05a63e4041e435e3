//! Twisty puzzle library
//!
//! Provides the cube transformation engine: the cubie grid model, exact layer
//! turns with a queued animation session, solved-state detection and the
//! translation of drag gestures into turns.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod grid;
pub mod pieces;
pub mod shapes;

use std::fmt;

use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use error::TurnError;
use geometry::Turn;
use grid::Cube;
use pieces::Cubie;
use shapes::StaticPuzzle;

/// The families of puzzle that can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleKind {
    /// N×N×N cube.
    Cube,
    /// Tetrahedral puzzle.
    Pyraminx,
    /// Dodecahedral puzzle.
    Megaminx,
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PuzzleKind::Cube => "cube",
            PuzzleKind::Pyraminx => "pyraminx",
            PuzzleKind::Megaminx => "megaminx",
        };
        f.write_str(name)
    }
}

/// Capabilities shared by every puzzle kind, usable behind `dyn`.
pub trait PuzzleOps {
    fn kind(&self) -> PuzzleKind;
    fn size(&self) -> usize;
    /// Validates a turn without applying it.
    fn check_turn(&self, turn: Turn) -> Result<(), TurnError>;
    /// Applies a single turn atomically.
    fn apply_turn(&mut self, turn: Turn) -> Result<(), TurnError>;
    /// Applies `turns` random turns and returns them.
    fn scramble(&mut self, turns: usize, rng: &mut ChaCha8Rng) -> Result<Vec<Turn>, TurnError>;
    fn default_scramble_length(&self) -> usize;
    /// Rebuilds the puzzle in its solved state, keeping its size.
    fn reset(&mut self);
    fn is_solved(&self) -> bool;
    /// Pieces available for hit-testing; empty for puzzles without cubies.
    fn cubies(&self) -> &[Cubie];
    /// The underlying cube, for cube-family puzzles.
    fn as_cube(&self) -> Option<&Cube> {
        None
    }
}

impl PuzzleOps for Cube {
    fn kind(&self) -> PuzzleKind {
        PuzzleKind::Cube
    }

    fn size(&self) -> usize {
        Cube::size(self)
    }

    fn check_turn(&self, turn: Turn) -> Result<(), TurnError> {
        Cube::check_turn(self, turn)
    }

    fn apply_turn(&mut self, turn: Turn) -> Result<(), TurnError> {
        Cube::apply_turn(self, turn)
    }

    fn scramble(&mut self, turns: usize, rng: &mut ChaCha8Rng) -> Result<Vec<Turn>, TurnError> {
        Cube::scramble(self, turns, rng)
    }

    fn default_scramble_length(&self) -> usize {
        Cube::default_scramble_length(self)
    }

    fn reset(&mut self) {
        Cube::reset(self);
    }

    fn is_solved(&self) -> bool {
        Cube::is_solved(self)
    }

    fn cubies(&self) -> &[Cubie] {
        Cube::cubies(self)
    }

    fn as_cube(&self) -> Option<&Cube> {
        Some(self)
    }
}

/// Builds a solved puzzle of the given kind and size.
pub fn new_puzzle(kind: PuzzleKind, size: usize) -> Result<Box<dyn PuzzleOps>, TurnError> {
    if size == 0 {
        return Err(TurnError::InvalidSize(size));
    }
    Ok(match kind {
        PuzzleKind::Cube => Box::new(Cube::new(size)),
        PuzzleKind::Pyraminx => Box::new(StaticPuzzle::pyraminx(size)),
        PuzzleKind::Megaminx => Box::new(StaticPuzzle::megaminx(size)),
    })
}
