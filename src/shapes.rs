//! Non-cubic puzzle shapes.
//!
//! Tetrahedral and dodecahedral puzzles can be selected but have no pieces
//! or turning logic: they are permanently solved, reject every turn, and the
//! viewer shows them as an empty scene.

use rand_chacha::ChaCha8Rng;

use crate::error::TurnError;
use crate::geometry::Turn;
use crate::pieces::Cubie;
use crate::{PuzzleKind, PuzzleOps};

/// A puzzle kind with no turning logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticPuzzle {
    kind: PuzzleKind,
    size: usize,
}

impl StaticPuzzle {
    pub fn pyraminx(size: usize) -> Self {
        Self {
            kind: PuzzleKind::Pyraminx,
            size,
        }
    }

    pub fn megaminx(size: usize) -> Self {
        Self {
            kind: PuzzleKind::Megaminx,
            size,
        }
    }
}

impl PuzzleOps for StaticPuzzle {
    fn kind(&self) -> PuzzleKind {
        self.kind
    }

    fn size(&self) -> usize {
        self.size
    }

    fn check_turn(&self, _turn: Turn) -> Result<(), TurnError> {
        Err(TurnError::Unsupported(self.kind))
    }

    fn apply_turn(&mut self, _turn: Turn) -> Result<(), TurnError> {
        Err(TurnError::Unsupported(self.kind))
    }

    fn scramble(&mut self, _turns: usize, _rng: &mut ChaCha8Rng) -> Result<Vec<Turn>, TurnError> {
        Err(TurnError::Unsupported(self.kind))
    }

    fn default_scramble_length(&self) -> usize {
        0
    }

    fn reset(&mut self) {}

    fn is_solved(&self) -> bool {
        true
    }

    fn cubies(&self) -> &[Cubie] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::geometry::{Axis, Direction};

    #[test]
    fn test_static_puzzles_reject_turns() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for mut puzzle in [StaticPuzzle::pyraminx(3), StaticPuzzle::megaminx(3)] {
            let turn = Turn::new(Axis::X, 0, Direction::Positive);
            assert_eq!(
                puzzle.apply_turn(turn),
                Err(TurnError::Unsupported(puzzle.kind()))
            );
            assert!(puzzle.scramble(5, &mut rng).is_err());
            puzzle.reset();
            assert!(puzzle.is_solved());
            assert!(puzzle.cubies().is_empty());
        }
    }
}
