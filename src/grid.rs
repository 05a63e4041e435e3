//! Cube puzzle state and logical layer turns.
//!
//! The cube owns its surface cubies and is the single source of truth for
//! puzzle state. Layer membership is decided from each cubie's current grid
//! position by exact integer comparison.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;

use crate::error::TurnError;
use crate::geometry::{Axis, Direction, Face, Turn};
use crate::pieces::{shell_cells, Color, Coord, Cubie};

/// Minimum number of turns in a default scramble.
const MIN_SCRAMBLE_TURNS: usize = 20;

/// Default scramble turns per unit of edge length.
const SCRAMBLE_TURNS_PER_LAYER: usize = 5;

/// An N×N×N cube puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cube {
    size: usize,
    cubies: Vec<Cubie>,
}

impl Cube {
    /// Creates a solved cube of edge length `size`.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size >= 1, "cube size must be at least 1");
        let cubies = shell_cells(size)
            .into_iter()
            .map(|home| Cubie::new(home, size))
            .collect();
        Self { size, cubies }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cubies(&self) -> &[Cubie] {
        &self.cubies
    }

    /// Discards all cubies and rebuilds a solved cube of the same size.
    pub fn reset(&mut self) {
        *self = Self::new(self.size);
    }

    /// Number of turns a default scramble uses: `max(20, 5 * size)`.
    pub fn default_scramble_length(&self) -> usize {
        MIN_SCRAMBLE_TURNS.max(self.size * SCRAMBLE_TURNS_PER_LAYER)
    }

    /// Rejects turns whose layer index is outside the grid.
    pub fn check_turn(&self, turn: Turn) -> Result<(), TurnError> {
        if turn.layer >= self.size {
            return Err(TurnError::LayerOutOfRange {
                layer: turn.layer,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Indices of the cubies currently in layer `layer` along `axis`.
    pub fn layer(&self, axis: Axis, layer: usize) -> impl Iterator<Item = usize> + '_ {
        self.cubies
            .iter()
            .enumerate()
            .filter(move |(_, cubie)| axis.component(cubie.position()) == layer as i32)
            .map(|(index, _)| index)
    }

    /// Applies one quarter turn to the selected layer.
    ///
    /// The turn is validated first; on error nothing is mutated.
    pub fn apply_turn(&mut self, turn: Turn) -> Result<(), TurnError> {
        self.check_turn(turn)?;
        let Turn {
            axis,
            layer,
            direction,
        } = turn;
        let size = self.size;
        for cubie in &mut self.cubies {
            if axis.component(cubie.position()) == layer as i32 {
                cubie.turn(size, axis, direction);
            }
        }
        debug_assert!(self
            .cubies
            .iter()
            .all(|cubie| cubie.orientation().is_cube_rotation()));
        Ok(())
    }

    /// Generates a uniformly random turn.
    pub fn random_turn(&self, rng: &mut ChaCha8Rng) -> Turn {
        let axis = Axis::ALL[rng.random_range(0..Axis::ALL.len())];
        let layer = rng.random_range(0..self.size);
        let direction = if rng.random_bool(0.5) {
            Direction::Positive
        } else {
            Direction::Negative
        };
        Turn::new(axis, layer, direction)
    }

    /// Applies `turns` uniformly random quarter turns and returns them.
    pub fn scramble(&mut self, turns: usize, rng: &mut ChaCha8Rng) -> Result<Vec<Turn>, TurnError> {
        let sequence: Vec<Turn> = (0..turns).map(|_| self.random_turn(rng)).collect();
        for &turn in &sequence {
            self.apply_turn(turn)?;
        }
        Ok(sequence)
    }

    /// Cubie currently occupying the slot `coord`.
    pub fn piece_at(&self, coord: Coord) -> Option<&Cubie> {
        self.cubies.iter().find(|cubie| cubie.position() == coord)
    }

    /// Colours showing on the world face `face`, one per cubie in that
    /// boundary layer.
    pub fn face_colors(&self, face: Face) -> impl Iterator<Item = Option<Color>> + '_ {
        let boundary = face.boundary_layer(self.size) as i32;
        self.cubies
            .iter()
            .filter(move |cubie| face.axis().component(cubie.position()) == boundary)
            .map(move |cubie| cubie.facing_color(face))
    }

    /// Returns whether every face shows a single colour.
    pub fn is_solved(&self) -> bool {
        Face::ALL.into_iter().all(|face| {
            let mut colors = self.face_colors(face);
            match colors.next() {
                Some(first) => colors.all(|color| color == first),
                None => true,
            }
        })
    }
}

/// Screen axes used to lay a face out as seen from outside the cube:
/// `(right, up)`.
const fn net_basis(face: Face) -> (Face, Face) {
    match face {
        Face::PosX => (Face::NegZ, Face::PosY),
        Face::NegX => (Face::PosZ, Face::PosY),
        Face::PosY => (Face::PosX, Face::NegZ),
        Face::NegY => (Face::PosX, Face::PosZ),
        Face::PosZ => (Face::PosX, Face::PosY),
        Face::NegZ => (Face::NegX, Face::PosY),
    }
}

/// Sticker letters of one face, row by row from the top.
fn face_rows(cube: &Cube, by_position: &FxHashMap<Coord, &Cubie>, face: Face) -> Vec<String> {
    let size = cube.size();
    let last = size as i32 - 1;
    let (right, up) = net_basis(face);
    // maps a screen index (0 = left/top) onto a grid coordinate
    let along = |screen_axis: Face, index: i32, ascending: bool| {
        if screen_axis.is_positive() == ascending {
            index
        } else {
            last - index
        }
    };

    (0..size as i32)
        .map(|row| {
            (0..size as i32)
                .map(|col| {
                    let mut cell = [0; 3];
                    cell[face.axis() as usize] = face.boundary_layer(size) as i32;
                    cell[right.axis() as usize] = along(right, col, true);
                    cell[up.axis() as usize] = along(up, row, false);
                    by_position
                        .get(&(cell[0], cell[1], cell[2]))
                        .and_then(|cubie| cubie.facing_color(face))
                        .map_or('.', |color| color.letter())
                })
                .collect()
        })
        .collect()
}

/// Formats the cube as a human-readable string.
///
/// Displays the six faces side by side in `+X -X +Y -Y +Z -Z` order, each
/// as seen from outside the cube. Missing stickers show as '.'.
pub fn format_net(cube: &Cube) -> String {
    let width = cube.size().max(2);
    let by_position: FxHashMap<Coord, &Cubie> = cube
        .cubies()
        .iter()
        .map(|cubie| (cubie.position(), cubie))
        .collect();
    let faces: Vec<Vec<String>> = Face::ALL
        .iter()
        .map(|&face| face_rows(cube, &by_position, face))
        .collect();

    let mut output = String::new();
    let mut push_line = |cells: Vec<String>| {
        let line: Vec<String> = cells
            .into_iter()
            .map(|cell| format!("{cell:<width$}"))
            .collect();
        output.push_str(line.join("  ").trim_end());
        output.push('\n');
    };

    push_line(Face::ALL.iter().map(|face| face.label().to_owned()).collect());
    for row in 0..cube.size() {
        push_line(faces.iter().map(|rows| rows[row].clone()).collect());
    }

    output
}
