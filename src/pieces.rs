//! Cubie definitions and coordinate types.
//!
//! A cube of edge length N is built from the unit cubes on its surface shell.
//! Each cubie keeps the sticker colours it was created with; turns only ever
//! move and reorient it.

use crate::geometry::{dot, turn_grid_cell, Axis, Direction, Face, Orientation};

/// A 3D coordinate representing a unit cube position.
pub type Coord = (i32, i32, i32);

/// Sticker colours, one per face direction of a solved cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Orange,
    White,
    Yellow,
    Green,
    Blue,
}

impl Color {
    pub const fn letter(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Orange => 'O',
            Color::White => 'W',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Blue => 'B',
        }
    }
}

/// The canonical colour shown on each face of a solved cube.
///
/// This is a fixed bijection shared by every puzzle instance.
pub const fn canonical_color(face: Face) -> Color {
    match face {
        Face::PosX => Color::Red,
        Face::NegX => Color::Orange,
        Face::PosY => Color::White,
        Face::NegY => Color::Yellow,
        Face::PosZ => Color::Green,
        Face::NegZ => Color::Blue,
    }
}

/// Returns whether `coord` lies on the outer shell of a `size`-wide grid.
#[inline]
pub fn on_shell((x, y, z): Coord, size: usize) -> bool {
    let last = size as i32 - 1;
    [x, y, z].iter().any(|&c| c == 0 || c == last)
}

/// Number of shell cells: N³ - (N-2)³ for N >= 2, and the lone cell for N = 1.
pub const fn shell_count(size: usize) -> usize {
    if size <= 2 {
        size * size * size
    } else {
        let inner = size - 2;
        size * size * size - inner * inner * inner
    }
}

/// All shell cells in x-major order.
pub fn shell_cells(size: usize) -> Vec<Coord> {
    let n = size as i32;
    let mut cells = Vec::with_capacity(shell_count(size));
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                if on_shell((x, y, z), size) {
                    cells.push((x, y, z));
                }
            }
        }
    }
    cells
}

/// One logical piece of a cube puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cubie {
    home: Coord,
    position: Coord,
    orientation: Orientation,
    /// Sticker colour per local face, indexed by `Face as usize`.
    /// `None` for interior-facing sides.
    face_colors: [Option<Color>; 6],
}

impl Cubie {
    /// Creates a solved cubie at `home`, colouring each local face that lies
    /// on the matching boundary of the grid.
    pub fn new(home: Coord, size: usize) -> Self {
        let face_colors = Face::ALL.map(|face| {
            let layer = face.axis().component(home) as usize;
            (layer == face.boundary_layer(size)).then(|| canonical_color(face))
        });
        Self {
            home,
            position: home,
            orientation: Orientation::IDENTITY,
            face_colors,
        }
    }

    /// The slot this cubie was created in.
    pub fn home(&self) -> Coord {
        self.home
    }

    /// The slot this cubie currently occupies.
    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Colour of a local face, as assigned at creation.
    pub fn face_color(&self, local: Face) -> Option<Color> {
        self.face_colors[local as usize]
    }

    /// Outward normal of a local face in world space.
    pub fn world_normal(&self, local: Face) -> Coord {
        self.orientation.apply(local.normal())
    }

    /// The local face pointing most nearly along the world direction `world`.
    ///
    /// Ties keep the first face in [`Face::ALL`] order.
    pub fn facing_face(&self, world: Face) -> Face {
        let target = world.normal();
        let mut best = Face::ALL[0];
        let mut best_dot = i32::MIN;
        for local in Face::ALL {
            let alignment = dot(self.world_normal(local), target);
            if alignment > best_dot {
                best = local;
                best_dot = alignment;
            }
        }
        best
    }

    /// Colour currently showing towards the world direction `world`.
    pub fn facing_color(&self, world: Face) -> Option<Color> {
        self.face_color(self.facing_face(world))
    }

    /// Applies a quarter turn about the grid centre to both position and
    /// orientation.
    pub(crate) fn turn(&mut self, size: usize, axis: Axis, direction: Direction) {
        self.position = turn_grid_cell(self.position, size, axis, direction);
        self.orientation = self.orientation.turned(axis, direction);
    }
}
