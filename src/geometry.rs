//! Axes, face directions and exact quarter-turn arithmetic.
//!
//! Every rotation a puzzle piece can undergo is a composition of quarter turns
//! about the three principal axes, so all of it is done on integer vectors.
//! Orientations are signed permutation matrices and never drift.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseTurnError, TurnError};
use crate::pieces::Coord;

/// A principal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the component of `coord` along this axis.
    #[inline]
    pub const fn component(self, (x, y, z): Coord) -> i32 {
        match self {
            Axis::X => x,
            Axis::Y => y,
            Axis::Z => z,
        }
    }

    pub const fn name(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

impl TryFrom<char> for Axis {
    type Error = TurnError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_lowercase() {
            'x' => Ok(Axis::X),
            'y' => Ok(Axis::Y),
            'z' => Ok(Axis::Z),
            _ => Err(TurnError::UnknownAxis(c)),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sense of a quarter turn.
///
/// `Positive` follows the right-hand rule: counter-clockwise when looking
/// down the axis from its positive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    pub const fn sign(self) -> i32 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }

    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }

    /// `Positive` when `sign` is non-negative, `Negative` otherwise.
    pub const fn from_sign(sign: i32) -> Self {
        if sign >= 0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = TurnError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Positive),
            -1 => Ok(Direction::Negative),
            other => Err(TurnError::InvalidDirection(other)),
        }
    }
}

/// Quarter-turn formulas indexed by `[axis][direction]`.
///
/// The second entry of each row is the inverse of the first; the index
/// mapping must stay in sync with [`quarter_turn`].
const QUARTER_TURNS: [[fn(Coord) -> Coord; 2]; 3] = [
    // X axis: y -> z
    [|(x, y, z)| (x, -z, y), |(x, y, z)| (x, z, -y)],
    // Y axis: z -> x
    [|(x, y, z)| (z, y, -x), |(x, y, z)| (-z, y, x)],
    // Z axis: x -> y
    [|(x, y, z)| (-y, x, z), |(x, y, z)| (y, -x, z)],
];

/// Rotates a vector by a quarter turn about the origin.
#[inline]
pub fn quarter_turn(axis: Axis, direction: Direction, v: Coord) -> Coord {
    let axis_index = axis as usize;
    let direction_index = match direction {
        Direction::Positive => 0,
        Direction::Negative => 1,
    };
    QUARTER_TURNS[axis_index][direction_index](v)
}

/// Rotates a grid cell of an `size`-wide grid by a quarter turn about the
/// grid's centre.
///
/// Uses doubled coordinates so even sizes (whose centre lies between cells)
/// stay in integer arithmetic: `doubled = 2 * p - (size - 1)`.
///
/// # Panics
///
/// Panics if the result is not an integer cell inside the grid, which can only
/// happen if `cell` was not inside the grid to begin with.
pub fn turn_grid_cell(cell: Coord, size: usize, axis: Axis, direction: Direction) -> Coord {
    let span = size as i32 - 1;
    let to_doubled = |p: i32| 2 * p - span;
    let from_doubled = |d: i32| {
        let shifted = d + span;
        assert!(
            shifted % 2 == 0 && (0..=2 * span).contains(&shifted),
            "quarter turn left the integer grid (doubled coordinate {d}, size {size})"
        );
        shifted / 2
    };

    let doubled = (to_doubled(cell.0), to_doubled(cell.1), to_doubled(cell.2));
    let (rx, ry, rz) = quarter_turn(axis, direction, doubled);
    (from_doubled(rx), from_doubled(ry), from_doubled(rz))
}

/// One of the six outward face directions of a cube.
///
/// The declaration order is the fixed enumeration order used to break ties
/// when matching directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    pub const fn new(axis: Axis, positive: bool) -> Self {
        match (axis, positive) {
            (Axis::X, true) => Face::PosX,
            (Axis::X, false) => Face::NegX,
            (Axis::Y, true) => Face::PosY,
            (Axis::Y, false) => Face::NegY,
            (Axis::Z, true) => Face::PosZ,
            (Axis::Z, false) => Face::NegZ,
        }
    }

    pub const fn axis(self) -> Axis {
        match self {
            Face::PosX | Face::NegX => Axis::X,
            Face::PosY | Face::NegY => Axis::Y,
            Face::PosZ | Face::NegZ => Axis::Z,
        }
    }

    pub const fn is_positive(self) -> bool {
        matches!(self, Face::PosX | Face::PosY | Face::PosZ)
    }

    /// Unit outward normal.
    pub const fn normal(self) -> Coord {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Returns the face whose normal is exactly `normal`, if any.
    pub fn from_normal(normal: Coord) -> Option<Self> {
        Face::ALL.into_iter().find(|face| face.normal() == normal)
    }

    /// Layer index of the boundary layer this face covers.
    pub const fn boundary_layer(self, size: usize) -> usize {
        if self.is_positive() {
            size - 1
        } else {
            0
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Face::PosX => "+X",
            Face::NegX => "-X",
            Face::PosY => "+Y",
            Face::NegY => "-Y",
            Face::PosZ => "+Z",
            Face::NegZ => "-Z",
        }
    }
}

#[inline]
pub const fn dot(a: Coord, b: Coord) -> i32 {
    a.0 * b.0 + a.1 * b.1 + a.2 * b.2
}

#[inline]
const fn cross(a: Coord, b: Coord) -> Coord {
    (
        a.1 * b.2 - a.2 * b.1,
        a.2 * b.0 - a.0 * b.2,
        a.0 * b.1 - a.1 * b.0,
    )
}

/// A rotation from the 24-element rotation group of the cube.
///
/// Stored as the images of the three basis vectors, so applying it is a
/// signed permutation of components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation {
    columns: [Coord; 3],
}

impl Orientation {
    pub const IDENTITY: Self = Self {
        columns: [(1, 0, 0), (0, 1, 0), (0, 0, 1)],
    };

    /// Rotates a vector from piece-local space into world space.
    #[inline]
    pub fn apply(&self, (x, y, z): Coord) -> Coord {
        let [c0, c1, c2] = self.columns;
        (
            x * c0.0 + y * c1.0 + z * c2.0,
            x * c0.1 + y * c1.1 + z * c2.1,
            x * c0.2 + y * c1.2 + z * c2.2,
        )
    }

    /// Composes a world-space quarter turn after this orientation.
    #[must_use]
    pub fn turned(&self, axis: Axis, direction: Direction) -> Self {
        Self {
            columns: self
                .columns
                .map(|column| quarter_turn(axis, direction, column)),
        }
    }

    /// Returns whether this is a proper rotation made of quarter turns:
    /// every column a signed unit axis vector and a right-handed basis.
    pub fn is_cube_rotation(&self) -> bool {
        let [c0, c1, c2] = self.columns;
        let is_unit_axis = |(x, y, z): Coord| x.abs() + y.abs() + z.abs() == 1;
        self.columns.iter().all(|&c| is_unit_axis(c)) && cross(c0, c1) == c2
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A quarter turn of one layer: the command consumed by the turn engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Turn {
    pub axis: Axis,
    pub layer: usize,
    pub direction: Direction,
}

impl Turn {
    pub const fn new(axis: Axis, layer: usize, direction: Direction) -> Self {
        Self {
            axis,
            layer,
            direction,
        }
    }

    /// Builds a turn from loosely typed input, as a UI layer would supply it.
    pub fn from_parts(axis: char, layer: usize, direction: i32) -> Result<Self, TurnError> {
        Ok(Self::new(
            Axis::try_from(axis)?,
            layer,
            Direction::try_from(direction)?,
        ))
    }

    #[must_use]
    pub const fn inverse(self) -> Self {
        Self::new(self.axis, self.layer, self.direction.reversed())
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.direction {
            Direction::Positive => '+',
            Direction::Negative => '-',
        };
        write!(f, "{}{}{}", self.axis, self.layer, sign)
    }
}

/// Parses `<axis><layer><sign>`, e.g. `y2+` or `x0-`.
impl FromStr for Turn {
    type Err = ParseTurnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let axis = Axis::try_from(chars.next().ok_or(ParseTurnError::Empty)?)?;
        let rest = chars.as_str();

        let (digits, direction) = if let Some(digits) = rest.strip_suffix('+') {
            (digits, Direction::Positive)
        } else if let Some(digits) = rest.strip_suffix('-') {
            (digits, Direction::Negative)
        } else {
            return Err(ParseTurnError::MissingDirection(s.to_owned()));
        };

        let layer = digits
            .parse()
            .map_err(|_| ParseTurnError::MissingLayer(s.to_owned()))?;

        Ok(Turn::new(axis, layer, direction))
    }
}
