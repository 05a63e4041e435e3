//! Translation of pointer drags on a cubie face into layer turns.
//!
//! A drag is resolved from the world-space normal of the face that was
//! pressed and the dominant screen direction of the pointer movement. The
//! pressed face comes from [`pick`], which casts the renderer's pointer ray
//! against the cubies.

use crate::geometry::{Axis, Direction, Face, Turn};
use crate::pieces::{Coord, Cubie};

/// Pointer travel in pixels along either screen axis before a drag counts.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 30.0;

/// Half the edge length of a cubie's hit box.
const CUBIE_HALF_EXTENT: f32 = 0.5;

/// A face of a cubie under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Index into the puzzle's cubie list.
    pub piece: usize,
    /// Local (unrotated) face that was hit.
    pub face: Face,
}

/// Picks the dominant axis of a face normal, checking Y, then X, then Z.
///
/// Returns the axis and the signed normal component along it, or `None` when
/// no component exceeds 0.5 in magnitude.
pub fn classify_normal([x, y, z]: [f32; 3]) -> Option<(Axis, f32)> {
    if y.abs() > 0.5 {
        Some((Axis::Y, y))
    } else if x.abs() > 0.5 {
        Some((Axis::X, x))
    } else if z.abs() > 0.5 {
        Some((Axis::Z, z))
    } else {
        None
    }
}

/// Resolves a drag `(dx, dy)` in screen pixels on a face with world normal
/// `normal` belonging to the cubie at `position`.
///
/// Horizontal means `|dx| > |dy|`. The turn acts on the layer that contains
/// the dragged cubie. Non-finite deltas produce no turn.
pub fn turn_for_drag(position: Coord, normal: [f32; 3], dx: f32, dy: f32) -> Option<Turn> {
    if !(dx.is_finite() && dy.is_finite()) {
        return None;
    }
    let (face_axis, component) = classify_normal(normal)?;
    let horizontal = dx.abs() > dy.abs();
    let pick = |condition: bool, if_true: i32| if condition { if_true } else { -if_true };

    let (axis, base) = match (face_axis, horizontal) {
        (Axis::Y, true) => (Axis::Z, pick(dx > 0.0, 1)),
        (Axis::Y, false) => (Axis::X, pick(dy > 0.0, -1)),
        (Axis::X, true) => (Axis::Y, pick(dx > 0.0, -1)),
        (Axis::X, false) => (Axis::Z, pick(dy > 0.0, 1)),
        (Axis::Z, true) => (Axis::Y, pick(dx > 0.0, -1)),
        (Axis::Z, false) => (Axis::X, pick(dy > 0.0, 1)),
    };
    let sign = if component < 0.0 { -base } else { base };
    let layer = usize::try_from(axis.component(position)).ok()?;

    Some(Turn::new(axis, layer, Direction::from_sign(sign)))
}

/// Resolves a drag on `hit` once it exceeds `threshold` pixels along either
/// screen axis.
pub fn interpret_drag(
    cubies: &[Cubie],
    hit: Hit,
    (dx, dy): (f32, f32),
    threshold: f32,
) -> Option<Turn> {
    if dx.abs() <= threshold && dy.abs() <= threshold {
        return None;
    }
    let cubie = cubies.get(hit.piece)?;
    let (nx, ny, nz) = cubie.world_normal(hit.face);
    turn_for_drag(cubie.position(), [nx as f32, ny as f32, nz as f32], dx, dy)
}

/// Casts a ray against the cubies of a cube of edge length `size`, laid out
/// as unit boxes centred on the origin, and returns the nearest face the ray
/// enters.
pub fn pick(cubies: &[Cubie], size: usize, origin: [f32; 3], direction: [f32; 3]) -> Option<Hit> {
    let center = (size as f32 - 1.0) / 2.0;
    let mut nearest: Option<(f32, Hit)> = None;
    for (piece, cubie) in cubies.iter().enumerate() {
        let (x, y, z) = cubie.position();
        let middle = [x as f32 - center, y as f32 - center, z as f32 - center];
        let Some((distance, normal)) = ray_box_entry(origin, direction, middle) else {
            continue;
        };
        if nearest.is_some_and(|(best, _)| best <= distance) {
            continue;
        }
        let local = Face::ALL
            .into_iter()
            .find(|&face| cubie.world_normal(face) == normal);
        if let Some(face) = local {
            nearest = Some((distance, Hit { piece, face }));
        }
    }
    nearest.map(|(_, hit)| hit)
}

/// Slab test of a ray against the unit box centred on `middle`. Returns the
/// entry distance and the outward normal of the entered face; rays starting
/// inside the box miss.
fn ray_box_entry(origin: [f32; 3], direction: [f32; 3], middle: [f32; 3]) -> Option<(f32, Coord)> {
    let mut entry = f32::NEG_INFINITY;
    let mut exit = f32::INFINITY;
    let mut entered = None;
    for axis in Axis::ALL {
        let i = axis as usize;
        let low = middle[i] - CUBIE_HALF_EXTENT;
        let high = middle[i] + CUBIE_HALF_EXTENT;
        if direction[i] == 0.0 {
            if origin[i] < low || origin[i] > high {
                return None;
            }
            continue;
        }
        let (near, far, positive) = if direction[i] > 0.0 {
            ((low - origin[i]) / direction[i], (high - origin[i]) / direction[i], false)
        } else {
            ((high - origin[i]) / direction[i], (low - origin[i]) / direction[i], true)
        };
        if near > entry {
            entry = near;
            entered = Some(Face::new(axis, positive));
        }
        exit = exit.min(far);
    }
    if !(entry >= 0.0 && entry <= exit) {
        return None;
    }
    entered.map(|face| (entry, face.normal()))
}

/// A drag in progress on a cubie face.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    hit: Hit,
    start: (f32, f32),
}

/// Tracks press/move/release pointer events and emits at most one turn per
/// press.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    threshold: f32,
    drag: Option<Drag>,
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl DragGesture {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            drag: None,
        }
    }

    /// Starts a drag on a cubie face at screen position `pointer`.
    pub fn press(&mut self, hit: Hit, pointer: (f32, f32)) {
        self.drag = Some(Drag {
            hit,
            start: pointer,
        });
    }

    /// Feeds a pointer move. Returns a turn the first time the drag passes the
    /// threshold; the drag then ends.
    pub fn move_to(&mut self, cubies: &[Cubie], pointer: (f32, f32)) -> Option<Turn> {
        let drag = self.drag?;
        let delta = (pointer.0 - drag.start.0, pointer.1 - drag.start.1);
        if !(delta.0.is_finite() && delta.1.is_finite()) {
            return None;
        }
        if delta.0.abs() <= self.threshold && delta.1.abs() <= self.threshold {
            return None;
        }
        self.drag = None;
        interpret_drag(cubies, drag.hit, delta, self.threshold)
    }

    /// Abandons the current drag, if any.
    pub fn release(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}
