//! Interactive 3D view of a puzzle session using kiss3d.

use std::time::Instant;

use kiss3d::prelude::*;

use twisty::engine::{Session, SessionEvent};
use twisty::geometry::{Axis, Direction, Face, Turn};
use twisty::gesture::{self, DragGesture};
use twisty::grid::Cube;
use twisty::pieces::{self, Cubie};

/// Edge length of a rendered cubie body (slightly smaller than 1.0 for visible gaps).
const BODY_SIZE: f32 = 0.95;
/// Edge length of a sticker.
const STICKER_SIZE: f32 = 0.82;
/// Thickness of a sticker.
const STICKER_DEPTH: f32 = 0.04;
/// Distance from a cubie centre to its sticker centre.
const STICKER_OFFSET: f32 = 0.5;
/// Largest cube the size keys will build.
const MAX_SIZE: usize = 10;

fn sticker_color(color: pieces::Color) -> Color {
    match color {
        pieces::Color::Red => Color::new(0.85, 0.1, 0.1, 1.0),
        pieces::Color::Orange => Color::new(1.0, 0.5, 0.0, 1.0),
        pieces::Color::White => Color::new(0.95, 0.95, 0.95, 1.0),
        pieces::Color::Yellow => Color::new(1.0, 0.85, 0.0, 1.0),
        pieces::Color::Green => Color::new(0.0, 0.65, 0.25, 1.0),
        pieces::Color::Blue => Color::new(0.05, 0.3, 0.85, 1.0),
    }
}

fn body_color() -> Color {
    Color::new(0.08, 0.08, 0.08, 1.0)
}

/// A scene node belonging to one cubie.
struct RenderedPart {
    node: SceneNode3d,
    /// Position when no twist is animating, relative to the cube centre.
    rest_position: Vec3,
    /// Index of the owning cubie.
    piece: usize,
}

fn to_vec3((x, y, z): pieces::Coord) -> Vec3 {
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Rotates `v` about a principal axis through the origin by `angle` radians,
/// following the right-hand rule.
fn rotate_about(axis: Axis, angle: f32, v: Vec3) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    match axis {
        Axis::X => Vec3::new(v.x, v.y * cos - v.z * sin, v.y * sin + v.z * cos),
        Axis::Y => Vec3::new(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos),
        Axis::Z => Vec3::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z),
    }
}

/// Builds the body and stickers of every cubie.
///
/// Grid coordinates map x->X, y->Y, z->Z in world units, centred on the
/// origin.
fn build_scene(scene: &mut SceneNode3d, cube: &Cube) -> Vec<RenderedPart> {
    let center = (cube.size() as f32 - 1.0) / 2.0;
    let mut parts = Vec::new();

    for (piece, cubie) in cube.cubies().iter().enumerate() {
        let body_position = to_vec3(cubie.position()) - Vec3::splat(center);
        let node = scene
            .add_cube(BODY_SIZE, BODY_SIZE, BODY_SIZE)
            .set_color(body_color())
            .set_position(body_position);
        parts.push(RenderedPart {
            node,
            rest_position: body_position,
            piece,
        });

        for local in Face::ALL {
            let Some(color) = cubie.face_color(local) else {
                continue;
            };
            let normal = cubie.world_normal(local);
            let rest_position = body_position + to_vec3(normal) * STICKER_OFFSET;
            let mut extent = [STICKER_SIZE; 3];
            if let Some(facing) = Face::from_normal(normal) {
                extent[facing.axis() as usize] = STICKER_DEPTH;
            }
            let node = scene
                .add_cube(extent[0], extent[1], extent[2])
                .set_color(sticker_color(color))
                .set_position(rest_position);
            parts.push(RenderedPart {
                node,
                rest_position,
                piece,
            });
        }
    }

    parts
}

/// Keyboard commands other than face turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyCommand {
    /// Toggle counter-clockwise face turns.
    Invert,
    Scramble,
    Reset,
    /// Change the edge length by one layer.
    Resize(isize),
}

fn key_command(key: Key) -> Option<KeyCommand> {
    match key {
        Key::I => Some(KeyCommand::Invert),
        Key::Space => Some(KeyCommand::Scramble),
        Key::Return => Some(KeyCommand::Reset),
        Key::Up => Some(KeyCommand::Resize(1)),
        Key::Down => Some(KeyCommand::Resize(-1)),
        _ => None,
    }
}

/// Edge length after a resize step, if it stays within `1..=MAX_SIZE`.
fn resized(size: usize, step: isize) -> Option<usize> {
    size.checked_add_signed(step)
        .filter(|new_size| (1..=MAX_SIZE).contains(new_size))
}

/// The outer-face turn for a keyboard face letter, clockwise as seen from
/// outside that face.
fn face_turn(face: Face, size: usize) -> Turn {
    let direction = if face.is_positive() {
        Direction::Negative
    } else {
        Direction::Positive
    };
    Turn::new(face.axis(), face.boundary_layer(size), direction)
}

fn window_title(session: &Session) -> String {
    let puzzle = session.puzzle();
    let n = puzzle.size();
    format!(
        "{} {n}x{n}x{n} - {} moves - {:.1}s{}",
        puzzle.kind(),
        session.moves(),
        session.elapsed().as_secs_f32(),
        if session.has_been_solved() { " - solved!" } else { "" }
    )
}

fn camera_distance(size: usize) -> f32 {
    size as f32 * 2.5 + 3.0
}

/// Casts the pointer ray at `cursor` into the cube and reports the cubie
/// face under it.
fn pick_at(
    session: &Session,
    camera: &OrbitCamera3d,
    window: &Window,
    cursor: Vec2,
) -> Option<gesture::Hit> {
    let cube = session.puzzle().as_cube()?;
    let viewport = Vec2::new(window.width() as f32, window.height() as f32);
    let (origin, direction) = camera.unproject(cursor, viewport);
    gesture::pick(cube.cubies(), cube.size(), origin.to_array(), direction.to_array())
}

/// Runs the interactive viewer until the window is closed.
pub fn display(session: Session, drag_threshold: f32) {
    pollster::block_on(display_async(session, drag_threshold));
}

async fn display_async(mut session: Session, drag_threshold: f32) {
    let mut window = Window::new(&window_title(&session)).await;

    // left button turns layers, right button orbits
    let mut camera = OrbitCamera3d::default();
    camera.set_dist(camera_distance(session.puzzle().size()));
    camera.rebind_rotate_button(Some(MouseButton::Button2));
    camera.rebind_drag_button(None);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(8.0, 10.0, 12.0));

    let mut parts = match session.puzzle().as_cube() {
        Some(cube) => build_scene(&mut scene, cube),
        None => Vec::new(),
    };
    // logical state the scene was built from
    let mut shown: Vec<Cubie> = session.puzzle().cubies().to_vec();
    // whether face keys turn counter-clockwise
    let mut inverted = false;
    let mut drag = DragGesture::new(drag_threshold);
    let mut cursor = Vec2::ZERO;
    let mut last_frame = Instant::now();

    loop {
        for event in window.events().iter() {
            match event.value {
                WindowEvent::CursorPos(x, y, _) => {
                    cursor = Vec2::new(x as f32, y as f32);
                    let pointer = (cursor.x, cursor.y);
                    if let Some(turn) = drag.move_to(session.puzzle().cubies(), pointer) {
                        if let Err(e) = session.rotate(turn, true) {
                            log::warn!("drag turn {turn} rejected: {e}");
                        }
                    }
                    continue;
                }
                WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                    if let Some(hit) = pick_at(&session, &camera, &window, cursor) {
                        drag.press(hit, (cursor.x, cursor.y));
                    }
                    continue;
                }
                WindowEvent::MouseButton(MouseButton::Button1, Action::Release, _) => {
                    drag.release();
                    continue;
                }
                _ => {}
            }
            if let WindowEvent::Key(key, action, _) = event.value {
                if action != Action::Press {
                    continue;
                }
                let size = session.puzzle().size();
                let face = match key {
                    Key::U => Some(Face::PosY),
                    Key::D => Some(Face::NegY),
                    Key::R => Some(Face::PosX),
                    Key::L => Some(Face::NegX),
                    Key::F => Some(Face::PosZ),
                    Key::B => Some(Face::NegZ),
                    _ => None,
                };
                if let Some(face) = face {
                    let mut turn = face_turn(face, size);
                    if inverted {
                        turn = turn.inverse();
                    }
                    if let Err(e) = session.rotate(turn, true) {
                        log::warn!("turn {turn} rejected: {e}");
                    }
                    continue;
                }
                match key_command(key) {
                    Some(KeyCommand::Invert) => inverted = !inverted,
                    Some(KeyCommand::Scramble) => {
                        if let Err(e) = session.scramble(None) {
                            log::warn!("scramble failed: {e}");
                        }
                    }
                    Some(KeyCommand::Reset) => session.reset(),
                    Some(KeyCommand::Resize(step)) => {
                        let Some(new_size) = resized(size, step) else {
                            continue;
                        };
                        match session.rebuild(session.puzzle().kind(), new_size) {
                            Ok(()) => {
                                drag.release();
                                camera.set_dist(camera_distance(new_size));
                            }
                            Err(e) => log::warn!("resize failed: {e}"),
                        }
                    }
                    None => {}
                }
            }
        }

        let now = Instant::now();
        if let Err(e) = session.advance(now - last_frame) {
            log::error!("twist failed: {e}");
        }
        last_frame = now;

        for event in session.drain_events() {
            if let SessionEvent::Solved { moves, elapsed } = event {
                println!("Solved in {moves} moves, {:.2}s", elapsed.as_secs_f32());
            }
        }

        // rebuild once the logical state has moved on
        if session.puzzle().cubies() != shown.as_slice() {
            for mut part in parts.drain(..) {
                part.node.remove();
            }
            if let Some(cube) = session.puzzle().as_cube() {
                parts = build_scene(&mut scene, cube);
            }
            shown = session.puzzle().cubies().to_vec();
        }

        // swing the turning layer through the animated angle
        let twist = session.twist_progress();
        for part in &mut parts {
            let position = match twist {
                Some((turn, t)) => {
                    let cubie = &shown[part.piece];
                    if turn.axis.component(cubie.position()) == turn.layer as i32 {
                        let angle = t * std::f32::consts::FRAC_PI_2 * turn.direction.sign() as f32;
                        rotate_about(turn.axis, angle, part.rest_position)
                    } else {
                        part.rest_position
                    }
                }
                None => part.rest_position,
            };
            part.node.set_position(position);
        }

        window.set_title(&window_title(&session));
        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
