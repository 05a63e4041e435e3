//! Benchmarks for the cube turn engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use twisty::engine::Session;
use twisty::geometry::{Axis, Direction, Face, Turn};
use twisty::gesture::{interpret_drag, Hit};
use twisty::grid::{format_net, Cube};

fn scrambled(size: usize) -> Cube {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut cube = Cube::new(size);
    cube.scramble(cube.default_scramble_length(), &mut rng).unwrap();
    cube
}

/// Benchmark a single outer-layer quarter turn on several sizes.
fn bench_quarter_turn(c: &mut Criterion) {
    let mut group = c.benchmark_group("quarter_turn");
    for size in [3, 7, 17] {
        let turn = Turn::new(Axis::Y, size - 1, Direction::Positive);
        let mut cube = Cube::new(size);
        group.bench_function(format!("{size}x{size}"), |b| {
            b.iter(|| cube.apply_turn(black_box(turn)))
        });
    }
    group.finish();
}

/// Benchmark the solved-state check on a scrambled cube.
fn bench_is_solved(c: &mut Criterion) {
    let cube = scrambled(5);
    c.bench_function("is_solved_5x5", |b| b.iter(|| black_box(&cube).is_solved()));
}

/// Benchmark a full default-length scramble through a session.
fn bench_scramble(c: &mut Criterion) {
    let mut session = Session::new(Box::new(Cube::new(4))).with_seed(9);
    c.bench_function("scramble_4x4", |b| b.iter(|| session.scramble(None)));
}

/// Benchmark resolving a drag gesture.
fn bench_gesture(c: &mut Criterion) {
    let cube = scrambled(3);
    let hit = Hit {
        piece: 0,
        face: Face::NegX,
    };
    c.bench_function("interpret_drag", |b| {
        b.iter(|| interpret_drag(cube.cubies(), black_box(hit), (45.0, -12.0), 30.0))
    });
}

/// Benchmark formatting a cube for display.
fn bench_format_net(c: &mut Criterion) {
    let cube = scrambled(5);
    c.bench_function("format_net_5x5", |b| b.iter(|| format_net(black_box(&cube))));
}

criterion_group!(
    benches,
    bench_quarter_turn,
    bench_is_solved,
    bench_scramble,
    bench_gesture,
    bench_format_net
);
criterion_main!(benches);
