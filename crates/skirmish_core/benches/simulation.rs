//! Simulation benchmarks for skirmish_core.
//!
//! Run with: `cargo bench -p skirmish_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use skirmish_core::grid::{Grid, TileCoord, TileState};
use skirmish_core::pathfinding::find_path;
use skirmish_core::runner::{default_controllers, run_match, setup_match, MatchConfig};
use skirmish_core::scheduler::TimerFires;

fn maze(size: u32) -> Grid {
    let mut grid = Grid::new(size, size);
    for col in (2..size).step_by(4) {
        for row in 0..size - 1 {
            grid.set_state(TileCoord::new(row, col), TileState::Blocked);
        }
    }
    for col in (4..size).step_by(4) {
        for row in 1..size {
            grid.set_state(TileCoord::new(row, col), TileState::Blocked);
        }
    }
    grid
}

/// Runs simulation benchmarks for the skirmish_core crate.
pub fn simulation_benchmark(c: &mut Criterion) {
    let grid = maze(64);
    c.bench_function("find_path_maze_64", |b| {
        b.iter(|| {
            find_path(
                black_box(&grid),
                TileCoord::new(0, 0),
                TileCoord::new(63, 63),
            )
        })
    });

    let config = MatchConfig::default();
    c.bench_function("tick_all_timers_opening", |b| {
        b.iter_batched(
            || setup_match(&config, 7, default_controllers(&config.sim)).ok(),
            |sim| {
                if let Some(mut sim) = sim {
                    for _ in 0..100 {
                        black_box(sim.step(TimerFires::ALL));
                    }
                }
            },
            BatchSize::SmallInput,
        )
    });

    let config = MatchConfig {
        max_frames: 50_000,
        ..MatchConfig::default()
    };
    let mut group = c.benchmark_group("full_match");
    group.sample_size(10);
    group.bench_function("seed_1", |b| {
        b.iter(|| run_match(&config, black_box(1), default_controllers(&config.sim)))
    });
    group.finish();
}

criterion_group!(benches, simulation_benchmark);
criterion_main!(benches);
