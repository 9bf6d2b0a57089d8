//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Tournament results are only meaningful if a seed replays exactly.
//! Sources of non-determinism include:
//!
//! - **Floating-point math**: hit chances are fixed-point via
//!   [`skirmish_core::math::Fixed`].
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Units and structures live in `BTreeMap`s keyed by id.
//!
//! - **System randomness**: every roll comes from the simulation's own
//!   seeded `ChaCha8Rng`.
//!
//! - **Wall clock**: the harness feeds a simulated clock, never `Instant`.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual system determinism (movement, combat, etc.)
//! 2. **Property tests**: Random inputs must still produce deterministic outputs
//! 3. **Integration tests**: Full matches are reproducible
//! 4. **Parallel tests**: Running N simulations on threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use skirmish_core::simulation::Simulation;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Advance a simulation one frame on a simulated clock of `frame_ms` per tick.
pub fn tick_frame(sim: &mut Simulation, frame_ms: u64) {
    let now = (sim.tick_count() + 1) * frame_ms;
    sim.tick(now);
}

/// Run the simulation twice with identical setup and compare final hashes.
///
/// Frames are fed at `frame_ms` intervals of simulated time.
pub fn verify_simulation_determinism<F>(setup_fn: F, frames: u64, frame_ms: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let result = verify_determinism(
        2,
        frames,
        &setup_fn,
        |sim| tick_frame(sim, frame_ms),
        Simulation::state_hash,
    );
    result.is_deterministic
}

/// Result of parallel simulation runs.
#[derive(Debug, Clone)]
pub struct ParallelSimResult {
    /// Final state hash from each simulation.
    pub hashes: Vec<u64>,
    /// Number of frames each simulation ran.
    pub frames: u64,
    /// Number of simulations run.
    pub num_sims: usize,
}

impl ParallelSimResult {
    /// Check if all simulations produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all simulations matched.
    ///
    /// # Panics
    ///
    /// Panics if simulations produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel simulations diverged!\n\
                 Simulations: {}\n\
                 Frames: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_sims, self.frames, unique.len(), self.hashes
            );
        }
    }
}

/// Run N simulations on scoped threads and collect final hashes.
///
/// Catches non-determinism that only shows up under thread scheduling
/// variations or memory layout differences.
///
/// # Panics
///
/// Panics if a simulation thread panics.
pub fn run_parallel_simulations<F>(
    setup_fn: F,
    num_sims: usize,
    frames: u64,
    frame_ms: u64,
) -> ParallelSimResult
where
    F: Fn() -> Simulation + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    for _ in 0..frames {
                        tick_frame(&mut sim, frame_ms);
                    }
                    sim.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("simulation thread panicked"))
            .collect()
    });

    ParallelSimResult {
        hashes,
        frames,
        num_sims,
    }
}

/// Compare two simulation runs frame-by-frame, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs agree throughout, `Some(frame)` for the first frame
/// whose state hashes differ (`0` means the setups already differ).
pub fn find_first_divergence<F>(setup_fn: F, frames: u64, frame_ms: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for frame in 1..=frames {
        tick_frame(&mut sim1, frame_ms);
        tick_frame(&mut sim2, frame_ms);

        if sim1.state_hash() != sim2.state_hash() {
            tracing::warn!(frame, "Simulations diverged");
            return Some(frame);
        }
    }

    None
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for boards, coordinates and units.
pub mod strategies {
    use proptest::prelude::*;
    use skirmish_core::grid::{Grid, TileCoord, TileState};
    use skirmish_core::units::UnitKind;

    /// Board dimensions from 2x2 to `max`x`max`.
    pub fn arb_dimensions(max: u32) -> impl Strategy<Value = (u32, u32)> {
        (2..=max, 2..=max)
    }

    /// A coordinate inside a `rows` x `cols` board.
    pub fn arb_coord(rows: u32, cols: u32) -> impl Strategy<Value = TileCoord> {
        (0..rows, 0..cols).prop_map(|(row, col)| TileCoord::new(row, col))
    }

    /// Any unit kind.
    pub fn arb_unit_kind() -> impl Strategy<Value = UnitKind> {
        prop_oneof![
            Just(UnitKind::CommandCenter),
            Just(UnitKind::Combatant),
            Just(UnitKind::Worker),
        ]
    }

    /// A board with roughly `density_pct` percent of tiles blocked.
    pub fn arb_grid(max: u32, density_pct: u32) -> impl Strategy<Value = Grid> {
        arb_dimensions(max).prop_flat_map(move |(rows, cols)| {
            proptest::collection::vec(0..100u32, (rows * cols) as usize).prop_map(move |rolls| {
                let mut grid = Grid::new(rows, cols);
                for (i, roll) in rolls.into_iter().enumerate() {
                    if roll < density_pct {
                        let at = TileCoord::new(i as u32 / cols, i as u32 % cols);
                        grid.set_state(at, TileState::Blocked);
                    }
                }
                grid
            })
        })
    }

    /// A board plus two coordinates on it.
    pub fn arb_grid_and_endpoints(
        max: u32,
        density_pct: u32,
    ) -> impl Strategy<Value = (Grid, TileCoord, TileCoord)> {
        arb_grid(max, density_pct).prop_flat_map(|grid| {
            let (rows, cols) = (grid.rows(), grid.cols());
            (Just(grid), arb_coord(rows, cols), arb_coord(rows, cols))
        })
    }
}
