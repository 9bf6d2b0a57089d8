//! Headless match harness.
//!
//! Plays AI-vs-AI matches without any interface so the engine can be
//! exercised from the command line and CI:
//!
//! - **Tournaments**: many seeded matches in parallel, reported as win rates
//! - **Determinism checks**: replay one seed and compare final state hashes
//! - **Board dumps**: ASCII snapshots of a running match
//!
//! # Example
//!
//! ```bash
//! # Play one match and print the board every 500 frames
//! cargo run -p skirmish_headless -- run --seed 7 --show --show-every 500
//!
//! # Play 100 matches on all cores
//! cargo run -p skirmish_headless -- tournament --count 100 --output results/
//!
//! # Replay seed 42 five times
//! cargo run -p skirmish_headless -- verify --seed 42 --runs 5
//! ```

pub mod ascii;
pub mod error;
pub mod match_config;
pub mod tournament;

pub use ascii::{render_board, render_snapshot, render_summary};
pub use error::{HarnessError, Result};
pub use match_config::{load_match_config, parse_match_config, resolve_match_config};
pub use tournament::{
    run_tournament, verify_determinism, TournamentConfig, TournamentResults, TournamentSummary,
};
