//! # Skirmish Core
//!
//! Deterministic tick simulation for a grid-based skirmish game.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness (one seeded `ChaCha8Rng` per simulation)
//! - No floating-point math in the tick (probabilities are fixed-point)
//!
//! This separation enables:
//! - Headless tournaments
//! - Determinism testing via state hashes
//! - Swapping any team between human input and a scripted policy
//!
//! ## Crate Structure
//!
//! - [`grid`] - Board, tiles and occupancy
//! - [`pathfinding`] - A* routes over free tiles
//! - [`units`] / [`structures`] / [`players`] - World entities
//! - [`combat`] - Adjacency attacks and structure capture
//! - [`scheduler`] - Wraparound interval timers
//! - [`simulation`] - Core simulation loop
//! - [`victory`] - Elimination and match outcome
//! - [`runner`] - Match setup and frame loop
//! - [`ai`] - Built-in opponent

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ai;
pub mod combat;
pub mod commands;
pub mod config;
pub mod error;
pub mod grid;
pub mod math;
pub mod pathfinding;
pub mod players;
pub mod runner;
pub mod scheduler;
pub mod simulation;
pub mod structures;
pub mod units;
pub mod victory;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ai::SkirmishAi;
    pub use crate::commands::Command;
    pub use crate::config::SimConfig;
    pub use crate::error::{GameError, Result};
    pub use crate::grid::{Grid, TileCoord, TileState};
    pub use crate::math::Fixed;
    pub use crate::players::{Order, Player, Policy, TeamId, WorldView};
    pub use crate::runner::{run_match, MatchConfig, MatchResult};
    pub use crate::simulation::{Simulation, TickEvents};
    pub use crate::structures::{Structure, StructureId};
    pub use crate::units::{Unit, UnitId, UnitKind};
    pub use crate::victory::MatchStatus;
}
