//! Error types for the skirmish simulation.

use thiserror::Error;

use crate::grid::TileCoord;
use crate::players::TeamId;
use crate::units::UnitId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all simulation errors.
///
/// Nothing in the simulation panics across subsystem boundaries; callers
/// either propagate these or log and drop them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A coordinate outside the board.
    #[error("Tile ({}, {}) is outside the board", .0.row, .0.col)]
    OutOfBounds(TileCoord),

    /// A coordinate that exists but cannot be entered or built on.
    #[error("Tile ({}, {}) is not available: {reason}", .coord.row, .coord.col)]
    TileUnavailable {
        /// The rejected tile.
        coord: TileCoord,
        /// Why the tile was rejected.
        reason: &'static str,
    },

    /// Invalid unit identifier.
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    /// Invalid team identifier.
    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    /// A controller tried to order another team's unit.
    #[error("Unit {unit} does not belong to team {team}")]
    NotOwner {
        /// Ordered unit.
        unit: UnitId,
        /// Team that issued the order.
        team: TeamId,
    },

    /// Input tried to act through a unit of an AI-controlled team.
    #[error("Unit {0} is not under human control")]
    NotHumanControlled(UnitId),

    /// The unit kind cannot perform the requested action.
    #[error("Unit {unit} cannot {action}")]
    NotCapable {
        /// Acting unit.
        unit: UnitId,
        /// Attempted action.
        action: &'static str,
    },

    /// Not enough resources for a build.
    #[error("Insufficient resources: need {required}, have {available}")]
    InsufficientResources {
        /// Amount required.
        required: u32,
        /// Amount available.
        available: u32,
    },

    /// The unit's build timer has not expired yet.
    #[error("Unit {0} is still cooling down from its last build")]
    BuildCoolingDown(UnitId),

    /// More players than the configured cap. Treated as fatal by callers.
    #[error("Exceeded player limit, which is {limit}")]
    PlayerLimitExceeded {
        /// The configured cap.
        limit: usize,
    },

    /// Rejected configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
