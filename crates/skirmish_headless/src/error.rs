//! Harness error type.

use skirmish_core::error::GameError;
use thiserror::Error;

/// Result alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Failures outside the simulation itself.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Config or report file missing.
    #[error("File not found: {0}")]
    FileNotFound(String),
    /// Failed to read or write a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse a RON match config.
    #[error("Failed to parse match config: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// Failed to write a RON match config.
    #[error("Failed to write match config: {0}")]
    RonWrite(#[from] ron::Error),
    /// The tournament worker pool could not start.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// Failed to encode or decode a JSON report.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The core rejected the setup.
    #[error(transparent)]
    Game(#[from] GameError),
}
