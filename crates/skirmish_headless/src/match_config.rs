//! Match configuration files.
//!
//! Tuning overrides live in RON. Every field is optional; anything left
//! out keeps its default:
//!
//! ```ron
//! (
//!     rows: 20,
//!     cols: 30,
//!     sim: (hit_chance: 0.6, factory_cost: 8),
//! )
//! ```

use std::path::Path;

use ron::ser::PrettyConfig;
use skirmish_core::runner::MatchConfig;

use crate::error::{HarnessError, Result};

/// Parse and validate a match config from RON text.
pub fn parse_match_config(text: &str) -> Result<MatchConfig> {
    let config: MatchConfig = ron::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a match config from a RON file.
pub fn load_match_config<P: AsRef<Path>>(path: P) -> Result<MatchConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(HarnessError::FileNotFound(path.display().to_string()));
    }
    let contents = std::fs::read_to_string(path)?;
    let config = parse_match_config(&contents)?;
    tracing::info!(path = %path.display(), rows = config.rows, cols = config.cols, "Loaded match config");
    Ok(config)
}

/// The config from `path`, or the defaults when no path is given.
pub fn resolve_match_config(path: Option<&Path>) -> Result<MatchConfig> {
    match path {
        Some(path) => load_match_config(path),
        None => Ok(MatchConfig::default()),
    }
}

/// Render a config as pretty RON, for use as a starting template.
pub fn to_ron(config: &MatchConfig) -> Result<String> {
    Ok(ron::ser::to_string_pretty(config, PrettyConfig::default())?)
}
