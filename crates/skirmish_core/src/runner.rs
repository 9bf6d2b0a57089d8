//! Match setup and the frame loop that drives a simulation to its end.
//!
//! The host clock is simulated: frame `n` feeds `n * frame_ms` to
//! [`Simulation::tick`], so a match is a pure function of its config, its
//! seed and its controllers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai::SkirmishAi;
use crate::config::SimConfig;
use crate::error::{GameError, Result};
use crate::grid::{Grid, TileCoord};
use crate::players::{Policy, TeamId};
use crate::simulation::Simulation;
use crate::units::UnitKind;
use crate::victory::MatchStatus;

/// Mixed into the match seed for starting positions so they do not share a
/// stream with combat rolls.
const SETUP_SALT: u64 = 0x5EED_0F5E_7195_0001;

/// Frames between progress log lines.
const PROGRESS_LOG_INTERVAL: u64 = 10_000;

/// Board and loop parameters for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Simulation tunables. The seed is overridden per match.
    pub sim: SimConfig,
    /// Board rows.
    pub rows: u32,
    /// Board columns.
    pub cols: u32,
    /// Surround the board with blocked tiles.
    pub walled: bool,
    /// Simulated host clock advance per frame (ms).
    pub frame_ms: u64,
    /// Frames before the harness gives up and calls a stalemate.
    pub max_frames: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            rows: 24,
            cols: 32,
            walled: false,
            frame_ms: 16,
            max_frames: 500_000,
        }
    }
}

impl MatchConfig {
    /// Smallest board that fits the mirrored starting positions.
    pub const MIN_ROWS: u32 = 5;
    /// See [`MatchConfig::MIN_ROWS`].
    pub const MIN_COLS: u32 = 9;

    /// Check board size and frame step.
    ///
    /// The frame step must be shorter than every timer interval, otherwise
    /// the wraparound check can miss fires entirely.
    pub fn validate(&self) -> Result<()> {
        self.sim.validate()?;
        if self.rows < Self::MIN_ROWS || self.cols < Self::MIN_COLS {
            return Err(GameError::InvalidConfig(format!(
                "board {}x{} is smaller than {}x{}",
                self.rows,
                self.cols,
                Self::MIN_ROWS,
                Self::MIN_COLS
            )));
        }
        if self.frame_ms == 0 || self.frame_ms >= self.sim.shortest_interval_ms() {
            return Err(GameError::InvalidConfig(format!(
                "frame_ms must be in 1..{}, got {}",
                self.sim.shortest_interval_ms(),
                self.frame_ms
            )));
        }
        if self.max_frames == 0 {
            return Err(GameError::InvalidConfig("max_frames must be positive".into()));
        }
        Ok(())
    }

    /// Mirrored starting tiles for the two command units.
    ///
    /// The first lands at a random row in `[2, max_row - 2]` and a random
    /// column in the left half, `[2, max_col / 2 - 2]`; the second is its
    /// point reflection through the board centre.
    pub fn starting_positions<R: Rng>(&self, rng: &mut R) -> [TileCoord; 2] {
        let max_row = self.rows - 1;
        let max_col = self.cols - 1;
        let row = rng.gen_range(2..=max_row - 2);
        let col = rng.gen_range(2..=max_col / 2 - 2);
        [
            TileCoord::new(row, col),
            TileCoord::new(max_row - row, max_col - col),
        ]
    }
}

/// Outcome of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchResult {
    /// Seed the match ran with.
    pub seed: u64,
    /// Final status. Never `Running`.
    pub status: MatchStatus,
    /// Ticks simulated.
    pub ticks: u64,
    /// Simulated milliseconds elapsed.
    pub elapsed_ms: u64,
    /// The frame cap ended the match.
    pub timed_out: bool,
    /// State hash after the last tick.
    pub final_hash: u64,
}

impl MatchResult {
    /// `0` for a stalemate, the winning team id otherwise.
    #[must_use]
    pub fn code(&self) -> u32 {
        self.status.result_code().unwrap_or(0)
    }

    /// Winning team, if any.
    #[must_use]
    pub const fn winner(&self) -> Option<TeamId> {
        match self.status {
            MatchStatus::Victory(team) => Some(team),
            _ => None,
        }
    }
}

/// The stock controllers: the built-in AI on both sides.
#[must_use]
pub fn default_controllers(config: &SimConfig) -> [Box<dyn Policy>; 2] {
    [
        Box::new(SkirmishAi::new(config)),
        Box::new(SkirmishAi::new(config)),
    ]
}

/// Build the opening position: two AI teams, one command unit each.
pub fn setup_match(
    config: &MatchConfig,
    seed: u64,
    controllers: [Box<dyn Policy>; 2],
) -> Result<Simulation> {
    config.validate()?;

    let grid = if config.walled {
        Grid::walled(config.rows, config.cols)
    } else {
        Grid::new(config.rows, config.cols)
    };
    let sim_config = SimConfig {
        seed,
        ..config.sim.clone()
    };
    let mut sim = Simulation::new(sim_config, grid)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ SETUP_SALT);
    let positions = config.starting_positions(&mut rng);

    for (policy, at) in controllers.into_iter().zip(positions) {
        let team = sim.add_player(Some(policy))?;
        sim.spawn_unit(team, UnitKind::CommandCenter, at)?;
    }
    Ok(sim)
}

/// Feed up to `frames` more frames into `sim`, stopping early if the match
/// ends or the frame cap is reached. Frames continue from the tick count,
/// so the clock stays monotonic across calls. Returns the frames fed.
pub fn run_frames(sim: &mut Simulation, config: &MatchConfig, frames: u64) -> u64 {
    let start = sim.tick_count();
    let stop = start.saturating_add(frames).min(config.max_frames);
    let mut frame = start;

    while !sim.status().is_terminal() && frame < stop {
        frame += 1;
        sim.tick(frame * config.frame_ms);

        if frame % PROGRESS_LOG_INTERVAL == 0 {
            tracing::debug!(
                frame,
                units = sim.units().count(),
                structures = sim.structures().count(),
                "Match progress"
            );
        }
    }
    frame - start
}

/// Drive `sim` until the match ends or the frame cap is hit.
pub fn play(sim: &mut Simulation, config: &MatchConfig) -> MatchResult {
    run_frames(sim, config, config.max_frames);

    let timed_out = !sim.status().is_terminal();
    if timed_out {
        tracing::warn!(
            seed = sim.config().seed,
            frames = sim.tick_count(),
            "Frame cap reached, scoring match as a stalemate"
        );
    }

    MatchResult {
        seed: sim.config().seed,
        status: if timed_out {
            MatchStatus::Stalemate
        } else {
            sim.status()
        },
        ticks: sim.tick_count(),
        elapsed_ms: sim.tick_count() * config.frame_ms,
        timed_out,
        final_hash: sim.state_hash(),
    }
}

/// Set up and play one match.
///
/// # Errors
///
/// Fails only on invalid configuration; every started match finishes.
pub fn run_match(
    config: &MatchConfig,
    seed: u64,
    controllers: [Box<dyn Policy>; 2],
) -> Result<MatchResult> {
    let mut sim = setup_match(config, seed, controllers)?;
    tracing::debug!(seed, rows = config.rows, cols = config.cols, "Starting match");
    let result = play(&mut sim, config);
    tracing::info!(
        seed,
        status = %result.status,
        ticks = result.ticks,
        "Match complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_frame_step() {
        let config = MatchConfig {
            frame_ms: 75,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MatchConfig {
            frame_ms: 0,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_tiny_board() {
        let config = MatchConfig {
            rows: 4,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_starting_positions_mirror() {
        let config = MatchConfig::default();
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let [a, b] = config.starting_positions(&mut rng);
            assert!((2..=config.rows - 3).contains(&a.row));
            assert!((2..=(config.cols - 1) / 2 - 2).contains(&a.col));
            assert_eq!(b.row, config.rows - 1 - a.row);
            assert_eq!(b.col, config.cols - 1 - a.col);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_setup_places_two_command_units() {
        let config = MatchConfig::default();
        let sim = setup_match(&config, 4, default_controllers(&config.sim)).unwrap();
        assert_eq!(sim.players().len(), 2);
        assert!(sim.players().iter().all(|p| !p.is_human()));
        assert_eq!(sim.units().count(), 2);
        assert!(sim
            .units()
            .all(|u| u.kind == UnitKind::CommandCenter));
        assert_eq!(sim.config().seed, 4);
    }

    #[test]
    fn test_frame_cap_scores_stalemate() {
        let config = MatchConfig {
            max_frames: 10,
            ..MatchConfig::default()
        };
        let result = run_match(&config, 1, default_controllers(&config.sim)).unwrap();
        assert!(result.timed_out);
        assert_eq!(result.status, MatchStatus::Stalemate);
        assert_eq!(result.code(), 0);
        assert_eq!(result.ticks, 10);
        assert_eq!(result.elapsed_ms, 160);
    }

    #[test]
    fn test_frames_resume_from_tick_count() {
        let config = MatchConfig {
            max_frames: 25,
            ..MatchConfig::default()
        };
        let mut chunked = setup_match(&config, 9, default_controllers(&config.sim)).unwrap();
        assert_eq!(run_frames(&mut chunked, &config, 10), 10);
        assert_eq!(run_frames(&mut chunked, &config, 10), 10);
        assert_eq!(run_frames(&mut chunked, &config, 10), 5);
        assert_eq!(run_frames(&mut chunked, &config, 10), 0);

        let mut straight = setup_match(&config, 9, default_controllers(&config.sim)).unwrap();
        let result = play(&mut straight, &config);
        assert_eq!(chunked.tick_count(), 25);
        assert_eq!(chunked.state_hash(), result.final_hash);
    }

    #[test]
    fn test_result_code() {
        let result = MatchResult {
            seed: 0,
            status: MatchStatus::Victory(TeamId(2)),
            ticks: 1,
            elapsed_ms: 16,
            timed_out: false,
            final_hash: 0,
        };
        assert_eq!(result.code(), 2);
        assert_eq!(result.winner(), Some(TeamId(2)));
    }
}
