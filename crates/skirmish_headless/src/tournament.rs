//! Tournament runner.
//!
//! Runs many independent matches in parallel using rayon and aggregates
//! win and stalemate rates. Match `i` is seeded `seed_start + i`, so a
//! tournament replays exactly regardless of thread count.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use skirmish_core::players::TeamId;
use skirmish_core::runner::{default_controllers, run_match, MatchConfig, MatchResult};

use crate::error::{HarnessError, Result};

/// Configuration for a tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Board, loop and tuning parameters shared by every match.
    pub match_config: MatchConfig,
    /// Number of matches to play.
    pub game_count: u32,
    /// Worker threads (0 = rayon default).
    pub parallel_games: u32,
    /// Seed of the first match.
    pub seed_start: u64,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            game_count: 10,
            parallel_games: 0,
            seed_start: 0,
        }
    }
}

impl TournamentConfig {
    /// Tournament of `game_count` matches with default tuning.
    pub fn new(game_count: u32) -> Self {
        Self {
            game_count,
            ..Default::default()
        }
    }

    /// Set the first seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Set the match parameters.
    pub fn with_match_config(mut self, config: MatchConfig) -> Self {
        self.match_config = config;
        self
    }
}

/// Aggregate outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSummary {
    /// Matches played.
    pub total_games: u32,
    /// Matches won by team 1.
    pub team1_wins: u32,
    /// Matches won by team 2.
    pub team2_wins: u32,
    /// Matches with no winner, frame-cap timeouts included.
    pub stalemates: u32,
    /// Matches ended by the frame cap.
    pub timeouts: u32,
}

impl TournamentSummary {
    /// Tally a set of results.
    pub fn from_results(results: &[MatchResult]) -> Self {
        let mut summary = Self {
            total_games: results.len() as u32,
            ..Self::default()
        };
        for result in results {
            match result.winner() {
                Some(TeamId(1)) => summary.team1_wins += 1,
                Some(TeamId(2)) => summary.team2_wins += 1,
                Some(other) => warn!(team = %other, "Unexpected winner in a two-team match"),
                None => summary.stalemates += 1,
            }
            if result.timed_out {
                summary.timeouts += 1;
            }
        }
        summary
    }

    fn percent(count: u32, total: u32) -> f64 {
        f64::from(count) / f64::from(total.max(1)) * 100.0
    }

    /// Team 1 win percentage.
    pub fn team1_percent(&self) -> f64 {
        Self::percent(self.team1_wins, self.total_games)
    }

    /// Team 2 win percentage.
    pub fn team2_percent(&self) -> f64 {
        Self::percent(self.team2_wins, self.total_games)
    }

    /// Stalemate percentage.
    pub fn stalemate_percent(&self) -> f64 {
        Self::percent(self.stalemates, self.total_games)
    }

    /// `p1|p2|ties` percentages, six decimals each.
    pub fn scoreline(&self) -> String {
        format!(
            "{:.6}|{:.6}|{:.6}",
            self.team1_percent(),
            self.team2_percent(),
            self.stalemate_percent()
        )
    }
}

/// A match that could not be set up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchError {
    /// Match index.
    pub game_index: u32,
    /// Seed used.
    pub seed: u64,
    /// Error message.
    pub message: String,
}

/// Results from a tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentResults {
    /// Configuration used.
    pub config: TournamentConfig,
    /// Per-match results in match order.
    pub matches: Vec<MatchResult>,
    /// Aggregate counts.
    pub summary: TournamentSummary,
    /// Wall-clock runtime.
    pub duration_seconds: f64,
    /// Matches that failed to start.
    pub errors: Vec<MatchError>,
}

impl TournamentResults {
    /// Save results to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load results from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HarnessError::FileNotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Default report location inside an output directory.
    pub fn default_path(output_dir: &Path) -> PathBuf {
        output_dir.join("tournament_results.json")
    }
}

/// Live completion counter shared by worker threads.
#[derive(Debug, Default)]
struct Progress {
    total: u32,
    completed: AtomicU32,
}

impl Progress {
    fn record(&self, result: &MatchResult) {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            completed,
            total = self.total,
            seed = result.seed,
            status = %result.status,
            "Match finished"
        );
    }
}

fn play_one(
    config: &TournamentConfig,
    index: u32,
    progress: &Progress,
) -> std::result::Result<MatchResult, MatchError> {
    let seed = config.seed_start.wrapping_add(u64::from(index));
    let controllers = default_controllers(&config.match_config.sim);
    match run_match(&config.match_config, seed, controllers) {
        Ok(result) => {
            info!(
                "Match {}/{}: {}",
                index + 1,
                config.game_count,
                result.status
            );
            progress.record(&result);
            Ok(result)
        }
        Err(e) => {
            warn!(game = index, seed, error = %e, "Match failed to start");
            Err(MatchError {
                game_index: index,
                seed,
                message: e.to_string(),
            })
        }
    }
}

/// Run a tournament.
///
/// # Errors
///
/// Fails only if the worker thread pool cannot be built. Matches that fail
/// to start are recorded in [`TournamentResults::errors`].
pub fn run_tournament(config: TournamentConfig) -> Result<TournamentResults> {
    let start = Instant::now();
    let progress = Progress {
        total: config.game_count,
        ..Progress::default()
    };

    info!(
        games = config.game_count,
        seed_start = config.seed_start,
        rows = config.match_config.rows,
        cols = config.match_config.cols,
        "Starting tournament"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallel_games as usize)
        .build()?;

    let outcomes: Vec<std::result::Result<MatchResult, MatchError>> = pool.install(|| {
        (0..config.game_count)
            .into_par_iter()
            .map(|i| play_one(&config, i, &progress))
            .collect()
    });

    let (matches, errors): (Vec<_>, Vec<_>) = outcomes.into_iter().partition(|r| r.is_ok());
    let matches: Vec<MatchResult> = matches.into_iter().filter_map(|r| r.ok()).collect();
    let errors: Vec<MatchError> = errors.into_iter().filter_map(|r| r.err()).collect();

    let summary = TournamentSummary::from_results(&matches);
    let duration_seconds = start.elapsed().as_secs_f64();

    info!(
        "Tournament complete: {} matches in {:.1}s ({:.1} matches/sec)",
        matches.len(),
        duration_seconds,
        matches.len() as f64 / duration_seconds.max(0.001)
    );

    Ok(TournamentResults {
        config,
        matches,
        summary,
        duration_seconds,
        errors,
    })
}

/// Replay one seed `runs` times and check every run ends identically.
pub fn verify_determinism(config: &MatchConfig, seed: u64, runs: u32) -> Result<bool> {
    let mut first: Option<MatchResult> = None;
    for run in 0..runs {
        let result = run_match(config, seed, default_controllers(&config.sim))?;
        debug!(run, hash = result.final_hash, ticks = result.ticks, "Verification run");
        match first {
            None => first = Some(result),
            Some(expected) if expected == result => {}
            Some(expected) => {
                warn!(
                    run,
                    expected = expected.final_hash,
                    actual = result.final_hash,
                    "Run diverged"
                );
                return Ok(false);
            }
        }
    }
    Ok(true)
}
