//! Headless skirmish runner.
//!
//! Plays AI-vs-AI matches without graphics. Results go to stdout, logs to
//! stderr.
//!
//! # Usage
//!
//! ```bash
//! # One match with the default board
//! cargo run -p skirmish_headless -- run --seed 3
//!
//! # Tournament of 1000 matches, tuning from a RON file
//! cargo run -p skirmish_headless -- tournament --config tuning.ron --count 1000
//!
//! # Determinism check
//! cargo run -p skirmish_headless -- verify --seed 12345 --runs 5
//!
//! # Write the default tuning as a template
//! cargo run -p skirmish_headless -- dump-config > tuning.ron
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skirmish_core::runner::{default_controllers, play, run_frames, setup_match, MatchConfig};
use skirmish_headless::{
    ascii::render_snapshot,
    match_config::{resolve_match_config, to_ron},
    tournament::{run_tournament, verify_determinism, TournamentConfig, TournamentResults},
    HarnessError,
};

#[derive(Parser)]
#[command(name = "skirmish_headless")]
#[command(about = "Headless skirmish runner for AI tournaments and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single match
    Run {
        /// RON file with tuning overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Match seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Print the board while the match runs
        #[arg(long)]
        show: bool,

        /// Frames between board prints
        #[arg(long, default_value = "250", requires = "show")]
        show_every: u64,
    },

    /// Play many matches and report win rates
    Tournament {
        /// RON file with tuning overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of matches to play
        #[arg(short = 'n', long, default_value = "10")]
        count: u32,

        /// Seed of the first match
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Worker threads (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: u32,

        /// Output directory for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify determinism by replaying one seed
    Verify {
        /// RON file with tuning overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },

    /// Print the effective match config as RON
    DumpConfig {
        /// RON file with tuning overrides
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let outcome = match cli.command {
        Commands::Run {
            config,
            seed,
            show,
            show_every,
        } => cmd_run(config, seed, show.then_some(show_every)),
        Commands::Tournament {
            config,
            count,
            seed,
            parallel,
            output,
        } => cmd_tournament(config, count, seed, parallel, output),
        Commands::Verify { config, seed, runs } => cmd_verify(config, seed, runs),
        Commands::DumpConfig { config } => cmd_dump_config(config),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load(config: Option<PathBuf>) -> Result<MatchConfig, HarnessError> {
    resolve_match_config(config.as_deref())
}

/// Play one match, optionally printing the board every `show_every` frames.
fn cmd_run(
    config: Option<PathBuf>,
    seed: u64,
    show_every: Option<u64>,
) -> Result<ExitCode, HarnessError> {
    let config = load(config)?;
    let mut sim = setup_match(&config, seed, default_controllers(&config.sim))?;

    tracing::info!(seed, rows = config.rows, cols = config.cols, "Starting match");

    if let Some(every) = show_every {
        println!("{}", render_snapshot(&sim));
        while run_frames(&mut sim, &config, every.max(1)) > 0 {
            println!("{}", render_snapshot(&sim));
        }
    }
    let result = play(&mut sim, &config);

    println!("Status:   {}", result.status);
    println!("Ticks:    {}", result.ticks);
    println!("Sim time: {} ms", result.elapsed_ms);
    if result.timed_out {
        println!("Timed out after {} frames", config.max_frames);
    }
    println!("Hash:     {:016x}", result.final_hash);
    println!("{}", result.code());

    Ok(ExitCode::SUCCESS)
}

/// Run a tournament and print `team1|team2|stalemate` rates.
fn cmd_tournament(
    config: Option<PathBuf>,
    count: u32,
    seed: u64,
    parallel: u32,
    output: Option<PathBuf>,
) -> Result<ExitCode, HarnessError> {
    let match_config = load(config)?;
    let mut tournament = TournamentConfig::new(count)
        .with_seed(seed)
        .with_match_config(match_config);
    tournament.parallel_games = parallel;

    let results = run_tournament(tournament)?;

    let summary = &results.summary;
    eprintln!();
    eprintln!("=== Tournament Results ===");
    eprintln!("Matches:    {}", summary.total_games);
    eprintln!(
        "Team 1:     {} ({:.1}%)",
        summary.team1_wins,
        summary.team1_percent()
    );
    eprintln!(
        "Team 2:     {} ({:.1}%)",
        summary.team2_wins,
        summary.team2_percent()
    );
    eprintln!(
        "Stalemates: {} ({:.1}%, {} timed out)",
        summary.stalemates,
        summary.stalemate_percent(),
        summary.timeouts
    );
    eprintln!("Duration:   {:.1}s", results.duration_seconds);
    if !results.errors.is_empty() {
        eprintln!("Errors:     {}", results.errors.len());
    }

    println!("{}", summary.scoreline());

    if let Some(dir) = output {
        let path = TournamentResults::default_path(&dir);
        results.save(&path)?;
        eprintln!("Results saved to: {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_verify(config: Option<PathBuf>, seed: u64, runs: u32) -> Result<ExitCode, HarnessError> {
    let config = load(config)?;
    tracing::info!(seed, runs, "Verifying determinism");

    if verify_determinism(&config, seed, runs)? {
        println!("Determinism verified: {runs} runs of seed {seed} ended identically");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Determinism check FAILED for seed {seed}");
        Ok(ExitCode::FAILURE)
    }
}

fn cmd_dump_config(config: Option<PathBuf>) -> Result<ExitCode, HarnessError> {
    let config = load(config)?;
    println!("{}", to_ron(&config)?);
    Ok(ExitCode::SUCCESS)
}
