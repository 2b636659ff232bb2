//! Simulate command - random-agent games for balance statistics
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: simulate_mode(), report_results()
//! - Level 3: play_single_game(), summarize()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use hexmerge_core::{Direction, Game, GameConfig, GameMode, MemoryStore, Rank, RngSource};

use crate::SessionArgs;

/// Seconds the agent "thinks" between moves; drives combo decay
const AGENT_THINK_SECONDS: f32 = 0.25;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Games per mode
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Move attempts before a game is cut off
    #[arg(long, default_value = "5000")]
    pub max_moves: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    seed: u64,
    score: u64,
    highest: Rank,
    moves: u64,
    game_over: bool,
}

/// Aggregated results for one mode
#[derive(Clone, Debug, Serialize)]
struct ModeSummary {
    mode: GameMode,
    games: usize,
    avg_score: f64,
    best_score: u64,
    highest_rank: Rank,
    avg_moves: f64,
    finished: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Resolve the session config and the modes to run
/// 2. Play every mode's games in parallel
/// 3. Report per-mode statistics
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let config = args.session.resolve()?;
    let modes = match args.session.mode() {
        Some(mode) => vec![mode],
        None => GameMode::ALL.to_vec(),
    };
    let base_seed = seed.unwrap_or_else(rand::random);

    tracing::info!(
        "Simulating {} games per mode on radius {} (seed {})",
        args.games,
        config.board_radius,
        base_seed
    );

    let summaries = modes
        .into_iter()
        .map(|mode| simulate_mode(&config.clone().with_mode(mode), &args, base_seed))
        .collect::<Result<Vec<_>>>()?;

    report_results(&summaries, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn simulate_mode(config: &GameConfig, args: &SimulateArgs, base_seed: u64) -> Result<ModeSummary> {
    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(args.games as u64)
    };
    progress.set_style(ProgressStyle::with_template("{msg:>9} [{bar:40}] {pos}/{len}")?);
    progress.set_message(config.mode.name());

    let records = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let record = play_single_game(config, base_seed.wrapping_add(i as u64), args.max_moves);
            progress.inc(1);
            record
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish_and_clear();

    let summary = summarize(config.mode, &records);
    tracing::info!(
        "{}: avg score {:.1}, best {}, highest rank {}",
        summary.mode,
        summary.avg_score,
        summary.best_score,
        summary.highest_rank
    );
    Ok(summary)
}

fn report_results(summaries: &[ModeSummary], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summaries)?);
        return Ok(());
    }

    println!("\n=== Simulation Results ===");
    println!(
        "{:<10} {:>6} {:>12} {:>10} {:>8} {:>10} {:>9}",
        "mode", "games", "avg score", "best", "highest", "avg moves", "finished"
    );
    for s in summaries {
        println!(
            "{:<10} {:>6} {:>12.1} {:>10} {:>8} {:>10.1} {:>9}",
            s.mode.name(),
            s.games,
            s.avg_score,
            s.best_score,
            s.highest_rank,
            s.avg_moves,
            s.finished
        );
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game with a uniformly random agent
fn play_single_game(config: &GameConfig, seed: u64, max_moves: usize) -> Result<GameRecord> {
    let config = config.clone().with_new_game(true);
    let mut game = Game::new(config, RngSource::seeded(seed), Box::new(MemoryStore::new()))?;
    // the agent draws from its own stream so spawns stay independent of it
    let mut agent = ChaCha8Rng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);

    for _ in 0..max_moves {
        if game.is_game_over() {
            break;
        }
        let direction = Direction::ALL[agent.gen_range(0..Direction::ALL.len())];
        game.play(direction);
        game.tick(AGENT_THINK_SECONDS);
    }

    Ok(GameRecord {
        seed,
        score: game.score(),
        highest: game.board().highest(),
        moves: game.moves(),
        game_over: game.is_game_over(),
    })
}

fn summarize(mode: GameMode, records: &[GameRecord]) -> ModeSummary {
    let games = records.len();
    let mean = |total: f64| if games == 0 { 0.0 } else { total / games as f64 };

    ModeSummary {
        mode,
        games,
        avg_score: mean(records.iter().map(|r| r.score as f64).sum()),
        best_score: records.iter().map(|r| r.score).max().unwrap_or(0),
        highest_rank: records.iter().map(|r| r.highest).max().unwrap_or(0),
        avg_moves: mean(records.iter().map(|r| r.moves as f64).sum()),
        finished: records.iter().filter(|r| r.game_over).count(),
    }
}
