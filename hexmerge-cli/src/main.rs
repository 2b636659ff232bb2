//! HexMerge CLI - terminal host for the merge puzzle
//!
//! Commands:
//! - play: Interactive game on stdin/stdout
//! - simulate: Random-agent games in parallel, with per-mode statistics

mod play;
mod render;
mod simulate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use hexmerge_core::{GameConfig, GameMode, RngSource};

#[derive(Parser)]
#[command(name = "hexmerge")]
#[command(about = "Hex-grid merge puzzle")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively
    Play(play::PlayArgs),
    /// Run random-agent games and report statistics
    Simulate(simulate::SimulateArgs),
}

/// Options shared by every command that builds a session
#[derive(Args, Clone, Debug)]
pub struct SessionArgs {
    /// Game mode: normal, hardcore or zen
    #[arg(long)]
    pub mode: Option<String>,

    /// Board radius (overrides the config file)
    #[arg(long)]
    pub radius: Option<u8>,

    /// Session config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl SessionArgs {
    /// Config file (or defaults) with command-line overrides applied
    pub fn resolve(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => GameConfig::default(),
        };
        if let Some(mode) = self.mode() {
            config = config.with_mode(mode);
        }
        if let Some(radius) = self.radius {
            config = config.with_radius(radius);
        }
        config.validate()?;
        Ok(config)
    }

    /// Mode named on the command line; unknown names fall back to Normal
    pub fn mode(&self) -> Option<GameMode> {
        let name = self.mode.as_deref()?;
        Some(GameMode::from_name(name).unwrap_or_else(|| {
            tracing::warn!("Unknown mode '{}', using {}", name, GameMode::default());
            GameMode::default()
        }))
    }
}

/// Create RNG from seed or entropy
pub fn create_rng(seed: Option<u64>) -> RngSource<ChaCha8Rng> {
    match seed {
        Some(s) => RngSource::seeded(s),
        None => RngSource::from_entropy(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Simulate(args) => simulate::run(args, cli.seed),
    }
}
