//! Play command - interactive game on the terminal
//!
//! Each input line is a sequence of keys applied in order:
//! `r` up-right, `f` right, `c` down-right, `x` down-left, `s` left,
//! `e` up-left, `n` new game, `q` quit.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use hexmerge_core::{Direction, FileStore, Game, RandomSource};

use crate::{create_rng, render, SessionArgs};

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Directory holding saved boards
    #[arg(long, value_name = "DIR", default_value = ".hexmerge")]
    pub save_dir: PathBuf,

    /// Start a new game even if a save exists
    #[arg(long)]
    pub new: bool,
}

/// A decoded key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Move(Direction),
    NewGame,
    Quit,
}

fn parse_key(key: char) -> Option<Command> {
    let command = match key.to_ascii_lowercase() {
        'r' => Command::Move(Direction::UpRight),
        'f' => Command::Move(Direction::Right),
        'c' => Command::Move(Direction::DownRight),
        'x' => Command::Move(Direction::DownLeft),
        's' => Command::Move(Direction::Left),
        'e' => Command::Move(Direction::UpLeft),
        'n' => Command::NewGame,
        'q' => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = args.session.resolve()?.with_new_game(args.new);
    let store = FileStore::open(&args.save_dir)
        .with_context(|| format!("Failed to open save directory: {}", args.save_dir.display()))?;
    let mut game = Game::new(config, create_rng(seed), Box::new(store))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "keys: r f c x s e to move, n new game, q quit")?;
    show(&mut out, &game)?;

    let mut last_input = Instant::now();
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read input")?;
        game.tick(last_input.elapsed().as_secs_f32());
        last_input = Instant::now();

        for key in line.chars().filter(|c| !c.is_whitespace()) {
            match parse_key(key) {
                Some(Command::Move(direction)) => {
                    let report = game.play(direction);
                    if report.score_gained() > 0 {
                        writeln!(out, "+{}", report.score_gained())?;
                    }
                }
                Some(Command::NewGame) => game.new_game(),
                Some(Command::Quit) => return Ok(()),
                None => writeln!(out, "unknown key '{key}'")?,
            }
        }
        show(&mut out, &game)?;
    }
    Ok(())
}

fn show<R: RandomSource>(out: &mut impl Write, game: &Game<R>) -> Result<()> {
    write!(out, "\n{}", render::board(game.board()))?;
    writeln!(out, "{}", render::status(game))?;
    if game.is_game_over() {
        writeln!(out, "Game over. Press n for a new game.")?;
    }
    out.flush()?;
    Ok(())
}
