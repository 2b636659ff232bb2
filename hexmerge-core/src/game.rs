//! Game session
//!
//! Ties a board, its combo tracker, the active mode, a random source and a
//! save store together. Every public mutation persists the new state.

use crate::board::{Board, MoveReport};
use crate::combo::ComboTracker;
use crate::config::GameConfig;
use crate::display::ScoreDisplay;
use crate::error::Result;
use crate::grid::{Direction, Grid};
use crate::mode::GameMode;
use crate::pieces::PieceType;
use crate::rng::RandomSource;
use crate::snapshot::Snapshot;
use crate::store::SaveStore;

/// Number of Standard(1) pieces on a fresh board
pub const STARTING_PIECES: usize = 3;

/// How a session came to its current board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStart {
    Loaded,
    NewGame,
}

pub struct Game<R: RandomSource> {
    config: GameConfig,
    board: Board,
    combo: ComboTracker,
    rng: R,
    store: Box<dyn SaveStore>,
    score_display: ScoreDisplay,
    moves: u64,
    start: SessionStart,
}

impl<R: RandomSource> Game<R> {
    /// Start a session: resume the mode's save unless told otherwise,
    /// falling back to a new game on any load failure
    pub fn new(config: GameConfig, rng: R, store: Box<dyn SaveStore>) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.board_radius)?;
        let mode = config.mode;
        let mut game = Self {
            board: Board::new(grid),
            combo: ComboTracker::new(mode),
            rng,
            store,
            score_display: ScoreDisplay::new(0),
            moves: 0,
            start: SessionStart::NewGame,
            config,
        };

        if game.config.force_new_game {
            tracing::info!("New game forced for mode {}", mode);
            game.new_game();
            return Ok(game);
        }

        match game.load() {
            Ok(true) => {
                tracing::info!("Loaded saved {} board (score {})", mode, game.board.score());
                game.start = SessionStart::Loaded;
                game.score_display.reset(game.board.score());
                game.persist();
            }
            Ok(false) => {
                tracing::info!("No saved {} board, starting a new game", mode);
                game.new_game();
            }
            Err(e) => {
                tracing::warn!("Rejected saved {} board: {}", mode, e);
                game.new_game();
            }
        }
        Ok(game)
    }

    /// Read and restore the mode's save. `Ok(false)` means there was none.
    fn load(&mut self) -> Result<bool> {
        let key = self.mode().save_key();
        if !self.store.exists(&key) {
            return Ok(false);
        }
        let bytes = self.store.read(&key)?;
        Snapshot::from_bytes(&bytes)?.decode(&mut self.board, &mut self.combo)?;
        Ok(true)
    }

    /// Clear everything and place the starting pieces
    pub fn new_game(&mut self) {
        self.board.reset();
        self.combo.reset();
        for _ in 0..STARTING_PIECES {
            self.board.place_random(PieceType::Standard(1), &mut self.rng);
        }
        self.moves = 0;
        self.start = SessionStart::NewGame;
        self.score_display.reset(0);
        tracing::info!(
            "New {} game on radius {} board",
            self.mode(),
            self.board.grid().radius()
        );
        self.persist();
    }

    /// Play one move and persist the result
    pub fn play(&mut self, direction: Direction) -> MoveReport {
        let report = self
            .board
            .apply_move(direction, &mut self.combo, &mut self.rng);
        if report.changed {
            self.moves += 1;
        }
        self.score_display.set_score(self.board.score());
        self.persist();
        report
    }

    /// Advance the combo clock and display smoothing
    pub fn tick(&mut self, delta_seconds: f32) {
        self.combo.tick(delta_seconds);
        self.score_display.tick(delta_seconds);
    }

    /// Write the current state to the store
    pub fn save(&mut self) -> Result<()> {
        let bytes = Snapshot::encode(&self.board, &self.combo).to_bytes()?;
        self.store.write(&self.mode().save_key(), &bytes)
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            tracing::warn!("Failed to save {} board: {}", self.mode(), e);
        }
    }

    pub fn can_make_move(&self) -> bool {
        self.board.can_make_move()
    }

    pub fn is_game_over(&self) -> bool {
        !self.can_make_move()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> u64 {
        self.board.score()
    }

    pub fn score_display(&self) -> &ScoreDisplay {
        &self.score_display
    }

    /// Changed moves since the session's board was created or loaded
    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn start(&self) -> SessionStart {
        self.start
    }

    /// Hand back the store, e.g. to start another session on the same saves
    pub fn into_store(self) -> Box<dyn SaveStore> {
        self.store
    }
}
