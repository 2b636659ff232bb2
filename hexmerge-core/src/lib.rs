//! HexMerge Core - simulation engine for a hex-grid merge puzzle
//!
//! This crate provides:
//! - Hex grid topology with six-direction adjacency
//! - Piece types and their merge algebra
//! - Board state and the compress / merge / spawn move pipeline
//! - Combo tracking and per-mode spawn policy
//! - Snapshot persistence and the game session that ties it together

pub mod error;
pub mod grid;
pub mod pieces;
pub mod arena;
pub mod board;
pub mod combo;
pub mod mode;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod display;
pub mod config;
pub mod game;

// Re-exports for convenient access
pub use error::{HexMergeError, Result};
pub use grid::{CellId, Direction, Grid, Hex, MAX_RADIUS};
pub use pieces::{MergeBehavior, PieceType, Rank, MAX_RANK};
pub use arena::{Piece, PieceId};
pub use board::{Board, MoveHints, MoveReport};
pub use combo::ComboTracker;
pub use mode::{GameMode, SpawnContext, SpawnRange};
pub use rng::{RandomSource, RngSource};
pub use snapshot::Snapshot;
pub use store::{FileStore, MemoryStore, SaveStore};
pub use display::{ScoreDisplay, SmoothedValue};
pub use config::GameConfig;
pub use game::{Game, SessionStart};
