//! Error types for the simulation core

use thiserror::Error;

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, HexMergeError>;

/// Everything that can go wrong outside of a move.
///
/// Moves themselves never fail: directions are a closed enum and a spawn
/// with no free cell is a no-op.
#[derive(Debug, Error)]
pub enum HexMergeError {
    #[error("board radius {radius} out of range (1..={max})")]
    RadiusOutOfRange { radius: u8, max: u8 },

    #[error("saved board has no legal move")]
    NotPlayable,

    #[error("saved board has {found} cells, expected {expected}")]
    CellCountMismatch { expected: usize, found: usize },

    #[error("saved piece at cell {cell} is invalid: {reason}")]
    InvalidPiece { cell: usize, reason: &'static str },

    #[error("saved {field} is invalid: {reason}")]
    InvalidCounter { field: &'static str, reason: &'static str },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot codec failed: {0}")]
    Codec(#[from] serde_json::Error),
}
