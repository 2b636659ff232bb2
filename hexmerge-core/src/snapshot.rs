//! Persistence codec
//!
//! A snapshot is the minimal state needed to resume a session: one entry per
//! cell in canonical grid order plus the scalar counters. Move-scoped merge
//! bookkeeping is never saved.

use crate::board::Board;
use crate::combo::ComboTracker;
use crate::error::{HexMergeError, Result};
use crate::pieces::{PieceType, Rank, MAX_RANK};
use serde::{Deserialize, Serialize};

/// Largest combo accepted from a save
pub const MAX_COMBO: u32 = u32::MAX / 2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Occupant of every cell, in canonical grid order
    pub pieces: Vec<Option<PieceType>>,
    pub score: u64,
    pub highest: Rank,
    pub spawning_score: f64,
    pub combo: u32,
    pub combo_time: f32,
    /// Whether the board still had a move when it was saved
    pub can_make_move: bool,
}

impl Snapshot {
    /// Capture the board and combo state
    pub fn encode(board: &Board, combo: &ComboTracker) -> Self {
        Self {
            pieces: board
                .grid()
                .cell_ids()
                .map(|cell| board.piece_type_at(cell))
                .collect(),
            score: board.score(),
            highest: board.highest(),
            spawning_score: board.spawning_score(),
            combo: combo.combo(),
            combo_time: combo.time_remaining(),
            can_make_move: board.can_make_move(),
        }
    }

    /// Restore into `board` and `combo`.
    ///
    /// The snapshot is fully validated before anything is written, so a
    /// rejected snapshot leaves both untouched.
    pub fn decode(&self, board: &mut Board, combo: &mut ComboTracker) -> Result<()> {
        self.validate(board.grid().len())?;

        board.reset();
        for (cell, piece) in self.pieces.iter().enumerate() {
            if let Some(piece_type) = piece {
                board.place(cell, *piece_type);
            }
        }
        // place() bumps highest; the saved value wins unless a piece outranks it
        let highest = self.highest.max(board.highest());
        board.restore_counters(self.score, highest, self.spawning_score);
        combo.restore(self.combo, self.combo_time);
        Ok(())
    }

    fn validate(&self, cells: usize) -> Result<()> {
        if !self.can_make_move {
            return Err(HexMergeError::NotPlayable);
        }
        if self.pieces.len() != cells {
            return Err(HexMergeError::CellCountMismatch {
                expected: cells,
                found: self.pieces.len(),
            });
        }
        for (cell, piece) in self.pieces.iter().enumerate() {
            match piece.and_then(|p| p.rank()) {
                Some(0) => {
                    return Err(HexMergeError::InvalidPiece {
                        cell,
                        reason: "rank must be at least 1",
                    })
                }
                Some(rank) if rank > MAX_RANK => {
                    return Err(HexMergeError::InvalidPiece {
                        cell,
                        reason: "rank is out of range",
                    })
                }
                _ => {}
            }
        }
        if self.highest > MAX_RANK {
            return Err(HexMergeError::InvalidCounter {
                field: "highest",
                reason: "rank is out of range",
            });
        }
        if self.combo > MAX_COMBO {
            return Err(HexMergeError::InvalidCounter {
                field: "combo",
                reason: "combo is out of range",
            });
        }
        if !self.spawning_score.is_finite() {
            return Err(HexMergeError::InvalidCounter {
                field: "spawning_score",
                reason: "not finite",
            });
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
