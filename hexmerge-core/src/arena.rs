//! Piece storage
//!
//! Pieces live in a flat slot vector and are addressed by [`PieceId`]. A cell
//! owns a piece by storing its id; removing a piece from the arena is what
//! destroys it. Freed slots are held back until [`PieceArena::recycle`], so
//! ids handed out during one move never alias each other.

use crate::pieces::PieceType;

/// Stable handle to a live piece
pub type PieceId = usize;

/// A piece and its per-move merge bookkeeping
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub piece_type: PieceType,
    /// Number of folds that reached this piece during the current move
    pub merge_count: u32,
    /// Set when the last piece folded in counts toward the combo
    pub combo: bool,
    /// Merge points carried along the fold chain
    pub score_accumulator: f64,
    /// Types folded into this piece, in fold order; starts as `[piece_type]`
    pub merging_types: Vec<PieceType>,
}

impl Piece {
    pub fn new(piece_type: PieceType) -> Self {
        Self {
            piece_type,
            merge_count: 0,
            combo: false,
            score_accumulator: 0.0,
            merging_types: vec![piece_type],
        }
    }

    /// Clear the move-scoped fields
    pub fn reset_merge_state(&mut self) {
        self.merge_count = 0;
        self.combo = false;
        self.score_accumulator = 0.0;
        self.merging_types.clear();
        self.merging_types.push(self.piece_type);
    }
}

#[derive(Clone, Debug, Default)]
pub struct PieceArena {
    slots: Vec<Option<Piece>>,
    free: Vec<PieceId>,
    retired: Vec<PieceId>,
}

impl PieceArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, piece: Piece) -> PieceId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(piece);
                id
            }
            None => {
                self.slots.push(Some(piece));
                self.slots.len() - 1
            }
        }
    }

    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.slots.get_mut(id)?.take()?;
        self.retired.push(id);
        Some(piece)
    }

    /// Make slots freed since the last call available again
    pub fn recycle(&mut self) {
        self.free.append(&mut self.retired);
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.slots.get(id)?.as_ref()
    }

    pub fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.slots.get_mut(id)?.as_mut()
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live pieces
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len() - self.retired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.retired.clear();
    }
}
