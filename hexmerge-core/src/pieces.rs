//! Piece type definitions and merge algebra
//!
//! The variant set is closed. Every capability the pipeline needs
//! (compatibility, fold result, post-merge behavior, scoring) is a match
//! over [`PieceType`].

use serde::{Deserialize, Serialize};

/// Rank of a numbered piece (1 is the smallest spawnable rank)
pub type Rank = u32;

/// Largest rank accepted from a save; merges saturate at `Rank::MAX`
pub const MAX_RANK: Rank = Rank::MAX / 2;

/// Piece type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "rank", rename_all = "lowercase")]
pub enum PieceType {
    Standard(Rank),
    Wall,
    Bomb(Rank),
    Incrementer,
}

/// What happens after a type has folded into a new piece
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeBehavior {
    None,
    /// Destroy the six neighbors and the new piece itself
    Detonate,
}

impl PieceType {
    /// Save-format tag
    pub fn name(&self) -> &'static str {
        match self {
            PieceType::Standard(_) => "standard",
            PieceType::Wall => "wall",
            PieceType::Bomb(_) => "bomb",
            PieceType::Incrementer => "incrementer",
        }
    }

    /// Rank for numbered variants
    pub fn rank(&self) -> Option<Rank> {
        match *self {
            PieceType::Standard(n) | PieceType::Bomb(n) => Some(n),
            PieceType::Wall | PieceType::Incrementer => None,
        }
    }

    pub fn is_numbered(&self) -> bool {
        self.rank().is_some()
    }

    /// Same variant with a different rank; non-numbered types are unchanged
    pub fn with_rank(&self, rank: Rank) -> PieceType {
        match self {
            PieceType::Standard(_) => PieceType::Standard(rank),
            PieceType::Bomb(_) => PieceType::Bomb(rank),
            other => *other,
        }
    }

    /// One-sided compatibility: does `self` accept `other` as a merge partner?
    fn accepts_merge(&self, other: &PieceType) -> bool {
        match self {
            PieceType::Standard(n) | PieceType::Bomb(n) => other.rank() == Some(*n),
            PieceType::Wall => *other == PieceType::Wall,
            PieceType::Incrementer => other.is_numbered(),
        }
    }

    /// Symmetric merge compatibility
    pub fn can_merge(&self, other: &PieceType) -> bool {
        self.accepts_merge(other) || other.accepts_merge(self)
    }

    /// Apply `self` to the type accumulated so far in a fold
    pub fn merge_result(&self, acc: PieceType) -> PieceType {
        match self {
            PieceType::Standard(n) | PieceType::Bomb(n) => match acc {
                PieceType::Incrementer => self.with_rank(n.saturating_add(1)),
                PieceType::Wall => PieceType::Standard(n.saturating_add(1)),
                PieceType::Standard(m) | PieceType::Bomb(m) => {
                    PieceType::Standard((*n).max(m).saturating_add(1))
                }
            },
            PieceType::Wall => PieceType::Wall,
            PieceType::Incrementer => match acc.rank() {
                Some(m) => acc.with_rank(m.saturating_add(1)),
                None => acc,
            },
        }
    }

    pub fn merge_behavior(&self) -> MergeBehavior {
        match self {
            PieceType::Bomb(_) => MergeBehavior::Detonate,
            _ => MergeBehavior::None,
        }
    }

    pub fn points_for_merge(&self) -> f64 {
        match *self {
            PieceType::Standard(n) => n as f64,
            PieceType::Wall => 0.0,
            PieceType::Bomb(n) => n as f64 * 3.0,
            PieceType::Incrementer => 100.0,
        }
    }

    pub fn points_for_explode(&self) -> f64 {
        match *self {
            PieceType::Standard(n) => n as f64 * 10.0,
            PieceType::Wall => 0.0,
            PieceType::Bomb(n) => n as f64 * 15.0,
            PieceType::Incrementer => 200.0,
        }
    }

    pub fn contributes_to_combo(&self) -> bool {
        !matches!(self, PieceType::Wall)
    }
}

/// Fold the types that merged into one cell, left to right.
///
/// Returns `None` for an empty list.
pub fn fold_types(types: &[PieceType]) -> Option<PieceType> {
    let (first, rest) = types.split_first()?;
    Some(rest.iter().fold(*first, |acc, t| t.merge_result(acc)))
}
