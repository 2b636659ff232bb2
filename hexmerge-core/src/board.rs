//! Board state and the move pipeline
//!
//! A move runs to completion in one call:
//! 1. compress: slide every piece toward the move direction until nothing moves
//! 2. merge: fold compatible neighbors until nothing folds, resolve the
//!    folded types into new pieces, run merge behaviors (explosions), and
//!    compress once more to settle
//! 3. combo: feed the move's combo value to the tracker and scale the score
//! 4. spawn: if anything changed, ratchet the spawning score and drop one
//!    new piece on a free cell

use crate::arena::{Piece, PieceArena, PieceId};
use crate::combo::ComboTracker;
use crate::grid::{CellId, Direction, Grid};
use crate::mode::{GameMode, SpawnContext};
use crate::pieces::{fold_types, MergeBehavior, PieceType, Rank};
use crate::rng::RandomSource;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Offset scale for slide hints (fraction of a cell)
const SLIDE_HINT_SCALE: f32 = 0.1;

/// Offset scale for fold hints (fraction of a cell)
const FOLD_HINT_SCALE: f32 = 0.4;

// ============================================================================
// MOVE REPORTING
// ============================================================================

/// A piece slid one cell
#[derive(Clone, Debug, PartialEq)]
pub struct SlideHint {
    pub piece: PieceId,
    pub from: CellId,
    pub to: CellId,
    pub offset: [f32; 2],
}

/// A piece was consumed by the neighbor ahead of it
#[derive(Clone, Debug, PartialEq)]
pub struct FoldHint {
    pub piece: PieceId,
    pub from: CellId,
    pub into: CellId,
    pub offset: [f32; 2],
}

/// A new piece was created from folded types
#[derive(Clone, Debug, PartialEq)]
pub struct MergeHint {
    pub cell: CellId,
    pub piece: PieceId,
    pub fold_order: Vec<PieceType>,
}

/// A piece was destroyed by an explosion
#[derive(Clone, Debug, PartialEq)]
pub struct ExplosionHint {
    pub cell: CellId,
    pub piece_type: PieceType,
}

/// Observational record of a move for renderers. Never read back by the core.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MoveHints {
    pub slides: Vec<SlideHint>,
    pub folds: Vec<FoldHint>,
    pub merges: Vec<MergeHint>,
    pub explosions: Vec<ExplosionHint>,
}

/// Result of one move
#[derive(Clone, Debug, PartialEq)]
pub struct MoveReport {
    pub direction: Direction,
    /// Anything slid or folded; false means the move was a no-op
    pub changed: bool,
    pub compressed: bool,
    pub merged: bool,
    /// Combo value this move submitted to the tracker
    pub combo_value: u32,
    /// Multiplier applied to the merge score
    pub multiplier: f32,
    /// Merge points credited after the multiplier
    pub merge_score: u64,
    /// Explosion points credited (not multiplied)
    pub explosion_score: u64,
    pub spawned: Option<(CellId, PieceType)>,
    pub hints: MoveHints,
}

impl MoveReport {
    pub fn score_gained(&self) -> u64 {
        self.merge_score + self.explosion_score
    }
}

/// What the merge phase produced before combo scaling
#[derive(Clone, Copy, Debug, Default)]
struct MergeOutcome {
    folded: bool,
    combo_value: u32,
    raw_score: f64,
    explosion_score: u64,
}

// ============================================================================
// BOARD STATE
// ============================================================================

/// Occupancy of a fixed grid plus the session counters
#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    /// Cell -> piece id
    occupants: Vec<Option<PieceId>>,
    pieces: PieceArena,
    /// Cells emptied by an explosion this move; they stay empty until it ends
    exploded: Vec<bool>,
    highest: Rank,
    spawning_score: f64,
    score: u64,
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(grid: Grid) -> Self {
        let cells = grid.len();
        Self {
            grid,
            occupants: vec![None; cells],
            pieces: PieceArena::new(),
            exploded: vec![false; cells],
            highest: 1,
            spawning_score: 1.0,
            score: 0,
        }
    }

    /// Empty the board and reset the counters
    pub fn reset(&mut self) {
        self.occupants.fill(None);
        self.exploded.fill(false);
        self.pieces.clear();
        self.highest = 1;
        self.spawning_score = 1.0;
        self.score = 0;
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn highest(&self) -> Rank {
        self.highest
    }

    pub fn spawning_score(&self) -> f64 {
        self.spawning_score
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Piece id at a cell
    pub fn piece_id_at(&self, cell: CellId) -> Option<PieceId> {
        self.occupants[cell]
    }

    /// Piece at a cell
    pub fn piece_at(&self, cell: CellId) -> Option<&Piece> {
        self.occupant(cell).map(|(_, piece)| piece)
    }

    /// Piece type at a cell
    pub fn piece_type_at(&self, cell: CellId) -> Option<PieceType> {
        self.piece_at(cell).map(|p| p.piece_type)
    }

    /// Look up a live piece by id
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    /// Iterate occupied cells in canonical order
    pub fn pieces(&self) -> impl Iterator<Item = (CellId, PieceType)> + '_ {
        self.grid
            .cell_ids()
            .filter_map(move |cell| self.piece_type_at(cell).map(|t| (cell, t)))
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_exploded(&self, cell: CellId) -> bool {
        self.exploded[cell]
    }

    /// Empty cells a piece may be placed on this move
    pub fn empty_cells(&self) -> Vec<CellId> {
        self.grid
            .cell_ids()
            .filter(|&cell| self.occupants[cell].is_none() && !self.exploded[cell])
            .collect()
    }

    fn occupant(&self, cell: CellId) -> Option<(PieceId, &Piece)> {
        let id = self.occupants[cell]?;
        self.pieces.get(id).map(|piece| (id, piece))
    }

    // ========================================================================
    // PLACEMENT
    // ========================================================================

    /// Put a new piece on a cell, replacing any occupant
    pub fn place(&mut self, cell: CellId, piece_type: PieceType) -> PieceId {
        if let Some(old) = self.occupants[cell].take() {
            self.pieces.remove(old);
        }
        let id = self.pieces.insert(Piece::new(piece_type));
        self.occupants[cell] = Some(id);
        if let Some(rank) = piece_type.rank() {
            self.highest = self.highest.max(rank);
        }
        id
    }

    /// Remove and return the piece type on a cell
    pub fn remove(&mut self, cell: CellId) -> Option<PieceType> {
        let id = self.occupants[cell].take()?;
        self.pieces.remove(id).map(|p| p.piece_type)
    }

    /// Place a piece on a uniformly random free cell. No-op on a full board.
    pub fn place_random<R: RandomSource + ?Sized>(
        &mut self,
        piece_type: PieceType,
        rng: &mut R,
    ) -> Option<CellId> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let cell = empty[rng.index(empty.len())];
        self.place(cell, piece_type);
        Some(cell)
    }

    /// Overwrite the counters (used when restoring a save)
    pub(crate) fn restore_counters(&mut self, score: u64, highest: Rank, spawning_score: f64) {
        self.score = score;
        self.highest = highest;
        self.spawning_score = spawning_score;
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Smallest numbered rank on the board and how many pieces hold it
    pub fn lowest_piece_count(&self) -> Option<(Rank, usize)> {
        let mut lowest: Option<(Rank, usize)> = None;
        for rank in self.pieces().filter_map(|(_, t)| t.rank()) {
            lowest = match lowest {
                Some((low, count)) if rank == low => Some((low, count + 1)),
                Some((low, _)) if rank > low => lowest,
                _ => Some((rank, 1)),
            };
        }
        lowest
    }

    /// Inputs the game mode needs to pick the next spawn
    pub fn spawn_context(&self) -> SpawnContext {
        SpawnContext {
            spawning_score: self.spawning_score,
            highest: self.highest,
            lowest: self.lowest_piece_count(),
        }
    }

    /// True while some direction can still change the board
    pub fn can_make_move(&self) -> bool {
        self.grid.cell_ids().any(|cell| {
            let Some((_, piece)) = self.occupant(cell) else {
                return true;
            };
            self.grid.neighbors(cell).any(|n| match self.occupant(n) {
                None => true,
                Some((_, other)) => piece.piece_type.can_merge(&other.piece_type),
            })
        })
    }

    // ========================================================================
    // MOVE PIPELINE
    // ========================================================================

    /// Run a full move in `direction`
    pub fn apply_move<R: RandomSource + ?Sized>(
        &mut self,
        direction: Direction,
        combo: &mut ComboTracker,
        rng: &mut R,
    ) -> MoveReport {
        let mode = combo.mode();
        self.pieces.recycle();
        let mut hints = MoveHints::default();

        let compressed = self.compress(direction, &mut hints);
        let merge = self.merge(direction, &mut hints);

        let mut multiplier = combo.multiplier();
        let mut merge_score = 0;
        if merge.folded {
            combo.submit(merge.combo_value);
            multiplier = combo.multiplier();
            merge_score = (merge.raw_score * multiplier as f64).floor() as u64;
            self.score += merge_score;
        }

        let changed = compressed || merge.folded;
        let spawned = if changed {
            self.refresh_highest();
            self.spawning_score =
                self.spawning_score.max(self.highest as f64) + mode.progression_speed();
            self.spawn(mode, rng)
        } else {
            None
        };
        self.exploded.fill(false);

        tracing::debug!(
            ?direction,
            changed,
            combo_value = merge.combo_value,
            merge_score,
            explosion_score = merge.explosion_score,
            "move applied"
        );

        MoveReport {
            direction,
            changed,
            compressed,
            merged: merge.folded,
            combo_value: merge.combo_value,
            multiplier,
            merge_score,
            explosion_score: merge.explosion_score,
            spawned,
            hints,
        }
    }

    /// Slide pieces toward `direction` until a full pass moves nothing.
    ///
    /// Returns whether anything moved. Terminates because every slide lowers
    /// [`Board::open_gaps`] by exactly one.
    pub fn compress(&mut self, direction: Direction, hints: &mut MoveHints) -> bool {
        let offset = scaled(direction, SLIDE_HINT_SCALE);
        let mut moved = false;

        loop {
            #[cfg(debug_assertions)]
            let gaps_before = self.open_gaps(direction);

            let mut changed = false;
            for cell in self.grid.cell_ids() {
                let Some(id) = self.occupants[cell] else {
                    continue;
                };
                let Some(next) = self.grid.neighbor(cell, direction) else {
                    continue;
                };
                if self.occupants[next].is_none() && !self.exploded[next] {
                    self.occupants[next] = Some(id);
                    self.occupants[cell] = None;
                    hints.slides.push(SlideHint {
                        piece: id,
                        from: cell,
                        to: next,
                        offset,
                    });
                    changed = true;
                }
            }

            if !changed {
                return moved;
            }
            moved = true;

            #[cfg(debug_assertions)]
            debug_assert!(
                self.open_gaps(direction) < gaps_before,
                "compress pass did not reduce open gaps"
            );
        }
    }

    /// Fold, resolve, run behaviors, settle
    fn merge(&mut self, direction: Direction, hints: &mut MoveHints) -> MergeOutcome {
        for cell in self.grid.cell_ids() {
            if let Some(piece) = self.occupants[cell].and_then(|id| self.pieces.get_mut(id)) {
                piece.reset_merge_state();
            }
        }

        let offset = scaled(direction, FOLD_HINT_SCALE);
        let mut folded_any = false;
        loop {
            // every fold destroys a piece, so the live count bounds the passes
            let live_before = self.pieces.len();
            let mut folded = false;
            for cell in self.grid.cell_ids() {
                folded |= self.try_fold(cell, direction, offset, hints);
            }
            if !folded {
                break;
            }
            folded_any = true;
            debug_assert!(self.pieces.len() < live_before);
        }

        if !folded_any {
            return MergeOutcome::default();
        }

        let mut outcome = self.resolve_merges(hints);
        outcome.folded = true;
        self.compress(direction, hints);
        outcome
    }

    /// Fold the piece on `cell` into the piece ahead of it, if allowed.
    ///
    /// A piece only moves forward when the piece behind it could not merge
    /// into it instead; that keeps one pass from consuming a piece twice.
    fn try_fold(
        &mut self,
        cell: CellId,
        direction: Direction,
        offset: [f32; 2],
        hints: &mut MoveHints,
    ) -> bool {
        let Some((id, piece)) = self.occupant(cell) else {
            return false;
        };
        let piece_type = piece.piece_type;
        let Some(ahead) = self.grid.neighbor(cell, direction) else {
            return false;
        };
        let Some((target_id, target)) = self.occupant(ahead) else {
            return false;
        };
        if !piece_type.can_merge(&target.piece_type) {
            return false;
        }
        let behind_takes = self
            .grid
            .neighbor(cell, direction.opposite())
            .and_then(|behind| self.occupant(behind))
            .is_some_and(|(_, other)| piece_type.can_merge(&other.piece_type));
        if behind_takes {
            return false;
        }

        self.occupants[cell] = None;
        let Some(folded) = self.pieces.remove(id) else {
            return false;
        };
        let Some(target) = self.pieces.get_mut(target_id) else {
            return false;
        };
        target.merge_count = folded.merge_count + 1;
        target.combo = folded.piece_type.contributes_to_combo();
        target.score_accumulator += folded.score_accumulator + folded.piece_type.points_for_merge();
        let mut types = folded.merging_types;
        types.append(&mut target.merging_types);
        target.merging_types = types;

        hints.folds.push(FoldHint {
            piece: id,
            from: cell,
            into: ahead,
            offset,
        });
        true
    }

    /// Replace every piece that received folds with its folded result, then
    /// run the merge behaviors of every contributing type
    fn resolve_merges(&mut self, hints: &mut MoveHints) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        let mut pending: Vec<(MergeBehavior, PieceId, CellId)> = Vec::new();

        for cell in self.grid.cell_ids() {
            let Some((id, piece)) = self.occupant(cell) else {
                continue;
            };
            outcome.raw_score += piece.score_accumulator;
            if piece.combo {
                outcome.combo_value = outcome.combo_value.max(piece.merge_count);
            }
            if piece.merge_count == 0 {
                continue;
            }
            let fold_order = piece.merging_types.clone();
            let Some(result) = fold_types(&fold_order) else {
                continue;
            };

            self.pieces.remove(id);
            self.occupants[cell] = None;
            let new_id = self.place(cell, result);
            pending.extend(fold_order.iter().map(|t| (t.merge_behavior(), new_id, cell)));
            hints.merges.push(MergeHint {
                cell,
                piece: new_id,
                fold_order,
            });
        }

        for (behavior, id, cell) in pending {
            match behavior {
                MergeBehavior::None => {}
                MergeBehavior::Detonate => {
                    // already destroyed by an earlier explosion
                    if self.occupants[cell] != Some(id) {
                        continue;
                    }
                    let around: Vec<CellId> = self.grid.neighbors(cell).collect();
                    for n in around {
                        outcome.explosion_score += self.explode(n, hints);
                    }
                    outcome.explosion_score += self.explode(cell, hints);
                }
            }
        }

        outcome
    }

    /// Destroy whatever is on `cell` and keep the cell empty for the rest of
    /// the move. Returns the points credited.
    fn explode(&mut self, cell: CellId, hints: &mut MoveHints) -> u64 {
        self.exploded[cell] = true;
        let Some(piece_type) = self.remove(cell) else {
            return 0;
        };
        let points = piece_type.points_for_explode().floor() as u64;
        self.score += points;
        hints.explosions.push(ExplosionHint { cell, piece_type });
        points
    }

    /// Spawn the mode's next piece on a random free cell
    fn spawn<R: RandomSource + ?Sized>(
        &mut self,
        mode: GameMode,
        rng: &mut R,
    ) -> Option<(CellId, PieceType)> {
        if self.empty_cells().is_empty() {
            return None;
        }
        let piece_type = mode.spawn_piece(&self.spawn_context(), rng);
        self.place_random(piece_type, rng).map(|cell| (cell, piece_type))
    }

    fn refresh_highest(&mut self) {
        if let Some(top) = self.pieces().filter_map(|(_, t)| t.rank()).max() {
            self.highest = self.highest.max(top);
        }
    }

    /// Sum over pieces of the free cells ahead of them in `direction`
    #[cfg(debug_assertions)]
    fn open_gaps(&self, direction: Direction) -> usize {
        self.grid
            .cell_ids()
            .filter(|&cell| self.occupants[cell].is_some())
            .map(|cell| {
                let mut gaps = 0;
                let mut next = self.grid.neighbor(cell, direction);
                while let Some(n) = next {
                    if self.occupants[n].is_none() && !self.exploded[n] {
                        gaps += 1;
                    }
                    next = self.grid.neighbor(n, direction);
                }
                gaps
            })
            .sum()
    }
}

fn scaled(direction: Direction, scale: f32) -> [f32; 2] {
    let [x, y] = direction.vector();
    [x * scale, y * scale]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Hex;
    use crate::rng::RngSource;
    use crate::pieces::PieceType::*;

    fn board_with(radius: u8, pieces: &[(i8, i8, PieceType)]) -> Board {
        let mut board = Board::new(Grid::new(radius).unwrap());
        for &(q, r, t) in pieces {
            let cell = board.grid().cell_at(Hex::new(q, r)).unwrap();
            board.place(cell, t);
        }
        board
    }

    fn at(board: &Board, q: i8, r: i8) -> Option<PieceType> {
        board.piece_type_at(board.grid().cell_at(Hex::new(q, r)).unwrap())
    }

    fn play(board: &mut Board, direction: Direction) -> (MoveReport, ComboTracker) {
        let mut combo = ComboTracker::new(GameMode::Normal);
        let mut rng = RngSource::seeded(11);
        let report = board.apply_move(direction, &mut combo, &mut rng);
        (report, combo)
    }

    #[test]
    fn test_compress_slides_to_edge() {
        let mut board = board_with(2, &[(-2, 0, Standard(1))]);
        let mut hints = MoveHints::default();
        assert!(board.compress(Direction::Right, &mut hints));
        assert_eq!(at(&board, 2, 0), Some(Standard(1)));
        assert_eq!(at(&board, -2, 0), None);
        assert_eq!(hints.slides.len(), 4);
    }

    #[test]
    fn test_compress_idempotent() {
        let mut board = board_with(2, &[(-2, 0, Standard(1)), (0, 1, Wall), (-1, -1, Bomb(3))]);
        let mut hints = MoveHints::default();
        board.compress(Direction::DownLeft, &mut hints);
        let before: Vec<_> = board.pieces().collect();
        assert!(!board.compress(Direction::DownLeft, &mut hints));
        assert_eq!(board.pieces().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_single_merge_scenario() {
        // walls pin the row ends so nothing else can slide right
        let mut board = board_with(
            1,
            &[(0, 0, Standard(1)), (1, 0, Standard(1)), (1, -1, Wall), (0, 1, Wall)],
        );
        let (report, combo) = play(&mut board, Direction::Right);

        assert!(report.changed);
        assert!(!report.compressed);
        assert!(report.merged);
        assert_eq!(at(&board, 1, 0), Some(Standard(2)));
        assert_eq!(report.combo_value, 1);
        assert_eq!(combo.combo(), 1);

        let multiplier = GameMode::Normal.combo_multiplier(1);
        assert_eq!(report.multiplier, multiplier);
        assert_eq!(board.score(), (1.0 * multiplier as f64).floor() as u64);

        // three pieces left plus one spawn, and the spawn landed on a free cell
        let (spawn_cell, _) = report.spawned.unwrap();
        assert_eq!(board.piece_count(), 4);
        assert_ne!(Some(spawn_cell), board.grid().cell_at(Hex::new(1, 0)));
        assert_eq!(board.highest(), 2);
    }

    #[test]
    fn test_prior_cell_empty_after_merge() {
        let mut board = board_with(
            1,
            &[(0, 0, Standard(1)), (1, 0, Standard(1)), (1, -1, Wall), (0, 1, Wall)],
        );
        let mut combo = ComboTracker::new(GameMode::Normal);
        let mut hints = MoveHints::default();
        let outcome = board.merge(Direction::Right, &mut hints);
        assert!(outcome.folded);
        assert_eq!(outcome.raw_score, 1.0);
        assert_eq!(at(&board, 0, 0), None);
        assert_eq!(hints.folds.len(), 1);
        assert_eq!(hints.merges[0].fold_order, vec![Standard(1), Standard(1)]);
        combo.submit(outcome.combo_value);
        assert_eq!(combo.combo(), 1);
    }

    #[test]
    fn test_line_of_three_collapses_once_each() {
        let mut board = board_with(1, &[(-1, 0, Standard(1)), (0, 0, Standard(1)), (1, 0, Standard(1))]);
        let mut hints = MoveHints::default();
        let outcome = board.merge(Direction::Right, &mut hints);

        // each piece folded at most once: two folds, one survivor
        assert_eq!(hints.folds.len(), 2);
        let consumed: Vec<_> = hints.folds.iter().map(|f| f.piece).collect();
        assert_ne!(consumed[0], consumed[1]);
        assert_eq!(board.piece_count(), 1);
        assert_eq!(at(&board, 1, 0), Some(Standard(3)));
        assert_eq!(outcome.combo_value, 2);
        assert_eq!(outcome.raw_score, 2.0);
    }

    #[test]
    fn test_line_of_three_other_direction() {
        let mut board = board_with(1, &[(-1, 0, Standard(1)), (0, 0, Standard(1)), (1, 0, Standard(1))]);
        let mut hints = MoveHints::default();
        board.merge(Direction::Left, &mut hints);
        assert_eq!(board.piece_count(), 1);
        assert_eq!(at(&board, -1, 0), Some(Standard(3)));
    }

    #[test]
    fn test_new_rank_does_not_merge_again_same_move() {
        let mut board = board_with(1, &[(-1, 0, Standard(1)), (0, 0, Standard(1)), (1, 0, Standard(2))]);
        let mut hints = MoveHints::default();
        board.merge(Direction::Right, &mut hints);
        assert_eq!(at(&board, 0, 0), Some(Standard(2)));
        assert_eq!(at(&board, 1, 0), Some(Standard(2)));
        assert_eq!(at(&board, -1, 0), None);
    }

    #[test]
    fn test_bomb_detonates_after_fold() {
        let mut board = board_with(
            2,
            &[(1, 0, Bomb(2)), (2, 0, Standard(2)), (2, -1, Standard(5)), (1, 1, Wall)],
        );
        let (report, _) = play(&mut board, Direction::Right);

        assert!(report.merged);
        assert_eq!(report.hints.merges[0].fold_order, vec![Bomb(2), Standard(2)]);
        // neighbors: wall (0) + standard 5 (50); the new standard 3 itself (30)
        assert_eq!(report.explosion_score, 80);
        assert_eq!(report.hints.explosions.len(), 3);
        let multiplier = GameMode::Normal.combo_multiplier(1) as f64;
        assert_eq!(report.merge_score, (6.0 * multiplier).floor() as u64);
        assert_eq!(board.score(), 80 + report.merge_score);

        // only the spawn is left, and not on a blast cell
        assert_eq!(board.piece_count(), 1);
        let (spawn_cell, _) = report.spawned.unwrap();
        let blasted = [(2, 0), (1, 0), (2, -1), (1, 1)];
        for (q, r) in blasted {
            assert_ne!(Some(spawn_cell), board.grid().cell_at(Hex::new(q, r)));
        }
        assert_eq!(board.highest(), 5);
    }

    #[test]
    fn test_explosion_cells_block_settling() {
        // the bomb clears (1,0); the standard at (-1,0) may only settle to (0,0)
        let mut board = board_with(
            2,
            &[(1, 0, Bomb(2)), (2, 0, Standard(2)), (-1, 0, Standard(9)), (-2, 0, Wall)],
        );
        let mut hints = MoveHints::default();
        board.compress(Direction::Right, &mut hints);
        assert_eq!(at(&board, 0, 0), Some(Standard(9)));
        board.merge(Direction::Right, &mut hints);
        assert_eq!(at(&board, 0, 0), Some(Standard(9)));
        assert_eq!(at(&board, 1, 0), None);
        assert!(board.is_exploded(board.grid().cell_at(Hex::new(1, 0)).unwrap()));
    }

    #[test]
    fn test_incrementer_merge() {
        let mut board = board_with(2, &[(1, 0, Incrementer), (2, 0, Standard(4))]);
        let mut hints = MoveHints::default();
        let outcome = board.merge(Direction::Right, &mut hints);
        assert_eq!(at(&board, 2, 0), Some(Standard(5)));
        assert_eq!(outcome.raw_score, 100.0);
        assert_eq!(board.highest(), 5);
    }

    #[test]
    fn test_incrementer_ignores_wall() {
        let mut board = board_with(2, &[(1, 0, Incrementer), (2, 0, Wall)]);
        let (report, _) = play(&mut board, Direction::Right);
        assert!(!report.changed);
        assert!(report.spawned.is_none());
        assert_eq!(board.piece_count(), 2);
    }

    #[test]
    fn test_walls_merge_without_combo() {
        let mut board = board_with(2, &[(1, 0, Wall), (2, 0, Wall)]);
        let (report, combo) = play(&mut board, Direction::Right);
        assert!(report.merged);
        assert_eq!(report.combo_value, 0);
        assert_eq!(combo.combo(), 0);
        assert_eq!(at(&board, 2, 0), Some(Wall));
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn test_no_op_move() {
        let mut board = board_with(1, &[(1, 0, Standard(1))]);
        let (report, _) = play(&mut board, Direction::Right);
        assert!(!report.changed);
        assert!(report.spawned.is_none());
        assert_eq!(board.spawning_score(), 1.0);
    }

    #[test]
    fn test_spawning_score_ratchets() {
        let mut board = board_with(2, &[(-2, 0, Standard(6))]);
        play(&mut board, Direction::Right);
        assert_eq!(board.spawning_score(), 6.0 + GameMode::Normal.progression_speed());
    }

    #[test]
    fn test_progression_follows_tracker_mode() {
        let mut board = board_with(2, &[(-2, 0, Standard(6))]);
        let mut combo = ComboTracker::new(GameMode::Zen);
        let mut rng = RngSource::seeded(11);
        board.apply_move(Direction::Right, &mut combo, &mut rng);
        assert_eq!(board.spawning_score(), 6.0 + GameMode::Zen.progression_speed());
        assert_ne!(board.spawning_score(), 6.0 + GameMode::Normal.progression_speed());
    }

    #[test]
    fn test_terminal_detection() {
        // center 3, ring alternating 1 and 2: no equal neighbors anywhere
        let mut pieces = vec![(0, 0, Standard(3))];
        for (i, dir) in Direction::ALL.iter().enumerate() {
            let (q, r) = dir.axial_offset();
            pieces.push((q, r, Standard(1 + (i % 2) as Rank)));
        }
        let board = board_with(1, &pieces);
        assert!(!board.can_make_move());

        pieces[1].2 = Standard(2);
        let board = board_with(1, &pieces);
        assert!(board.can_make_move());
    }

    #[test]
    fn test_empty_cell_allows_move() {
        let board = board_with(1, &[(0, 0, Standard(3))]);
        assert!(board.can_make_move());
    }

    #[test]
    fn test_lowest_piece_count() {
        let board = board_with(
            2,
            &[(0, 0, Standard(4)), (1, 0, Bomb(2)), (2, 0, Standard(2)), (-1, 0, Wall)],
        );
        assert_eq!(board.lowest_piece_count(), Some((2, 2)));
        let walls = board_with(1, &[(0, 0, Wall), (1, 0, Incrementer)]);
        assert_eq!(walls.lowest_piece_count(), None);
    }

    #[test]
    fn test_full_board_spawn_is_noop() {
        let mut board = board_with(1, &[]);
        let mut rng = RngSource::seeded(5);
        for _ in 0..7 {
            assert!(board.place_random(Wall, &mut rng).is_some());
        }
        assert!(board.place_random(Wall, &mut rng).is_none());
    }

    #[test]
    fn test_monotonic_counters() {
        let mut board = board_with(2, &[(0, 0, Standard(1)), (1, 0, Standard(1))]);
        let mut combo = ComboTracker::new(GameMode::Normal);
        let mut rng = RngSource::seeded(2024);
        let mut last = (board.score(), board.highest(), board.spawning_score());

        for step in 0..300 {
            if !board.can_make_move() {
                break;
            }
            let direction = Direction::ALL[step % 6];
            board.apply_move(direction, &mut combo, &mut rng);
            combo.tick(0.3);

            let now = (board.score(), board.highest(), board.spawning_score());
            assert!(now.0 >= last.0);
            assert!(now.1 >= last.1);
            assert!(now.2 >= last.2);
            assert!(board.piece_count() <= board.grid().len());
            last = now;
        }
    }
}
