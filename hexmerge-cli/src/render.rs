//! Text rendering of boards and session status

use hexmerge_core::{Board, Game, Hex, PieceType, RandomSource};

/// Columns per cell; rows shift by half of this
const CELL_WIDTH: usize = 4;

/// Short label for a piece
pub fn label(piece: Option<PieceType>) -> String {
    match piece {
        None => ".".to_string(),
        Some(PieceType::Standard(n)) => n.to_string(),
        Some(PieceType::Wall) => "W".to_string(),
        Some(PieceType::Bomb(n)) => format!("B{n}"),
        Some(PieceType::Incrementer) => "+".to_string(),
    }
}

/// Hexagon as text rows, top row first
pub fn board(board: &Board) -> String {
    let radius = board.grid().radius() as i8;
    let mut out = String::new();
    for r in -radius..=radius {
        let indent = r.unsigned_abs() as usize * CELL_WIDTH / 2;
        out.push_str(&" ".repeat(indent));
        let q_min = (-radius).max(-radius - r);
        let q_max = radius.min(radius - r);
        for q in q_min..=q_max {
            let piece = board
                .grid()
                .cell_at(Hex::new(q, r))
                .and_then(|cell| board.piece_type_at(cell));
            out.push_str(&format!("{:^width$}", label(piece), width = CELL_WIDTH));
        }
        out.push('\n');
    }
    out
}

/// One-line summary under the board
pub fn status<R: RandomSource>(game: &Game<R>) -> String {
    let combo = game.combo();
    let mut line = format!(
        "[{}] score {}  highest {}",
        game.mode(),
        game.score(),
        game.board().highest()
    );
    if combo.is_active() {
        line.push_str(&format!(
            "  combo {} (x{:.2}, {:.1}s)",
            combo.combo(),
            combo.multiplier(),
            combo.time_remaining()
        ));
    }
    line
}
