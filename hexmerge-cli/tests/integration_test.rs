//! Integration tests for the hex merge puzzle
//!
//! Tests the full stack: grid, move pipeline, combo, spawn policy,
//! snapshot codec, stores and the game session

use hexmerge_core::{
    board::MoveHints,
    Board, ComboTracker, Direction, FileStore, Game, GameConfig, GameMode, Grid, Hex,
    MemoryStore, PieceType, RandomSource, RngSource, SaveStore, SessionStart, Snapshot,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Build a board with pieces at axial coordinates
fn board_with(radius: u8, pieces: &[(i8, i8, PieceType)]) -> Board {
    let mut board = Board::new(Grid::new(radius).unwrap());
    for &(q, r, piece_type) in pieces {
        let cell = board.grid().cell_at(Hex::new(q, r)).unwrap();
        board.place(cell, piece_type);
    }
    board
}

fn at(board: &Board, q: i8, r: i8) -> Option<PieceType> {
    board.piece_type_at(board.grid().cell_at(Hex::new(q, r)).unwrap())
}

fn seeded_game(config: GameConfig, seed: u64) -> Game<RngSource<ChaCha8Rng>> {
    Game::new(config, RngSource::seeded(seed), Box::new(MemoryStore::new())).unwrap()
}

/// Play random directions until the game ends or `limit` is reached
fn play_random<R: RandomSource>(game: &mut Game<R>, agent: &mut ChaCha8Rng, limit: usize) {
    for _ in 0..limit {
        if game.is_game_over() {
            break;
        }
        game.play(Direction::ALL[agent.gen_range(0..6)]);
        game.tick(0.2);
    }
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("hexmerge-it-{}-{}", name, std::process::id()))
}

// ============================================================================
// MOVE PIPELINE TESTS
// ============================================================================

#[test]
fn test_two_ones_merge_right() {
    let mut board = board_with(
        1,
        &[
            (0, 0, PieceType::Standard(1)),
            (1, 0, PieceType::Standard(1)),
            (1, -1, PieceType::Wall),
            (0, 1, PieceType::Wall),
        ],
    );
    let mut combo = ComboTracker::new(GameMode::Normal);
    let mut rng = RngSource::seeded(8);
    let report = board.apply_move(Direction::Right, &mut combo, &mut rng);

    assert!(report.changed);
    assert_eq!(at(&board, 1, 0), Some(PieceType::Standard(2)));
    assert_eq!(at(&board, 0, 0), None);
    assert!(report.spawned.is_some());
    let expected = (1.0 * combo.multiplier() as f64).floor() as u64;
    assert_eq!(board.score(), expected);
}

#[test]
fn test_bomb_folded_into_standard_still_detonates() {
    // Standard behind, bomb ahead: the survivor is Standard but the bomb fires
    let mut board = board_with(
        2,
        &[
            (1, 0, PieceType::Standard(4)),
            (2, 0, PieceType::Bomb(4)),
            (2, -1, PieceType::Standard(1)),
        ],
    );
    let mut combo = ComboTracker::new(GameMode::Zen);
    let mut rng = RngSource::seeded(1);
    let report = board.apply_move(Direction::Right, &mut combo, &mut rng);

    assert_eq!(
        report.hints.merges[0].fold_order,
        vec![PieceType::Standard(4), PieceType::Bomb(4)]
    );
    // Standard(1) neighbor (10) + the new Standard(5) itself (50)
    assert_eq!(report.explosion_score, 60);
    assert_eq!(board.piece_count(), 1);
}

#[test]
fn test_slide_hints_follow_direction() {
    let mut board = board_with(2, &[(0, 0, PieceType::Standard(1))]);
    let mut hints = MoveHints::default();
    board.compress(Direction::UpLeft, &mut hints);

    assert_eq!(at(&board, 0, -2), Some(PieceType::Standard(1)));
    assert_eq!(hints.slides.len(), 2);
    let [x, y] = Direction::UpLeft.vector();
    assert!((hints.slides[0].offset[0] - x * 0.1).abs() < 1e-6);
    assert!((hints.slides[0].offset[1] - y * 0.1).abs() < 1e-6);
}

#[test]
fn test_every_direction_keeps_board_consistent() {
    let mut rng = RngSource::seeded(77);
    for direction in Direction::ALL {
        let mut board = board_with(
            2,
            &[
                (0, 0, PieceType::Standard(2)),
                (1, 0, PieceType::Standard(2)),
                (-1, 1, PieceType::Incrementer),
                (0, -1, PieceType::Wall),
                (1, -1, PieceType::Wall),
            ],
        );
        let mut combo = ComboTracker::new(GameMode::Hardcore);
        board.apply_move(direction, &mut combo, &mut rng);

        let occupied = board.pieces().count();
        assert_eq!(occupied, board.piece_count());
        assert!(board.pieces().all(|(_, t)| t.rank() != Some(0)));
    }
}

// ============================================================================
// SESSION TESTS
// ============================================================================

#[test]
fn test_session_is_reproducible() {
    let mut a = seeded_game(GameConfig::default(), 5);
    let mut b = seeded_game(GameConfig::default(), 5);
    let mut agent_a = ChaCha8Rng::seed_from_u64(6);
    let mut agent_b = ChaCha8Rng::seed_from_u64(6);

    play_random(&mut a, &mut agent_a, 300);
    play_random(&mut b, &mut agent_b, 300);

    assert_eq!(a.score(), b.score());
    assert_eq!(
        a.board().pieces().collect::<Vec<_>>(),
        b.board().pieces().collect::<Vec<_>>()
    );
}

#[test]
fn test_session_counters_monotonic() {
    for mode in GameMode::ALL {
        let mut game = seeded_game(GameConfig::default().with_mode(mode), 99);
        let mut agent = ChaCha8Rng::seed_from_u64(100);
        let mut last = (0, 1, 1.0);
        for _ in 0..400 {
            if game.is_game_over() {
                break;
            }
            game.play(Direction::ALL[agent.gen_range(0..6)]);
            let now = (game.score(), game.board().highest(), game.board().spawning_score());
            assert!(now.0 >= last.0, "{mode}: score went down");
            assert!(now.1 >= last.1, "{mode}: highest went down");
            assert!(now.2 >= last.2, "{mode}: spawning score went down");
            last = now;
        }
    }
}

#[test]
fn test_file_store_resume() {
    let dir = temp_dir("resume");
    let config = GameConfig::default().with_mode(GameMode::Hardcore);

    let (pieces, score) = {
        let store = FileStore::open(&dir).unwrap();
        let mut game = Game::new(config.clone(), RngSource::seeded(3), Box::new(store)).unwrap();
        let mut agent = ChaCha8Rng::seed_from_u64(4);
        play_random(&mut game, &mut agent, 10);
        assert!(!game.is_game_over());
        (game.board().pieces().collect::<Vec<_>>(), game.score())
    };
    assert!(dir.join("board_hardcore.json").is_file());

    let store = FileStore::open(&dir).unwrap();
    let resumed = Game::new(config, RngSource::seeded(0), Box::new(store)).unwrap();
    assert_eq!(resumed.start(), SessionStart::Loaded);
    assert_eq!(resumed.board().pieces().collect::<Vec<_>>(), pieces);
    assert_eq!(resumed.score(), score);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_terminal_save_forces_new_game() {
    // radius 1, no equal neighbors anywhere
    let mut pieces = vec![(0, 0, PieceType::Standard(3))];
    for (i, direction) in Direction::ALL.iter().enumerate() {
        let (q, r) = direction.axial_offset();
        pieces.push((q, r, PieceType::Standard(1 + (i % 2) as u32)));
    }
    let board = board_with(1, &pieces);
    let combo = ComboTracker::new(GameMode::Normal);
    let snapshot = Snapshot::encode(&board, &combo);
    assert!(!snapshot.can_make_move);

    let mut store = MemoryStore::new();
    store
        .write(&GameMode::Normal.save_key(), &snapshot.to_bytes().unwrap())
        .unwrap();
    let game = Game::new(
        GameConfig::default().with_radius(1),
        RngSource::seeded(2),
        Box::new(store),
    )
    .unwrap();

    assert_eq!(game.start(), SessionStart::NewGame);
    assert_eq!(game.board().piece_count(), 3);
    assert!(game.can_make_move());
}

#[test]
fn test_radius_change_discards_save() {
    let mut game = seeded_game(GameConfig::default().with_radius(3), 12);
    game.play(Direction::Left);
    let store = game.into_store();

    let smaller = Game::new(GameConfig::default(), RngSource::seeded(12), store).unwrap();
    assert_eq!(smaller.start(), SessionStart::NewGame);
    assert_eq!(smaller.board().grid().len(), 19);
}

#[test]
fn test_saved_after_every_move() {
    let mut game = seeded_game(GameConfig::default(), 21);
    let mut agent = ChaCha8Rng::seed_from_u64(22);
    play_random(&mut game, &mut agent, 10);
    let expected = Snapshot::encode(game.board(), game.combo());

    let store = game.into_store();
    let saved = Snapshot::from_bytes(&store.read("board_normal").unwrap()).unwrap();
    assert_eq!(saved.pieces, expected.pieces);
    assert_eq!(saved.score, expected.score);
    assert_eq!(saved.highest, expected.highest);
}
