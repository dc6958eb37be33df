//! Draw condition coverage: stalemate, fifty-move rule, threefold
//! repetition, and insufficient material.

use opal_core::{Board, Color, Move, PieceKind, generate_moves};

// =============================================================================
// Stalemate
// =============================================================================

#[test]
fn test_stalemate_king_in_corner() {
    // Black king a8, white king c7, white queen b6.
    let mut board = Board::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
    let (moves, in_check) = generate_moves(&mut board);
    assert!(moves.is_empty(), "stalemate has no legal moves");
    assert!(!in_check, "stalemate means the king is not in check");
}

#[test]
fn test_stalemate_king_and_pawn_endgame() {
    // The classic K+P vs K dead draw: white pawn g7, kings g6 and g8.
    let mut board = Board::from_fen("6k1/6P1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let (moves, in_check) = generate_moves(&mut board);
    assert!(moves.is_empty());
    assert!(!in_check);
}

#[test]
fn test_checkmate_is_not_stalemate() {
    // Scholar's mate: no moves, but the king IS in check.
    let fen = "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4";
    let mut board = Board::from_fen(fen).unwrap();
    let (moves, in_check) = generate_moves(&mut board);
    assert!(moves.is_empty());
    assert!(in_check);
}

#[test]
fn test_check_is_not_checkmate() {
    let fen = "rnbqkbnr/ppppp1pp/8/5p1Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 2";
    let mut board = Board::from_fen(fen).unwrap();
    let (moves, in_check) = generate_moves(&mut board);
    assert!(!moves.is_empty());
    assert!(in_check);
    assert!(board.in_check(Color::Black));
}

// =============================================================================
// Fifty-move rule
// =============================================================================

#[test]
fn test_fifty_move_rule_boundary() {
    let board = Board::from_fen("8/8/8/4k3/8/4K3/8/8 w - - 100 60").unwrap();
    assert!(board.is_fifty_move_draw());
    let board = Board::from_fen("8/8/8/4k3/8/4K3/8/8 w - - 99 60").unwrap();
    assert!(!board.is_fifty_move_draw());
}

#[test]
fn test_fifty_move_clock_resets_on_pawn_move() {
    let mut board = Board::from_fen("8/8/8/4k3/8/3K4/4P3/8 w - - 99 60").unwrap();
    let (moves, _) = generate_moves(&mut board);
    let pawn_move = moves
        .iter()
        .find(|m| m.piece == PieceKind::Pawn)
        .copied()
        .expect("the e2 pawn can move");

    board.make_move(pawn_move, false);
    assert_eq!(board.halfmove_clock, 0);
    assert!(!board.is_fifty_move_draw());
}

// =============================================================================
// Threefold repetition
// =============================================================================

#[test]
fn test_threefold_repetition_by_knight_shuffle() {
    let mut board = Board::startpos();
    let shuffle = [
        Move::new(6, 21, PieceKind::Knight),
        Move::new(62, 45, PieceKind::Knight),
        Move::new(21, 6, PieceKind::Knight),
        Move::new(45, 62, PieceKind::Knight),
    ];

    for mv in shuffle {
        board.make_move(mv, false);
    }
    assert!(!board.is_repetition_draw(), "two occurrences is not a draw");

    for mv in shuffle {
        board.make_move(mv, false);
    }
    assert!(board.is_repetition_draw(), "third occurrence is a draw");
}

#[test]
fn test_hash_distinguishes_state_beyond_piece_placement() {
    let base = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";
    let a = Board::from_fen(&format!("{base} w KQkq - 0 1")).unwrap();
    let b = Board::from_fen(&format!("{base} b KQkq - 0 1")).unwrap();
    let c = Board::from_fen(&format!("{base} w Kq - 0 1")).unwrap();
    assert_ne!(a.hash, b.hash, "side to move must hash differently");
    assert_ne!(a.hash, c.hash, "castling rights must hash differently");

    let with_ep =
        Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
    let without_ep =
        Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1").unwrap();
    assert_ne!(with_ep.hash, without_ep.hash, "en passant must hash differently");
}

#[test]
fn test_hash_ignores_move_counters() {
    let a = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let b = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 42 99").unwrap();
    assert_eq!(a.hash, b.hash);
}

// =============================================================================
// Insufficient material
// =============================================================================

#[test]
fn test_insufficient_material_cases() {
    for fen in [
        "8/8/8/4k3/8/4K3/8/8 w - - 0 1",   // K vs K
        "8/8/8/4k3/8/4KB2/8/8 w - - 0 1",  // K+B vs K
        "8/8/8/4k3/8/4KN2/8/8 w - - 0 1",  // K+N vs K
        "8/8/4b3/4k3/8/4K3/8/8 w - - 0 1", // K vs K+B
        "8/8/4n3/4k3/8/4K3/8/8 w - - 0 1", // K vs K+N
        "5b2/8/8/4k3/8/4K3/8/2B5 w - - 0 1", // bishops on one square color
    ] {
        let board = Board::from_fen(fen).unwrap();
        assert!(board.is_insufficient_material(), "{fen}");
    }
}

#[test]
fn test_sufficient_material_cases() {
    for fen in [
        "2b5/8/8/4k3/8/4K3/8/2B5 w - - 0 1", // opposite-colored bishops
        "8/8/8/4k3/8/4K3/4P3/8 w - - 0 1",   // pawn
        "8/8/8/4k3/8/4K3/8/4R3 w - - 0 1",   // rook
        "8/8/8/4k3/8/4K3/8/4Q3 w - - 0 1",   // queen
        "8/8/8/4k3/8/4K3/3NN3/8 w - - 0 1",  // two knights
    ] {
        let board = Board::from_fen(fen).unwrap();
        assert!(!board.is_insufficient_material(), "{fen}");
    }
}
