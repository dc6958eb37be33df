use super::*;
use crate::board::Board;
use crate::types::file_of;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

#[test]
fn test_startpos_has_twenty_moves() {
    let mut board = Board::startpos();
    let (moves, in_check) = generate_moves(&mut board);
    assert_eq!(moves.len(), 20);
    assert!(!in_check);
}

#[test]
fn test_kiwipete_has_forty_eight_moves() {
    let mut board = Board::from_fen(KIWIPETE).unwrap();
    let (moves, in_check) = generate_moves(&mut board);
    assert_eq!(moves.len(), 48);
    assert!(!in_check);
}

#[test]
fn test_orthogonally_pinned_bishop_cannot_move() {
    // Bishop on e2 shields its king from the e8 rook.
    let mut board = Board::from_fen("3kr3/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
    let (moves, in_check) = generate_moves(&mut board);
    assert!(!in_check);
    assert!(moves.iter().all(|m| m.from_sq() != 12));
}

#[test]
fn test_pinned_rook_slides_along_the_pin_ray() {
    let mut board = Board::from_fen("3kr3/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
    let (moves, _) = generate_moves(&mut board);
    let rook_moves: Vec<_> = moves.iter().filter(|m| m.from_sq() == 12).collect();
    // e3 through e8 (capturing the pinner), never off the file.
    assert_eq!(rook_moves.len(), 6);
    assert!(rook_moves.iter().all(|m| file_of(m.to_sq()) == 4));
    assert!(rook_moves.iter().any(|m| m.to_sq() == 60 && m.is_capture()));
}

#[test]
fn test_double_check_allows_only_king_moves() {
    // Rook on e8 and knight on c2 both check the e1 king.
    let mut board = Board::from_fen("3kr3/8/8/8/8/8/2n5/4K3 w - - 0 1").unwrap();
    let (moves, in_check) = generate_moves(&mut board);
    assert!(in_check);
    assert!(!moves.is_empty());
    assert!(moves.iter().all(|m| m.piece == PieceKind::King));
}

#[test]
fn test_single_check_block_or_capture() {
    // Rook e8 checks; the d2 rook can block on e2 or the king steps aside.
    let mut board = Board::from_fen("3kr3/8/8/8/8/8/3R4/4K3 w - - 0 1").unwrap();
    let (moves, in_check) = generate_moves(&mut board);
    assert!(in_check);
    let rook_moves: Vec<_> = moves.iter().filter(|m| m.from_sq() == 11).collect();
    assert_eq!(rook_moves.len(), 1);
    assert_eq!(rook_moves[0].to_sq(), 12); // Re2 is the only block
}

#[test]
fn test_fools_mate_is_checkmate() {
    let fen = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
    let mut board = Board::from_fen(fen).unwrap();
    let (no_moves, in_check) = is_terminal(&mut board);
    assert!(no_moves);
    assert!(in_check);
}

#[test]
fn test_stalemate_classification() {
    let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let (no_moves, in_check) = is_terminal(&mut board);
    assert!(no_moves);
    assert!(!in_check);
}

#[test]
fn test_en_passant_generated_when_legal() {
    let mut board = Board::from_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
    let (moves, _) = generate_moves(&mut board);
    let ep: Vec<_> = moves
        .iter()
        .filter(|m| m.flag == MoveFlag::EnPassant)
        .collect();
    assert_eq!(ep.len(), 1);
    assert_eq!(ep[0].from_sq(), 28);
    assert_eq!(ep[0].to_sq(), 19);
    assert!(ep[0].is_capture());
}

#[test]
fn test_en_passant_rejected_when_it_exposes_the_king() {
    // Both pawns leave the fourth rank at once, uncovering Qh4 against Ka4.
    let mut board = Board::from_fen("8/8/8/8/k2Pp2Q/8/8/4K3 b - d3 0 1").unwrap();
    let (moves, _) = generate_moves(&mut board);
    assert!(moves.iter().all(|m| m.flag != MoveFlag::EnPassant));
}

#[test]
fn test_castling_through_attacked_square_is_illegal() {
    // The f3 rook covers f1: no kingside castling, queenside still fine.
    let mut board = Board::from_fen("r3k2r/8/8/8/8/5r2/8/R3K2R w KQkq - 0 1").unwrap();
    let (moves, in_check) = generate_moves(&mut board);
    assert!(!in_check);
    assert!(moves.iter().all(|m| m.flag != MoveFlag::CastleKingside));
    assert!(moves.iter().any(|m| m.flag == MoveFlag::CastleQueenside));
}

#[test]
fn test_castling_both_sides_when_clear() {
    let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let (moves, _) = generate_moves(&mut board);
    assert!(moves.iter().any(|m| m.flag == MoveFlag::CastleKingside));
    assert!(moves.iter().any(|m| m.flag == MoveFlag::CastleQueenside));
}

#[test]
fn test_promotion_branches_into_four_moves() {
    let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let (moves, _) = generate_moves(&mut board);
    let promos: Vec<_> = moves.iter().filter(|m| m.promotion.is_some()).collect();
    assert_eq!(promos.len(), 4);
    let kinds: std::collections::HashSet<_> =
        promos.iter().map(|m| m.promotion.unwrap()).collect();
    assert_eq!(kinds.len(), 4);
}

#[test]
fn test_capture_generation_is_a_subset_of_all_moves() {
    let mut board = Board::from_fen(KIWIPETE).unwrap();
    let (all_moves, _) = generate_moves(&mut board);
    let (captures, _) = generate_captures(&mut board);

    assert!(!captures.is_empty());
    assert!(captures.iter().all(|m| m.is_capture()));
    for cap in &captures {
        assert!(all_moves.contains(cap), "{cap:?} missing from full list");
    }
    let full_capture_count = all_moves.iter().filter(|m| m.is_capture()).count();
    assert_eq!(captures.len(), full_capture_count);
}

#[test]
fn test_every_generated_move_is_legal() {
    // Making any generated move must never leave the mover's king in
    // check, across positions with pins, checks, and en passant.
    for fen in [
        KIWIPETE,
        "3kr3/8/8/8/8/8/4R3/4K3 w - - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1",
        "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
    ] {
        let mut board = Board::from_fen(fen).unwrap();
        let us = board.side_to_move;
        let (moves, _) = generate_moves(&mut board);
        for mv in moves {
            board.make_move(mv, true);
            assert!(!board.in_check(us), "{fen}: {mv:?} leaves the king hanging");
            board.unmake_move(mv, true);
        }
    }
}

#[test]
fn test_generator_leaves_board_untouched() {
    // The en passant probe must round-trip perfectly.
    let mut board = Board::from_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
    let fen = board.fen();
    let hash = board.hash;
    let _ = generate_moves(&mut board);
    assert_eq!(board.fen(), fen);
    assert_eq!(board.hash, hash);
}
