use std::time::Duration;

use opal_core::{Board, SearchLimits, generate_captures, generate_moves};

use super::*;
use crate::eval::evaluate;
use crate::tt::TranspositionTable;

fn search(board: &mut Board, depth: u8) -> SearchResult {
    let mut tt = TranspositionTable::new(1);
    run(board, &mut tt, &SearchLimits::depth(depth))
}

#[test]
fn test_finds_mate_in_one() {
    // Back-rank mate: Qe8#.
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1").unwrap();
    let result = search(&mut board, 3);

    let best = result.best_move.expect("legal moves exist");
    assert_eq!(best.from_sq(), 4, "queen starts on e1");
    assert_eq!(best.to_sq(), 60, "queen mates on e8");
    assert_eq!(result.score, MATE_SCORE - 1, "mate on the first ply");
    assert!(is_mate_score(result.score));
}

#[test]
fn test_wins_hanging_queen() {
    let mut board = Board::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
    let result = search(&mut board, 3);

    let best = result.best_move.expect("legal moves exist");
    assert_eq!(best.from_sq(), 28, "pawn on e4");
    assert_eq!(best.to_sq(), 35, "takes on d5");
    // Taking leaves K+P vs K, so the score is a pawn up, not a queen up.
    assert!(result.score > 0, "capturing wins material: {}", result.score);
}

#[test]
fn test_checkmated_root_reports_no_move() {
    // Fool's mate, white to move and mated.
    let fen = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
    let mut board = Board::from_fen(fen).unwrap();
    let result = search(&mut board, 3);
    assert!(result.best_move.is_none());
    assert_eq!(result.score, -MATE_SCORE);
}

#[test]
fn test_stalemate_root_scores_zero() {
    let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let result = search(&mut board, 3);
    assert!(result.best_move.is_none());
    assert_eq!(result.score, 0);
}

#[test]
fn test_search_leaves_board_untouched() {
    let mut board = Board::startpos();
    let fen = board.fen();
    let hash = board.hash;
    let _ = search(&mut board, 3);
    assert_eq!(board.fen(), fen);
    assert_eq!(board.hash, hash);
}

#[test]
fn test_fixed_depth_is_deterministic() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 3";

    let mut board = Board::from_fen(fen).unwrap();
    let a = search(&mut board, 3);
    let mut board = Board::from_fen(fen).unwrap();
    let b = search(&mut board, 3);

    assert_eq!(a.best_move, b.best_move);
    assert_eq!(a.score, b.score);
}

#[test]
fn test_tt_reuse_does_not_change_the_score() {
    // The table only reorders moves, so a second search of the same
    // position through a warm table must agree with the cold one.
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 3";
    let mut board = Board::from_fen(fen).unwrap();
    let mut tt = TranspositionTable::new(1);

    let cold = run(&mut board, &mut tt, &SearchLimits::depth(3));
    let warm = run(&mut board, &mut tt, &SearchLimits::depth(3));

    assert_eq!(cold.score, warm.score);
    assert_eq!(cold.best_move, warm.best_move);
}

#[test]
fn test_zero_time_budget_stops_the_search() {
    let mut board = Board::startpos();
    let mut tt = TranspositionTable::default();
    let result = run(&mut board, &mut tt, &SearchLimits::time(Duration::ZERO));
    assert!(result.stopped);
}

// =============================================================================
// Pruning soundness: alpha-beta must agree with a plain minimax over the
// same tree (same extensions, same quiescence leaves).
// =============================================================================

fn minimax_quiescence(board: &mut Board) -> i32 {
    let mut best = evaluate(board);
    let (captures, _) = generate_captures(board);
    for mv in captures {
        board.make_move(mv, true);
        best = best.max(-minimax_quiescence(board));
        board.unmake_move(mv, true);
    }
    best
}

fn minimax(board: &mut Board, depth: u8, extensions: u8) -> i32 {
    if depth == 0 {
        return minimax_quiescence(board);
    }
    let (moves, in_check) = generate_moves(board);
    if moves.is_empty() {
        return if in_check { -MATE_SCORE } else { 0 };
    }

    let extend = in_check && extensions < 16;
    let child_depth = depth - 1 + extend as u8;

    let mut best = -INFINITY;
    for mv in moves {
        board.make_move(mv, true);
        best = best.max(-minimax(board, child_depth, extensions + extend as u8));
        board.unmake_move(mv, true);
    }
    best
}

#[test]
fn test_alpha_beta_matches_minimax() {
    // Sparse position with captures and checks in reach, so the unpruned
    // reference stays cheap to enumerate. A lone queen cannot force mate
    // this shallow and no draw rule can trigger, so the ply-biased mate
    // scores cannot diverge from the reference.
    let fen = "4k3/8/2p5/3p4/3QP3/8/8/4K3 w - - 0 1";

    let mut board = Board::from_fen(fen).unwrap();
    let expected = minimax(&mut board, 3, 0);

    let mut board = Board::from_fen(fen).unwrap();
    let result = search(&mut board, 3);

    assert_eq!(result.score, expected);
}
