//! Perft: exhaustive legal-move tree counts for generator validation.

use crate::board::Board;
use crate::movegen::generate_moves;

/// Count all leaf positions `depth` plies below the current one. Depth 1
/// is counted in bulk from the move list without making the moves.
pub fn perft(board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let (moves, _) = generate_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for mv in moves {
        board.make_move(mv, true);
        nodes += perft(board, depth - 1);
        board.unmake_move(mv, true);
    }
    nodes
}

/// Per-root-move node counts, for diffing against a reference engine when
/// a perft total disagrees.
pub fn perft_divide(board: &mut Board, depth: u8) -> Vec<(crate::types::Move, u64)> {
    let (moves, _) = generate_moves(board);
    let mut counts = Vec::with_capacity(moves.len());
    for mv in moves {
        board.make_move(mv, true);
        counts.push((mv, perft(board, depth.saturating_sub(1))));
        board.unmake_move(mv, true);
    }
    counts
}
