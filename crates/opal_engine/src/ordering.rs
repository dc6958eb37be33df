//! Move ordering for alpha-beta: the sooner the best move is tried, the
//! more of the tree gets cut off.
//!
//! Scores are band-based. The hash move from a previous visit goes first,
//! then winning captures by MVV-LVA, promotions, killer moves (most recent
//! first), losing and equal captures, and finally quiet moves. A capture
//! drops to the losing band when the victim does not outweigh the attacker
//! and the opponent defends the destination square; a capture of an
//! undefended piece is always treated as winning.

use std::cmp::Reverse;

use opal_core::{Board, Move};

use crate::eval::piece_value;

const CAPTURE_WIN: i32 = 8_000_000;
const PROMOTE: i32 = 6_000_000;
const KILLER: i32 = 4_000_000;
const CAPTURE_LOSE: i32 = 2_000_000;

pub(crate) fn order_moves(
    moves: &mut [Move],
    board: &Board,
    tt_move: Option<Move>,
    killers: &[Option<Move>; 2],
) {
    moves.sort_by_cached_key(|&mv| Reverse(score_move(mv, board, tt_move, killers)));
}

fn score_move(mv: Move, board: &Board, tt_move: Option<Move>, killers: &[Option<Move>; 2]) -> i32 {
    if tt_move == Some(mv) {
        return i32::MAX;
    }

    if let Some(victim) = mv.captured {
        let delta = piece_value(victim) - piece_value(mv.piece);
        let recapture = board.is_square_attacked(mv.to_sq(), board.side_to_move.other());
        let band = if delta > 0 || !recapture {
            CAPTURE_WIN
        } else {
            CAPTURE_LOSE
        };
        return band + delta;
    }

    if let Some(promo) = mv.promotion {
        return PROMOTE + piece_value(promo);
    }

    if killers[0] == Some(mv) {
        return KILLER + 1;
    }
    if killers[1] == Some(mv) {
        return KILLER;
    }

    0
}
