//! Fully-legal move generation in a single pass.
//!
//! No pseudo-legal filtering: before any move is emitted we compute, once,
//! the opponent's attack map (with our king removed from slider occupancy,
//! so the king cannot step backwards along a checking ray), the set of
//! checking pieces, a check-block mask, and a per-square pin-ray mask.
//! Every non-king move is then intersected with the check mask and its
//! piece's pin mask; king moves are filtered against the attack map. The
//! only speculative work left is en passant, whose discovered-check
//! geometry is cheapest to verify by actually making the move.

use crate::attacks::{
    between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks,
    rook_attacks, NEGATIVE_DIRS, POSITIVE_DIRS, RAYS,
};
use crate::bitboard::Bitboard;
use crate::board::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::types::{Color, Move, MoveFlag, PieceKind};

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Generate every legal move for the side to move. Also reports whether
/// that side is currently in check, so the caller can classify an empty
/// move list as checkmate or stalemate.
pub fn generate_moves(board: &mut Board) -> (Vec<Move>, bool) {
    generate(board, false)
}

/// Captures only (en passant included), for quiescence search.
pub fn generate_captures(board: &mut Board) -> (Vec<Move>, bool) {
    generate(board, true)
}

fn generate(board: &mut Board, captures_only: bool) -> (Vec<Move>, bool) {
    let us = board.side_to_move;
    let them = us.other();
    let ksq = board.king_sq(us);
    let our_occ = board.occupancy[us.idx()];
    let their_occ = board.occupancy[them.idx()];
    let their = &board.pieces[them.idx()];

    // Opponent attack map with our king removed from slider occupancy.
    let occ_nk = board.all ^ Bitboard::from_square(ksq);
    let attacked = attack_map(board, them, occ_nk);

    // Pieces currently giving check.
    let checkers = (knight_attacks(ksq) & their[PieceKind::Knight.idx()])
        | (pawn_attacks(ksq, us) & their[PieceKind::Pawn.idx()])
        | (bishop_attacks(ksq, board.all)
            & (their[PieceKind::Bishop.idx()] | their[PieceKind::Queen.idx()]))
        | (rook_attacks(ksq, board.all)
            & (their[PieceKind::Rook.idx()] | their[PieceKind::Queen.idx()]));
    let in_check = checkers.any();

    let mut moves = Vec::with_capacity(if captures_only { 16 } else { 48 });

    // King moves are legal iff the destination is not covered.
    let king_targets = king_attacks(ksq)
        & !attacked
        & !our_occ
        & if captures_only { their_occ } else { Bitboard::ALL };
    for to in king_targets {
        let mut mv = Move::new(ksq, to, PieceKind::King);
        mv.captured = board.kind_at(to, them);
        moves.push(mv);
    }

    // Double check: only the king can move.
    if checkers.popcount() > 1 {
        return (moves, in_check);
    }

    // With a single checker, non-king moves must capture it or block its
    // ray; otherwise every target is allowed.
    let check_mask = match checkers.lsb() {
        Some(csq) => between(ksq, csq) | checkers,
        None => Bitboard::ALL,
    };

    let pin_rays = compute_pins(board, us, ksq);
    let capture_filter = if captures_only {
        their_occ
    } else {
        Bitboard::ALL
    };

    // Knights. A pinned knight can never stay on its pin ray, so the mask
    // intersection silently discards all of its moves.
    for from in board.pieces[us.idx()][PieceKind::Knight.idx()] {
        let targets = knight_attacks(from)
            & !our_occ
            & check_mask
            & pin_rays[from as usize]
            & capture_filter;
        for to in targets {
            let mut mv = Move::new(from, to, PieceKind::Knight);
            mv.captured = board.kind_at(to, them);
            moves.push(mv);
        }
    }

    // Sliders.
    for (kind, attack_fn) in [
        (PieceKind::Bishop, bishop_attacks as fn(u8, Bitboard) -> Bitboard),
        (PieceKind::Rook, rook_attacks),
        (PieceKind::Queen, queen_attacks),
    ] {
        for from in board.pieces[us.idx()][kind.idx()] {
            let targets = attack_fn(from, board.all)
                & !our_occ
                & check_mask
                & pin_rays[from as usize]
                & capture_filter;
            for to in targets {
                let mut mv = Move::new(from, to, kind);
                mv.captured = board.kind_at(to, them);
                moves.push(mv);
            }
        }
    }

    generate_pawn_moves(
        board,
        us,
        them,
        check_mask,
        &pin_rays,
        captures_only,
        &mut moves,
    );

    if !captures_only && !in_check {
        generate_castling(board, us, attacked, &mut moves);
    }

    (moves, in_check)
}

/// Every square the given color attacks, with slider rays cast through
/// `occ_nk` (occupancy minus the defending king).
fn attack_map(board: &Board, them: Color, occ_nk: Bitboard) -> Bitboard {
    let their = &board.pieces[them.idx()];
    let mut attacked = Bitboard::EMPTY;

    let pawns = their[PieceKind::Pawn.idx()];
    attacked |= match them {
        Color::White => pawns.north_east() | pawns.north_west(),
        Color::Black => pawns.south_east() | pawns.south_west(),
    };
    for sq in their[PieceKind::Knight.idx()] {
        attacked |= knight_attacks(sq);
    }
    for sq in their[PieceKind::King.idx()] {
        attacked |= king_attacks(sq);
    }
    for sq in their[PieceKind::Bishop.idx()] | their[PieceKind::Queen.idx()] {
        attacked |= bishop_attacks(sq, occ_nk);
    }
    for sq in their[PieceKind::Rook.idx()] | their[PieceKind::Queen.idx()] {
        attacked |= rook_attacks(sq, occ_nk);
    }
    attacked
}

/// Per-square pin masks. An unpinned square maps to the full board so the
/// caller can intersect unconditionally; a pinned piece's mask is the ray
/// from the king through the pinner (pinner square included).
fn compute_pins(board: &Board, us: Color, ksq: u8) -> [Bitboard; 64] {
    let them = us.other();
    let their = &board.pieces[them.idx()];
    let diag_sliders = their[PieceKind::Bishop.idx()] | their[PieceKind::Queen.idx()];
    let ortho_sliders = their[PieceKind::Rook.idx()] | their[PieceKind::Queen.idx()];
    let our_occ = board.occupancy[us.idx()];

    let mut pin_rays = [Bitboard::ALL; 64];

    for dir in 0..8 {
        let ray = RAYS[dir][ksq as usize];
        let blockers = ray & board.all;
        let positive = POSITIVE_DIRS.contains(&dir);
        debug_assert!(positive != NEGATIVE_DIRS.contains(&dir));

        let first = if positive {
            blockers.lsb()
        } else {
            blockers.msb()
        };
        let first = match first {
            Some(sq) if our_occ.contains(sq) => sq,
            _ => continue,
        };

        let rest = blockers ^ Bitboard::from_square(first);
        let second = if positive { rest.lsb() } else { rest.msb() };
        let second = match second {
            Some(sq) => sq,
            None => continue,
        };

        // Odd direction indices are the diagonals.
        let sliders = if dir % 2 == 1 {
            diag_sliders
        } else {
            ortho_sliders
        };
        if sliders.contains(second) {
            pin_rays[first as usize] = ray & !RAYS[dir][second as usize];
        }
    }

    pin_rays
}

#[allow(clippy::too_many_arguments)]
fn generate_pawn_moves(
    board: &mut Board,
    us: Color,
    them: Color,
    check_mask: Bitboard,
    pin_rays: &[Bitboard; 64],
    captures_only: bool,
    moves: &mut Vec<Move>,
) {
    let (push, start_rank, promo_rank) = match us {
        Color::White => (8i8, Bitboard::RANK_2, Bitboard::RANK_8),
        Color::Black => (-8i8, Bitboard::RANK_7, Bitboard::RANK_1),
    };
    let ep_square = board.ep_square();

    for from in board.pieces[us.idx()][PieceKind::Pawn.idx()] {
        let mask = check_mask & pin_rays[from as usize];

        // Pushes.
        if !captures_only {
            let one = (from as i8 + push) as u8;
            if !board.all.contains(one) {
                if mask.contains(one) {
                    if promo_rank.contains(one) {
                        push_promotions(moves, from, one, None);
                    } else {
                        moves.push(Move::new(from, one, PieceKind::Pawn));
                    }
                }
                if start_rank.contains(from) {
                    let two = (from as i8 + 2 * push) as u8;
                    if !board.all.contains(two) && mask.contains(two) {
                        let mut mv = Move::new(from, two, PieceKind::Pawn);
                        mv.flag = MoveFlag::DoublePush;
                        moves.push(mv);
                    }
                }
            }
        }

        // Captures.
        let targets = pawn_attacks(from, us) & board.occupancy[them.idx()] & mask;
        for to in targets {
            let captured = board.kind_at(to, them);
            if promo_rank.contains(to) {
                push_promotions(moves, from, to, captured);
            } else {
                let mut mv = Move::new(from, to, PieceKind::Pawn);
                mv.captured = captured;
                moves.push(mv);
            }
        }

        // En passant. Removing two pawns from one rank in a single move has
        // discovered-check geometry the masks do not cover, so candidates
        // are verified by making the move.
        if let Some(eps) = ep_square {
            if pawn_attacks(from, us).contains(eps) {
                let mut mv = Move::new(from, eps, PieceKind::Pawn);
                mv.flag = MoveFlag::EnPassant;
                mv.captured = Some(PieceKind::Pawn);

                board.make_move(mv, true);
                let legal = !board.in_check(us);
                board.unmake_move(mv, true);
                if legal {
                    moves.push(mv);
                }
            }
        }
    }
}

fn push_promotions(moves: &mut Vec<Move>, from: u8, to: u8, captured: Option<PieceKind>) {
    for kind in PROMOTION_KINDS {
        let mut mv = Move::new(from, to, PieceKind::Pawn);
        mv.captured = captured;
        mv.promotion = Some(kind);
        moves.push(mv);
    }
}

/// Castling: rights intact, path empty, king's transit squares (its own
/// square excluded, handled by the not-in-check gate) unattacked.
fn generate_castling(board: &Board, us: Color, attacked: Bitboard, moves: &mut Vec<Move>) {
    let (ksq, k_right, q_right) = match us {
        Color::White => (4u8, CASTLE_WK, CASTLE_WQ),
        Color::Black => (60u8, CASTLE_BK, CASTLE_BQ),
    };
    let rooks = board.pieces[us.idx()][PieceKind::Rook.idx()];

    if board.castling & k_right != 0 && rooks.contains(ksq + 3) {
        let transit = Bitboard::from_square(ksq + 1) | Bitboard::from_square(ksq + 2);
        if (board.all & transit).is_empty() && (attacked & transit).is_empty() {
            let mut mv = Move::new(ksq, ksq + 2, PieceKind::King);
            mv.flag = MoveFlag::CastleKingside;
            moves.push(mv);
        }
    }

    if board.castling & q_right != 0 && rooks.contains(ksq - 4) {
        let path = Bitboard::from_square(ksq - 1)
            | Bitboard::from_square(ksq - 2)
            | Bitboard::from_square(ksq - 3);
        let transit = Bitboard::from_square(ksq - 1) | Bitboard::from_square(ksq - 2);
        if (board.all & path).is_empty() && (attacked & transit).is_empty() {
            let mut mv = Move::new(ksq, ksq - 2, PieceKind::King);
            mv.flag = MoveFlag::CastleQueenside;
            moves.push(mv);
        }
    }
}

/// Is the side to move checkmated or stalemated? Returns
/// `(no_legal_moves, in_check)`.
pub fn is_terminal(board: &mut Board) -> (bool, bool) {
    let (moves, in_check) = generate_moves(board);
    (moves.is_empty(), in_check)
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
