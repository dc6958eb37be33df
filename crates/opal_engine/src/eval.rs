//! Static evaluation: material, piece-square tables, and endgame terms.
//!
//! Scores are centipawns from the side to move's perspective. The tables
//! are data, not logic: they are written from White's point of view with
//! rank 8 first, so a White piece indexes with its square vertically
//! flipped (`sq ^ 56`) and a Black piece indexes directly.
//!
//! The king uses two tables blended by how deep into the endgame the
//! opponent is (little enemy material left pulls the king toward the
//! center); everything else uses a single middlegame table. A mop-up term
//! helps convert K+Q/K+R endings by driving the bare king to the edge.

use opal_core::{Board, Color, PieceKind};

/// Material values in centipawns, indexed by PieceKind::idx().
/// Order: Pawn, Knight, Bishop, Rook, Queen, King
pub const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 0];

/// Enemy material (pawns excluded) at or below which the endgame king
/// table starts taking over: two rooks plus two minors.
const ENDGAME_MATERIAL_START: i32 =
    2 * PIECE_VALUES[3] + PIECE_VALUES[2] + PIECE_VALUES[1];

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     98, 134,  61,  95,  68, 126,  34, -11,
     -6,   7,  26,  31,  65,  56,  25, -20,
    -14,  13,   6,  21,  23,  12,  17, -23,
    -27,  -2,  -5,  12,  17,   6,  10, -25,
    -26,  -4,  -4, -10,   3,   3,  33, -12,
    -35,  -1, -20, -23, -15,  24,  38, -22,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -167, -89, -34, -49,  61, -97, -15, -107,
     -73, -41,  72,  36,  23,  62,   7,  -17,
     -47,  60,  37,  65,  84, 129,  73,   44,
      -9,  17,  19,  53,  37,  69,  18,   22,
     -13,   4,  16,  13,  28,  19,  21,   -8,
     -23,  -9,  12,  10,  19,  17,  25,  -16,
     -29, -53, -12,  -3,  -1,  18, -14,  -19,
    -105, -74, -58, -33, -17, -28, -73,  -65,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -33,   4, -39, -21, -20, -39,   4, -33,
    -15,  12,  15,   2,  15,   8,  12, -15,
    -14,  13,  19,  24,  39,  31,  13, -14,
    -12,  13,  28,  34,  21,  28,  13, -12,
    -16,  14,  32,  24,  35,  17,  14, -16,
    -21,  15,  11,  15,   7,  13,  15, -21,
    -22,  14,   6,   7,  11,  10,  14, -22,
    -36, -11, -23, -26, -26, -23, -11, -36,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
     -3,   5,  10,  12,  12,  10,   5,  -3,
     -5,   5,  10,  12,  12,  10,   5,  -5,
     -5,   5,  10,  12,  12,  10,   5,  -5,
     -5,   5,  10,  12,  12,  10,   5,  -5,
     -5,   5,  10,  12,  12,  10,   5,  -5,
     -5,   5,  10,  12,  12,  10,   5,  -5,
     -5,   5,  10,  12,  12,  10,   5,  -5,
     -3,   5,  10,  12,  12,  10,   5,  -3,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
     -2,   4,  15,  12,   7,  21,   2,  -6,
    -17, -19,  -1,   9,  31,  14,  20, -31,
     -9,  22,  22,  27,  35,  51,  57,  21,
     -6,  17,  49,  35,  58,  84,  42,  23,
    -15,  33,  40,  71,  73,  71,  38,   2,
    -23,  -6,  31,  21,  19,  42,  24, -23,
    -36, -28,  13,  40,  35,  14, -22, -32,
    -52, -54, -18,  -5, -17, -18, -45, -54,
];

#[rustfmt::skip]
const KING_MG_PST: [i32; 64] = [
    -15,  36,  12, -54,   8, -28,  24,  14,
      1,   7,  -8, -64, -11, -16,   1,  16,
    -13, -19, -47, -72, -99, -47, -22, -14,
    -55, -43, -52, -97, -91, -43, -55, -53,
    -55, -40, -39, -56, -56, -39, -40, -55,
    -23, -23, -23, -23, -23, -23, -23, -23,
     31,  46,  13,  -7,  15,  33,  34,  45,
     18,  36,  33,  -2,   5,  20,  37,  26,
];

#[rustfmt::skip]
const KING_EG_PST: [i32; 64] = [
    -50, -20,   0,  10,  10,   0, -20, -50,
    -30,  10,  30,  35,  35,  30,  10, -30,
    -20,  30,  40,  45,  45,  40,  30, -20,
    -10,  35,  45,  50,  50,  45,  35, -10,
    -10,  35,  45,  50,  50,  45,  35, -10,
    -20,  30,  40,  45,  45,  40,  30, -20,
    -30,  10,  30,  35,  35,  30,  10, -30,
    -50, -20,   0,  10,  10,   0, -20, -50,
];

const PSTS: [&[i32; 64]; 5] = [&PAWN_PST, &KNIGHT_PST, &BISHOP_PST, &ROOK_PST, &QUEEN_PST];

/// Evaluate from the side to move's perspective: positive is good for
/// whoever moves next.
pub fn evaluate(board: &Board) -> i32 {
    let white = side_score(board, Color::White);
    let black = side_score(board, Color::Black);
    let score = white - black
        + mop_up(board, Color::White) - mop_up(board, Color::Black);

    if board.side_to_move == Color::White {
        score
    } else {
        -score
    }
}

fn side_score(board: &Board, color: Color) -> i32 {
    let mut score = 0;

    for kind in [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ] {
        for sq in board.pieces[color.idx()][kind.idx()] {
            score += PIECE_VALUES[kind.idx()] + PSTS[kind.idx()][pst_index(sq, color)];
        }
    }

    // King placement: shelter early, centralization once the enemy's
    // attacking material is gone.
    let weight = endgame_weight(nonpawn_material(board, color.other()));
    let ksq = pst_index(board.king_sq(color), color);
    score += (KING_MG_PST[ksq] * (256 - weight) + KING_EG_PST[ksq] * weight) / 256;

    score
}

#[inline(always)]
fn pst_index(sq: u8, color: Color) -> usize {
    match color {
        Color::White => (sq ^ 56) as usize,
        Color::Black => sq as usize,
    }
}

fn nonpawn_material(board: &Board, color: Color) -> i32 {
    let mut material = 0;
    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ] {
        material +=
            PIECE_VALUES[kind.idx()] * board.pieces[color.idx()][kind.idx()].popcount() as i32;
    }
    material
}

/// 0 = full middlegame, 256 = bare-king endgame.
fn endgame_weight(nonpawn_material: i32) -> i32 {
    256 - (nonpawn_material * 256 / ENDGAME_MATERIAL_START).min(256)
}

/// Once the opponent is down to a bare king and we still have a major
/// piece, reward cornering their king and closing in with ours. Without
/// this the PSTs alone see most K+R vs K positions as equal shuffling.
fn mop_up(board: &Board, color: Color) -> i32 {
    let them = color.other();
    if board.occupancy[them.idx()].popcount() != 1 {
        return 0;
    }
    let majors = board.pieces[color.idx()][PieceKind::Rook.idx()]
        | board.pieces[color.idx()][PieceKind::Queen.idx()];
    if majors.is_empty() {
        return 0;
    }

    let our_king = board.king_sq(color);
    let their_king = board.king_sq(them);
    center_distance(their_king) * 10 + (14 - king_distance(our_king, their_king)) * 4
}

fn center_distance(sq: u8) -> i32 {
    let file = (sq % 8) as i32;
    let rank = (sq / 8) as i32;
    let df = (file - 3).max(4 - file);
    let dr = (rank - 3).max(4 - rank);
    df + dr
}

fn king_distance(a: u8, b: u8) -> i32 {
    let df = ((a % 8) as i32 - (b % 8) as i32).abs();
    let dr = ((a / 8) as i32 - (b / 8) as i32).abs();
    df + dr
}

/// Plain material value, used by move ordering for MVV-LVA.
#[inline(always)]
pub(crate) fn piece_value(kind: PieceKind) -> i32 {
    PIECE_VALUES[kind.idx()]
}
