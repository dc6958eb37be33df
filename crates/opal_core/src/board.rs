//! Board state: piece bitboards, composites, and make/unmake.
//!
//! The board keeps one bitboard per color and piece kind plus per-color and
//! total occupancy composites, all maintained incrementally. Every
//! `make_move` pushes an undo snapshot; `unmake_move` pops it and restores
//! the position bit for bit, including the zobrist hash. Moves are trusted:
//! passing a move that did not come from the generator is a caller bug.

use std::fmt;

use thiserror::Error;

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::types::{coord_to_sq, file_of, sq_to_coord, Color, Move, MoveFlag, Piece, PieceKind};
use crate::zobrist::ZOBRIST;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// Castling-rights bits.
pub const CASTLE_WK: u8 = 1;
pub const CASTLE_WQ: u8 = 2;
pub const CASTLE_BK: u8 = 4;
pub const CASTLE_BQ: u8 = 8;

/// Rights that survive a move touching each square. Indexed by square,
/// ANDed into the rights mask for both the from- and to-square, so moving
/// a king or rook, or capturing a rook on its home square, clears the
/// right without any piece-kind checks.
static CASTLING_MASKS: [u8; 64] = {
    let mut masks = [0b1111u8; 64];
    masks[0] = !CASTLE_WQ; // a1
    masks[4] = !(CASTLE_WK | CASTLE_WQ); // e1
    masks[7] = !CASTLE_WK; // h1
    masks[56] = !CASTLE_BQ; // a8
    masks[60] = !(CASTLE_BK | CASTLE_BQ); // e8
    masks[63] = !CASTLE_BK; // h8
    masks
};

/// FEN parsing failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected at least 4 FEN fields, got {0}")]
    MissingFields(usize),
    #[error("FEN board section must have 8 ranks")]
    BadRankCount,
    #[error("FEN rank {0} does not describe exactly 8 files")]
    BadRank(usize),
    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),
    #[error("invalid side to move '{0}'")]
    InvalidSide(String),
    #[error("invalid castling character '{0}'")]
    InvalidCastling(char),
    #[error("invalid en passant target '{0}'")]
    InvalidEnPassant(String),
    #[error("invalid clock field '{0}'")]
    InvalidClock(String),
}

/// Per-ply undo snapshot, pushed by `make_move` and popped by
/// `unmake_move`. Stack depth equals the ply count since position load.
#[derive(Clone, Copy, Debug)]
struct GameState {
    ep_file: u8,
    castling: u8,
    halfmove_clock: u32,
    hash: u64,
}

#[derive(Clone, Debug)]
pub struct Board {
    /// Piece masks indexed by [color][piece kind].
    pub pieces: [[Bitboard; 6]; 2],
    /// Per-color occupancy composites.
    pub occupancy: [Bitboard; 2],
    /// All occupied squares.
    pub all: Bitboard,
    pub side_to_move: Color,
    /// 4-bit castling-rights mask (CASTLE_* bits).
    pub castling: u8,
    /// En passant file, 1-indexed; 0 means no target.
    pub ep_file: u8,
    /// Plies since the last pawn move or capture (fifty-move rule).
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    /// Incrementally maintained zobrist hash.
    pub hash: u64,
    /// Hashes of all real positions since load, current included. Search
    /// moves do not touch it; the searcher threads its own line history.
    pub repetition: Vec<u64>,
    state_stack: Vec<GameState>,
}

impl Board {
    pub fn startpos() -> Self {
        Board::from_fen(START_FEN).expect("start position FEN is valid")
    }

    /// Forsyth-Edwards Notation parser used by tests and UCI setup.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::MissingFields(parts.len()));
        }

        let board_part = parts[0];
        let stm_part = parts[1];
        let castle_part = parts[2];
        let ep_part = parts[3];
        let halfmove_part = parts.get(4).copied().unwrap_or("0");
        let fullmove_part = parts.get(5).copied().unwrap_or("1");

        let mut pieces = [[Bitboard::EMPTY; 6]; 2];
        let ranks: Vec<&str> = board_part.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadRankCount);
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let mut file: u8 = 0;
            let rank = 7 - rank_idx as u8; // FEN lists rank 8 .. 1
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as u8;
                } else {
                    let color = if ch.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let kind = match ch.to_ascii_lowercase() {
                        'p' => PieceKind::Pawn,
                        'n' => PieceKind::Knight,
                        'b' => PieceKind::Bishop,
                        'r' => PieceKind::Rook,
                        'q' => PieceKind::Queen,
                        'k' => PieceKind::King,
                        _ => return Err(FenError::InvalidPiece(ch)),
                    };
                    if file > 7 {
                        return Err(FenError::BadRank(8 - rank_idx));
                    }
                    pieces[color.idx()][kind.idx()].set(rank * 8 + file);
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::BadRank(8 - rank_idx));
                }
            }
            if file != 8 {
                return Err(FenError::BadRank(8 - rank_idx));
            }
        }

        let side_to_move = match stm_part {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::InvalidSide(stm_part.to_string())),
        };

        let mut castling = 0u8;
        if castle_part != "-" {
            for c in castle_part.chars() {
                castling |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    _ => return Err(FenError::InvalidCastling(c)),
                };
            }
        }

        let ep_file = if ep_part == "-" {
            0
        } else {
            match coord_to_sq(ep_part) {
                Some(sq) => file_of(sq) + 1,
                None => return Err(FenError::InvalidEnPassant(ep_part.to_string())),
            }
        };

        let halfmove_clock: u32 = halfmove_part
            .parse()
            .map_err(|_| FenError::InvalidClock(halfmove_part.to_string()))?;
        let fullmove_number: u32 = fullmove_part
            .parse()
            .map_err(|_| FenError::InvalidClock(fullmove_part.to_string()))?;

        let mut board = Board {
            pieces,
            occupancy: [Bitboard::EMPTY; 2],
            all: Bitboard::EMPTY,
            side_to_move,
            castling,
            ep_file,
            halfmove_clock,
            fullmove_number,
            hash: 0,
            repetition: Vec::new(),
            state_stack: Vec::new(),
        };
        board.rebuild_composites();
        board.hash = board.compute_hash();
        board.repetition.push(board.hash);
        Ok(board)
    }

    /// Emit the current position as FEN.
    pub fn fen(&self) -> String {
        let mut out = String::new();
        for rank in (0u8..8).rev() {
            let mut empty = 0u32;
            for file in 0u8..8 {
                let sq = rank * 8 + file;
                match self.piece_at(sq) {
                    Some(pc) => {
                        if empty > 0 {
                            out.push(char::from_digit(empty, 10).unwrap_or('0'));
                            empty = 0;
                        }
                        let letter = pc.kind.letter();
                        out.push(if pc.color == Color::White {
                            letter.to_ascii_uppercase()
                        } else {
                            letter
                        });
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from_digit(empty, 10).unwrap_or('0'));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        if self.castling == 0 {
            out.push('-');
        } else {
            if self.castling & CASTLE_WK != 0 {
                out.push('K');
            }
            if self.castling & CASTLE_WQ != 0 {
                out.push('Q');
            }
            if self.castling & CASTLE_BK != 0 {
                out.push('k');
            }
            if self.castling & CASTLE_BQ != 0 {
                out.push('q');
            }
        }

        out.push(' ');
        match self.ep_square() {
            Some(sq) => out.push_str(&sq_to_coord(sq)),
            None => out.push('-'),
        }

        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }

    fn rebuild_composites(&mut self) {
        for color in 0..2 {
            let mut occ = Bitboard::EMPTY;
            for kind in 0..6 {
                occ |= self.pieces[color][kind];
            }
            self.occupancy[color] = occ;
        }
        self.all = self.occupancy[0] | self.occupancy[1];
    }

    /// Full hash recompute, used only at position load.
    fn compute_hash(&self) -> u64 {
        let mut hash = 0u64;
        for &color in &[Color::White, Color::Black] {
            for &kind in &PieceKind::ALL {
                for sq in self.pieces[color.idx()][kind.idx()] {
                    hash ^= ZOBRIST.piece_key(Piece { color, kind }, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.side_to_move;
        }
        hash ^= ZOBRIST.castling_key(self.castling);
        hash ^= ZOBRIST.ep_key(self.ep_file);
        hash
    }

    /// The en passant target square, derived from the stored file and the
    /// side to move (the capture lands behind the pawn that double-pushed).
    #[inline(always)]
    pub fn ep_square(&self) -> Option<u8> {
        if self.ep_file == 0 {
            None
        } else {
            let file = self.ep_file - 1;
            Some(match self.side_to_move {
                Color::White => 40 + file, // rank 6
                Color::Black => 16 + file, // rank 3
            })
        }
    }

    #[inline(always)]
    pub fn king_sq(&self, c: Color) -> u8 {
        let kings = self.pieces[c.idx()][PieceKind::King.idx()];
        debug_assert!(kings.any(), "no king on the board");
        kings.0.trailing_zeros() as u8
    }

    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        for &color in &[Color::White, Color::Black] {
            if !self.occupancy[color.idx()].contains(sq) {
                continue;
            }
            for &kind in &PieceKind::ALL {
                if self.pieces[color.idx()][kind.idx()].contains(sq) {
                    return Some(Piece { color, kind });
                }
            }
        }
        None
    }

    /// Kind of the piece of `color` on `sq`, for capture lookup.
    #[inline]
    pub fn kind_at(&self, sq: u8, color: Color) -> Option<PieceKind> {
        if !self.occupancy[color.idx()].contains(sq) {
            return None;
        }
        PieceKind::ALL
            .iter()
            .copied()
            .find(|k| self.pieces[color.idx()][k.idx()].contains(sq))
    }

    #[inline(always)]
    fn add_piece(&mut self, color: Color, kind: PieceKind, sq: u8) {
        let bb = Bitboard::from_square(sq);
        self.pieces[color.idx()][kind.idx()] |= bb;
        self.occupancy[color.idx()] |= bb;
        self.all |= bb;
        self.hash ^= ZOBRIST.piece_key(Piece { color, kind }, sq);
    }

    #[inline(always)]
    fn remove_piece(&mut self, color: Color, kind: PieceKind, sq: u8) {
        let bb = Bitboard::from_square(sq);
        self.pieces[color.idx()][kind.idx()] ^= bb;
        self.occupancy[color.idx()] ^= bb;
        self.all ^= bb;
        self.hash ^= ZOBRIST.piece_key(Piece { color, kind }, sq);
    }

    /// Apply a legal move. `in_search` skips the repetition-history push;
    /// search lines thread their own hash history.
    pub fn make_move(&mut self, mv: Move, in_search: bool) {
        let us = self.side_to_move;
        let them = us.other();
        let from = mv.from_sq();
        let to = mv.to_sq();

        self.state_stack.push(GameState {
            ep_file: self.ep_file,
            castling: self.castling,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
        });

        self.hash ^= ZOBRIST.castling_key(self.castling);
        self.hash ^= ZOBRIST.ep_key(self.ep_file);

        if let Some(cap) = mv.captured {
            let cap_sq = if mv.flag == MoveFlag::EnPassant {
                // The victim sits behind the target square.
                match us {
                    Color::White => to - 8,
                    Color::Black => to + 8,
                }
            } else {
                to
            };
            self.remove_piece(them, cap, cap_sq);
        }

        self.remove_piece(us, mv.piece, from);
        self.add_piece(us, mv.promotion.unwrap_or(mv.piece), to);

        match mv.flag {
            MoveFlag::CastleKingside => {
                self.remove_piece(us, PieceKind::Rook, to + 1);
                self.add_piece(us, PieceKind::Rook, to - 1);
            }
            MoveFlag::CastleQueenside => {
                self.remove_piece(us, PieceKind::Rook, to - 2);
                self.add_piece(us, PieceKind::Rook, to + 1);
            }
            _ => {}
        }

        self.castling &= CASTLING_MASKS[from as usize] & CASTLING_MASKS[to as usize];
        self.ep_file = if mv.flag == MoveFlag::DoublePush {
            file_of(from) + 1
        } else {
            0
        };

        self.hash ^= ZOBRIST.castling_key(self.castling);
        self.hash ^= ZOBRIST.ep_key(self.ep_file);

        if mv.piece == PieceKind::Pawn || mv.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = them;
        self.hash ^= ZOBRIST.side_to_move;

        if !in_search {
            self.repetition.push(self.hash);
        }
    }

    /// Revert the last `make_move`. Must be called with the same move and
    /// the same `in_search` flag.
    pub fn unmake_move(&mut self, mv: Move, in_search: bool) {
        if !in_search {
            self.repetition.pop();
        }

        let us = self.side_to_move.other(); // side that made the move
        let them = self.side_to_move;
        self.side_to_move = us;
        if us == Color::Black {
            self.fullmove_number -= 1;
        }

        let from = mv.from_sq();
        let to = mv.to_sq();

        self.remove_piece(us, mv.promotion.unwrap_or(mv.piece), to);
        self.add_piece(us, mv.piece, from);

        if let Some(cap) = mv.captured {
            let cap_sq = if mv.flag == MoveFlag::EnPassant {
                match us {
                    Color::White => to - 8,
                    Color::Black => to + 8,
                }
            } else {
                to
            };
            self.add_piece(them, cap, cap_sq);
        }

        match mv.flag {
            MoveFlag::CastleKingside => {
                self.remove_piece(us, PieceKind::Rook, to - 1);
                self.add_piece(us, PieceKind::Rook, to + 1);
            }
            MoveFlag::CastleQueenside => {
                self.remove_piece(us, PieceKind::Rook, to + 1);
                self.add_piece(us, PieceKind::Rook, to - 2);
            }
            _ => {}
        }

        let state = self.state_stack.pop().expect("unmake without make");
        self.ep_file = state.ep_file;
        self.castling = state.castling;
        self.halfmove_clock = state.halfmove_clock;
        self.hash = state.hash;
    }

    /// Is `target` attacked by any piece of `by`? Slider attacks use the
    /// full occupancy.
    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        let their = &self.pieces[by.idx()];

        // A pawn of `by` attacks `target` iff a pawn of the other color on
        // `target` would attack the pawn's square.
        if (attacks::pawn_attacks(target, by.other()) & their[PieceKind::Pawn.idx()]).any() {
            return true;
        }
        if (attacks::knight_attacks(target) & their[PieceKind::Knight.idx()]).any() {
            return true;
        }
        if (attacks::king_attacks(target) & their[PieceKind::King.idx()]).any() {
            return true;
        }

        let diag = attacks::bishop_attacks(target, self.all);
        if (diag & (their[PieceKind::Bishop.idx()] | their[PieceKind::Queen.idx()])).any() {
            return true;
        }
        let ortho = attacks::rook_attacks(target, self.all);
        if (ortho & (their[PieceKind::Rook.idx()] | their[PieceKind::Queen.idx()])).any() {
            return true;
        }

        false
    }

    #[inline]
    pub fn in_check(&self, c: Color) -> bool {
        self.is_square_attacked(self.king_sq(c), c.other())
    }

    // Draw classification. The searcher scores these as 0.

    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Threefold repetition over the real game history, current position
    /// included.
    pub fn is_repetition_draw(&self) -> bool {
        self.repetition.iter().filter(|&&h| h == self.hash).count() >= 3
    }

    /// Neither side can possibly deliver mate: bare kings, a single minor
    /// piece, or only bishops all on the same square color.
    pub fn is_insufficient_material(&self) -> bool {
        for color in 0..2 {
            if self.pieces[color][PieceKind::Pawn.idx()].any()
                || self.pieces[color][PieceKind::Rook.idx()].any()
                || self.pieces[color][PieceKind::Queen.idx()].any()
            {
                return false;
            }
        }

        let knights = self.pieces[0][PieceKind::Knight.idx()]
            | self.pieces[1][PieceKind::Knight.idx()];
        let bishops = self.pieces[0][PieceKind::Bishop.idx()]
            | self.pieces[1][PieceKind::Bishop.idx()];
        let minors = knights.popcount() + bishops.popcount();

        if minors <= 1 {
            return true;
        }
        if knights.is_empty() {
            // Any number of bishops on one square color cannot mate.
            let light = bishops & Bitboard::LIGHT_SQUARES;
            return light == bishops || light.is_empty();
        }
        false
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0u8..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0u8..8 {
                let sq = rank * 8 + file;
                let ch = match self.piece_at(sq) {
                    Some(pc) => {
                        let letter = pc.kind.letter();
                        if pc.color == Color::White {
                            letter.to_ascii_uppercase()
                        } else {
                            letter
                        }
                    }
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(f, "{}", self.fen())
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
