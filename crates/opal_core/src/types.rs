//! Core value types: colors, piece kinds, moves, and square helpers.

use crate::bitboard::Bitboard;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline(always)]
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline(always)]
    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Default for PieceKind {
    fn default() -> Self {
        PieceKind::Pawn
    }
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline(always)]
    pub fn idx(self) -> usize {
        self as usize
    }

    /// Lowercase letter used in FEN and diagnostics.
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

/// Special-move tag carried on every move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MoveFlag {
    #[default]
    Normal,
    CastleKingside,
    CastleQueenside,
    EnPassant,
    DoublePush,
}

/// A move, created and destroyed at very high frequency in the search hot
/// path, so this stays a plain value type with a discriminant field.
///
/// From- and to-squares are stored as single-bit masks; callers that need a
/// square index bit-scan with [`Move::from_sq`] / [`Move::to_sq`]. The
/// all-zero value is the null move, distinguishable from any legal move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Move {
    pub from: Bitboard,
    pub to: Bitboard,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub flag: MoveFlag,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub const NULL: Move = Move {
        from: Bitboard::EMPTY,
        to: Bitboard::EMPTY,
        piece: PieceKind::Pawn,
        captured: None,
        flag: MoveFlag::Normal,
        promotion: None,
    };

    #[inline(always)]
    pub fn new(from: u8, to: u8, piece: PieceKind) -> Self {
        Move {
            from: Bitboard::from_square(from),
            to: Bitboard::from_square(to),
            piece,
            captured: None,
            flag: MoveFlag::Normal,
            promotion: None,
        }
    }

    #[inline(always)]
    pub fn from_sq(self) -> u8 {
        self.from.0.trailing_zeros() as u8
    }

    #[inline(always)]
    pub fn to_sq(self) -> u8 {
        self.to.0.trailing_zeros() as u8
    }

    #[inline(always)]
    pub fn is_null(self) -> bool {
        self.from.is_empty() && self.to.is_empty() && self.flag == MoveFlag::Normal
    }

    #[inline(always)]
    pub fn is_capture(self) -> bool {
        self.captured.is_some()
    }
}

// Square helpers. Squares are 0..64, a1 = 0, h8 = 63.

#[inline(always)]
pub fn file_of(sq: u8) -> u8 {
    sq % 8
}

#[inline(always)]
pub fn rank_of(sq: u8) -> u8 {
    sq / 8
}

pub fn sq_to_coord(sq: u8) -> String {
    let f = (b'a' + (sq % 8)) as char;
    let r = (b'1' + (sq / 8)) as char;
    format!("{f}{r}")
}

pub fn coord_to_sq(c: &str) -> Option<u8> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let (f, r) = (b[0], b[1]);
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    Some((r - b'1') * 8 + (f - b'a'))
}
