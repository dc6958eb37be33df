//! Pre-computed attack tables for move generation and attack detection.
//!
//! This module contains:
//! - Knight attack tables (constant)
//! - King attack tables (constant)
//! - Pawn attack tables (constant, per color)
//! - Ray and between tables (constant), used for pin and check masks
//! - Sliding piece attacks via magic bitboards, built lazily on first use

use std::sync::LazyLock;

use crate::bitboard::Bitboard;
use crate::magic::{
    bishop_attacks_slow, bishop_mask, blockers_from_index, find_magic, rook_attacks_slow,
    rook_mask, Magic,
};
use crate::types::Color;

/// Pre-computed knight attacks for each square.
pub static KNIGHT_ATTACKS: [Bitboard; 64] = {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let bb = Bitboard::from_square(sq);

        // All 8 L-shaped jumps with file-wrap masking.
        let mut result = 0u64;
        result |= (bb.0 << 17) & Bitboard::NOT_FILE_A.0;
        result |= (bb.0 << 15) & Bitboard::NOT_FILE_H.0;
        result |= (bb.0 << 10) & Bitboard::NOT_FILE_AB.0;
        result |= (bb.0 << 6) & Bitboard::NOT_FILE_GH.0;
        result |= (bb.0 >> 6) & Bitboard::NOT_FILE_AB.0;
        result |= (bb.0 >> 10) & Bitboard::NOT_FILE_GH.0;
        result |= (bb.0 >> 15) & Bitboard::NOT_FILE_A.0;
        result |= (bb.0 >> 17) & Bitboard::NOT_FILE_H.0;

        attacks[sq as usize] = Bitboard(result);
        sq += 1;
    }
    attacks
};

/// Pre-computed king attacks for each square.
pub static KING_ATTACKS: [Bitboard; 64] = {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let bb = Bitboard::from_square(sq);

        let mut result = 0u64;
        result |= bb.0 << 8; // North
        result |= bb.0 >> 8; // South
        result |= (bb.0 << 1) & Bitboard::NOT_FILE_A.0; // East
        result |= (bb.0 >> 1) & Bitboard::NOT_FILE_H.0; // West
        result |= (bb.0 << 9) & Bitboard::NOT_FILE_A.0; // North-East
        result |= (bb.0 << 7) & Bitboard::NOT_FILE_H.0; // North-West
        result |= (bb.0 >> 7) & Bitboard::NOT_FILE_A.0; // South-East
        result |= (bb.0 >> 9) & Bitboard::NOT_FILE_H.0; // South-West

        attacks[sq as usize] = Bitboard(result);
        sq += 1;
    }
    attacks
};

/// Pre-computed pawn attacks, indexed [color][square]. White attacks
/// north-east and north-west, Black the mirror.
pub static PAWN_ATTACKS: [[Bitboard; 64]; 2] = {
    let mut attacks = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0u8;
    while sq < 64 {
        let bb = Bitboard::from_square(sq);

        let mut white = 0u64;
        white |= (bb.0 << 9) & Bitboard::NOT_FILE_A.0;
        white |= (bb.0 << 7) & Bitboard::NOT_FILE_H.0;
        attacks[0][sq as usize] = Bitboard(white);

        let mut black = 0u64;
        black |= (bb.0 >> 7) & Bitboard::NOT_FILE_A.0;
        black |= (bb.0 >> 9) & Bitboard::NOT_FILE_H.0;
        attacks[1][sq as usize] = Bitboard(black);

        sq += 1;
    }
    attacks
};

/// Get pawn attacks for a given color and square.
#[inline(always)]
pub fn pawn_attacks(sq: u8, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.idx()][sq as usize]
}

/// Get knight attacks for a given square.
#[inline(always)]
pub fn knight_attacks(sq: u8) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

/// Get king attacks for a given square.
#[inline(always)]
pub fn king_attacks(sq: u8) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

/// Pre-computed ray attacks in each direction.
/// RAYS[direction][square] gives all squares in that direction from sq
/// (not including sq). Directions: 0=N, 1=NE, 2=E, 3=SE, 4=S, 5=SW, 6=W, 7=NW.
pub static RAYS: [[Bitboard; 64]; 8] = build_rays();

/// Directions whose rays grow toward higher square indices (first blocker
/// is the LSB of ray & occupied). The rest scan from the MSB side.
pub const POSITIVE_DIRS: [usize; 4] = [0, 1, 2, 7];
pub const NEGATIVE_DIRS: [usize; 4] = [3, 4, 5, 6];

const fn build_rays() -> [[Bitboard; 64]; 8] {
    // (rank step, file step) per direction index.
    const STEPS: [(i8, i8); 8] = [
        (1, 0),
        (1, 1),
        (0, 1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
        (0, -1),
        (1, -1),
    ];

    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut sq = 0usize;
    while sq < 64 {
        let mut dir = 0usize;
        while dir < 8 {
            let (dr, df) = STEPS[dir];
            let mut bb = 0u64;
            let mut r = (sq / 8) as i8 + dr;
            let mut f = (sq % 8) as i8 + df;
            while r >= 0 && r < 8 && f >= 0 && f < 8 {
                bb |= 1u64 << (r * 8 + f);
                r += dr;
                f += df;
            }
            rays[dir][sq] = Bitboard(bb);
            dir += 1;
        }
        sq += 1;
    }
    rays
}

/// Open squares strictly between two aligned squares (rank, file, or
/// diagonal), empty when the squares are not aligned or equal.
pub static BETWEEN: [[Bitboard; 64]; 64] = {
    let mut table = [[Bitboard::EMPTY; 64]; 64];
    let mut a = 0usize;
    while a < 64 {
        let mut b = 0usize;
        while b < 64 {
            if a != b {
                let ar = (a / 8) as i8;
                let af = (a % 8) as i8;
                let br = (b / 8) as i8;
                let bf = (b % 8) as i8;
                let dr = (br - ar).signum();
                let df = (bf - af).signum();
                let aligned = ar == br || af == bf || (br - ar).abs() == (bf - af).abs();
                if aligned {
                    let mut bb = 0u64;
                    let mut r = ar + dr;
                    let mut f = af + df;
                    while r != br || f != bf {
                        bb |= 1u64 << (r * 8 + f);
                        r += dr;
                        f += df;
                    }
                    table[a][b] = Bitboard(bb);
                }
            }
            b += 1;
        }
        a += 1;
    }
    table
};

/// Squares strictly between two aligned squares.
#[inline(always)]
pub fn between(a: u8, b: u8) -> Bitboard {
    BETWEEN[a as usize][b as usize]
}

// =============================================================================
// Sliding piece attacks (magic bitboards)
// =============================================================================

/// Shared magic lookup tables for both slider kinds. Built once on first
/// use and immutable afterwards; the magic search is seeded with a fixed
/// constant so the tables are identical on every run.
pub struct SliderTables {
    bishop: [Magic; 64],
    rook: [Magic; 64],
    attacks: Vec<Bitboard>,
}

static SLIDERS: LazyLock<SliderTables> = LazyLock::new(SliderTables::build);

impl SliderTables {
    fn build() -> SliderTables {
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        // 5248 bishop entries + 102400 rook entries with fixed per-square
        // shifts of 64 - popcount(mask).
        let mut attacks = Vec::with_capacity(5248 + 102400);
        let mut bishop = [Magic::default(); 64];
        let mut rook = [Magic::default(); 64];

        let mut sq = 0u8;
        while sq < 64 {
            bishop[sq as usize] = Self::build_square(sq, true, &mut attacks, &mut state);
            sq += 1;
        }
        let mut sq = 0u8;
        while sq < 64 {
            rook[sq as usize] = Self::build_square(sq, false, &mut attacks, &mut state);
            sq += 1;
        }

        SliderTables {
            bishop,
            rook,
            attacks,
        }
    }

    fn build_square(
        sq: u8,
        is_bishop: bool,
        attacks: &mut Vec<Bitboard>,
        state: &mut u64,
    ) -> Magic {
        let mask = if is_bishop {
            bishop_mask(sq)
        } else {
            rook_mask(sq)
        };
        let bits = mask.popcount();
        let size = 1usize << bits;

        let subsets: Vec<(Bitboard, Bitboard)> = (0..size)
            .map(|i| {
                let occ = blockers_from_index(i, mask);
                let att = if is_bishop {
                    bishop_attacks_slow(sq, occ)
                } else {
                    rook_attacks_slow(sq, occ)
                };
                (occ, att)
            })
            .collect();

        let mut fragment = vec![Bitboard::EMPTY; size];
        let magic = find_magic(mask, &subsets, &mut fragment, state);
        let offset = attacks.len();
        attacks.extend_from_slice(&fragment);

        Magic {
            mask,
            magic,
            shift: (64 - bits) as u8,
            offset,
        }
    }
}

/// Bishop attacks given a square and occupied squares.
#[inline(always)]
pub fn bishop_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    let t = &*SLIDERS;
    t.attacks[t.bishop[sq as usize].index(occupied)]
}

/// Rook attacks given a square and occupied squares.
#[inline(always)]
pub fn rook_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    let t = &*SLIDERS;
    t.attacks[t.rook[sq as usize].index(occupied)]
}

/// Queen attacks (union of bishop and rook attacks).
#[inline(always)]
pub fn queen_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
