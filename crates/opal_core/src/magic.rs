//! Plain magic bitboards for sliding-piece attack lookup.
//!
//! Each square carries a relevant-occupancy mask, a magic multiplier, and a
//! shift; `((occupancy & mask) * magic) >> shift` indexes a precomputed
//! attack table. The multipliers are found once at table-build time by a
//! fixed-seed random search, with every candidate verified against
//! ray-cast reference attacks over all blocker subsets of the mask, so a
//! bad multiplier can never reach the lookup path.

use crate::bitboard::Bitboard;

/// Per-square lookup parameters for one slider kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct Magic {
    pub mask: Bitboard,
    pub magic: u64,
    pub shift: u8,
    pub offset: usize,
}

impl Magic {
    /// Table slot for the given occupancy.
    #[inline(always)]
    pub fn index(&self, occupied: Bitboard) -> usize {
        let relevant = occupied.0 & self.mask.0;
        self.offset + (relevant.wrapping_mul(self.magic) >> self.shift) as usize
    }
}

const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Relevant-occupancy mask for a bishop: its rays with the board edges
/// stripped, since an edge square never changes the reachable set.
pub fn bishop_mask(sq: u8) -> Bitboard {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut mask = 0u64;

    for (dr, df) in BISHOP_DIRS {
        let mut r = rank + dr;
        let mut f = file + df;
        while (1..7).contains(&r) && (1..7).contains(&f) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    Bitboard(mask)
}

/// Relevant-occupancy mask for a rook; edges are excluded per direction.
pub fn rook_mask(sq: u8) -> Bitboard {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut mask = 0u64;

    for (dr, df) in ROOK_DIRS {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            if (dr != 0 && r > 0 && r < 7) || (df != 0 && f > 0 && f < 7) {
                mask |= 1u64 << (r * 8 + f);
            }
            r += dr;
            f += df;
        }
    }
    Bitboard(mask)
}

fn ray_attacks(sq: u8, occupied: Bitboard, dirs: &[(i8, i8); 4]) -> Bitboard {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut attacks = 0u64;

    for &(dr, df) in dirs {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occupied.0 & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    Bitboard(attacks)
}

/// Reference bishop attacks by ray casting, stopping at the first blocker
/// (inclusive). Used to populate and verify the magic tables.
pub fn bishop_attacks_slow(sq: u8, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &BISHOP_DIRS)
}

/// Reference rook attacks by ray casting.
pub fn rook_attacks_slow(sq: u8, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &ROOK_DIRS)
}

/// Expand iteration index `index` into the `index`-th blocker subset of
/// `mask` (binary enumeration over the mask's set bits).
pub fn blockers_from_index(index: usize, mask: Bitboard) -> Bitboard {
    let mut occupancy = 0u64;
    let mut rest = mask;
    let mut i = 0;
    while let Some(sq) = rest.pop_lsb() {
        if index & (1 << i) != 0 {
            occupancy |= 1u64 << sq;
        }
        i += 1;
    }
    Bitboard(occupancy)
}

fn xorshift64(state: &mut u64) -> u64 {
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    *state
}

/// Sparse random candidate; magics with few high bits after multiplication
/// almost never work, so AND three draws together (standard trick).
fn candidate(state: &mut u64) -> u64 {
    xorshift64(state) & xorshift64(state) & xorshift64(state)
}

/// Try to fill an attack table fragment of size `1 << bits` with `magic`.
/// Fails on any destructive collision (two blocker subsets mapping to the
/// same slot with different attack sets).
fn try_magic(
    magic: u64,
    shift: u8,
    subsets: &[(Bitboard, Bitboard)],
    table: &mut [Bitboard],
) -> bool {
    table.fill(Bitboard::EMPTY);
    for &(occ, attacks) in subsets {
        let idx = (occ.0.wrapping_mul(magic) >> shift) as usize;
        if table[idx].is_empty() {
            table[idx] = attacks;
        } else if table[idx] != attacks {
            return false;
        }
    }
    true
}

/// Find a verified magic multiplier for one square and fill `table` with
/// its attack entries. Deterministic: the caller threads the PRNG state.
pub fn find_magic(
    mask: Bitboard,
    subsets: &[(Bitboard, Bitboard)],
    table: &mut [Bitboard],
    state: &mut u64,
) -> u64 {
    let bits = mask.popcount() as u8;
    let shift = 64 - bits;
    loop {
        let magic = candidate(state);
        // Quick rejection: the top byte of the mapped mask must be dense
        // enough to spread indices.
        if (mask.0.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }
        if try_magic(magic, shift, subsets, table) {
            return magic;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_exclude_edges() {
        // Rook on a1: mask is a2..a7 and b1..g1 (12 squares, no edges).
        assert_eq!(rook_mask(0).popcount(), 12);
        // Rook on e4 has 10 relevant squares.
        assert_eq!(rook_mask(28).popcount(), 10);
        // Bishop on e4 has 9 relevant squares.
        assert_eq!(bishop_mask(28).popcount(), 9);
        // Corner bishop: the long diagonal minus both ends.
        assert_eq!(bishop_mask(0).popcount(), 6);
    }

    #[test]
    fn test_blockers_from_index_enumerates_all_subsets() {
        let mask = bishop_mask(0);
        let n = 1usize << mask.popcount();
        let mut seen = std::collections::HashSet::new();
        for i in 0..n {
            let occ = blockers_from_index(i, mask);
            assert_eq!(occ.0 & !mask.0, 0, "subset must stay inside the mask");
            assert!(seen.insert(occ.0), "subsets must be distinct");
        }
        assert_eq!(seen.len(), n);
    }

    #[test]
    fn test_slow_attacks_stop_at_first_blocker() {
        // Rook on a1, blocker on a4: sees a2, a3, a4 but not a5.
        let occupied = Bitboard::from_square(24);
        let attacks = rook_attacks_slow(0, occupied);
        assert!(attacks.contains(8));
        assert!(attacks.contains(16));
        assert!(attacks.contains(24));
        assert!(!attacks.contains(32));
    }
}
