//! Transposition table: fixed-size cache of search results keyed by the
//! position's zobrist hash.
//!
//! The search currently consumes only the stored best move, as an ordering
//! hint; depth, score, and node type are recorded so entries carry enough
//! context for score reuse later.

use std::mem;

use opal_core::Move;

/// How the stored score relates to the true value at that node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum NodeType {
    Exact,
    /// Fail-high: the score is a lower bound.
    LowerBound,
    /// Fail-low: the score is an upper bound.
    UpperBound,
}

#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    pub key: u64,
    pub best_move: Move,
    pub score: i32,
    pub depth: u8,
    pub node_type: NodeType,
}

impl Default for TTEntry {
    fn default() -> Self {
        TTEntry {
            key: 0,
            best_move: Move::NULL,
            score: 0,
            depth: 0,
            node_type: NodeType::Exact,
        }
    }
}

pub struct TranspositionTable {
    entries: Vec<TTEntry>,
}

impl TranspositionTable {
    pub const DEFAULT_SIZE_MB: usize = 64;

    pub fn new(size_mb: usize) -> Self {
        let entry_size = mem::size_of::<TTEntry>();
        let num_entries = (size_mb * 1024 * 1024 / entry_size).max(1);
        Self {
            entries: vec![TTEntry::default(); num_entries],
        }
    }

    /// Look up a position. The stored key is validated, so an index
    /// collision can never surface a foreign entry.
    pub fn probe(&self, key: u64) -> Option<&TTEntry> {
        let index = (key as usize) % self.entries.len();
        let entry = &self.entries[index];
        // Empty slots keep key 0; a real position hashing to 0 would just
        // miss, which is harmless.
        if entry.key == key { Some(entry) } else { None }
    }

    /// Always-replace store.
    pub fn store(&mut self, entry: TTEntry) {
        let index = (entry.key as usize) % self.entries.len();
        self.entries[index] = entry;
    }

    /// Wipe all entries, e.g. on `ucinewgame`.
    pub fn clear(&mut self) {
        self.entries.fill(TTEntry::default());
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE_MB)
    }
}
