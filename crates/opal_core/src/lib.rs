pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod magic;
pub mod movegen;
pub mod perft;
pub mod time_control;
pub mod types;
pub mod uci;
pub mod zobrist;

// Re-export core game logic (not engine-specific)
pub use bitboard::Bitboard;
pub use board::{Board, FenError, START_FEN};
pub use movegen::{generate_captures, generate_moves, is_terminal};
pub use perft::{perft, perft_divide};
pub use time_control::{SearchLimits, TimeControl};
pub use types::*;
pub use uci::{move_to_uci, parse_move};
pub use zobrist::ZOBRIST;

// =============================================================================
// Engine trait — implemented by all engines that can pick a move
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best move found (None if no legal moves)
    pub best_move: Option<Move>,
    /// Evaluation score in centipawns from the side to move's perspective
    pub score: i32,
    /// Search depth reached
    pub depth: u8,
    /// Number of nodes searched
    pub nodes: u64,
    /// Whether search was stopped early due to time limit or cancellation
    pub stopped: bool,
}

/// Trait the protocol layer talks to, so search strategies stay swappable.
pub trait Engine: Send {
    /// Search the position within the given limits. The board is returned
    /// to its entry state before this call finishes.
    fn search(&mut self, board: &mut Board, limits: SearchLimits) -> SearchResult;

    /// Engine name for protocol identification
    fn name(&self) -> &str;

    /// Engine author for protocol identification
    fn author(&self) -> &str {
        "opal"
    }

    /// Reset internal state for a new game (hash tables, killers, etc.)
    fn new_game(&mut self) {}

    /// Set an engine option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> bool {
        false
    }
}
