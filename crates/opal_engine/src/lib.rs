//! Engines that plug into the [`Engine`] trait from `opal_core`: the
//! alpha-beta searcher and a uniformly random mover useful as a baseline
//! and smoke-test opponent.

mod eval;
mod ordering;
mod search;
mod tt;

pub use eval::{PIECE_VALUES, evaluate};
pub use search::{INFINITY, MATE_SCORE, MAX_PLY, is_mate_score};
pub use tt::{NodeType, TTEntry, TranspositionTable};

use std::time::Duration;

use opal_core::{Board, Engine, SearchLimits, SearchResult, generate_moves};
use rand::seq::SliceRandom;

/// How `go` without explicit limits is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchType {
    /// Iterative deepening under a wall-clock budget.
    Iterative,
    /// A single fixed-depth search, mainly for reproducible runs.
    Fixed,
}

pub struct AlphaBetaEngine {
    tt: TranspositionTable,
    search_type: SearchType,
    search_time_ms: u64,
    fixed_depth: u8,
}

impl AlphaBetaEngine {
    pub const DEFAULT_TIME_MS: u64 = 1000;
    pub const DEFAULT_DEPTH: u8 = 4;

    pub fn new() -> Self {
        Self {
            tt: TranspositionTable::default(),
            search_type: SearchType::Iterative,
            search_time_ms: Self::DEFAULT_TIME_MS,
            fixed_depth: Self::DEFAULT_DEPTH,
        }
    }

    /// Limits matching the configured search type, for callers that do not
    /// bring their own.
    pub fn make_limits(&self) -> SearchLimits {
        match self.search_type {
            SearchType::Iterative => SearchLimits::time(Duration::from_millis(self.search_time_ms)),
            SearchType::Fixed => SearchLimits::depth(self.fixed_depth),
        }
    }
}

impl Default for AlphaBetaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for AlphaBetaEngine {
    fn search(&mut self, board: &mut Board, limits: SearchLimits) -> SearchResult {
        let mut result = search::run(board, &mut self.tt, &limits);

        // If even the first iteration was cancelled there is no move from a
        // completed depth; any legal move beats forfeiting on time.
        if result.best_move.is_none() {
            let (moves, _) = generate_moves(board);
            result.best_move = moves.choose(&mut rand::thread_rng()).copied();
        }
        result
    }

    fn name(&self) -> &str {
        "opal-alphabeta"
    }

    fn new_game(&mut self) {
        self.tt.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        match name.to_ascii_lowercase().as_str() {
            "searchtype" => match value.to_ascii_lowercase().as_str() {
                "iterative" => {
                    self.search_type = SearchType::Iterative;
                    true
                }
                "fixed" => {
                    self.search_type = SearchType::Fixed;
                    true
                }
                _ => false,
            },
            "searchtime" => match value.parse() {
                Ok(ms) => {
                    self.search_time_ms = ms;
                    true
                }
                Err(_) => false,
            },
            "searchdepth" => match value.parse() {
                Ok(depth) => {
                    self.fixed_depth = depth;
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}

/// Picks a uniformly random legal move.
#[derive(Default)]
pub struct RandomEngine;

impl Engine for RandomEngine {
    fn search(&mut self, board: &mut Board, _limits: SearchLimits) -> SearchResult {
        let (moves, _) = generate_moves(board);
        SearchResult {
            best_move: moves.choose(&mut rand::thread_rng()).copied(),
            score: 0,
            depth: 0,
            nodes: moves.len() as u64,
            stopped: false,
        }
    }

    fn name(&self) -> &str {
        "opal-random"
    }
}
