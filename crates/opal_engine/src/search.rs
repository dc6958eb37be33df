//! Iterative-deepening negamax with alpha-beta pruning.
//!
//! The searcher is fail-hard: returned scores never leave the (alpha, beta)
//! window, which keeps results reproducible and makes the pruned search
//! agree exactly with plain minimax at the root. Leaves drop into a
//! captures-only quiescence search so the evaluation is never taken in the
//! middle of an exchange.
//!
//! Mate scores are biased by ply so a nearer mate wins, draws score zero,
//! and a cancelled iteration is thrown away whole: the reported move always
//! comes from the last fully completed depth.

use opal_core::{
    Board, Move, SearchLimits, SearchResult, generate_captures, generate_moves,
};

use crate::eval::evaluate;
use crate::ordering::order_moves;
use crate::tt::{NodeType, TTEntry, TranspositionTable};

pub const MATE_SCORE: i32 = 100_000;
pub const INFINITY: i32 = 1_000_000;
pub const MAX_PLY: usize = 128;

/// Cap on check extensions per line so a perpetual cannot blow the stack.
const MAX_EXTENSIONS: u8 = 16;

/// Score at which a mate is certain somewhere in the line.
#[inline(always)]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_SCORE - MAX_PLY as i32
}

/// One search session: owns the killer slots and the line of hashes walked
/// so far (seeded with the game history, so repetitions across the
/// game/search boundary are seen).
struct Searcher<'a> {
    tt: &'a mut TranspositionTable,
    limits: &'a SearchLimits,
    killers: [[Option<Move>; 2]; MAX_PLY],
    line: Vec<u64>,
    nodes: u64,
    aborted: bool,
}

impl<'a> Searcher<'a> {
    fn new(tt: &'a mut TranspositionTable, limits: &'a SearchLimits, board: &Board) -> Self {
        Searcher {
            tt,
            limits,
            killers: [[None; 2]; MAX_PLY],
            line: board.repetition.clone(),
            nodes: 0,
            aborted: false,
        }
    }

    /// Search all root moves at the given depth with a full window.
    /// Returns the partial best on abort; the driver discards it.
    fn search_root(&mut self, board: &mut Board, depth: u8) -> (Option<Move>, i32) {
        let (mut moves, in_check) = generate_moves(board);
        if moves.is_empty() {
            return (None, if in_check { -MATE_SCORE } else { 0 });
        }

        let tt_move = self.probe_move(board.hash);
        order_moves(&mut moves, board, tt_move, &self.killers[0]);

        let mut alpha = -INFINITY;
        let mut best = moves[0];
        for mv in moves {
            board.make_move(mv, true);
            self.line.push(board.hash);
            let score = -self.negamax(board, depth - 1, 1, -INFINITY, -alpha, 0);
            self.line.pop();
            board.unmake_move(mv, true);

            if self.aborted {
                return (Some(best), alpha);
            }
            if score > alpha {
                alpha = score;
                best = mv;
            }
        }

        self.tt.store(TTEntry {
            key: board.hash,
            best_move: best,
            score: alpha,
            depth,
            node_type: NodeType::Exact,
        });
        (Some(best), alpha)
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        depth: u8,
        ply: usize,
        mut alpha: i32,
        beta: i32,
        extensions: u8,
    ) -> i32 {
        self.nodes += 1;
        if self.limits.time_control.should_check_time(self.nodes)
            && self.limits.time_control.check_time()
        {
            self.aborted = true;
        }
        if self.aborted {
            return alpha;
        }

        if self.is_draw(board) {
            return 0;
        }
        if ply >= MAX_PLY - 1 {
            return evaluate(board);
        }
        if depth == 0 {
            return self.quiescence(board, ply, alpha, beta);
        }

        let (mut moves, in_check) = generate_moves(board);
        if moves.is_empty() {
            // Mate scores count plies from the root so shorter mates score
            // higher up the tree.
            return if in_check { -MATE_SCORE + ply as i32 } else { 0 };
        }

        let tt_move = self.probe_move(board.hash);
        order_moves(&mut moves, board, tt_move, &self.killers[ply]);

        // Extend forcing lines a little so a mate just past the horizon is
        // still seen, bounded to keep the tree finite.
        let extend = in_check && extensions < MAX_EXTENSIONS;
        let child_depth = depth - 1 + extend as u8;
        let child_extensions = extensions + extend as u8;

        let mut best_move = Move::NULL;
        let mut node_type = NodeType::UpperBound;
        for mv in moves {
            board.make_move(mv, true);
            self.line.push(board.hash);
            let score = -self.negamax(board, child_depth, ply + 1, -beta, -alpha, child_extensions);
            self.line.pop();
            board.unmake_move(mv, true);

            if self.aborted {
                return alpha;
            }
            if score >= beta {
                if !mv.is_capture() {
                    self.store_killer(ply, mv);
                }
                self.tt.store(TTEntry {
                    key: board.hash,
                    best_move: mv,
                    score: beta,
                    depth,
                    node_type: NodeType::LowerBound,
                });
                return beta;
            }
            if score > alpha {
                alpha = score;
                best_move = mv;
                node_type = NodeType::Exact;
            }
        }

        self.tt.store(TTEntry {
            key: board.hash,
            best_move,
            score: alpha,
            depth,
            node_type,
        });
        alpha
    }

    /// Captures-only search below the horizon. The side to move may always
    /// "stand pat" on the static evaluation, so only exchanges that improve
    /// it are pursued.
    fn quiescence(&mut self, board: &mut Board, ply: usize, mut alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;
        if self.limits.time_control.should_check_time(self.nodes)
            && self.limits.time_control.check_time()
        {
            self.aborted = true;
        }
        if self.aborted {
            return alpha;
        }

        let stand_pat = evaluate(board);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
        if ply >= MAX_PLY - 1 {
            return alpha;
        }

        let (mut captures, _) = generate_captures(board);
        order_moves(&mut captures, board, None, &[None, None]);

        for mv in captures {
            board.make_move(mv, true);
            let score = -self.quiescence(board, ply + 1, -beta, -alpha);
            board.unmake_move(mv, true);

            if self.aborted {
                return alpha;
            }
            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    fn probe_move(&self, hash: u64) -> Option<Move> {
        self.tt
            .probe(hash)
            .map(|e| e.best_move)
            .filter(|m| !m.is_null())
    }

    fn store_killer(&mut self, ply: usize, mv: Move) {
        if self.killers[ply][0] != Some(mv) {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = Some(mv);
        }
    }

    /// Fifty-move rule, insufficient material, or the third occurrence of
    /// this position anywhere on the game-plus-search line.
    fn is_draw(&self, board: &Board) -> bool {
        if board.is_fifty_move_draw() || board.is_insufficient_material() {
            return true;
        }
        self.line.iter().filter(|&&h| h == board.hash).count() >= 3
    }
}

/// Iterative-deepening driver. Each depth restarts from scratch with the
/// previous iteration's hash move leading the ordering; when the clock runs
/// out mid-iteration, that depth's partial result is discarded.
pub(crate) fn run(
    board: &mut Board,
    tt: &mut TranspositionTable,
    limits: &SearchLimits,
) -> SearchResult {
    // The caller may have started the clock already (and possibly stopped
    // it again); restarting here would clear that cancellation.
    if !limits.time_control.is_running() {
        limits.start();
    }

    let mut searcher = Searcher::new(tt, limits, board);
    let mut result = SearchResult {
        best_move: None,
        score: 0,
        depth: 0,
        nodes: 0,
        stopped: false,
    };

    let max_depth = limits.depth.clamp(1, MAX_PLY as u8 - 1);
    for depth in 1..=max_depth {
        let (best, score) = searcher.search_root(board, depth);
        if searcher.aborted {
            result.stopped = true;
            break;
        }

        result.best_move = best;
        result.score = score;
        result.depth = depth;

        if best.is_none() {
            break;
        }
        // A forced mate found at this depth cannot improve.
        if is_mate_score(score) {
            break;
        }
        if limits.should_stop() {
            result.stopped = true;
            break;
        }
    }

    result.nodes = searcher.nodes;
    result
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
