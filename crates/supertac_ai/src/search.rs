//! Hard tier: iterative-deepening alpha-beta.
//!
//! Scores are always from O's point of view, so O maximises and X
//! minimises. Each iteration is a complete depth-bounded search; an
//! iteration interrupted by the deadline or the cancel flag is thrown
//! away and the previous iteration's answer stands.

use crate::config::SearchConfig;
use crate::heuristic::{evaluate, WIN_SCORE};
use derive_getters::Getters;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use supertac_rules::{Mark, MetaBoard, Move};
use tracing::{debug, instrument};

/// How often, in visited nodes, the clock and cancel flag are polled.
const POLL_INTERVAL: u64 = 1024;

/// Outcome of a hard-tier search.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct SearchReport {
    /// Chosen move.
    mv: Move,
    /// Score of the chosen move, positive favouring O.
    score: i32,
    /// Deepest fully completed iteration (0 if none completed).
    depth_reached: u8,
    /// Nodes visited across all iterations.
    nodes: u64,
    /// Wall-clock time spent.
    elapsed: Duration,
}

/// Marker for an iteration cut short.
struct Aborted;

struct Searcher<'a> {
    deadline: Option<Instant>,
    cancel: Option<&'a AtomicBool>,
    nodes: u64,
}

impl Searcher<'_> {
    fn should_stop(&self) -> bool {
        if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return true;
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn visit(&mut self) -> Result<(), Aborted> {
        self.nodes += 1;
        if self.nodes % POLL_INTERVAL == 0 && self.should_stop() {
            return Err(Aborted);
        }
        Ok(())
    }

    /// Best move and score at the root for one fixed depth.
    fn root(&mut self, board: &MetaBoard, moves: &[Move], depth: u8) -> Result<(Move, i32), Aborted> {
        let maximizing = board.current_player() == Mark::O;
        let (mut alpha, mut beta) = (i32::MIN, i32::MAX);
        let mut best: Option<(Move, i32)> = None;

        for &mv in moves {
            let Ok(child) = board.play(mv) else { continue };
            let score = self.alpha_beta(&child, depth - 1, alpha, beta)?;
            let better = match best {
                None => true,
                Some((_, s)) if maximizing => score > s,
                Some((_, s)) => score < s,
            };
            if better {
                best = Some((mv, score));
            }
            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
        }
        // Legal moves never fail to apply.
        Ok(best.unwrap_or((moves[0], evaluate(board))))
    }

    fn alpha_beta(&mut self, board: &MetaBoard, depth: u8, mut alpha: i32, mut beta: i32) -> Result<i32, Aborted> {
        self.visit()?;
        if depth == 0 || board.is_over() {
            return Ok(evaluate(board));
        }

        let maximizing = board.current_player() == Mark::O;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for mv in board.legal_moves() {
            let Ok(child) = board.play(mv) else { continue };
            let score = self.alpha_beta(&child, depth - 1, alpha, beta)?;
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }
        Ok(best)
    }
}

/// Searches `board` for the side to move.
///
/// Returns `None` only when there is no legal move.
#[instrument(level = "debug", skip(board, config, cancel), fields(depth = config.depth()))]
pub fn search(board: &MetaBoard, config: &SearchConfig, cancel: Option<&AtomicBool>) -> Option<SearchReport> {
    let moves = board.legal_moves();
    let first = *moves.first()?;
    let started = Instant::now();

    let mut searcher = Searcher {
        deadline: config.time_budget().map(|budget| started + budget),
        cancel,
        nodes: 0,
    };
    let mut report = SearchReport {
        mv: first,
        score: evaluate(board),
        depth_reached: 0,
        nodes: 0,
        elapsed: Duration::ZERO,
    };

    for depth in 1..=(*config.depth()).max(1) {
        if depth > 1 && searcher.should_stop() {
            break;
        }
        match searcher.root(board, &moves, depth) {
            Ok((mv, score)) => {
                report.mv = mv;
                report.score = score;
                report.depth_reached = depth;
                debug!(depth, %mv, score, nodes = searcher.nodes, "Iteration complete");
                if score.abs() >= WIN_SCORE {
                    break;
                }
            }
            Err(Aborted) => {
                debug!(depth, nodes = searcher.nodes, "Iteration aborted");
                break;
            }
        }
    }

    report.nodes = searcher.nodes;
    report.elapsed = started.elapsed();
    Some(report)
}
