//! Medium tier: one-ply greedy tactics with occasional blunders.
//!
//! Priorities, each scanned over every legal move before falling through:
//! win the match, block a match win, win a sub-board, block a sub-board
//! win, take a center cell, anything.

use crate::easy::random_move;
use rand::Rng;
use rand::seq::IndexedRandom;
use supertac_rules::{apply_move, Mark, MetaBoard, Move, CENTER};
use tracing::trace;

/// Picks a move for the side to move.
///
/// With probability `blunder_rate` the choice is handed to the easy tier.
pub fn greedy_move(board: &MetaBoard, blunder_rate: f64, rng: &mut impl Rng) -> Option<Move> {
    let moves = board.legal_moves();
    if moves.is_empty() {
        return None;
    }
    if rng.random::<f64>() < blunder_rate {
        trace!("Medium tier blundering");
        return random_move(board, rng);
    }

    let me = board.current_player();
    let them = me.opponent();

    let tactic = find(board, &moves, me, wins_match)
        .or_else(|| find(board, &moves, them, wins_match))
        .or_else(|| find(board, &moves, me, wins_sub_board))
        .or_else(|| find(board, &moves, them, wins_sub_board));
    if let Some(mv) = tactic {
        return Some(mv);
    }

    let centers: Vec<Move> = moves.iter().copied().filter(|m| m.cell == CENTER).collect();
    centers.choose(rng).or_else(|| moves.choose(rng)).copied()
}

/// First move that, played by `mark`, satisfies `goal`.
fn find(
    board: &MetaBoard,
    moves: &[Move],
    mark: Mark,
    goal: fn(&MetaBoard, Move, Mark) -> bool,
) -> Option<Move> {
    moves.iter().copied().find(|&mv| {
        apply_move(board, mv, mark)
            .map(|next| goal(&next, mv, mark))
            .unwrap_or(false)
    })
}

fn wins_match(after: &MetaBoard, _mv: Move, mark: Mark) -> bool {
    after.meta_winner().and_then(|m| m.winner()) == Some(mark)
}

fn wins_sub_board(after: &MetaBoard, mv: Move, mark: Mark) -> bool {
    after.sub_winners()[mv.board].winner() == Some(mark)
}
