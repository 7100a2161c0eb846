//! Easy tier: a uniformly random legal move.

use rand::Rng;
use rand::seq::IndexedRandom;
use supertac_rules::{MetaBoard, Move};

/// Picks any legal move with equal probability.
pub fn random_move(board: &MetaBoard, rng: &mut impl Rng) -> Option<Move> {
    board.legal_moves().choose(rng).copied()
}
