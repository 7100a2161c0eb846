//! Outcome derivation: wins first, then draws.

use super::win::{check_meta_winner, check_winner};
use crate::types::{MetaOutcome, SubBoard, SubOutcome, BOARD_CELLS};
use tracing::instrument;

/// Derives a sub-board's outcome from its cells.
///
/// A line wins; otherwise a full board is a draw.
#[instrument(level = "trace")]
pub fn sub_outcome(board: &SubBoard) -> SubOutcome {
    match check_winner(board) {
        Some(mark) => SubOutcome::from(mark),
        None if board.is_full() => SubOutcome::Draw,
        None => SubOutcome::Undecided,
    }
}

/// Derives the match outcome from the sub-board outcomes.
///
/// Returns `None` while the match is still open.
#[instrument(level = "trace")]
pub fn meta_outcome(sub_winners: &[SubOutcome; BOARD_CELLS]) -> Option<MetaOutcome> {
    if let Some(mark) = check_meta_winner(sub_winners) {
        return Some(MetaOutcome::from(mark));
    }
    sub_winners
        .iter()
        .all(|s| s.is_decided())
        .then_some(MetaOutcome::Draw)
}
