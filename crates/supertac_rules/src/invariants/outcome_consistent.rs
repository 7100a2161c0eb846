//! Outcome consistency: recorded results agree with the cells.

use super::Invariant;
use crate::rules::{meta_outcome, sub_outcome};
use crate::MetaBoard;

/// Invariant: every recorded outcome can be re-derived from the cells.
///
/// - each `sub_winners` entry equals the outcome computed from its cells
/// - `meta_winner` equals the outcome computed from `sub_winners`
/// - `is_over` is set exactly when `meta_winner` is
///
/// Because decided boards are frozen, the first clause also means a
/// decided board never gains a mark.
pub struct OutcomeConsistentInvariant;

impl Invariant<MetaBoard> for OutcomeConsistentInvariant {
    fn holds(board: &MetaBoard) -> bool {
        let subs_agree = board
            .boards()
            .iter()
            .zip(board.sub_winners())
            .all(|(cells, recorded)| sub_outcome(cells) == *recorded);

        subs_agree
            && board.meta_winner() == meta_outcome(board.sub_winners())
            && board.is_over() == board.meta_winner().is_some()
    }

    fn description() -> &'static str {
        "Recorded sub-board and match outcomes agree with the cells"
    }
}
