//! Active board invariant: the mover is never sent to a closed board.

use super::Invariant;
use crate::MetaBoard;

/// Invariant: `active_board` is either unconstrained or names an open board.
///
/// A decided sub-board can never be the forced target; the engine
/// normalizes such a target to "any board".
pub struct ActiveBoardInvariant;

impl Invariant<MetaBoard> for ActiveBoardInvariant {
    fn holds(board: &MetaBoard) -> bool {
        match board.active_board() {
            None => true,
            Some(index) => board
                .sub_winners()
                .get(index)
                .is_some_and(|outcome| !outcome.is_decided()),
        }
    }

    fn description() -> &'static str {
        "Active board is None or an undecided sub-board"
    }
}
