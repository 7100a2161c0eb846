//! Line detection shared by sub-boards and the meta-board.
//!
//! The meta-board is a 3x3 board whose "cells" are sub-board outcomes, so
//! both levels are checked by the same table in the same order.

use crate::types::{Cell, Mark, SubBoard, SubOutcome, BOARD_CELLS};
use tracing::instrument;

/// The eight three-in-a-row lines, in evaluation order.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],             // Diagonals
];

/// Returns the owner of the first complete line, scanning [`LINES`] in order.
///
/// `owner` maps a square to the mark that claims it; squares mapping to
/// `None` never complete a line.
pub fn first_line<T: Copy>(squares: &[T; BOARD_CELLS], owner: impl Fn(T) -> Option<Mark>) -> Option<Mark> {
    LINES.iter().find_map(|&[a, b, c]| {
        let mark = owner(squares[a])?;
        (owner(squares[b]) == Some(mark) && owner(squares[c]) == Some(mark)).then_some(mark)
    })
}

/// Checks if a sub-board has three in a row.
#[instrument(level = "trace")]
pub fn check_winner(board: &SubBoard) -> Option<Mark> {
    first_line(board.cells(), Cell::mark)
}

/// Checks if the meta-board has three won sub-boards in a row.
///
/// Drawn sub-boards belong to nobody, so a line of draws is not a win.
#[instrument(level = "trace")]
pub fn check_meta_winner(sub_winners: &[SubOutcome; BOARD_CELLS]) -> Option<Mark> {
    first_line(sub_winners, SubOutcome::winner)
}
