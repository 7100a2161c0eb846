//! Static evaluation of a meta-board, from O's point of view.
//!
//! Positive scores favour O, negative scores favour X.

use supertac_rules::rules::LINES;
use supertac_rules::{Mark, MetaBoard, MetaOutcome, SubBoard, SubOutcome};

/// Score of a match won by O (negated for X).
pub const WIN_SCORE: i32 = 1000;

/// Value of each sub-board won.
pub const SUB_BOARD_SCORE: i32 = 100;

/// Value of an open line holding two of the player's marks.
pub const TWO_IN_LINE: i32 = 10;

/// Value of an open line holding one of the player's marks.
pub const ONE_IN_LINE: i32 = 1;

/// Evaluates a board for the search.
///
/// Decided matches score `±WIN_SCORE` (draws 0). Otherwise every won
/// sub-board is worth `±SUB_BOARD_SCORE` and every open sub-board adds
/// O's line potential minus X's.
pub fn evaluate(board: &MetaBoard) -> i32 {
    if let Some(outcome) = board.meta_winner() {
        return match outcome {
            MetaOutcome::O => WIN_SCORE,
            MetaOutcome::X => -WIN_SCORE,
            MetaOutcome::Draw => 0,
        };
    }

    board
        .boards()
        .iter()
        .zip(board.sub_winners())
        .map(|(cells, outcome)| match outcome {
            SubOutcome::O => SUB_BOARD_SCORE,
            SubOutcome::X => -SUB_BOARD_SCORE,
            SubOutcome::Draw => 0,
            SubOutcome::Undecided => line_potential(cells, Mark::O) - line_potential(cells, Mark::X),
        })
        .sum()
}

/// Sums the open-line bonuses for `mark` on one sub-board.
///
/// Lines touched by the opponent are worth nothing.
pub fn line_potential(board: &SubBoard, mark: Mark) -> i32 {
    LINES
        .iter()
        .map(|line| {
            let (mut own, mut empty) = (0, 0);
            for &i in line {
                match board.cells()[i].mark() {
                    Some(m) if m == mark => own += 1,
                    Some(_) => return 0,
                    None => empty += 1,
                }
            }
            match (own, empty) {
                (2, 1) => TWO_IN_LINE,
                (1, 2) => ONE_IN_LINE,
                _ => 0,
            }
        })
        .sum()
}
