//! Contract-based validation for moves.
//!
//! Contracts define correctness through preconditions and postconditions,
//! Hoare style: {P} action {Q}.

use crate::action::MoveError;
use crate::invariants::{ActiveBoardInvariant, InvariantSet, OutcomeConsistentInvariant};
use crate::types::{Move, BOARD_CELLS};
use crate::MetaBoard;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: both indices are within 0-8.
pub struct InRange;

impl InRange {
    /// Rejects coordinates outside the board.
    pub fn check(mv: &Move) -> Result<(), MoveError> {
        if mv.board >= BOARD_CELLS || mv.cell >= BOARD_CELLS {
            return Err(MoveError::OutOfRange {
                board: mv.board,
                cell: mv.cell,
            });
        }
        Ok(())
    }
}

/// Precondition: the match is still open.
pub struct MatchOpen;

impl MatchOpen {
    /// Rejects any move once the match is decided.
    pub fn check(board: &MetaBoard) -> Result<(), MoveError> {
        if board.is_over() {
            return Err(MoveError::GameOver);
        }
        Ok(())
    }
}

/// Precondition: the target cell is empty.
pub struct CellIsEmpty;

impl CellIsEmpty {
    /// Rejects occupied cells.
    pub fn check(mv: &Move, board: &MetaBoard) -> Result<(), MoveError> {
        if board.boards()[mv.board].is_empty(mv.cell) {
            Ok(())
        } else {
            Err(MoveError::CellOccupied {
                board: mv.board,
                cell: mv.cell,
            })
        }
    }
}

/// Precondition: the target sub-board is undecided.
pub struct BoardIsOpen;

impl BoardIsOpen {
    /// Rejects won or drawn sub-boards.
    pub fn check(mv: &Move, board: &MetaBoard) -> Result<(), MoveError> {
        if board.sub_winners()[mv.board].is_decided() {
            return Err(MoveError::BoardDecided(mv.board));
        }
        Ok(())
    }
}

/// Precondition: the move respects the active board, if one is set.
pub struct RespectsActiveBoard;

impl RespectsActiveBoard {
    /// Rejects moves outside the forced sub-board.
    pub fn check(mv: &Move, board: &MetaBoard) -> Result<(), MoveError> {
        match board.active_board() {
            Some(required) if required != mv.board => Err(MoveError::WrongBoard {
                required,
                attempted: mv.board,
            }),
            _ => Ok(()),
        }
    }
}

/// Composite precondition: every rule a move must satisfy.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    ///
    /// Checks run in a fixed order, so a move breaking several rules
    /// always reports the same one.
    #[instrument(level = "trace", skip(board))]
    pub fn check(mv: &Move, board: &MetaBoard) -> Result<(), MoveError> {
        InRange::check(mv)?;
        MatchOpen::check(board)?;
        CellIsEmpty::check(mv, board)?;
        BoardIsOpen::check(mv, board)?;
        RespectsActiveBoard::check(mv, board)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Invariants re-checked after every move.
pub type MoveInvariants = (ActiveBoardInvariant, OutcomeConsistentInvariant);

/// Contract for move actions.
///
/// Preconditions:
/// - Coordinates in range, match open
/// - Cell empty, sub-board undecided, active board respected
///
/// Postconditions:
/// - Exactly one cell went from empty to occupied, none changed otherwise
/// - Active board and recorded outcomes are consistent
pub struct MoveContract;

impl Contract<MetaBoard, Move> for MoveContract {
    fn pre(board: &MetaBoard, action: &Move) -> Result<(), MoveError> {
        LegalMove::check(action, board)
    }

    fn post(before: &MetaBoard, after: &MetaBoard) -> Result<(), MoveError> {
        let monotonic = before
            .boards()
            .iter()
            .zip(after.boards())
            .flat_map(|(b, a)| b.cells().iter().zip(a.cells()))
            .all(|(was, now)| was.mark().is_none() || was == now);
        if !monotonic || after.filled_cells() != before.filled_cells() + 1 {
            warn!(
                before = before.filled_cells(),
                after = after.filled_cells(),
                "Board monotonicity violated"
            );
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: exactly one empty cell must be filled".to_string(),
            ));
        }

        MoveInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}
