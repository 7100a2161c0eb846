//! First-class action types for super tic-tac-toe.
//!
//! Moves are domain events, not side effects. They carry the player's
//! intent and can be validated independently of execution.

use crate::types::{Mark, Move};
use serde::{Deserialize, Serialize};

/// A move attributed to the mark that played it.
///
/// Played moves can be:
/// - Serialized for replay
/// - Logged for debugging
/// - Checked against a board by the invariants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayedMove {
    /// The mark placed.
    pub mark: Mark,
    /// Where it was placed.
    pub at: Move,
}

impl PlayedMove {
    /// Creates a new played move.
    pub fn new(mark: Mark, at: Move) -> Self {
        Self { mark, at }
    }
}

impl std::fmt::Display for PlayedMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.at)
    }
}

/// Reasons a move is rejected by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// Board or cell index outside 0-8.
    #[display("Position ({board}, {cell}) is out of range")]
    OutOfRange {
        /// Requested sub-board.
        board: usize,
        /// Requested cell.
        cell: usize,
    },

    /// The target cell already holds a mark.
    #[display("Cell {cell} of board {board} is already occupied")]
    CellOccupied {
        /// Requested sub-board.
        board: usize,
        /// Requested cell.
        cell: usize,
    },

    /// The target sub-board is already won or drawn.
    #[display("Board {_0} is already decided")]
    BoardDecided(#[error(not(source))] usize),

    /// The mover is confined to a different sub-board.
    #[display("Must play in board {required}, not board {attempted}")]
    WrongBoard {
        /// The active board.
        required: usize,
        /// The board the move targeted.
        attempted: usize,
    },

    /// The match is already decided.
    #[display("Game is already over")]
    GameOver,

    /// A postcondition failed after applying the move.
    #[display("Invariant violation: {_0}")]
    InvariantViolation(#[error(not(source))] String),
}
