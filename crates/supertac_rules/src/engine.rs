//! The rule engine: pure transitions over [`MetaBoard`] values.

use crate::action::MoveError;
use crate::contracts::{Contract, MoveContract};
use crate::invariants::{InvariantSet, MetaBoardInvariants};
use crate::rules::{meta_outcome, sub_outcome};
use crate::types::{Mark, MetaBoard, Move, SubBoard, BOARD_CELLS};
use tracing::{instrument, trace};

/// Places `mark` at `mv` and returns the resulting board.
///
/// The input board is never modified. On success the sub-board outcome,
/// the match outcome, `is_over` and the active board are recomputed, and
/// the side to move becomes `mark`'s opponent.
///
/// `mark` is normally `board.current_player()`; the search passes the
/// other mark to explore what the opponent could do from this position.
///
/// Postconditions are checked in debug builds only.
#[instrument(level = "trace", skip(board))]
pub fn apply_move(board: &MetaBoard, mv: Move, mark: Mark) -> Result<MetaBoard, MoveError> {
    MoveContract::pre(board, &mv)?;

    let mut next = board.clone();
    next.boards[mv.board].place(mv.cell, mark);
    next.sub_winners[mv.board] = sub_outcome(&next.boards[mv.board]);
    next.meta_winner = meta_outcome(&next.sub_winners);
    next.is_over = next.meta_winner.is_some();
    next.active_board = (!next.sub_winners[mv.cell].is_decided()).then_some(mv.cell);
    next.current_player = mark.opponent();

    trace!(
        sub_outcome = ?next.sub_winners[mv.board],
        active = ?next.active_board,
        over = next.is_over,
        "Move applied"
    );

    #[cfg(debug_assertions)]
    MoveContract::post(board, &next)?;

    Ok(next)
}

/// Every legal move, ascending by board then cell.
///
/// Empty once the match is over.
pub fn legal_moves(board: &MetaBoard) -> Vec<Move> {
    if board.is_over() {
        return Vec::new();
    }
    let boards: Vec<usize> = match board.active_board() {
        Some(index) => vec![index],
        None => (0..BOARD_CELLS).collect(),
    };
    boards
        .into_iter()
        .filter(|&b| !board.sub_winners()[b].is_decided())
        .flat_map(|b| {
            (0..BOARD_CELLS)
                .filter(move |&c| board.boards()[b].is_empty(c))
                .map(move |c| Move::new(b, c))
        })
        .collect()
}

/// Replays moves from the initial board, each for the side to move.
///
/// The full invariant set, including mark alternation, is checked on the
/// final board.
#[instrument(skip(moves), fields(moves = moves.len()))]
pub fn replay(moves: &[Move]) -> Result<MetaBoard, MoveError> {
    let mut board = MetaBoard::new();
    for &mv in moves {
        board = board.play(mv)?;
    }
    MetaBoardInvariants::check_all(&board).map_err(|violations| {
        MoveError::InvariantViolation(
            violations
                .into_iter()
                .map(|v| v.description)
                .collect::<Vec<_>>()
                .join("; "),
        )
    })?;
    Ok(board)
}

impl MetaBoard {
    /// Sets up an arbitrary position from its cells.
    ///
    /// Outcomes are derived from the cells, and an active board that is
    /// out of range or already decided is normalized to `None`.
    pub fn from_position(boards: [SubBoard; BOARD_CELLS], current_player: Mark, active_board: Option<usize>) -> Self {
        let sub_winners = boards.map(|b| sub_outcome(&b));
        let meta_winner = meta_outcome(&sub_winners);
        Self {
            boards,
            sub_winners,
            active_board: active_board.filter(|&i| i < BOARD_CELLS && !sub_winners[i].is_decided()),
            current_player,
            is_over: meta_winner.is_some(),
            meta_winner,
        }
    }

    /// Applies `mv` for the side to move.
    pub fn play(&self, mv: Move) -> Result<MetaBoard, MoveError> {
        apply_move(self, mv, self.current_player)
    }

    /// Every legal move for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(self)
    }
}
