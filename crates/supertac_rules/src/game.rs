//! A match in progress: the board plus the moves that produced it.

use crate::action::{MoveError, PlayedMove};
use crate::engine::apply_move;
use crate::types::{MetaBoard, Move};
use tracing::{debug, instrument};

/// Super tic-tac-toe game: current board and move history.
///
/// The board is replaced wholesale on every accepted move, so a rejected
/// move leaves the game exactly as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Game {
    board: MetaBoard,
    history: Vec<PlayedMove>,
}

impl Game {
    /// Creates a new game with X to move.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current board.
    pub fn board(&self) -> &MetaBoard {
        &self.board
    }

    /// Returns the move history.
    pub fn history(&self) -> &[PlayedMove] {
        &self.history
    }

    /// Number of moves played so far.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Plays `mv` for the side to move.
    #[instrument(skip(self), fields(ply = self.history.len()))]
    pub fn make_move(&mut self, mv: Move) -> Result<&MetaBoard, MoveError> {
        let mark = self.board.current_player();
        self.board = apply_move(&self.board, mv, mark)?;
        self.history.push(PlayedMove::new(mark, mv));
        debug!(%mark, %mv, over = self.board.is_over(), "Move recorded");
        Ok(&self.board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{replay, Mark, MoveError};

    #[test]
    fn test_alternating_players() {
        let mut game = Game::new();
        assert_eq!(game.board().current_player(), Mark::X);
        game.make_move(Move::new(4, 4)).expect("legal");
        assert_eq!(game.board().current_player(), Mark::O);
        assert_eq!(game.history()[0], PlayedMove::new(Mark::X, Move::new(4, 4)));
    }

    #[test]
    fn test_rejected_move_leaves_game_untouched() {
        let mut game = Game::new();
        game.make_move(Move::new(4, 4)).expect("legal");
        let before = game.clone();

        let err = game.make_move(Move::new(4, 4)).unwrap_err();
        assert_eq!(err, MoveError::CellOccupied { board: 4, cell: 4 });
        assert_eq!(game, before);
    }

    #[test]
    fn test_history_replays_to_same_board() {
        let mut game = Game::new();
        for mv in [Move::new(0, 4), Move::new(4, 0), Move::new(0, 8), Move::new(8, 0)] {
            game.make_move(mv).expect("legal");
        }
        let moves: Vec<Move> = game.history().iter().map(|p| p.at).collect();
        assert_eq!(&replay(&moves).expect("legal"), game.board());
        assert_eq!(game.ply(), 4);
    }
}
