//! Mark balance invariant: players alternate, X first.

use super::Invariant;
use crate::{Mark, MetaBoard};

/// Invariant: X has played as often as O, or exactly once more, and the
/// side to move matches.
///
/// Only holds for boards reached by alternating play from the initial
/// position; search simulations that place an opponent mark out of turn
/// are not checked against it.
pub struct MarkBalanceInvariant;

impl Invariant<MetaBoard> for MarkBalanceInvariant {
    fn holds(board: &MetaBoard) -> bool {
        let x = board.count_of(Mark::X);
        let o = board.count_of(Mark::O);
        match board.current_player() {
            Mark::X => x == o,
            Mark::O => x == o + 1,
        }
    }

    fn description() -> &'static str {
        "Marks alternate starting with X"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Move;

    #[test]
    fn test_new_board_holds() {
        assert!(MarkBalanceInvariant::holds(&MetaBoard::new()));
    }

    #[test]
    fn test_holds_after_each_move() {
        let mut board = MetaBoard::new();
        for mv in [Move::new(4, 4), Move::new(4, 8), Move::new(8, 4)] {
            board = board.play(mv).expect("legal");
            assert!(MarkBalanceInvariant::holds(&board));
        }
    }

    #[test]
    fn test_out_of_turn_mark_violates() {
        let board = MetaBoard::new()
            .play(Move::new(4, 4))
            .expect("legal");
        // X plays again instead of O.
        let board = crate::apply_move(&board, Move::new(4, 0), Mark::X).expect("rules allow it");
        assert!(!MarkBalanceInvariant::holds(&board));
    }
}
