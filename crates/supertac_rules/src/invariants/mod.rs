//! First-class invariants for the meta-board.
//!
//! Invariants are logical properties that must hold after every move.
//! They are testable independently and double as documentation of what
//! the engine guarantees.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        collect::<S, I3>(state, &mut violations);
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

pub mod active_board;
pub mod mark_balance;
pub mod outcome_consistent;

pub use active_board::ActiveBoardInvariant;
pub use mark_balance::MarkBalanceInvariant;
pub use outcome_consistent::OutcomeConsistentInvariant;

/// All meta-board invariants as a composable set.
pub type MetaBoardInvariants = (
    ActiveBoardInvariant,
    OutcomeConsistentInvariant,
    MarkBalanceInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{replay, MetaBoard, Move};

    #[test]
    fn test_invariant_set_holds_for_new_board() {
        assert!(MetaBoardInvariants::check_all(&MetaBoard::new()).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let board = replay(&[Move::new(4, 4), Move::new(4, 0), Move::new(0, 8)])
            .expect("legal sequence");
        assert!(MetaBoardInvariants::check_all(&board).is_ok());
    }

    #[test]
    fn test_invariant_set_detects_violations() {
        let mut board = MetaBoard::new();
        // Two X marks and no O: unbalanced.
        board.boards[0].place(0, crate::Mark::X);
        board.boards[0].place(1, crate::Mark::X);

        let violations = MetaBoardInvariants::check_all(&board).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].description, MarkBalanceInvariant::description());
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (ActiveBoardInvariant, OutcomeConsistentInvariant);
        assert!(TwoInvariants::check_all(&MetaBoard::new()).is_ok());
    }
}
