//! Game rules for super tic-tac-toe.
//!
//! This module contains pure functions for evaluating board state.
//! Rules are separated from board storage so the engine, the invariants
//! and the search can all share them.

pub mod draw;
pub mod win;

pub use draw::{meta_outcome, sub_outcome};
pub use win::{check_meta_winner, check_winner, first_line, LINES};
