//! Super tic-tac-toe rules - pure, deterministic game logic.
//!
//! Nine 3x3 sub-boards sit in a 3x3 meta-board. The cell a player takes
//! decides which sub-board the opponent must play in next.
//!
//! # Architecture
//!
//! - **Types**: [`MetaBoard`], [`SubBoard`], [`Cell`], [`Mark`] and the outcome enums
//! - **Rules**: line detection shared by both board levels
//! - **Engine**: [`apply_move`], [`legal_moves`], [`replay`]
//! - **Contracts / invariants**: pre- and postconditions checked around every move
//!
//! # Example
//!
//! ```
//! use supertac_rules::{MetaBoard, Move, Mark};
//!
//! let board = MetaBoard::new().play(Move::new(0, 4)).unwrap();
//! assert_eq!(board.active_board(), Some(4));
//! assert_eq!(board.current_player(), Mark::O);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod engine;
mod game;
mod types;

pub mod contracts;
pub mod invariants;
pub mod rules;

pub use action::{MoveError, PlayedMove};
pub use engine::{apply_move, legal_moves, replay};
pub use game::Game;
pub use types::{Cell, Mark, MetaBoard, MetaOutcome, Move, SubBoard, SubOutcome, BOARD_CELLS, CENTER};
