//! Computer opponents for super tic-tac-toe.
//!
//! Three tiers share one entry point, [`Bot::choose_move`]:
//!
//! - **Easy**: uniformly random legal move
//! - **Medium**: one-ply greedy tactics, blundering at a configurable rate
//! - **Hard**: iterative-deepening alpha-beta over [`evaluate`], bounded by
//!   depth, a wall-clock budget and an optional cancel flag
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use supertac_ai::{Bot, Difficulty, SearchConfig};
//! use supertac_rules::MetaBoard;
//!
//! let bot = Bot::new(Difficulty::Hard, SearchConfig::default().with_depth(2));
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mv = bot.choose_move(&MetaBoard::new(), &mut rng, None);
//! assert!(mv.is_some());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bot;
mod config;
mod difficulty;
mod easy;
mod heuristic;
mod medium;
mod search;

pub use bot::Bot;
pub use config::{SearchConfig, DEFAULT_BLUNDER_RATE, DEFAULT_DEPTH, DEFAULT_TIME_BUDGET};
pub use difficulty::Difficulty;
pub use easy::random_move;
pub use heuristic::{evaluate, line_potential, ONE_IN_LINE, SUB_BOARD_SCORE, TWO_IN_LINE, WIN_SCORE};
pub use medium::greedy_move;
pub use search::{search, SearchReport};
