//! The computer opponent: a difficulty tier plus its tuning.

use crate::config::SearchConfig;
use crate::difficulty::Difficulty;
use crate::easy::random_move;
use crate::medium::greedy_move;
use crate::search::{search, SearchReport};
use derive_getters::Getters;
use rand::Rng;
use std::sync::atomic::AtomicBool;
use supertac_rules::{MetaBoard, Move};
use tracing::{debug, instrument};

/// A computer player.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Bot {
    difficulty: Difficulty,
    config: SearchConfig,
}

impl Bot {
    /// Creates a bot of the given tier.
    pub fn new(difficulty: Difficulty, config: SearchConfig) -> Self {
        Self { difficulty, config }
    }

    /// Chooses a move for the side to move on `board`.
    ///
    /// Returns `None` only when no legal move exists. The cancel flag is
    /// honoured by the hard tier; the other tiers finish instantly.
    #[instrument(skip(self, board, rng, cancel), fields(difficulty = %self.difficulty, player = %board.current_player()))]
    pub fn choose_move(&self, board: &MetaBoard, rng: &mut impl Rng, cancel: Option<&AtomicBool>) -> Option<Move> {
        let mv = match self.difficulty {
            Difficulty::Easy => random_move(board, rng),
            Difficulty::Medium => greedy_move(board, *self.config.blunder_rate(), rng),
            Difficulty::Hard => self.search(board, cancel).map(|report| *report.mv()),
        };
        debug!(?mv, "Bot chose move");
        mv
    }

    /// Runs the hard-tier search regardless of this bot's tier.
    pub fn search(&self, board: &MetaBoard, cancel: Option<&AtomicBool>) -> Option<SearchReport> {
        let report = search(board, &self.config, cancel)?;
        debug!(
            depth = report.depth_reached(),
            nodes = report.nodes(),
            score = report.score(),
            elapsed_ms = report.elapsed().as_millis() as u64,
            "Search finished"
        );
        Some(report)
    }
}

impl From<Difficulty> for Bot {
    fn from(difficulty: Difficulty) -> Self {
        Self::new(difficulty, SearchConfig::default())
    }
}
