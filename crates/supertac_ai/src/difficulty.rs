//! Difficulty tiers for the computer opponent.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How hard the computer opponent plays.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random legal moves.
    Easy,
    /// Greedy one-ply tactics with occasional random blunders.
    #[default]
    Medium,
    /// Depth-limited alpha-beta search.
    Hard,
}

impl Difficulty {
    /// Parses a tier name, falling back to [`Difficulty::Medium`] for
    /// anything unrecognized.
    pub fn parse_or_default(name: &str) -> Self {
        Self::from_str(name.trim()).unwrap_or_default()
    }
}
