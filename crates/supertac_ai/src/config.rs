//! Search tuning knobs.

use derive_getters::Getters;
use derive_setters::Setters;
use std::time::Duration;

/// Default search depth in plies, counting the move being chosen.
pub const DEFAULT_DEPTH: u8 = 6;

/// Default wall-clock budget for one hard-tier decision.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_millis(1500);

/// Default probability that the medium tier plays a random move.
pub const DEFAULT_BLUNDER_RATE: f64 = 0.3;

/// Tuning for the computer opponent.
#[derive(Debug, Clone, PartialEq, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct SearchConfig {
    /// Maximum plies searched by the hard tier (at least 1).
    depth: u8,
    /// Wall-clock cutoff for the hard tier; `None` searches to full depth.
    time_budget: Option<Duration>,
    /// Chance in `[0, 1]` that the medium tier delegates to the easy tier.
    blunder_rate: f64,
}

impl SearchConfig {
    /// Creates a configuration, clamping out-of-range values.
    pub fn new(depth: u8, time_budget: Option<Duration>, blunder_rate: f64) -> Self {
        Self {
            depth: depth.max(1),
            time_budget,
            blunder_rate: if blunder_rate.is_finite() { blunder_rate.clamp(0.0, 1.0) } else { DEFAULT_BLUNDER_RATE },
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH, Some(DEFAULT_TIME_BUDGET), DEFAULT_BLUNDER_RATE)
    }
}
