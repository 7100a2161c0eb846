//! Bot-versus-bot matches for measuring the tiers against each other.

use derive_getters::Getters;
use rand::Rng;
use supertac_ai::Bot;
use supertac_rules::{Game, MetaOutcome};
use tracing::{debug, instrument, warn};

/// Results over a series of matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct Tally {
    /// Matches won by X.
    x_wins: u32,
    /// Matches won by O.
    o_wins: u32,
    /// Drawn matches.
    draws: u32,
}

impl Tally {
    /// Counts one result.
    pub fn record(&mut self, outcome: MetaOutcome) {
        match outcome {
            MetaOutcome::X => self.x_wins += 1,
            MetaOutcome::O => self.o_wins += 1,
            MetaOutcome::Draw => self.draws += 1,
        }
    }

    /// Matches counted.
    pub fn games(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

impl std::fmt::Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} games: X won {}, O won {}, {} drawn",
            self.games(),
            self.x_wins,
            self.o_wins,
            self.draws
        )
    }
}

/// Plays one match to the end and returns it.
#[instrument(skip_all, fields(x = %x.difficulty(), o = %o.difficulty()))]
pub fn play_match(x: &Bot, o: &Bot, rng: &mut impl Rng) -> Game {
    let mut game = Game::new();
    while !game.board().is_over() {
        let bot = match game.board().current_player() {
            supertac_rules::Mark::X => x,
            supertac_rules::Mark::O => o,
        };
        let Some(mv) = bot.choose_move(game.board(), rng, None) else {
            warn!("Bot found no move in an open position");
            break;
        };
        if let Err(error) = game.make_move(mv) {
            warn!(%error, %mv, "Bot chose an illegal move");
            break;
        }
    }
    debug!(ply = game.ply(), result = ?game.board().meta_winner(), "Match complete");
    game
}

/// Plays `games` matches with `x` always moving first.
pub fn run(x: &Bot, o: &Bot, games: u32, rng: &mut impl Rng) -> Tally {
    let mut tally = Tally::default();
    for _ in 0..games {
        let game = play_match(x, o, rng);
        tally.record(game.board().meta_winner().unwrap_or(MetaOutcome::Draw));
    }
    tally
}
