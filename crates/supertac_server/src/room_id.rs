//! Room and player identifiers.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of a generated room id.
pub const ROOM_ID_LEN: usize = 10;

/// Characters a generated id is drawn from.
pub const ROOM_ID_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Opaque identifier of a connected player (one per connection).
pub type PlayerId = String;

/// Unique identifier of a room.
///
/// Ids arriving from clients are not validated; an unknown id simply
/// matches no room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Draws a fresh random id.
    pub fn generate(rng: &mut impl Rng) -> Self {
        Self(random_token(rng))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Draws a fresh player id for a new connection.
pub fn new_player_id(rng: &mut impl Rng) -> PlayerId {
    format!("player-{}", random_token(rng))
}

/// Id of the computer player seated in a bot room.
pub fn bot_player_id(room: &RoomId) -> PlayerId {
    format!("bot-{room}")
}

fn random_token(rng: &mut impl Rng) -> String {
    let alphabet = ROOM_ID_ALPHABET.as_bytes();
    (0..ROOM_ID_LEN)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}
