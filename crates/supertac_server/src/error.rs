//! Error types for room coordination and configuration.

use crate::protocol::ServerEvent;
use derive_more::{Display, Error, From};
use supertac_rules::MoveError;
use tracing::instrument;

/// Why a room operation was refused.
///
/// Every variant is an expected, recoverable condition reported only to
/// the player who asked. The display text is what the client sees.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum RoomError {
    /// The rule engine rejected the move.
    #[display("Invalid move: {_0}")]
    #[from]
    IllegalMove(MoveError),

    /// The mover does not hold the turn.
    #[display("Not your turn")]
    NotYourTurn,

    /// No room with that id exists (or it has already closed).
    #[display("Room not found")]
    RoomNotFound,

    /// The room already has two players.
    #[display("Room is full")]
    RoomFull,

    /// Matchmaking found no room waiting for an opponent.
    #[display("No available rooms")]
    NoRoomAvailable,

    /// The requester is not seated in the room.
    #[display("Player not in room")]
    PlayerNotInRoom,
}

impl RoomError {
    /// The outbound event that reports this error to the requester.
    pub fn event(&self) -> ServerEvent {
        let message = self.to_string();
        match self {
            RoomError::IllegalMove(_) | RoomError::NotYourTurn | RoomError::PlayerNotInRoom => {
                ServerEvent::MoveError { message }
            }
            RoomError::RoomNotFound | RoomError::RoomFull | RoomError::NoRoomAvailable => {
                ServerEvent::RoomError { message }
            }
        }
    }

    /// The event that reports this error as the answer to a `makeMove`.
    ///
    /// A mover always hears back through `moveError`, whatever refused the
    /// move, so a move aimed at a closed room is not reported as a room
    /// lookup failure.
    pub fn move_event(&self) -> ServerEvent {
        ServerEvent::MoveError { message: self.to_string() }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
