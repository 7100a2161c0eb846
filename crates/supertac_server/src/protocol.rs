//! The socket message contract.
//!
//! Every frame is a JSON object `{"event": <name>, "data": {...}}` with an
//! optional numeric `requestId`. Replies addressed only to the requester
//! echo that id; broadcasts never carry one.

use crate::room::{MatchOutcome, PlayerSlot};
use crate::room_id::{PlayerId, RoomId};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use supertac_ai::Difficulty;
use supertac_rules::{Mark, MetaBoard, Move};

/// Message sent to the player left behind by a departure.
pub const OPPONENT_LEFT: &str = "Opponent left the game";

/// Inbound commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Open a room and wait for an opponent.
    CreateRoom {
        /// Display name.
        room_name: String,
    },
    /// Open a room against the computer.
    CreateBotRoom {
        /// Display name.
        room_name: String,
        /// Tier name; unknown or missing values mean medium.
        #[serde(default)]
        difficulty: Option<String>,
    },
    /// Join the first room waiting for an opponent.
    JoinRoom {},
    /// Join a specific room.
    JoinRoomById {
        /// Target room.
        room_id: RoomId,
    },
    /// Place a mark.
    MakeMove {
        /// Target room.
        room_id: RoomId,
        /// Sub-board index.
        board_index: usize,
        /// Cell index within the sub-board.
        cell_index: usize,
    },
    /// Leave a room.
    LeaveRoom {
        /// Room to leave.
        room_id: RoomId,
    },
}

impl ClientEvent {
    /// The tier requested by `createBotRoom`, falling back to medium.
    pub fn difficulty(name: Option<&str>) -> Difficulty {
        name.map(Difficulty::parse_or_default).unwrap_or_default()
    }
}

/// An inbound command with its correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMessage {
    /// The command.
    pub event: ClientEvent,
    /// Echoed on replies to this command.
    pub request_id: Option<u64>,
}

#[derive(Deserialize)]
struct Correlation {
    #[serde(rename = "requestId", default)]
    request_id: Option<u64>,
}

/// An inbound frame that could not be understood.
#[derive(Debug, Display, Error, From)]
#[display("Malformed message: {_0}")]
pub struct ProtocolError(serde_json::Error);

/// Parses one inbound text frame.
///
/// A frame without `data` (or with `"data": null`) is read as carrying an
/// empty object, so payload-free commands such as `joinRoom` may omit it.
pub fn parse_client_message(text: &str) -> Result<ClientMessage, ProtocolError> {
    let mut value: serde_json::Value = serde_json::from_str(text)?;
    if let Some(object) = value.as_object_mut() {
        if object.get("data").is_none_or(serde_json::Value::is_null) {
            object.insert("data".to_string(), serde_json::Value::Object(serde_json::Map::new()));
        }
    }
    let Correlation { request_id } = Correlation::deserialize(&value)?;
    let event = ClientEvent::deserialize(&value)?;
    Ok(ClientMessage { event, request_id })
}

/// Outbound events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// The room exists and waits for a second player.
    WaitingForPlayer {
        /// The new room.
        room_id: RoomId,
    },
    /// Both seats are taken; play begins.
    GameStart {
        /// The room that started.
        room_id: RoomId,
        /// The initial board.
        game_state: MetaBoard,
        /// Seats, X first.
        players: Vec<PlayerSlot>,
    },
    /// A move was committed.
    MoveMade {
        /// The board after the move.
        game_state: MetaBoard,
    },
    /// The turn moved to another player.
    TurnChange {
        /// Player whose move is legal now.
        current_turn: PlayerId,
    },
    /// The requester's move was committed.
    MoveConfirmed {
        /// Sub-board index.
        board_index: usize,
        /// Cell index.
        cell_index: usize,
        /// Mark placed.
        symbol: Mark,
    },
    /// The requester's move was refused.
    MoveError {
        /// Reason.
        message: String,
    },
    /// The requester's room operation was refused.
    RoomError {
        /// Reason.
        message: String,
    },
    /// The opponent left.
    PlayerLeft {
        /// Notice text.
        message: String,
    },
    /// The match reached a terminal state.
    GameOver {
        /// Result.
        outcome: MatchOutcome,
    },
}

impl ServerEvent {
    /// Confirmation for a committed move.
    pub fn move_confirmed(mv: Move, symbol: Mark) -> Self {
        ServerEvent::MoveConfirmed {
            board_index: mv.board,
            cell_index: mv.cell,
            symbol,
        }
    }
}

/// An outbound event plus the request it answers, if any.
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct ServerMessage {
    /// The event.
    pub event: ServerEvent,
    /// Correlation id of the request being answered.
    pub request_id: Option<u64>,
}

impl ServerMessage {
    /// A broadcast, never correlated.
    pub fn broadcast(event: ServerEvent) -> Self {
        Self::new(event, None)
    }

    /// Encodes the frame, adding `requestId` when present.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut value = serde_json::to_value(&self.event)?;
        if let (Some(id), Some(object)) = (self.request_id, value.as_object_mut()) {
            object.insert("requestId".to_string(), id.into());
        }
        serde_json::to_string(&value)
    }
}

impl From<ServerEvent> for ServerMessage {
    fn from(event: ServerEvent) -> Self {
        Self::broadcast(event)
    }
}
