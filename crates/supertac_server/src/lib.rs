//! SuperTac server - authoritative multiplayer rooms for super tic-tac-toe.
//!
//! # Architecture
//!
//! - **Room**: one match's seats, turn owner, board and lifecycle
//! - **Coordinator**: serializes every mutation of one room and queues its events
//! - **Registry**: creation, matchmaking, lookup and teardown of rooms
//! - **Protocol**: the JSON socket contract
//! - **Outbox / hub**: per-connection delivery of outbound events
//! - **Web**: axum routes and the WebSocket loop
//!
//! Bot rooms hand the computer's turn to a blocking worker; its answer is
//! re-validated against the room before it is committed.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use supertac_server::{AiConfig, ConnectionHub, RoomRegistry};
//!
//! let registry = RoomRegistry::new(Arc::new(ConnectionHub::new()), AiConfig::default());
//! let room = registry.create_room("lobby".to_string(), &"alice".to_string(), None);
//! registry.join_by_id(&room, &"bob".to_string()).unwrap();
//! assert_eq!(registry.list_rooms()[0].player_count(), &2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod coordinator;
mod error;
mod outbox;
mod protocol;
mod registry;
mod room;
mod room_id;
mod selfplay;
mod ws;

pub mod cli;

// Crate-level exports - Configuration
pub use config::{AiConfig, ListenConfig, ServerConfig};

// Crate-level exports - Errors
pub use error::{ConfigError, RoomError};

// Crate-level exports - Rooms
pub use coordinator::{BotTurn, RoomCoordinator};
pub use registry::RoomRegistry;
pub use room::{MatchOutcome, PlayerKind, PlayerSlot, Room, RoomStatus, RoomSummary};
pub use room_id::{bot_player_id, new_player_id, PlayerId, RoomId, ROOM_ID_ALPHABET, ROOM_ID_LEN};

// Crate-level exports - Protocol and delivery
pub use outbox::{ConnectionHub, Outbox};
pub use protocol::{parse_client_message, ClientEvent, ClientMessage, ProtocolError, ServerEvent, ServerMessage, OPPONENT_LEFT};

// Crate-level exports - HTTP surface
pub use ws::{router, AppState, WELCOME};

// Crate-level exports - Self-play
pub use selfplay::{play_match, run as run_selfplay, Tally};
