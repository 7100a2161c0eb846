//! Serialized mutation of a single room.
//!
//! Every operation takes the room's lock for its whole duration, applies
//! one transition and queues the resulting events before releasing it.
//! Two racing moves therefore see each other's effects in a fixed order,
//! and each room's events leave in the order its state changed.

use crate::error::RoomError;
use crate::outbox::Outbox;
use crate::protocol::{ServerEvent, ServerMessage, OPPONENT_LEFT};
use crate::room::{Room, RoomStatus, RoomSummary};
use crate::room_id::{PlayerId, RoomId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use supertac_ai::{Bot, SearchConfig};
use supertac_rules::{MetaBoard, Move, PlayedMove};
use tracing::{debug, info, instrument, warn};

/// Everything a bot search needs, captured under the room lock.
#[derive(Debug, Clone)]
pub struct BotTurn {
    /// Board to search.
    pub board: MetaBoard,
    /// Ply the answer must apply to.
    pub ply: usize,
    /// Configured opponent.
    pub bot: Bot,
    /// Raised when the room closes.
    pub cancel: Arc<AtomicBool>,
}

/// Owner of one room's state.
pub struct RoomCoordinator {
    id: RoomId,
    sequence: u64,
    room: Mutex<Room>,
    outbox: Arc<dyn Outbox>,
}

impl std::fmt::Debug for RoomCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomCoordinator")
            .field("id", &self.id)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

impl RoomCoordinator {
    /// Wraps `room`. `sequence` orders rooms by creation for matchmaking.
    pub fn new(room: Room, sequence: u64, outbox: Arc<dyn Outbox>) -> Self {
        Self {
            id: room.id().clone(),
            sequence,
            room: Mutex::new(room),
            outbox,
        }
    }

    /// Room id.
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Creation order.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// A copy of the current room state.
    pub fn snapshot(&self) -> Room {
        self.room.lock().clone()
    }

    /// Listing snapshot.
    pub fn summary(&self) -> RoomSummary {
        self.room.lock().summary()
    }

    /// True when `player` holds a seat.
    pub fn has_player(&self, player: &str) -> bool {
        self.room.lock().slot(player).is_some()
    }

    /// Tells the creator the room is open.
    pub fn announce_waiting(&self, creator: &PlayerId, request_id: Option<u64>) {
        let event = ServerEvent::WaitingForPlayer { room_id: self.id.clone() };
        self.outbox.send(creator, ServerMessage::new(event, request_id));
    }

    /// Sends the opening events of a match that started without a join.
    pub fn announce_start(&self) {
        let room = self.room.lock();
        self.broadcast_start(&room);
    }

    /// Seats `player` as O and starts the match.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn join(&self, player: PlayerId) -> Result<(), RoomError> {
        let mut room = self.room.lock();
        room.join(player)?;
        self.broadcast_start(&room);
        Ok(())
    }

    /// Plays a human move and returns the room's status afterwards.
    #[instrument(skip(self), fields(room_id = %self.id, board = mv.board, cell = mv.cell))]
    pub fn make_move(&self, player: &PlayerId, mv: Move, request_id: Option<u64>) -> Result<RoomStatus, RoomError> {
        let mut room = self.room.lock();
        let played = room.play(player, mv).inspect_err(|e| {
            debug!(player_id = %player, error = %e, "Move rejected");
        })?;
        self.broadcast_move(&room, played);
        self.outbox.send(
            player,
            ServerMessage::new(ServerEvent::move_confirmed(played.at, played.mark), request_id),
        );
        self.broadcast_game_over(&room);
        Ok(*room.status())
    }

    /// Captures the position for a bot search, if the bot is to move.
    ///
    /// Any earlier search for this room is cancelled.
    pub fn prepare_bot_turn(&self, config: &SearchConfig) -> Option<BotTurn> {
        let mut room = self.room.lock();
        let difficulty = room.bot_to_move()?;
        let board = room.board()?.clone();
        let ply = room.ply();
        let cancel = room.begin_search();
        Some(BotTurn {
            board,
            ply,
            bot: Bot::new(difficulty, config.clone()),
            cancel,
        })
    }

    /// Commits a bot's answer for `expected_ply`.
    ///
    /// Returns `None` when the answer is stale: the room closed, the match
    /// moved on, or the bot no longer holds the turn. A move the rules
    /// reject is replaced by the first legal move.
    #[instrument(skip(self), fields(room_id = %self.id, board = mv.board, cell = mv.cell))]
    pub fn commit_bot_move(&self, expected_ply: usize, mv: Move) -> Option<RoomStatus> {
        let mut room = self.room.lock();
        if room.bot_to_move().is_none() || room.ply() != expected_ply {
            debug!(ply = room.ply(), expected_ply, "Stale bot move discarded");
            return None;
        }
        room.end_search();
        let bot = room.turn_owner().clone()?;

        let played = match room.play(&bot, mv) {
            Ok(played) => played,
            Err(error) => {
                warn!(%error, "Bot proposed an illegal move, falling back");
                let fallback = room.board()?.legal_moves().first().copied()?;
                room.play(&bot, fallback).ok()?
            }
        };
        info!(mv = %played.at, "Bot moved");
        self.broadcast_move(&room, played);
        self.broadcast_game_over(&room);
        Some(*room.status())
    }

    /// Removes `player`, abandoning a match in progress.
    ///
    /// The remaining human, if any, is told the opponent left and how the
    /// match ended. The room should be dropped from the registry afterwards.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn leave(&self, player: &PlayerId) -> Result<(), RoomError> {
        let mut room = self.room.lock();
        let was_playing = *room.status() == RoomStatus::InProgress;
        room.remove_player(player)?;
        if was_playing {
            self.broadcast(&room, ServerEvent::PlayerLeft { message: OPPONENT_LEFT.to_string() });
            self.broadcast_game_over(&room);
        }
        Ok(())
    }

    /// Cancels any outstanding bot search.
    pub fn close(&self) {
        self.room.lock().cancel_search();
    }

    fn broadcast(&self, room: &Room, event: ServerEvent) {
        for player in room.humans() {
            self.outbox.send(&player.id, ServerMessage::broadcast(event.clone()));
        }
    }

    fn broadcast_start(&self, room: &Room) {
        let Some(board) = room.board() else { return };
        self.broadcast(
            room,
            ServerEvent::GameStart {
                room_id: self.id.clone(),
                game_state: board.clone(),
                players: room.players().clone(),
            },
        );
        if let Some(owner) = room.turn_owner() {
            self.broadcast(room, ServerEvent::TurnChange { current_turn: owner.clone() });
        }
    }

    fn broadcast_move(&self, room: &Room, played: PlayedMove) {
        let Some(board) = room.board() else { return };
        debug!(mark = %played.mark, mv = %played.at, ply = room.ply(), "Broadcasting move");
        self.broadcast(room, ServerEvent::MoveMade { game_state: board.clone() });
        if let Some(owner) = room.turn_owner() {
            self.broadcast(room, ServerEvent::TurnChange { current_turn: owner.clone() });
        }
    }

    fn broadcast_game_over(&self, room: &Room) {
        if !room.status().is_terminal() {
            return;
        }
        if let Some(outcome) = *room.outcome() {
            self.broadcast(room, ServerEvent::GameOver { outcome });
        }
    }
}
