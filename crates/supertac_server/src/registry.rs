//! The set of live rooms: creation, matchmaking, lookup and teardown.
//!
//! The registry lock only guards the id → room map and is never held while
//! a room's own lock is taken. Per-room work happens on a snapshot of
//! coordinators taken under a brief registry section.

use crate::config::AiConfig;
use crate::coordinator::{BotTurn, RoomCoordinator};
use crate::error::RoomError;
use crate::outbox::Outbox;
use crate::protocol::{ClientEvent, ClientMessage, ServerMessage};
use crate::room::{Room, RoomStatus, RoomSummary};
use crate::room_id::{PlayerId, RoomId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use supertac_ai::Difficulty;
use supertac_rules::Move;
use tracing::{debug, info, instrument, warn};

#[derive(Default)]
struct Rooms {
    by_id: HashMap<RoomId, Arc<RoomCoordinator>>,
    next_sequence: u64,
}

/// Shared handle to every live room.
///
/// Cloning is cheap; all clones see the same rooms.
#[derive(Clone)]
pub struct RoomRegistry {
    rooms: Arc<Mutex<Rooms>>,
    outbox: Arc<dyn Outbox>,
    ai: AiConfig,
}

impl std::fmt::Debug for RoomRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomRegistry")
            .field("rooms", &self.rooms.lock().by_id.len())
            .field("ai", &self.ai)
            .finish_non_exhaustive()
    }
}

impl RoomRegistry {
    /// Creates an empty registry delivering events through `outbox`.
    #[instrument(skip(outbox))]
    pub fn new(outbox: Arc<dyn Outbox>, ai: AiConfig) -> Self {
        info!("Creating room registry");
        Self {
            rooms: Arc::new(Mutex::new(Rooms::default())),
            outbox,
            ai,
        }
    }

    fn insert(&self, build: impl FnOnce(RoomId) -> Room) -> Arc<RoomCoordinator> {
        let mut rooms = self.rooms.lock();
        let mut rng = rand::rng();
        let id = loop {
            let candidate = RoomId::generate(&mut rng);
            if !rooms.by_id.contains_key(&candidate) {
                break candidate;
            }
        };
        let sequence = rooms.next_sequence;
        rooms.next_sequence += 1;
        let coordinator = Arc::new(RoomCoordinator::new(build(id.clone()), sequence, Arc::clone(&self.outbox)));
        rooms.by_id.insert(id, Arc::clone(&coordinator));
        coordinator
    }

    /// Looks up a room.
    pub fn get(&self, id: &RoomId) -> Option<Arc<RoomCoordinator>> {
        self.rooms.lock().by_id.get(id).cloned()
    }

    /// Drops a room and cancels its pending bot search.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &RoomId) {
        let removed = self.rooms.lock().by_id.remove(id);
        if let Some(coordinator) = removed {
            coordinator.close();
            info!(room_id = %id, "Room destroyed");
        }
    }

    fn snapshot(&self) -> Vec<Arc<RoomCoordinator>> {
        let mut rooms: Vec<_> = self.rooms.lock().by_id.values().cloned().collect();
        rooms.sort_by_key(|c| c.sequence());
        rooms
    }

    /// Every live room, oldest first.
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        self.snapshot().iter().map(|c| c.summary()).collect()
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.lock().by_id.len()
    }

    /// True when no room is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Opens a room with `creator` as X and tells them it is waiting.
    #[instrument(skip(self))]
    pub fn create_room(&self, name: String, creator: &PlayerId, request_id: Option<u64>) -> RoomId {
        let coordinator = self.insert(|id| Room::new(id, name, creator.clone()));
        coordinator.announce_waiting(creator, request_id);
        coordinator.id().clone()
    }

    /// Opens a room against the computer; the human plays X and moves first.
    #[instrument(skip(self))]
    pub fn create_bot_room(&self, name: String, human: &PlayerId, difficulty: Difficulty) -> RoomId {
        let coordinator = self.insert(|id| Room::against_bot(id, name, human.clone(), difficulty));
        coordinator.announce_start();
        coordinator.id().clone()
    }

    /// Joins the oldest room waiting for an opponent.
    ///
    /// Rooms created by `player` are skipped.
    #[instrument(skip(self))]
    pub fn join_random(&self, player: &PlayerId) -> Result<RoomId, RoomError> {
        for coordinator in self.snapshot() {
            if coordinator.has_player(player) {
                continue;
            }
            match coordinator.join(player.clone()) {
                Ok(()) => return Ok(coordinator.id().clone()),
                // Filled or closed since the snapshot.
                Err(RoomError::RoomFull) => continue,
                Err(other) => return Err(other),
            }
        }
        debug!(player_id = %player, "No room waiting for an opponent");
        Err(RoomError::NoRoomAvailable)
    }

    /// Joins a specific room.
    #[instrument(skip(self))]
    pub fn join_by_id(&self, id: &RoomId, player: &PlayerId) -> Result<(), RoomError> {
        self.get(id).ok_or(RoomError::RoomNotFound)?.join(player.clone())
    }

    /// Plays a human move.
    ///
    /// A finished room is destroyed; otherwise, if the bot is to move, its
    /// search is scheduled.
    #[instrument(skip(self), fields(board = mv.board, cell = mv.cell))]
    pub fn make_move(
        &self,
        id: &RoomId,
        player: &PlayerId,
        mv: Move,
        request_id: Option<u64>,
    ) -> Result<RoomStatus, RoomError> {
        let coordinator = self.get(id).ok_or(RoomError::RoomNotFound)?;
        let status = coordinator.make_move(player, mv, request_id)?;
        self.after_move(&coordinator, status);
        Ok(status)
    }

    fn after_move(&self, coordinator: &Arc<RoomCoordinator>, status: RoomStatus) {
        if status.is_terminal() {
            self.remove(coordinator.id());
        } else if let Some(turn) = coordinator.prepare_bot_turn(&self.ai.search_config()) {
            self.spawn_bot_turn(coordinator.id().clone(), turn);
        }
    }

    fn spawn_bot_turn(&self, id: RoomId, turn: BotTurn) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(room_id = %id, "No async runtime, bot turn not scheduled");
            return;
        };
        let registry = self.clone();
        let delay = self.ai.think_delay();
        runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if turn.cancel.load(Ordering::Relaxed) {
                debug!(room_id = %id, "Bot turn cancelled before search");
                return;
            }
            let BotTurn { board, ply, bot, cancel } = turn;
            let search = tokio::task::spawn_blocking(move || {
                let mut rng = rand::rng();
                bot.choose_move(&board, &mut rng, Some(&*cancel))
            });
            match search.await {
                Ok(Some(mv)) => registry.commit_bot_move(&id, ply, mv),
                Ok(None) => debug!(room_id = %id, "Bot had no legal move"),
                Err(error) => warn!(room_id = %id, %error, "Bot search task failed"),
            }
        });
    }

    /// Feeds a bot's answer back into its room.
    ///
    /// Answers for destroyed rooms or stale positions are discarded.
    #[instrument(skip(self), fields(board = mv.board, cell = mv.cell))]
    pub fn commit_bot_move(&self, id: &RoomId, expected_ply: usize, mv: Move) {
        let Some(coordinator) = self.get(id) else {
            debug!("Room gone, bot move discarded");
            return;
        };
        if let Some(status) = coordinator.commit_bot_move(expected_ply, mv) {
            self.after_move(&coordinator, status);
        }
    }

    /// Removes `player` from one room and destroys it.
    #[instrument(skip(self))]
    pub fn leave_room(&self, id: &RoomId, player: &PlayerId) -> Result<(), RoomError> {
        let coordinator = self.get(id).ok_or(RoomError::RoomNotFound)?;
        coordinator.leave(player)?;
        self.remove(id);
        Ok(())
    }

    /// Removes a departed player from every room they sat in.
    #[instrument(skip(self))]
    pub fn handle_disconnect(&self, player: &PlayerId) {
        for coordinator in self.snapshot() {
            if !coordinator.has_player(player) {
                continue;
            }
            if coordinator.leave(player).is_ok() {
                self.remove(coordinator.id());
            }
        }
        info!(player_id = %player, "Player disconnected");
    }

    /// Executes one inbound command for `player`.
    ///
    /// Refusals are reported to `player` only, echoing the request id. A
    /// refused `makeMove` is always answered with `moveError`.
    #[instrument(skip(self, message), fields(request_id = message.request_id))]
    pub fn dispatch(&self, player: &PlayerId, message: ClientMessage) {
        let ClientMessage { event, request_id } = message;
        let is_move = matches!(event, ClientEvent::MakeMove { .. });
        let result = match event {
            ClientEvent::CreateRoom { room_name } => {
                self.create_room(room_name, player, request_id);
                Ok(())
            }
            ClientEvent::CreateBotRoom { room_name, difficulty } => {
                self.create_bot_room(room_name, player, ClientEvent::difficulty(difficulty.as_deref()));
                Ok(())
            }
            ClientEvent::JoinRoom {} => self.join_random(player).map(drop),
            ClientEvent::JoinRoomById { room_id } => self.join_by_id(&room_id, player),
            ClientEvent::MakeMove {
                room_id,
                board_index,
                cell_index,
            } => self
                .make_move(&room_id, player, Move::new(board_index, cell_index), request_id)
                .map(drop),
            ClientEvent::LeaveRoom { room_id } => self.leave_room(&room_id, player),
        };
        if let Err(error) = result {
            warn!(player_id = %player, %error, "Request refused");
            let reply = if is_move { error.move_event() } else { error.event() };
            self.outbox.send(player, ServerMessage::new(reply, request_id));
        }
    }
}
