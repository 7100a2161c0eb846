//! One match: its seats, turn owner, board and lifecycle.
//!
//! `Room` is a plain state machine with no I/O. The coordinator wraps it
//! in a lock and turns each transition into outbound events.
//!
//! ```text
//! WaitingForPlayer ──join──▶ InProgress ──game over──▶ Finished
//!        │                       │
//!        └───────leave───────────┴──────────▶ Abandoned
//! ```

use crate::error::RoomError;
use crate::room_id::{bot_player_id, PlayerId, RoomId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use supertac_ai::Difficulty;
use supertac_rules::{Game, Mark, MetaBoard, MetaOutcome, Move, PlayedMove};
use tracing::{debug, info, instrument, warn};

/// Who sits in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "difficulty", rename_all = "lowercase")]
pub enum PlayerKind {
    /// A connected client.
    Human,
    /// The server-side computer opponent.
    Bot(Difficulty),
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct PlayerSlot {
    /// Player's id.
    pub id: PlayerId,
    /// Mark this player places.
    pub symbol: Mark,
    /// Human or bot.
    pub kind: PlayerKind,
}

impl PlayerSlot {
    /// True for the computer opponent.
    pub fn is_bot(&self) -> bool {
        matches!(self.kind, PlayerKind::Bot(_))
    }
}

/// Lifecycle stage of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum RoomStatus {
    /// Created, one seat empty.
    WaitingForPlayer,
    /// Both seats taken, moves accepted.
    InProgress,
    /// Decided by the rules.
    Finished,
    /// A player left before the end.
    Abandoned,
}

impl RoomStatus {
    /// True for `Finished` and `Abandoned`.
    pub fn is_terminal(self) -> bool {
        matches!(self, RoomStatus::Finished | RoomStatus::Abandoned)
    }
}

/// How a match ended.
///
/// A forfeit is kept apart from a rules win so results can be tallied
/// without mixing the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MatchOutcome {
    /// A line of sub-boards.
    Won {
        /// The winning mark.
        winner: Mark,
    },
    /// Every sub-board decided without a line.
    Draw,
    /// One player left mid-match.
    Forfeit {
        /// Mark of the player who stayed.
        winner: Mark,
        /// Mark of the player who left.
        leaver: Mark,
    },
}

impl From<MetaOutcome> for MatchOutcome {
    fn from(outcome: MetaOutcome) -> Self {
        match outcome.winner() {
            Some(winner) => MatchOutcome::Won { winner },
            None => MatchOutcome::Draw,
        }
    }
}

/// Snapshot of a room for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    /// Room id.
    id: RoomId,
    /// Display name chosen by the creator.
    name: String,
    /// Lifecycle stage.
    status: RoomStatus,
    /// Seats taken.
    player_count: usize,
}

/// A room and its match.
#[derive(Debug, Clone, Getters)]
pub struct Room {
    /// Room id.
    id: RoomId,
    /// Display name.
    name: String,
    /// Seated players, X first.
    players: Vec<PlayerSlot>,
    /// Player whose move is legal, once the match has started.
    turn_owner: Option<PlayerId>,
    /// The match, once both seats are taken.
    game: Option<Game>,
    /// Lifecycle stage.
    status: RoomStatus,
    /// Result, once terminal.
    outcome: Option<MatchOutcome>,
    #[getter(skip)]
    pending_search: Option<Arc<AtomicBool>>,
}

impl Room {
    /// Opens a room with `creator` seated as X, waiting for an opponent.
    #[instrument(skip(name), fields(room_id = %id))]
    pub fn new(id: RoomId, name: String, creator: PlayerId) -> Self {
        info!(player_id = %creator, "Room created");
        Self {
            id,
            name,
            players: vec![PlayerSlot::new(creator, Mark::X, PlayerKind::Human)],
            turn_owner: None,
            game: None,
            status: RoomStatus::WaitingForPlayer,
            outcome: None,
            pending_search: None,
        }
    }

    /// Opens a room with `human` as X and a bot as O; play starts at once.
    #[instrument(skip(name), fields(room_id = %id))]
    pub fn against_bot(id: RoomId, name: String, human: PlayerId, difficulty: Difficulty) -> Self {
        info!(player_id = %human, %difficulty, "Bot room created");
        let bot = PlayerSlot::new(bot_player_id(&id), Mark::O, PlayerKind::Bot(difficulty));
        Self {
            id,
            name,
            turn_owner: Some(human.clone()),
            players: vec![PlayerSlot::new(human, Mark::X, PlayerKind::Human), bot],
            game: Some(Game::new()),
            status: RoomStatus::InProgress,
            outcome: None,
            pending_search: None,
        }
    }

    /// The current board, once the match has started.
    pub fn board(&self) -> Option<&MetaBoard> {
        self.game.as_ref().map(Game::board)
    }

    /// Number of moves played.
    pub fn ply(&self) -> usize {
        self.game.as_ref().map_or(0, Game::ply)
    }

    /// The seat held by `player`, if any.
    pub fn slot(&self, player: &str) -> Option<&PlayerSlot> {
        self.players.iter().find(|p| p.id == player)
    }

    /// True while a second player may join.
    pub fn is_joinable(&self) -> bool {
        self.status == RoomStatus::WaitingForPlayer && self.players.len() == 1
    }

    /// The bot's tier, when the bot holds the turn.
    pub fn bot_to_move(&self) -> Option<Difficulty> {
        if self.status != RoomStatus::InProgress {
            return None;
        }
        let owner = self.turn_owner.as_deref()?;
        match self.slot(owner)?.kind {
            PlayerKind::Bot(difficulty) => Some(difficulty),
            PlayerKind::Human => None,
        }
    }

    /// Human players, for delivering events.
    pub fn humans(&self) -> impl Iterator<Item = &PlayerSlot> {
        self.players.iter().filter(|p| !p.is_bot())
    }

    /// Listing snapshot.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            status: self.status,
            player_count: self.players.len(),
        }
    }

    /// Seats `player` as O and starts the match with X to move.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn join(&mut self, player: PlayerId) -> Result<(), RoomError> {
        if !self.is_joinable() || self.slot(&player).is_some() {
            warn!(player_id = %player, status = %self.status, "Join refused");
            return Err(RoomError::RoomFull);
        }
        let creator = self.players[0].id.clone();
        self.players.push(PlayerSlot::new(player.clone(), Mark::O, PlayerKind::Human));
        self.turn_owner = Some(creator);
        self.game = Some(Game::new());
        self.status = RoomStatus::InProgress;
        info!(player_id = %player, "Second player joined, match started");
        Ok(())
    }

    /// Plays `mv` for `player`.
    ///
    /// Checks seat, then turn, then the rules; a refused move changes
    /// nothing. On success the turn passes to the other seat and a decided
    /// match moves the room to `Finished`.
    #[instrument(skip(self), fields(room_id = %self.id, board = mv.board, cell = mv.cell))]
    pub fn play(&mut self, player: &str, mv: Move) -> Result<PlayedMove, RoomError> {
        if self.status.is_terminal() {
            return Err(RoomError::RoomNotFound);
        }
        let symbol = self.slot(player).ok_or(RoomError::PlayerNotInRoom)?.symbol;
        if self.turn_owner.as_deref() != Some(player) {
            debug!(player_id = player, "Move out of turn");
            return Err(RoomError::NotYourTurn);
        }
        let game = self.game.as_mut().ok_or(RoomError::NotYourTurn)?;
        let board = game.make_move(mv)?;
        let over = board.meta_winner();

        self.turn_owner = self.players.iter().find(|p| p.id != player).map(|p| p.id.clone());
        if let Some(result) = over {
            self.status = RoomStatus::Finished;
            self.outcome = Some(MatchOutcome::from(result));
            info!(%result, "Match finished");
        }
        Ok(PlayedMove::new(symbol, mv))
    }

    /// Removes `player` from the room.
    ///
    /// Leaving a match in progress abandons it and records a forfeit for
    /// the other seat. Any pending bot search is cancelled.
    #[instrument(skip(self), fields(room_id = %self.id))]
    pub fn remove_player(&mut self, player: &str) -> Result<PlayerSlot, RoomError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == player)
            .ok_or(RoomError::PlayerNotInRoom)?;
        let leaver = self.players.remove(index);
        self.cancel_search();

        match self.status {
            RoomStatus::InProgress => {
                self.status = RoomStatus::Abandoned;
                self.outcome = Some(MatchOutcome::Forfeit {
                    winner: leaver.symbol.opponent(),
                    leaver: leaver.symbol,
                });
                self.turn_owner = None;
                info!(player_id = player, "Player left mid-match, room abandoned");
            }
            RoomStatus::WaitingForPlayer => {
                self.status = RoomStatus::Abandoned;
                info!(player_id = player, "Creator left before an opponent joined");
            }
            RoomStatus::Finished | RoomStatus::Abandoned => {
                debug!(player_id = player, "Player left a closed room");
            }
        }
        Ok(leaver)
    }

    /// Arms a fresh cancel flag for a bot search and returns it.
    pub fn begin_search(&mut self) -> Arc<AtomicBool> {
        self.cancel_search();
        let flag = Arc::new(AtomicBool::new(false));
        self.pending_search = Some(Arc::clone(&flag));
        flag
    }

    /// Clears the pending search without cancelling it.
    pub fn end_search(&mut self) {
        self.pending_search = None;
    }

    /// Raises the cancel flag of any pending search.
    pub fn cancel_search(&mut self) {
        if let Some(flag) = self.pending_search.take() {
            flag.store(true, Ordering::Relaxed);
            debug!(room_id = %self.id, "Pending bot search cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supertac_rules::MoveError;

    fn waiting_room() -> Room {
        Room::new(RoomId::from("room000001"), "lobby".to_string(), "alice".to_string())
    }

    fn started_room() -> Room {
        let mut room = waiting_room();
        room.join("bob".to_string()).expect("joinable");
        room
    }

    #[test]
    fn test_new_room_waits_with_creator_as_x() {
        let room = waiting_room();
        assert_eq!(*room.status(), RoomStatus::WaitingForPlayer);
        assert_eq!(room.players()[0].symbol, Mark::X);
        assert!(room.board().is_none());
        assert!(room.is_joinable());
    }

    #[test]
    fn test_second_join_starts_match() {
        let room = started_room();
        assert_eq!(*room.status(), RoomStatus::InProgress);
        assert_eq!(room.players()[1], PlayerSlot::new("bob".to_string(), Mark::O, PlayerKind::Human));
        assert_eq!(room.turn_owner().as_deref(), Some("alice"));
        assert_eq!(room.board(), Some(&MetaBoard::new()));
    }

    #[test]
    fn test_third_join_is_refused() {
        let mut room = started_room();
        assert_eq!(room.join("carol".to_string()), Err(RoomError::RoomFull));
        assert_eq!(room.players().len(), 2);
    }

    #[test]
    fn test_creator_cannot_join_own_room() {
        let mut room = waiting_room();
        assert_eq!(room.join("alice".to_string()), Err(RoomError::RoomFull));
    }

    #[test]
    fn test_turn_passes_after_move() {
        let mut room = started_room();
        let played = room.play("alice", Move::new(0, 0)).expect("legal");
        assert_eq!(played.mark, Mark::X);
        assert_eq!(room.turn_owner().as_deref(), Some("bob"));
        assert_eq!(room.play("alice", Move::new(0, 1)), Err(RoomError::NotYourTurn));
    }

    #[test]
    fn test_stranger_and_illegal_moves_rejected() {
        let mut room = started_room();
        assert_eq!(room.play("mallory", Move::new(0, 0)), Err(RoomError::PlayerNotInRoom));
        room.play("alice", Move::new(0, 4)).expect("legal");
        assert_eq!(
            room.play("bob", Move::new(1, 0)),
            Err(RoomError::IllegalMove(MoveError::WrongBoard { required: 4, attempted: 1 }))
        );
        assert_eq!(room.ply(), 1);
    }

    #[test]
    fn test_move_before_start_is_not_your_turn() {
        let mut room = waiting_room();
        assert_eq!(room.play("alice", Move::new(0, 0)), Err(RoomError::NotYourTurn));
    }

    #[test]
    fn test_leaving_mid_match_is_a_forfeit() {
        let mut room = started_room();
        let flag = room.begin_search();
        let leaver = room.remove_player("alice").expect("seated");
        assert_eq!(leaver.symbol, Mark::X);
        assert_eq!(*room.status(), RoomStatus::Abandoned);
        assert_eq!(
            *room.outcome(),
            Some(MatchOutcome::Forfeit { winner: Mark::O, leaver: Mark::X })
        );
        assert!(flag.load(Ordering::Relaxed));
        assert_eq!(room.play("bob", Move::new(0, 0)), Err(RoomError::RoomNotFound));
    }

    #[test]
    fn test_bot_room_starts_immediately() {
        let room = Room::against_bot(RoomId::from("bots000001"), "solo".to_string(), "alice".to_string(), Difficulty::Hard);
        assert_eq!(*room.status(), RoomStatus::InProgress);
        assert_eq!(room.players()[1].kind, PlayerKind::Bot(Difficulty::Hard));
        assert_eq!(room.bot_to_move(), None);
        assert_eq!(room.humans().count(), 1);
    }

    #[test]
    fn test_bot_holds_turn_after_human_moves() {
        let mut room = Room::against_bot(RoomId::from("bots000002"), "solo".to_string(), "alice".to_string(), Difficulty::Easy);
        room.play("alice", Move::new(4, 4)).expect("legal");
        assert_eq!(room.bot_to_move(), Some(Difficulty::Easy));
        assert_eq!(room.turn_owner().as_deref(), Some("bot-bots000002"));
    }

    #[test]
    fn test_wire_shapes() {
        let slot = PlayerSlot::new("b".to_string(), Mark::O, PlayerKind::Bot(Difficulty::Hard));
        let json = serde_json::to_value(&slot).expect("serialize");
        assert_eq!(json["symbol"], "o");
        assert_eq!(json["kind"]["type"], "bot");
        assert_eq!(json["kind"]["difficulty"], "hard");

        let outcome = serde_json::to_value(MatchOutcome::Forfeit { winner: Mark::O, leaver: Mark::X }).expect("serialize");
        assert_eq!(outcome["result"], "forfeit");
        assert_eq!(outcome["leaver"], "x");
        assert_eq!(serde_json::to_value(RoomStatus::WaitingForPlayer).expect("serialize"), "waitingForPlayer");
    }
}
