//! Shared fixtures for registry tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use supertac_server::{AiConfig, Outbox, PlayerId, RoomRegistry, ServerEvent, ServerMessage};

/// Outbox that keeps every message for inspection.
#[derive(Debug, Default)]
pub struct RecordingOutbox {
    sent: Mutex<Vec<(PlayerId, ServerMessage)>>,
}

impl Outbox for RecordingOutbox {
    fn send(&self, to: &PlayerId, message: ServerMessage) {
        self.sent.lock().push((to.clone(), message));
    }
}

impl RecordingOutbox {
    /// Everything sent so far.
    pub fn all(&self) -> Vec<(PlayerId, ServerMessage)> {
        self.sent.lock().clone()
    }

    /// Messages delivered to one player, in order.
    pub fn to(&self, player: &str) -> Vec<ServerMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|(to, _)| to == player)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    /// Event names delivered to one player, in order.
    pub fn names(&self, player: &str) -> Vec<&'static str> {
        self.to(player).iter().map(|m| event_name(&m.event)).collect()
    }

    /// Forgets everything recorded.
    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

/// Wire name of an event.
pub fn event_name(event: &ServerEvent) -> &'static str {
    match event {
        ServerEvent::WaitingForPlayer { .. } => "waitingForPlayer",
        ServerEvent::GameStart { .. } => "gameStart",
        ServerEvent::MoveMade { .. } => "moveMade",
        ServerEvent::TurnChange { .. } => "turnChange",
        ServerEvent::MoveConfirmed { .. } => "moveConfirmed",
        ServerEvent::MoveError { .. } => "moveError",
        ServerEvent::RoomError { .. } => "roomError",
        ServerEvent::PlayerLeft { .. } => "playerLeft",
        ServerEvent::GameOver { .. } => "gameOver",
    }
}

/// AI settings with no think delay and a shallow, unbounded search.
pub fn fast_ai() -> AiConfig {
    AiConfig::default()
        .with_think_delay_ms(0)
        .with_search_depth(2)
        .with_time_budget_ms(0)
        .with_blunder_rate(0.0)
}

/// A registry wired to a recording outbox.
pub fn registry() -> (RoomRegistry, Arc<RecordingOutbox>) {
    let outbox = Arc::new(RecordingOutbox::default());
    let registry = RoomRegistry::new(outbox.clone(), fast_ai());
    (registry, outbox)
}

/// Player id helper.
pub fn pid(name: &str) -> PlayerId {
    name.to_string()
}
