//! Delivery of outbound events to connected players.

use crate::protocol::ServerMessage;
use crate::room_id::PlayerId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, instrument, warn};

/// Where the coordinator sends events.
///
/// Sending never blocks; a message for a player who is no longer
/// connected is dropped.
pub trait Outbox: Send + Sync {
    /// Queues `message` for `to`.
    fn send(&self, to: &PlayerId, message: ServerMessage);
}

/// Per-connection outbound queues, keyed by player id.
#[derive(Debug, Clone, Default)]
pub struct ConnectionHub {
    queues: Arc<Mutex<HashMap<PlayerId, UnboundedSender<ServerMessage>>>>,
}

impl ConnectionHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a queue for `player`; the receiver feeds that connection's writer.
    #[instrument(skip(self))]
    pub fn register(&self, player: PlayerId) -> UnboundedReceiver<ServerMessage> {
        let (tx, rx) = unbounded_channel();
        self.queues.lock().insert(player, tx);
        debug!("Connection registered");
        rx
    }

    /// Closes `player`'s queue.
    #[instrument(skip(self))]
    pub fn unregister(&self, player: &PlayerId) {
        self.queues.lock().remove(player);
        debug!("Connection unregistered");
    }

    /// Number of open connections.
    pub fn connections(&self) -> usize {
        self.queues.lock().len()
    }
}

impl Outbox for ConnectionHub {
    fn send(&self, to: &PlayerId, message: ServerMessage) {
        let queues = self.queues.lock();
        match queues.get(to) {
            Some(tx) => {
                if tx.send(message).is_err() {
                    warn!(player_id = %to, "Connection closed, message dropped");
                }
            }
            None => debug!(player_id = %to, "No connection for player, message dropped"),
        }
    }
}
