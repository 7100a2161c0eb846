//! HTTP and WebSocket surface.
//!
//! - `GET /` plain welcome text
//! - `GET /rooms` JSON list of live rooms
//! - `GET /ws` the game socket, one player per connection

use crate::config::AiConfig;
use crate::outbox::ConnectionHub;
use crate::protocol::parse_client_message;
use crate::registry::RoomRegistry;
use crate::room::RoomSummary;
use crate::room_id::new_player_id;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Request, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use derive_getters::Getters;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

/// Text served at the root path.
pub const WELCOME: &str = "Welcome to the SuperTac API. The backend is up and running";

/// Shared state behind every route.
#[derive(Debug, Clone, Getters)]
pub struct AppState {
    registry: RoomRegistry,
    hub: ConnectionHub,
}

impl AppState {
    /// Wires a registry to a fresh connection hub.
    pub fn new(ai: AiConfig) -> Self {
        let hub = ConnectionHub::new();
        let registry = RoomRegistry::new(Arc::new(hub.clone()), ai);
        Self { registry, hub }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/rooms", get(list_rooms))
        .route("/ws", get(upgrade))
        .with_state(state)
        .layer(ServiceBuilder::new().map_request(|req: Request| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
}

async fn welcome() -> &'static str {
    WELCOME
}

async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomSummary>> {
    Json(state.registry.list_rooms())
}

async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs one connection until the client goes away.
#[instrument(skip_all)]
async fn handle_socket(socket: WebSocket, state: AppState) {
    let player = new_player_id(&mut rand::rng());
    info!(player_id = %player, "Player connected");

    let mut outbound = state.hub.register(player.clone());
    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            match message.to_json() {
                Ok(text) => {
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(error) => warn!(%error, "Failed to encode outbound message"),
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match parse_client_message(text.as_str()) {
                Ok(message) => state.registry.dispatch(&player, message),
                Err(error) => warn!(player_id = %player, %error, "Dropping malformed message"),
            },
            Ok(Message::Binary(_)) => warn!(player_id = %player, "Dropping binary frame"),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(error) => {
                debug!(player_id = %player, %error, "Socket error");
                break;
            }
        }
    }

    state.registry.handle_disconnect(&player);
    state.hub.unregister(&player);
    writer.abort();
}
