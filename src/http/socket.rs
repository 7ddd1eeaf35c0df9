use super::state::AppState;
use crate::protocol::ClientEvent;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, error, info, warn};

/// GET /ws
/// Upgrade to the session event WebSocket
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Serve one connection until either side closes
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (connection, mut events) = match state.coordinator.connect() {
        Ok(registered) => registered,
        Err(e) => {
            error!("Failed to register connection: {:#}", e);
            return;
        }
    };

    let (mut ws_tx, mut ws_rx) = socket.split();

    // Forward room broadcasts to the socket in emission order
    let send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server event: {}", e);
                    continue;
                }
            };

            if ws_tx.send(Message::Text(json)).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        let text = match result {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("WebSocket error on {}: {}", connection, e);
                break;
            }
        };

        let event: ClientEvent = match serde_json::from_str(&text) {
            Ok(event) => event,
            Err(e) => {
                warn!("Dropping malformed event from {}: {}", connection, e);
                continue;
            }
        };

        if let Err(e) = state.coordinator.send(connection, event) {
            error!("Failed to route event from {}: {:#}", connection, e);
            break;
        }
    }

    if let Err(e) = state.coordinator.disconnect(connection) {
        warn!("Failed to unregister {}: {:#}", connection, e);
    }
    send_task.abort();
    info!("WebSocket connection closed {}", connection);
}
