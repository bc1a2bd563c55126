use crate::server::BridgeAppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use harmwatch_core::{Error, Result};
use tokio::time::timeout;

/// Peer text frame after parsing
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    /// Empty frame, or the bare `ready` / `ping` a dashboard sends on open
    Keepalive,
    Json(serde_json::Value),
}

/// Parse a text frame from a subscriber
pub fn parse_control(text: &str) -> Result<ControlMessage> {
    let trimmed = text.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("ready")
        || trimmed.eq_ignore_ascii_case("ping")
    {
        return Ok(ControlMessage::Keepalive);
    }

    serde_json::from_str(trimmed)
        .map(ControlMessage::Json)
        .map_err(|e| Error::malformed_message(e.to_string()))
}

/// WebSocket handler for the live event stream
pub async fn stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<BridgeAppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: BridgeAppState) {
    let (mut sender, mut receiver) = socket.split();

    let mut subscription = state.hub.connect().await;
    let id = subscription.id();
    let send_timeout = state.hub.options().send_timeout;

    // Event forwarding task
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = subscription.recv().await {
            match timeout(send_timeout, sender.send(Message::Text(payload.to_string()))).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!(connection = %id, "Socket write failed: {}", e);
                    break;
                }
                Err(_) => {
                    tracing::debug!(connection = %id, "Socket write timed out");
                    break;
                }
            }
        }
        subscription.close();
    });

    // Receive task (peer keepalives and control messages)
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => match parse_control(&text) {
                    Ok(ControlMessage::Keepalive) => {
                        tracing::trace!(connection = %id, "Keepalive");
                    }
                    Ok(ControlMessage::Json(value)) => {
                        tracing::debug!(connection = %id, "Ignoring control message: {}", value);
                    }
                    Err(e) => {
                        tracing::trace!(connection = %id, "{}", e);
                    }
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(connection = %id, "Socket read failed: {}", e);
                    break;
                }
            }
        }
    });

    // Whichever side finishes first ends the connection
    tokio::select! {
        _ = &mut send_task => {
            tracing::debug!(connection = %id, "Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            tracing::debug!(connection = %id, "Receive task completed");
            send_task.abort();
        }
    }

    state.hub.disconnect(id).await;
}
