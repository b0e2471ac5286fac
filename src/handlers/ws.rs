use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    user_id: Option<String>,
}

/// Live stats feed. Each client receives only its own user's events.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
) -> Response {
    let Some(user_id) = query.user_id.filter(|id| !id.trim().is_empty()) else {
        tracing::warn!("WebSocket rejected: missing user_id");
        return (StatusCode::BAD_REQUEST, "Missing user_id query parameter").into_response();
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

/// Messages tagged with another user's id are skipped.
fn is_for_user(msg: &str, user_id: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(msg)
        .ok()
        .and_then(|parsed| {
            parsed
                .get("user_id")
                .and_then(|v| v.as_str())
                .map(|target| target == user_id)
        })
        .unwrap_or(false)
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: String) {
    let (mut sender, mut receiver) = socket.split();
    let conn_id = Uuid::new_v4();

    tracing::debug!(user_id = %user_id, conn_id = %conn_id, "WebSocket connection established");

    let mut rx = state.hub.subscribe();

    let uid = user_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(msg) => {
                    if !is_for_user(&msg, &uid) {
                        continue;
                    }
                    if sender.send(Message::Text(msg)).await.is_err() {
                        break;
                    }
                }
                // A slow client only needs the newest revision anyway
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(conn_id = %conn_id, skipped, "WebSocket subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let recv_user = user_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    tracing::debug!(user_id = %recv_user, message = %text, "WebSocket message received");
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::debug!(user_id = %user_id, conn_id = %conn_id, "WebSocket connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_for_user() {
        let msg = r#"{"type":"stats_changed","user_id":"u1","revision":3}"#;
        assert!(is_for_user(msg, "u1"));
        assert!(!is_for_user(msg, "u2"));
        assert!(!is_for_user(r#"{"type":"ping"}"#, "u1"));
        assert!(!is_for_user("not json", "u1"));
    }
}
