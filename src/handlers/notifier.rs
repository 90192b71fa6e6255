//! WebSocket subscription handlers.
//!
//! - GET /ws/topic/leaderboard - accounts by descending balance
//! - GET /ws/topic/outcomes - accounts in store order
//!
//! Each connection gets its own notifier loop. The loop ends when the client
//! goes away, when a push fails, or when the server shuts down.

use crate::{
    app::AppState,
    services::notifier::{NotifierError, Snapshot, SnapshotSink, View},
};
use async_trait::async_trait;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use serde_json::json;
use uuid::Uuid;

/// Subscribe to leaderboard updates.
pub async fn leaderboard(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| serve_subscriber(socket, state, View::Leaderboard))
}

/// Subscribe to raw account updates.
pub async fn outcomes(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| serve_subscriber(socket, state, View::Raw))
}

/// Pushes snapshots as JSON text frames.
struct WsSink {
    sender: SplitSink<WebSocket, Message>,
}

impl WsSink {
    async fn send_json(&mut self, value: &impl serde::Serialize) -> Result<(), NotifierError> {
        let text = serde_json::to_string(value).map_err(|e| NotifierError::Push(e.to_string()))?;
        self.sender
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| NotifierError::Push(e.to_string()))
    }
}

#[async_trait]
impl SnapshotSink for WsSink {
    async fn push(&mut self, snapshot: &Snapshot) -> Result<(), NotifierError> {
        self.send_json(snapshot).await
    }
}

/// Resolves when the client closes the connection or the socket errors.
///
/// Anything the client sends before that is ignored.
async fn disconnected(mut receiver: SplitStream<WebSocket>) {
    while let Some(message) = receiver.next().await {
        if matches!(message, Ok(Message::Close(_)) | Err(_)) {
            break;
        }
    }
}

async fn serve_subscriber(socket: WebSocket, state: AppState, view: View) {
    let connection_id = Uuid::new_v4();
    let channel = view.channel();
    tracing::info!(%connection_id, channel, "subscriber connected");

    let (sender, receiver) = socket.split();
    let mut sink = WsSink { sender };

    let shutdown = state.shutdown.clone();
    let cancelled = async move {
        tokio::select! {
            _ = disconnected(receiver) => {}
            _ = shutdown.wait() => {}
        }
    };

    match state.notifier.run(view, &mut sink, cancelled).await {
        Ok(()) => {
            tracing::info!(%connection_id, channel, "subscriber closed");
        }
        Err(NotifierError::Store(e)) => {
            tracing::error!(%connection_id, channel, error = %e, "subscriber loop failed");
            // Best effort; the connection is closing either way.
            let _ = sink.send_json(&json!({ "error": "couldn't find users" })).await;
        }
        Err(NotifierError::Push(e)) => {
            tracing::warn!(%connection_id, channel, error = %e, "push failed, dropping subscriber");
        }
    }

    let _ = sink.sender.close().await;
}
