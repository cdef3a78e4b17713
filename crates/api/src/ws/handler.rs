use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use vidshelf_core::membership::{MembershipModel, Snapshot};

use crate::state::AppState;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct SnapshotMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a Snapshot,
}

fn snapshot_message(snapshot: &Snapshot) -> Option<Message> {
    let msg = SnapshotMessage {
        kind: "snapshot",
        data: snapshot,
    };
    match serde_json::to_string(&msg) {
        Ok(text) => Some(Message::Text(text.into())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize snapshot");
            None
        }
    }
}

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.membership))
}

/// Manage a single WebSocket connection after upgrade.
///
/// A spawned sender task pushes snapshots and heartbeat pings; the current
/// task drains inbound frames until the client goes away.
async fn handle_socket(socket: WebSocket, membership: Arc<MembershipModel>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let mut rx = membership.subscribe();
    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        // The first tick completes immediately.
        heartbeat.tick().await;

        let current = rx.borrow_and_update().clone();
        if let Some(msg) = snapshot_message(&current) {
            if sink.send(msg).await.is_err() {
                return;
            }
        }

        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = rx.borrow_and_update().clone();
                    let Some(msg) = snapshot_message(&snapshot) else {
                        continue;
                    };
                    if sink.send(msg).await.is_err() {
                        tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if sink.send(Message::Ping(Default::default())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
