//! WebSocket control channel: state push and inbound commands.
//!
//! Every connected console receives the full pool snapshot immediately on
//! connect and again after every mutation. Inbound frames carry
//! `{ cmd, slot }` commands, validated at this boundary; a reply frame is
//! sent once the command has fully completed.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use replayq_core::{Command, PoolView};

use crate::metrics::{WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_LAG_EVENTS, WS_MESSAGES_SENT};
use crate::state::AppState;

/// Seconds between keep-alive pings.
const HEARTBEAT_SECS: u64 = 30;

/// Inbound command frame.
#[derive(Debug, Deserialize)]
struct WireCommand {
    cmd: String,
    #[serde(default)]
    slot: i64,
}

/// Reply frame for an inbound command.
#[derive(Debug, Serialize)]
struct CommandReply {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl CommandReply {
    fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}

/// Broadcaster for pool snapshots using tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct WsBroadcaster {
    sender: broadcast::Sender<PoolView>,
}

impl WsBroadcaster {
    /// Create a new broadcaster with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcast a snapshot to all connected clients.
    pub fn broadcast(&self, view: PoolView) {
        // Ignore send errors - they just mean no one is listening
        let _ = self.sender.send(view);
    }

    /// Subscribe to receive snapshots.
    pub fn subscribe(&self) -> broadcast::Receiver<PoolView> {
        self.sender.subscribe()
    }
}

impl Default for WsBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sink, mut stream) = socket.split();

    // Single writer: the forward task and the command loop both queue
    // outbound frames here.
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(64);

    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();
    info!("control client connected");

    let writer_task = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if sink.send(msg).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
        }
    });

    // Late joiners get the full state without asking for it.
    if let Some(frame) = view_frame(&state.session().view()) {
        WS_MESSAGES_SENT.with_label_values(&["snapshot"]).inc();
        let _ = out_tx.send(frame).await;
    }

    // Forward every broadcast snapshot, with keep-alive pings in between.
    let mut rx = state.broadcaster().subscribe();
    let forward_tx = out_tx.clone();
    let forward_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(Duration::from_secs(HEARTBEAT_SECS));
        heartbeat.tick().await; // the first tick fires immediately
        loop {
            tokio::select! {
                result = rx.recv() => {
                    match result {
                        Ok(view) => {
                            let Some(frame) = view_frame(&view) else { continue };
                            WS_MESSAGES_SENT.with_label_values(&["state"]).inc();
                            if forward_tx.send(frame).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("control client lagged, skipped {} snapshots", n);
                            WS_LAG_EVENTS.inc();
                            // Keep receiving - the next snapshot is complete anyway
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            debug!("broadcast channel closed");
                            break;
                        }
                    }
                }
                _ = heartbeat.tick() => {
                    let payload = chrono::Utc::now().timestamp_millis().to_string();
                    if forward_tx.send(Message::Ping(payload.into_bytes().into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Inbound commands run synchronously from this client's perspective:
    // the reply goes out only after the session has finished the command.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let reply = process_command(&state, &text).await;
                WS_MESSAGES_SENT.with_label_values(&["reply"]).inc();
                match serde_json::to_string(&reply) {
                    Ok(json) => {
                        if out_tx.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => error!("failed to serialize command reply: {}", e),
                }
            }
            Ok(Message::Close(_)) => {
                debug!("control client requested close");
                break;
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // Pong is handled automatically by axum
            }
            Ok(_) => {
                // Ignore other message types
            }
            Err(e) => {
                warn!("WebSocket receive error: {}", e);
                break;
            }
        }
    }

    // Clean up
    forward_task.abort();
    writer_task.abort();
    WS_CONNECTIONS_ACTIVE.dec();
    info!("control client disconnected");
}

/// Validates and executes one inbound command frame.
async fn process_command(state: &AppState, text: &str) -> CommandReply {
    let wire: WireCommand = match serde_json::from_str(text) {
        Ok(wire) => wire,
        Err(e) => return CommandReply::error(format!("malformed command: {}", e)),
    };

    let cmd = match Command::parse(&wire.cmd, wire.slot, state.session().capacity()) {
        Ok(cmd) => cmd,
        Err(e) => {
            debug!("rejected command {:?}: {}", wire.cmd, e);
            return CommandReply::error(e.to_string());
        }
    };

    match state.session().execute(cmd).await {
        Ok(()) => CommandReply::ok(),
        Err(e) => CommandReply::error(e.to_string()),
    }
}

fn view_frame(view: &PoolView) -> Option<Message> {
    match serde_json::to_string(view) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            error!("failed to serialize pool view: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_reaches_subscriber() {
        let broadcaster = WsBroadcaster::default();
        let mut rx = broadcaster.subscribe();

        let view = PoolView {
            slots: vec![1, 2, 0],
            progress: false,
            transition: "fade".to_string(),
        };
        broadcaster.broadcast(view.clone());

        assert_eq!(rx.try_recv().unwrap(), view);
    }

    #[test]
    fn test_broadcast_without_subscribers_is_harmless() {
        let broadcaster = WsBroadcaster::default();
        broadcaster.broadcast(PoolView {
            slots: vec![0],
            progress: false,
            transition: "fade".to_string(),
        });
    }

    #[test]
    fn test_view_frame_is_the_wire_payload() {
        let view = PoolView {
            slots: vec![2, 1, 0],
            progress: true,
            transition: "dissolve".to_string(),
        };
        let frame = view_frame(&view).unwrap();
        match frame {
            Message::Text(text) => {
                assert_eq!(
                    text.as_str(),
                    r#"{"slots":[2,1,0],"progress":true,"transition":"dissolve"}"#
                );
            }
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    #[test]
    fn test_reply_serialization() {
        let ok = serde_json::to_string(&CommandReply::ok()).unwrap();
        assert_eq!(ok, r#"{"ok":true}"#);

        let err = serde_json::to_string(&CommandReply::error("unknown command: BOGUS")).unwrap();
        assert_eq!(err, r#"{"ok":false,"error":"unknown command: BOGUS"}"#);
    }
}
