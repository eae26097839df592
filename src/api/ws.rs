//! Realtime fanout over websockets
//!
//! ## Protocol
//!
//! Connect: `ws://host:port/ws`
//!
//! Messages (client → server):
//! - `save-wash-entry` - upsert a daily entry
//! - `save-weekly-action` - upsert a weekly action
//! - `ping` - keep-alive
//!
//! Messages (server → all clients):
//! - `wash-entry-updated` - full post-upsert daily entry
//! - `weekly-action-updated` - full post-upsert weekly action
//!
//! Delivery is best-effort: no sequence numbers, no acknowledgement, no
//! replay. A viewer that missed events catches up through the REST full
//! dumps on reconnect.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::SharedState;
use crate::models::{DailyEntry, WeeklyAction};
use crate::service;

/// Message broadcast from the server to every connected viewer
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    WashEntryUpdated { entry: DailyEntry },
    WeeklyActionUpdated { action: WeeklyAction },
}

/// Message received from a viewer
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    SaveWashEntry { entry: DailyEntry },
    SaveWeeklyAction { action: WeeklyAction },
    Ping,
}

/// Hub broadcasting accepted mutations to all connected viewers
pub struct FanoutHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl FanoutHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Broadcast an event. Send errors (no subscribers) are ignored.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for FanoutHub {
    fn default() -> Self {
        Self::new()
    }
}

/// GET /ws - upgrade to the realtime channel
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.hub.subscribe();

    info!("Viewer connected");

    loop {
        tokio::select! {
            // Fanout from the hub
            event = rx.recv() => {
                match event {
                    Ok(event) => match serde_json::to_string(&event) {
                        Ok(json) => {
                            if sender.send(Message::Text(json)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!(error = %e, "Failed to encode event"),
                    },
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // No replay; the viewer refetches over REST
                        warn!(skipped, "Viewer lagged behind fanout");
                        continue;
                    }
                }
            }

            // Message from the viewer
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_message(&state, &mut sender, &text).await;
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Viewer disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Websocket error");
                        break;
                    }
                    None => break,
                    _ => {}
                }
            }
        }
    }

    debug!("Viewer connection closed");
}

async fn handle_client_message(
    state: &SharedState,
    sender: &mut SplitSink<WebSocket, Message>,
    text: &str,
) {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(error = %e, "Malformed client message, ignoring");
            return;
        }
    };

    match msg {
        ClientMessage::SaveWashEntry { entry } => {
            service::save_wash_entry(state, entry).await;
        }
        ClientMessage::SaveWeeklyAction { action } => {
            service::save_weekly_action(state, action).await;
        }
        ClientMessage::Ping => {
            let pong = serde_json::json!({ "type": "pong" });
            let _ = sender.send(Message::Text(pong.to_string())).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_event_tags() {
        let event = ServerEvent::WashEntryUpdated {
            entry: DailyEntry {
                date: "2025-03-02".to_string(),
                team: "A".to_string(),
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"wash-entry-updated\""));

        let event = ServerEvent::WeeklyActionUpdated {
            action: WeeklyAction {
                action: "check scanners".to_string(),
                week_start: "2025-03-02".to_string(),
                team: "A".to_string(),
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"weekly-action-updated\""));
    }

    #[test]
    fn test_client_message_tags() {
        let json = r#"{"type":"save-wash-entry","entry":{"date":"2025-03-02","team":"A"}}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::SaveWashEntry { .. }));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }
}
