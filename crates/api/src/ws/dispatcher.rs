use axum::extract::ws::Message;
use tracing::{debug, warn};

use super::protocol::ServerEvent;
use super::storage::WsStorage;

/// Who receives an outbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Every connection joined to the room, minus `except` when set.
    Room {
        room_id: String,
        except: Option<String>,
    },
    /// Exactly one connection.
    Connection(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub target: Target,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn to_room(room_id: &str, event: ServerEvent) -> Self {
        Self {
            target: Target::Room {
                room_id: room_id.to_string(),
                except: None,
            },
            event,
        }
    }

    pub fn to_room_except(room_id: &str, connection_id: &str, event: ServerEvent) -> Self {
        Self {
            target: Target::Room {
                room_id: room_id.to_string(),
                except: Some(connection_id.to_string()),
            },
            event,
        }
    }

    pub fn to_connection(connection_id: &str, event: ServerEvent) -> Self {
        Self {
            target: Target::Connection(connection_id.to_string()),
            event,
        }
    }
}

/// Delivers events in order. Fire-and-forget: a closed outbox only logs.
pub fn deliver(ws_storage: &WsStorage, outbound: impl IntoIterator<Item = Outbound>) {
    for Outbound { target, event } in outbound {
        match target {
            Target::Room { room_id, except } => {
                broadcast(ws_storage, &room_id, except.as_deref(), &event)
            }
            Target::Connection(connection_id) => send_to_connection(ws_storage, &connection_id, &event),
        }
    }
}

/// Broadcasts an event to all connections of a room.
pub fn broadcast(ws_storage: &WsStorage, room_id: &str, except: Option<&str>, event: &ServerEvent) {
    let text = event.to_text();
    let recipients = ws_storage.room_connection_ids(room_id);
    let mut sent = 0usize;
    for connection_id in recipients.iter().filter(|id| Some(id.as_str()) != except) {
        if send_text(ws_storage, connection_id, &text) {
            sent += 1;
        }
    }
    debug!(%room_id, kind = event.kind, sent, "WS event broadcast");
}

/// Sends an event to a specific connection by connection_id.
pub fn send_to_connection(ws_storage: &WsStorage, connection_id: &str, event: &ServerEvent) {
    send_text(ws_storage, connection_id, &event.to_text());
}

fn send_text(ws_storage: &WsStorage, connection_id: &str, text: &str) -> bool {
    let Some(sender) = ws_storage.get_sender(connection_id) else {
        return false;
    };
    if let Err(e) = sender.send(Message::text(text.to_string())) {
        warn!(%connection_id, %e, "Failed to queue WS message");
        return false;
    }
    true
}
