use serde_json::{Value, json};
use tracing::debug;

use super::dispatcher::Outbound;
use super::protocol::ServerEvent;
use super::storage::WsStorage;

/// Routes a WebRTC negotiation payload to the one connection in `room_id`
/// bound to participant `to`. A target that left (or never joined) makes
/// this a no-op: signaling is not queued or retried.
pub fn relay(
    ws_storage: &WsStorage,
    room_id: &str,
    from: &str,
    to: &str,
    data: Value,
) -> Option<Outbound> {
    let Some(connection_id) = ws_storage.find_connection(room_id, to) else {
        debug!(%room_id, %from, %to, "Signal target not in room, dropped");
        return None;
    };
    Some(Outbound::to_connection(
        &connection_id,
        ServerEvent::new("webrtc:signal", json!({ "from": from, "data": data })),
    ))
}
