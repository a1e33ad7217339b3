use axum::{
    extract::{State, WebSocketUpgrade, ws::{Message, WebSocket}},
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dispatcher;
use super::protocol::{ClientEvent, ServerEvent};
use super::relay;
use crate::state::AppState;

pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let max = state.settings.app.max_message_size;
    ws.max_message_size(max)
        .max_frame_size(max)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4().to_string();
    info!(%connection_id, "WebSocket connected");

    let (mut sink, mut receiver) = socket.split();
    let (sender, mut outbox) = mpsc::unbounded_channel::<Message>();

    // Writer task: owns the sink so dispatch never waits on a slow peer.
    let writer = tokio::spawn(async move {
        while let Some(msg) = outbox.recv().await {
            if sink.send(msg).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    state.ws_storage.add(connection_id.clone(), sender.clone());
    dispatcher::send_to_connection(
        &state.ws_storage,
        &connection_id,
        &ServerEvent::new("connected", json!({ "connectionId": connection_id })),
    );

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_client_message(&state, &connection_id, text.as_str()).await;
            }
            Ok(Message::Ping(data)) => {
                let _ = sender.send(Message::Pong(data));
            }
            Ok(Message::Close(_)) => {
                break;
            }
            Err(e) => {
                warn!(%connection_id, %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Cleanup
    relay::disconnect(&state, &connection_id);
    drop(sender);
    let _ = writer.await;

    info!(%connection_id, "WebSocket disconnected");
}

async fn handle_client_message(state: &AppState, connection_id: &str, text: &str) {
    let Some(event) = ClientEvent::parse(text) else {
        debug!(%connection_id, len = text.len(), "Malformed or unknown WS message dropped");
        return;
    };

    debug!(%connection_id, event = event.name(), "WS message received");

    relay::handle(state, connection_id, event).await;
}
