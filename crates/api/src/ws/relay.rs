//! Session event relay: applies each validated [`ClientEvent`] to the room
//! state and delivers the resulting events.
//!
//! Events whose author already rendered the change locally (strokes, fills,
//! document edits, media, cursor and pose) go to everyone else in the room.
//! Events where the server is the source of truth for ordering or timestamps
//! (chat, voice transcript, clear, avatar changes) go back to the author too.
//!
//! Room-state events are fanned out while the room lock is still held, so
//! every member receives them in the order the store applied them.

use huddle_services::room::{
    ChatMessage, Fill, Participant, RoomState, StateKind, Stroke, TranscriptSegment,
    WhiteboardAction,
};
use huddle_services::{SummaryProfile, now_millis, summarize};
use serde_json::json;
use tracing::{debug, info};

use super::dispatcher::{self, Outbound};
use super::protocol::{ClientEvent, FillPayload, JoinPayload, ServerEvent, StrokePayload, is_truthy};
use super::signaling;
use super::storage::Session;
use crate::state::AppState;

const DEFAULT_TOOL: &str = "pencil";

/// Applies one inbound event for `connection_id` and delivers its effects.
/// Room-scoped events from a connection that has not joined are no-ops.
pub async fn handle(state: &AppState, connection_id: &str, event: ClientEvent) {
    match event {
        ClientEvent::Ping => reply(state, connection_id, ServerEvent::bare("pong")),
        ClientEvent::Join(join) => handle_join(state, connection_id, join),
        ClientEvent::AiSummarize { text } => {
            let summary = summarize(&text, SummaryProfile::AdHoc);
            reply(
                state,
                connection_id,
                ServerEvent::new("ai:summary", json!({ "summary": summary })),
            );
        }
        ClientEvent::TranscriptList { room_id } => {
            let files = state.transcripts.list(&room_id).await;
            reply(
                state,
                connection_id,
                ServerEvent::new("transcript:list", json!({ "roomId": room_id, "files": files })),
            );
        }
        ClientEvent::TranscriptGet { room_id, file } => {
            let data = match state.transcripts.get(&room_id, file.as_deref().unwrap_or("")).await {
                Ok(data) => json!({ "roomId": room_id, "file": file, "data": data }),
                Err(e) => json!({ "roomId": room_id, "file": file, "error": e.code() }),
            };
            reply(state, connection_id, ServerEvent::new("transcript:get", data));
        }
        event => {
            let Some(session) = state.ws_storage.session(connection_id) else {
                debug!(%connection_id, event = event.name(), "Event before room:join, dropped");
                return;
            };
            handle_in_room(state, connection_id, session, event).await;
        }
    }
}

/// Forgets the connection and tells its room it left.
pub fn disconnect(state: &AppState, connection_id: &str) {
    if let Some(Session {
        room_id,
        participant,
    }) = state.ws_storage.remove(connection_id)
    {
        info!(%connection_id, %room_id, user_id = %participant.id, "Participant left");
        dispatcher::broadcast(
            &state.ws_storage,
            &room_id,
            None,
            &ServerEvent::new("presence:leave", &participant),
        );
    }
}

fn handle_join(state: &AppState, connection_id: &str, join: JoinPayload) {
    let JoinPayload {
        room_id,
        user_id,
        name,
        avatar,
    } = join;
    let participant = Participant {
        id: user_id,
        name: name.unwrap_or_default(),
        avatar,
    };

    let mut out = Vec::new();
    if let Some(previous) = state
        .ws_storage
        .join(connection_id, &room_id, participant.clone())
        && previous.room_id != room_id
    {
        out.push(Outbound::to_room(
            &previous.room_id,
            ServerEvent::new("presence:leave", &previous.participant),
        ));
    }

    // Touch the room so its state bags exist from the first join on.
    state.rooms.with_room(&room_id, |_| ());

    let roster = state.ws_storage.roster(&room_id, Some(connection_id));
    info!(
        %connection_id,
        %room_id,
        user_id = %participant.id,
        others = roster.len(),
        "Participant joined"
    );

    out.push(Outbound::to_room_except(
        &room_id,
        connection_id,
        ServerEvent::new("presence:join", &participant),
    ));
    out.push(Outbound::to_connection(
        connection_id,
        ServerEvent::new("presence:roster", &roster),
    ));
    dispatcher::deliver(&state.ws_storage, out);
}

async fn handle_in_room(
    state: &AppState,
    connection_id: &str,
    session: Session,
    event: ClientEvent,
) {
    let Session {
        room_id,
        participant,
    } = session;
    let room = room_id.as_str();
    let author = Some(connection_id);

    match event {
        ClientEvent::AvatarUpdate { avatar } => {
            if let Some(updated) = state.ws_storage.set_avatar(connection_id, avatar) {
                dispatcher::broadcast(
                    &state.ws_storage,
                    room,
                    None,
                    &ServerEvent::new("presence:update", &updated),
                );
            }
        }
        ClientEvent::AvatarPose(pose) => dispatcher::broadcast(
            &state.ws_storage,
            room,
            author,
            &ServerEvent::new("avatar:pose", pose),
        ),
        ClientEvent::CursorPos(pos) => dispatcher::broadcast(
            &state.ws_storage,
            room,
            author,
            &ServerEvent::new("cursor:pos", pos),
        ),
        ClientEvent::WhiteboardStroke(stroke) => {
            let action = stroke_action(stroke);
            commit(state, room, author, |r| {
                let event = ServerEvent::new("whiteboard:stroke", &action);
                r.whiteboard.actions.push(action);
                event
            });
        }
        ClientEvent::WhiteboardFill(fill) => {
            let action = fill_action(fill);
            commit(state, room, author, |r| {
                let event = ServerEvent::new("whiteboard:fill", &action);
                r.whiteboard.actions.push(action);
                event
            });
        }
        ClientEvent::WhiteboardClear => {
            commit(state, room, None, |r| {
                r.reset(StateKind::Whiteboard);
                ServerEvent::bare("whiteboard:clear")
            });
            debug!(%room_id, user_id = %participant.id, "Whiteboard cleared");
        }
        ClientEvent::WhiteboardRequestState => {
            state_reply(state, connection_id, room, StateKind::Whiteboard, "whiteboard:state")
        }
        ClientEvent::DocUpdate { text } => {
            commit(state, room, author, |r| {
                let event = ServerEvent::new("doc:update", json!({ "text": text }));
                r.document.text = text;
                event
            });
        }
        ClientEvent::DocRequestState => {
            state_reply(state, connection_id, room, StateKind::Document, "doc:state")
        }
        ClientEvent::MediaAdd { items } => {
            commit(state, room, author, |r| {
                let event = ServerEvent::new("media:add", json!({ "items": items }));
                r.media.items.extend(items);
                event
            });
        }
        ClientEvent::MediaRequestState => {
            state_reply(state, connection_id, room, StateKind::Media, "media:state")
        }
        ClientEvent::ChatMessage { text, cid } => {
            commit(state, room, None, |r| {
                let message = ChatMessage {
                    user_id: participant.id.clone(),
                    name: participant.display_name().to_string(),
                    text,
                    ts: now_millis(),
                    cid,
                };
                let event = ServerEvent::new("chat:message", &message);
                r.chat.messages.push(message);
                event
            });
        }
        ClientEvent::SttSegment { text } => {
            commit(state, room, None, |r| {
                let segment = TranscriptSegment {
                    user_id: participant.id.clone(),
                    name: participant.display_name().to_string(),
                    text,
                    ts: now_millis(),
                };
                let event = ServerEvent::new("stt:segment", &segment);
                r.transcript.segments.push(segment);
                event
            });
        }
        ClientEvent::SttRequestState => {
            state_reply(state, connection_id, room, StateKind::Transcript, "stt:state")
        }
        ClientEvent::SttSummary => {
            let spoken = state.rooms.with_room(room, |r| {
                r.transcript
                    .segments
                    .iter()
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            });
            let summary = summarize(&spoken, SummaryProfile::Transcript);
            reply(
                state,
                connection_id,
                ServerEvent::new("stt:summary", json!({ "summary": summary })),
            );
        }
        ClientEvent::WebrtcSignal(signal) => {
            let from = signal.from.unwrap_or_else(|| participant.id.clone());
            dispatcher::deliver(
                &state.ws_storage,
                signaling::relay(&state.ws_storage, room, &from, &signal.to, signal.data),
            );
        }
        ClientEvent::MeetingEnd => {
            let record = state.transcripts.end_meeting(&state.rooms, room).await;
            info!(
                %room_id,
                file = %record.file,
                ok = record.persisted,
                "Meeting ended"
            );
            reply(
                state,
                connection_id,
                ServerEvent::new(
                    "transcript:ready",
                    json!({
                        "roomId": room_id,
                        "file": record.file,
                        "ok": record.persisted,
                        "transcriptText": record.transcript.transcript_text,
                    }),
                ),
            );
        }
        // Handled before the session lookup.
        ClientEvent::Ping
        | ClientEvent::Join(_)
        | ClientEvent::AiSummarize { .. }
        | ClientEvent::TranscriptList { .. }
        | ClientEvent::TranscriptGet { .. } => {}
    }
}

/// Applies `mutate` to the room and broadcasts the event it returns before
/// the room lock is released.
fn commit(
    state: &AppState,
    room_id: &str,
    except: Option<&str>,
    mutate: impl FnOnce(&mut RoomState) -> ServerEvent,
) {
    state.rooms.with_room(room_id, |room| {
        let event = mutate(room);
        dispatcher::broadcast(&state.ws_storage, room_id, except, &event);
    });
}

/// Sends a bag snapshot under the room lock, so the reply cannot miss or
/// repeat an event broadcast around it.
fn state_reply(
    state: &AppState,
    connection_id: &str,
    room_id: &str,
    kind: StateKind,
    event: &'static str,
) {
    state.rooms.with_room(room_id, |room| {
        let event = ServerEvent::new(event, room.snapshot(kind));
        dispatcher::send_to_connection(&state.ws_storage, connection_id, &event);
    });
}

fn reply(state: &AppState, connection_id: &str, event: ServerEvent) {
    dispatcher::send_to_connection(&state.ws_storage, connection_id, &event);
}

fn stroke_action(stroke: StrokePayload) -> WhiteboardAction {
    let tool = if is_truthy(&stroke.tool) {
        stroke.tool
    } else {
        json!(DEFAULT_TOOL)
    };
    WhiteboardAction::Stroke(Stroke {
        tool,
        color: stroke.color,
        size: stroke.size,
        points: stroke.points,
    })
}

fn fill_action(fill: FillPayload) -> WhiteboardAction {
    WhiteboardAction::Fill(Fill {
        color: fill.color,
        x: fill.x,
        y: fill.y,
    })
}
