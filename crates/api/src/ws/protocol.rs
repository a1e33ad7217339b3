//! Wire format of the session socket: every frame is
//! `{"type": <event>, "data": <payload>}` in both directions.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// An event leaving the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerEvent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl ServerEvent {
    pub fn new(kind: &'static str, data: impl Serialize) -> Self {
        Self {
            kind,
            data: serde_json::to_value(data).unwrap_or(Value::Null),
        }
    }

    /// An event without payload.
    pub fn bare(kind: &'static str) -> Self {
        Self {
            kind,
            data: Value::Null,
        }
    }

    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub room_id: String,
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Value,
}

/// Only `points` is checked (a non-empty array); the rest is opaque.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StrokePayload {
    #[serde(default)]
    pub tool: Value,
    #[serde(default)]
    pub color: Value,
    #[serde(default)]
    pub size: Value,
    pub points: Vec<Value>,
}

/// Only numeric `x` and `y` gate a fill.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FillPayload {
    #[serde(default)]
    pub color: Value,
    pub x: Number,
    pub y: Number,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignalPayload {
    pub to: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
struct TextPayload {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChatPayload {
    text: String,
    #[serde(default)]
    cid: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct AvatarPayload {
    #[serde(default)]
    avatar: Value,
}

#[derive(Debug, Deserialize)]
struct MediaPayload {
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranscriptQuery {
    room_id: String,
    #[serde(default)]
    file: Option<String>,
}

/// An event arriving from a participant, already validated.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Ping,
    Join(JoinPayload),
    AvatarUpdate { avatar: Value },
    AvatarPose(Value),
    CursorPos(Value),
    WhiteboardStroke(StrokePayload),
    WhiteboardFill(FillPayload),
    WhiteboardClear,
    WhiteboardRequestState,
    DocUpdate { text: String },
    DocRequestState,
    MediaAdd { items: Vec<Value> },
    MediaRequestState,
    ChatMessage { text: String, cid: Option<Value> },
    SttSegment { text: String },
    SttRequestState,
    SttSummary,
    AiSummarize { text: String },
    WebrtcSignal(SignalPayload),
    MeetingEnd,
    TranscriptList { room_id: String },
    TranscriptGet { room_id: String, file: Option<String> },
}

impl ClientEvent {
    /// Wire name of the event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Ping => "ping",
            ClientEvent::Join(_) => "room:join",
            ClientEvent::AvatarUpdate { .. } => "avatar:update",
            ClientEvent::AvatarPose(_) => "avatar:pose",
            ClientEvent::CursorPos(_) => "cursor:pos",
            ClientEvent::WhiteboardStroke(_) => "whiteboard:stroke",
            ClientEvent::WhiteboardFill(_) => "whiteboard:fill",
            ClientEvent::WhiteboardClear => "whiteboard:clear",
            ClientEvent::WhiteboardRequestState => "whiteboard:requestState",
            ClientEvent::DocUpdate { .. } => "doc:update",
            ClientEvent::DocRequestState => "doc:requestState",
            ClientEvent::MediaAdd { .. } => "media:add",
            ClientEvent::MediaRequestState => "media:requestState",
            ClientEvent::ChatMessage { .. } => "chat:message",
            ClientEvent::SttSegment { .. } => "stt:segment",
            ClientEvent::SttRequestState => "stt:requestState",
            ClientEvent::SttSummary => "stt:summary",
            ClientEvent::AiSummarize { .. } => "ai:summarize",
            ClientEvent::WebrtcSignal(_) => "webrtc:signal",
            ClientEvent::MeetingEnd => "meeting:end",
            ClientEvent::TranscriptList { .. } => "transcript:list",
            ClientEvent::TranscriptGet { .. } => "transcript:get",
        }
    }

    /// Parses and validates one inbound frame. Anything malformed, unknown
    /// or failing validation yields `None` and is dropped by the caller.
    pub fn parse(text: &str) -> Option<Self> {
        let mut frame: Value = serde_json::from_str(text).ok()?;
        let kind = frame.get("type")?.as_str()?.to_string();
        let data = frame
            .get_mut("data")
            .map(Value::take)
            .unwrap_or(Value::Null);
        Self::from_parts(&kind, data)
    }

    fn from_parts(kind: &str, data: Value) -> Option<Self> {
        let event = match kind {
            "ping" => ClientEvent::Ping,
            "room:join" => {
                let join: JoinPayload = payload(data)?;
                if join.room_id.is_empty() || join.user_id.is_empty() {
                    return None;
                }
                ClientEvent::Join(join)
            }
            "avatar:update" => {
                let AvatarPayload { avatar } = payload(data)?;
                if !is_truthy(&avatar) {
                    return None;
                }
                ClientEvent::AvatarUpdate { avatar }
            }
            "avatar:pose" => ClientEvent::AvatarPose(data),
            "cursor:pos" => ClientEvent::CursorPos(data),
            "whiteboard:stroke" => {
                let stroke: StrokePayload = payload(data)?;
                if stroke.points.is_empty() {
                    return None;
                }
                ClientEvent::WhiteboardStroke(stroke)
            }
            "whiteboard:fill" => ClientEvent::WhiteboardFill(payload(data)?),
            "whiteboard:clear" => ClientEvent::WhiteboardClear,
            "whiteboard:requestState" => ClientEvent::WhiteboardRequestState,
            "doc:update" => {
                let TextPayload { text } = payload(data)?;
                ClientEvent::DocUpdate { text }
            }
            "doc:requestState" => ClientEvent::DocRequestState,
            "media:add" => {
                let MediaPayload { items } = payload(data)?;
                if items.is_empty() {
                    return None;
                }
                ClientEvent::MediaAdd { items }
            }
            "media:requestState" => ClientEvent::MediaRequestState,
            "chat:message" => {
                let ChatPayload { text, cid } = payload(data)?;
                ClientEvent::ChatMessage { text, cid }
            }
            "stt:segment" => {
                let TextPayload { text } = payload(data)?;
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                ClientEvent::SttSegment {
                    text: text.to_string(),
                }
            }
            "stt:requestState" => ClientEvent::SttRequestState,
            "stt:summary" => ClientEvent::SttSummary,
            "ai:summarize" => {
                let TextPayload { text } = payload(data)?;
                ClientEvent::AiSummarize { text }
            }
            "webrtc:signal" => ClientEvent::WebrtcSignal(payload(data)?),
            "meeting:end" => ClientEvent::MeetingEnd,
            "transcript:list" => {
                let TranscriptQuery { room_id, .. } = payload(data)?;
                ClientEvent::TranscriptList { room_id }
            }
            "transcript:get" => {
                let TranscriptQuery { room_id, file } = payload(data)?;
                ClientEvent::TranscriptGet { room_id, file }
            }
            _ => return None,
        };
        Some(event)
    }
}

fn payload<T: serde::de::DeserializeOwned>(data: Value) -> Option<T> {
    serde_json::from_value(data).ok()
}

/// JavaScript truthiness, which is what clients mean by "avatar present".
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
