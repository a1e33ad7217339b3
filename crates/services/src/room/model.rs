use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Display name used when a participant joined without one.
pub const GUEST_NAME: &str = "Guest";

/// A participant as bound to one live connection at room-join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    /// Client-defined avatar blob, relayed untouched.
    #[serde(default)]
    pub avatar: Value,
}

impl Participant {
    /// Name to stamp on chat messages and transcript segments.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            GUEST_NAME
        } else {
            &self.name
        }
    }
}

/// A freehand stroke. Everything but the action tag is client-defined and
/// relayed as received; `points` entries are never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub tool: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub color: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub size: Value,
    pub points: Vec<Value>,
}

/// A flood fill at a numeric canvas position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub color: Value,
    pub x: Number,
    pub y: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WhiteboardAction {
    Stroke(Stroke),
    Fill(Fill),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhiteboardState {
    pub actions: Vec<WhiteboardAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaState {
    /// Shared files as sent by clients (typically `{name, type, dataUrl}`).
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    pub user_id: String,
    pub name: String,
    pub text: String,
    pub ts: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptState {
    pub segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub user_id: String,
    pub name: String,
    pub text: String,
    pub ts: i64,
    /// Client correlation id, echoed back so the sender can match its
    /// optimistic copy to the server-stamped one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
}
