use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::room::{ChatMessage, GUEST_NAME, TranscriptSegment};

use super::LookupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Voice,
    Chat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEvent {
    pub kind: EventKind,
    pub user_id: String,
    pub name: String,
    pub text: String,
    pub ts: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptParticipant {
    pub id: String,
    pub name: String,
}

/// The durable end-of-meeting record, stored as `<roomId>-<endedAt>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledTranscript {
    pub room_id: String,
    pub started_at: i64,
    pub ended_at: i64,
    pub participants: Vec<TranscriptParticipant>,
    pub events: Vec<TranscriptEvent>,
    pub transcript_text: String,
}

/// Merges voice segments and chat messages into one chronological transcript.
///
/// Voice entries are merged ahead of chat entries and the sort is stable, so
/// equal timestamps keep voice-before-chat and their original order.
pub fn compile(
    room_id: &str,
    segments: &[TranscriptSegment],
    messages: &[ChatMessage],
    now_ms: i64,
) -> CompiledTranscript {
    let mut events: Vec<TranscriptEvent> = segments
        .iter()
        .map(|s| TranscriptEvent {
            kind: EventKind::Voice,
            user_id: s.user_id.clone(),
            name: s.name.clone(),
            text: s.text.clone(),
            ts: s.ts,
        })
        .chain(messages.iter().map(|m| TranscriptEvent {
            kind: EventKind::Chat,
            user_id: m.user_id.clone(),
            name: m.name.clone(),
            text: m.text.clone(),
            ts: m.ts,
        }))
        .collect();
    events.sort_by_key(|e| e.ts);

    let participants = participants(&events);
    let started_at = events.first().map(|e| e.ts).unwrap_or(now_ms);
    let transcript_text = events.iter().map(render_line).collect::<Vec<_>>().join("\n");

    CompiledTranscript {
        room_id: room_id.to_string(),
        started_at,
        ended_at: now_ms,
        participants,
        events,
        transcript_text,
    }
}

/// Distinct speakers in order of first appearance, each with the last name
/// they used.
fn participants(events: &[TranscriptEvent]) -> Vec<TranscriptParticipant> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<TranscriptParticipant> = Vec::new();

    for event in events.iter().filter(|e| !e.user_id.is_empty()) {
        let name = if event.name.is_empty() {
            GUEST_NAME
        } else {
            &event.name
        };
        match index.get(event.user_id.as_str()) {
            Some(&i) => out[i].name = name.to_string(),
            None => {
                index.insert(&event.user_id, out.len());
                out.push(TranscriptParticipant {
                    id: event.user_id.clone(),
                    name: name.to_string(),
                });
            }
        }
    }
    out
}

/// `[2024-05-01T09:30:00.000Z] Al: hello`
pub fn render_line(event: &TranscriptEvent) -> String {
    let at = DateTime::from_timestamp_millis(event.ts)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default();
    format!("[{}] {}: {}", at, event.name, event.text)
}

pub fn file_name(room_id: &str, ended_at: i64) -> String {
    format!("{room_id}-{ended_at}.json")
}

/// Accepts only `<roomId>-….json` names without path separators.
pub fn validate_file_name(room_id: &str, file: &str) -> Result<(), LookupError> {
    let in_namespace = file.starts_with(&format!("{room_id}-")) && file.ends_with(".json");
    if !in_namespace || file.contains(['/', '\\']) {
        return Err(LookupError::BadFile);
    }
    Ok(())
}
