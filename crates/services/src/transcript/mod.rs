pub mod compiler;
pub mod store;

pub use compiler::{
    CompiledTranscript, EventKind, TranscriptEvent, TranscriptParticipant, compile, file_name,
    render_line, validate_file_name,
};
pub use store::{FileTranscriptStore, StoreError, TranscriptStore};

use std::sync::Arc;

use tracing::{info, warn};

use crate::room::RoomStore;

/// Why a stored transcript could not be returned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("file name does not belong to this room")]
    BadFile,
    #[error("transcript not found")]
    NotFound,
}

impl LookupError {
    /// Wire code carried in the `error` field of `transcript:get`.
    pub fn code(&self) -> &'static str {
        match self {
            LookupError::BadFile => "bad_file",
            LookupError::NotFound => "not_found",
        }
    }
}

/// Result of ending a meeting. The compiled transcript is always present;
/// `persisted` reports whether it reached the store.
#[derive(Debug, Clone)]
pub struct MeetingRecord {
    pub file: String,
    pub persisted: bool,
    pub transcript: CompiledTranscript,
}

/// Compiles meeting transcripts from room state and serves stored ones.
pub struct TranscriptService {
    store: Arc<dyn TranscriptStore>,
}

impl TranscriptService {
    pub fn new(store: Arc<dyn TranscriptStore>) -> Self {
        Self { store }
    }

    /// Compiles the room's voice segments and chat into one transcript and
    /// persists it. A persistence failure is logged and reported through
    /// [`MeetingRecord::persisted`], never returned as an error.
    pub async fn end_meeting(&self, rooms: &RoomStore, room_id: &str) -> MeetingRecord {
        let (segments, messages) = rooms.with_room(room_id, |room| {
            (
                room.transcript.segments.clone(),
                room.chat.messages.clone(),
            )
        });

        let transcript = compile(room_id, &segments, &messages, crate::now_millis());
        let file = file_name(room_id, transcript.ended_at);

        let persisted = match self.store.save(&file, &transcript).await {
            Ok(()) => {
                info!(%room_id, %file, events = transcript.events.len(), "Transcript saved");
                true
            }
            Err(e) => {
                warn!(%room_id, %file, %e, "Failed to save transcript");
                false
            }
        };

        MeetingRecord {
            file,
            persisted,
            transcript,
        }
    }

    /// Stored transcript file names for a room, lexically sorted. Store
    /// failures degrade to an empty list.
    pub async fn list(&self, room_id: &str) -> Vec<String> {
        let prefix = format!("{room_id}-");
        match self.store.list().await {
            Ok(names) => {
                let mut files: Vec<String> = names
                    .into_iter()
                    .filter(|name| name.starts_with(&prefix) && name.ends_with(".json"))
                    .collect();
                files.sort();
                files
            }
            Err(e) => {
                warn!(%room_id, %e, "Failed to list transcripts");
                Vec::new()
            }
        }
    }

    /// Loads one stored transcript. Names outside the room's
    /// `<roomId>-*.json` namespace are rejected before touching the store.
    pub async fn get(&self, room_id: &str, file: &str) -> Result<serde_json::Value, LookupError> {
        validate_file_name(room_id, file)?;
        self.store.load(file).await.map_err(|e| {
            warn!(%room_id, %file, %e, "Failed to load transcript");
            LookupError::NotFound
        })
    }
}
