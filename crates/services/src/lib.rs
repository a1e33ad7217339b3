pub mod room;
pub mod summarizer;
pub mod transcript;

pub use room::{RoomState, RoomStore, StateBag, StateKind};
pub use summarizer::{SummaryProfile, summarize};
pub use transcript::{CompiledTranscript, FileTranscriptStore, TranscriptService, TranscriptStore};

/// Server clock in epoch milliseconds, the unit of every `ts` on the wire.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
