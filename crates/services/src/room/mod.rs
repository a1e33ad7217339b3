pub mod model;
pub mod store;

pub use model::{
    ChatMessage, ChatState, DocumentState, Fill, MediaState, Participant, Stroke,
    TranscriptSegment, TranscriptState, WhiteboardAction, WhiteboardState, GUEST_NAME,
};
pub use store::RoomStore;

use serde::Serialize;

/// The five per-room state bags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Whiteboard,
    Document,
    Media,
    Transcript,
    Chat,
}

/// A snapshot of one state bag. Serializes to the bag's own wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StateBag {
    Whiteboard(WhiteboardState),
    Document(DocumentState),
    Media(MediaState),
    Transcript(TranscriptState),
    Chat(ChatState),
}

/// All shared state of one room. Only reachable through [`RoomStore`].
#[derive(Debug, Default)]
pub struct RoomState {
    pub whiteboard: WhiteboardState,
    pub document: DocumentState,
    pub media: MediaState,
    pub transcript: TranscriptState,
    pub chat: ChatState,
}

impl RoomState {
    pub fn snapshot(&self, kind: StateKind) -> StateBag {
        match kind {
            StateKind::Whiteboard => StateBag::Whiteboard(self.whiteboard.clone()),
            StateKind::Document => StateBag::Document(self.document.clone()),
            StateKind::Media => StateBag::Media(self.media.clone()),
            StateKind::Transcript => StateBag::Transcript(self.transcript.clone()),
            StateKind::Chat => StateBag::Chat(self.chat.clone()),
        }
    }

    pub fn reset(&mut self, kind: StateKind) {
        match kind {
            StateKind::Whiteboard => self.whiteboard = WhiteboardState::default(),
            StateKind::Document => self.document = DocumentState::default(),
            StateKind::Media => self.media = MediaState::default(),
            StateKind::Transcript => self.transcript = TranscriptState::default(),
            StateKind::Chat => self.chat = ChatState::default(),
        }
    }
}
