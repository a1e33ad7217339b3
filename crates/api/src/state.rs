use std::sync::Arc;

use huddle_config::Settings;
use huddle_services::{FileTranscriptStore, RoomStore, TranscriptService, TranscriptStore};

use crate::ws::storage::WsStorage;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub ws_storage: Arc<WsStorage>,
    pub rooms: Arc<RoomStore>,
    pub transcripts: Arc<TranscriptService>,
}

impl AppState {
    /// State backed by the transcripts directory named in `settings`.
    pub fn new(settings: Settings) -> Self {
        let store = Arc::new(FileTranscriptStore::new(&settings.transcripts.dir));
        Self::with_store(settings, store)
    }

    pub fn with_store(settings: Settings, store: Arc<dyn TranscriptStore>) -> Self {
        Self {
            settings: Arc::new(settings),
            ws_storage: Arc::new(WsStorage::new()),
            rooms: Arc::new(RoomStore::new()),
            transcripts: Arc::new(TranscriptService::new(store)),
        }
    }
}
