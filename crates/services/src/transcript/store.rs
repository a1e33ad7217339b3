use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use super::CompiledTranscript;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid transcript name: {0}")]
    InvalidName(String),
}

/// Durable home of compiled transcripts, addressed by file name.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn save(&self, file: &str, transcript: &CompiledTranscript) -> Result<(), StoreError>;

    /// All stored file names, unfiltered and unsorted.
    async fn list(&self) -> Result<Vec<String>, StoreError>;

    async fn load(&self, file: &str) -> Result<serde_json::Value, StoreError>;
}

/// One pretty-printed JSON file per transcript in a flat directory.
pub struct FileTranscriptStore {
    dir: PathBuf,
}

impl FileTranscriptStore {
    /// Opens `dir`, creating it if missing. A directory that cannot be
    /// created is only logged; saves will then fail individually.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(dir = %dir.display(), %e, "Failed to create transcripts directory");
        }
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, file: &str) -> Result<PathBuf, StoreError> {
        let name = Path::new(file);
        if name.file_name().map(|n| n == name.as_os_str()) != Some(true) {
            return Err(StoreError::InvalidName(file.to_string()));
        }
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl TranscriptStore for FileTranscriptStore {
    async fn save(&self, file: &str, transcript: &CompiledTranscript) -> Result<(), StoreError> {
        let path = self.path_of(file)?;
        let body = serde_json::to_string_pretty(transcript)?;
        tokio::fs::write(path, body).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    async fn load(&self, file: &str) -> Result<serde_json::Value, StoreError> {
        let path = self.path_of(file)?;
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}
