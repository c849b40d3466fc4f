//! JSON-file conversation store.
//!
//! Implements `ConversationStore` from `gatechat-core` with the whole log
//! kept in one file, `{data_dir}/conversation.json`, as a JSON array of
//! messages (oldest first). Only the most recent [`STORE_CAPACITY`]
//! messages are kept.
//!
//! Writes go to a sibling temp file that is then renamed over the real one,
//! so a crash mid-write never leaves a truncated conversation behind.

use std::path::{Path, PathBuf};

use gatechat_core::store::ConversationStore;
use gatechat_types::config::STORE_CAPACITY;
use gatechat_types::error::StoreError;
use gatechat_types::message::Message;

use crate::filesystem::conversation_path;

pub struct JsonFileStore {
    path: PathBuf,
    capacity: usize,
}

impl JsonFileStore {
    /// Store backed by `{data_dir}/conversation.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self::at(conversation_path(data_dir))
    }

    /// Store backed by an explicit file path.
    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            capacity: STORE_CAPACITY,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn most_recent<'a>(&self, messages: &'a [Message]) -> &'a [Message] {
        &messages[messages.len().saturating_sub(self.capacity)..]
    }
}

impl ConversationStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Message>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored conversation");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::Io(format!("{}: {e}", self.path.display()))),
        };

        let messages: Vec<Message> = serde_json::from_str(&content)
            .map_err(|e| StoreError::Serialization(format!("{}: {e}", self.path.display())))?;

        Ok(self.most_recent(&messages).to_vec())
    }

    async fn save(&self, messages: &[Message]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self.most_recent(messages))
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(format!("{}: {e}", parent.display())))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {e}", temp.display())))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {e}", self.path.display())))?;

        tracing::trace!(message_count = messages.len().min(self.capacity), "conversation saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(format!("{}: {e}", self.path.display()))),
        }
    }
}
