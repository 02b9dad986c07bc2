use super::model::NewHistoryEntry;
use crate::infrastructure::repositories::HistoryRepository;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Best-effort writer of synthesis history.
///
/// Nothing here returns an error: a failed write ends in a log line and the
/// entry is dropped. Writes are not transactional with synthesis, so a crash
/// between the two loses that entry.
pub struct HistoryRecorder {
    history_repo: Arc<dyn HistoryRepository>,
}

impl HistoryRecorder {
    pub fn new(history_repo: Arc<dyn HistoryRepository>) -> Self {
        Self { history_repo }
    }

    /// Write one entry, swallowing any failure
    pub async fn save(&self, entry: NewHistoryEntry) {
        match self.history_repo.insert(&entry).await {
            Ok(record) => {
                tracing::debug!(
                    history_id = %record.id,
                    user_id = %record.user_id,
                    character_count = record.character_count,
                    "History entry saved"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    user_id = %entry.user_id,
                    voice = %entry.voice,
                    "Failed to save history entry"
                );
            }
        }
    }

    /// Write one entry on a detached task. The handle may be dropped.
    pub fn spawn_save(self: &Arc<Self>, entry: NewHistoryEntry) -> JoinHandle<()> {
        let recorder = Arc::clone(self);
        tokio::spawn(async move { recorder.save(entry).await })
    }
}
