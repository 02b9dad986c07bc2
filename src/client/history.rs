use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use super::audio::AudioClip;
use super::session::SessionStore;
use super::{ClientError, TtsClient};
use crate::domain::history::{text_prefix, AudioRef, HistoryEntry};
use crate::domain::tts::{TtsRequest, TtsResponse};

/// Session key holding anonymous history as a JSON array
pub const SESSION_HISTORY_KEY: &str = "tts_history";

/// How many durable entries are fetched for an identified user
pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// Rebuilds a caller's history from durable storage (identified users) or
/// from the session store (anonymous callers), and recovers playable audio
/// for each entry.
pub struct HistoryReconstructor {
    client: TtsClient,
    session: Arc<dyn SessionStore>,
}

impl HistoryReconstructor {
    pub fn new(client: TtsClient, session: Arc<dyn SessionStore>) -> Self {
        Self { client, session }
    }

    /// Most recent entries first. Identified users read durable history over
    /// HTTP, anonymous callers read this session's entries.
    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<HistoryEntry>, ClientError> {
        match user_id {
            Some(user_id) => Ok(self
                .client
                .history(user_id, Some(DEFAULT_LIST_LIMIT))
                .await?
                .entries),
            None => Ok(self.session_entries()),
        }
    }

    /// Synthesize `request`, remembering the result in the session when the
    /// caller is anonymous
    pub async fn generate(&self, request: TtsRequest) -> Result<TtsResponse, ClientError> {
        let response = self.client.synthesize(&request).await?;
        if request.user_id.is_none() {
            if let Err(e) = self.remember(&request, &response) {
                tracing::warn!(error = %e, "Session history not saved");
            }
        }
        Ok(response)
    }

    /// Prepend an entry for a successful synthesis to the session history.
    ///
    /// A full session store rejects the entry and keeps the previous history.
    pub fn remember(
        &self,
        request: &TtsRequest,
        response: &TtsResponse,
    ) -> Result<HistoryEntry, ClientError> {
        let audio_ref = match &response.audio_url {
            Some(url) => AudioRef::Url(url.clone()),
            None => AudioRef::Inline(response.audio_base64.clone()),
        };
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            text: text_prefix(request.text.as_deref().unwrap_or_default()),
            voice_id: request.voice.clone().unwrap_or_default(),
            speed: request.speed.unwrap_or(1.0),
            character_count: i32::try_from(response.character_count).unwrap_or(i32::MAX),
            created_at: Utc::now(),
            audio_ref: Some(audio_ref),
        };

        let mut entries = self.session_entries();
        entries.insert(0, entry.clone());

        let encoded = serde_json::to_string(&entries)?;
        self.session.set(SESSION_HISTORY_KEY, encoded)?;
        Ok(entry)
    }

    /// Recover playable audio for `entry`, if it carries any
    pub async fn audio(&self, entry: &HistoryEntry) -> Result<Option<AudioClip>, ClientError> {
        match &entry.audio_ref {
            Some(AudioRef::Inline(encoded)) => Ok(Some(AudioClip::from_base64(encoded)?)),
            Some(AudioRef::Url(url)) => {
                Ok(Some(AudioClip::new(self.client.fetch_bytes(url).await?)))
            }
            None => Ok(None),
        }
    }

    /// Write the entry's audio to `dir` as `hebvoice-<millis>.mp3`.
    /// Returns `None` when the entry has no recoverable audio.
    pub async fn download(
        &self,
        entry: &HistoryEntry,
        dir: &Path,
    ) -> Result<Option<PathBuf>, ClientError> {
        let Some(clip) = self.audio(entry).await? else {
            return Ok(None);
        };

        let path = dir.join(AudioClip::download_file_name(Utc::now()));
        tokio::fs::write(&path, &clip.bytes).await?;
        tracing::debug!(path = %path.display(), bytes = clip.bytes.len(), "Audio downloaded");
        Ok(Some(path))
    }

    fn session_entries(&self) -> Vec<HistoryEntry> {
        let Some(raw) = self.session.get(SESSION_HISTORY_KEY) else {
            return Vec::new();
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding unreadable session history");
            Vec::new()
        })
    }
}
