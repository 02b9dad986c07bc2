use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Longest text prefix kept in a history entry, in characters
pub const HISTORY_TEXT_PREFIX_CHARS: usize = 200;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Row of the `tts_requests` table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub user_id: String,
    pub text: String,
    pub voice: String,
    pub speed: f64,
    pub character_count: i32,
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Metadata written after a successful synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryEntry {
    pub user_id: String,
    pub text: String,
    pub voice: String,
    pub speed: f64,
    pub character_count: i32,
    pub audio_url: Option<String>,
}

impl NewHistoryEntry {
    /// Build an entry for `text`, keeping only a normalized prefix of it
    pub fn new(
        user_id: String,
        text: &str,
        voice: String,
        speed: f64,
        character_count: usize,
    ) -> Self {
        Self {
            user_id,
            text: text_prefix(text),
            voice,
            speed,
            character_count: i32::try_from(character_count).unwrap_or(i32::MAX),
            audio_url: None,
        }
    }

    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> HistoryRecord {
        HistoryRecord {
            id,
            user_id: self.user_id,
            text: self.text,
            voice: self.voice,
            speed: self.speed,
            character_count: self.character_count,
            audio_url: self.audio_url,
            created_at,
        }
    }
}

/// Where the audio of a history entry can be recovered from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum AudioRef {
    /// Base64 MP3 payload kept alongside the entry
    Inline(String),
    /// Publicly resolvable URL
    Url(String),
}

/// A past synthesis request as shown to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub text: String,
    pub voice_id: String,
    pub speed: f64,
    pub character_count: i32,
    pub created_at: DateTime<Utc>,
    pub audio_ref: Option<AudioRef>,
}

impl From<HistoryRecord> for HistoryEntry {
    fn from(record: HistoryRecord) -> Self {
        Self {
            id: record.id,
            text: record.text,
            voice_id: record.voice,
            speed: record.speed,
            character_count: record.character_count,
            created_at: record.created_at,
            audio_ref: record.audio_url.map(AudioRef::Url),
        }
    }
}

/// Response for GET /tts/history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListResponse {
    pub entries: Vec<HistoryEntry>,
    pub total_characters: i64,
}

impl HistoryListResponse {
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        let total_characters = entries.iter().map(|e| i64::from(e.character_count)).sum();
        Self {
            entries,
            total_characters,
        }
    }
}

/// Collapse whitespace and cut `text` to at most [`HISTORY_TEXT_PREFIX_CHARS`] characters
pub fn text_prefix(text: &str) -> String {
    let normalized = WHITESPACE.replace_all(text.trim(), " ");
    normalized.chars().take(HISTORY_TEXT_PREFIX_CHARS).collect()
}
