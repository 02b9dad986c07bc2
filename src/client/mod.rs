//! Typed client for the HebVoice HTTP API, plus history reconstruction for
//! callers that keep anonymous history in a session store.

pub mod audio;
pub mod history;
pub mod session;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::history::HistoryListResponse;
use crate::domain::tts::{StatusResponse, TtsRequest, TtsResponse};
use crate::error::ErrorResponse;

pub use audio::AudioClip;
pub use history::HistoryReconstructor;
pub use session::{MemorySessionStore, SessionError, SessionStore};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success answer from the API, with its `error` message
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid audio payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Invalid session data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Voice as listed by GET /tts/voices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceListing {
    pub id: String,
    pub display_name: String,
}

/// Speed as listed by GET /tts/voices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedListing {
    pub id: f64,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogListing {
    pub voices: Vec<VoiceListing>,
    pub speeds: Vec<SpeedListing>,
}

#[derive(Clone)]
pub struct TtsClient {
    http: reqwest::Client,
    base_url: String,
}

impl TtsClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST /tts
    pub async fn synthesize(&self, request: &TtsRequest) -> Result<TtsResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/tts", self.base_url))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// GET /tts
    pub async fn status(&self) -> Result<StatusResponse, ClientError> {
        let response = self.http.get(format!("{}/tts", self.base_url)).send().await?;
        Self::decode(response).await
    }

    /// GET /tts/voices
    pub async fn voices(&self) -> Result<CatalogListing, ClientError> {
        let response = self
            .http
            .get(format!("{}/tts/voices", self.base_url))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// GET /tts/history
    pub async fn history(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<HistoryListResponse, ClientError> {
        let mut request = self
            .http
            .get(format!("{}/tts/history", self.base_url))
            .query(&[("userId", user_id)]);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        Self::decode(request.send().await?).await
    }

    /// Download raw bytes from an absolute URL
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: format!("Audio download failed with status {}", status),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                format!("Request failed with status {}", status)
            } else {
                body.to_string()
            }
        })
}
