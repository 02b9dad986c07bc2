use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// MP3 audio returned by a synthesis provider
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
}

impl SynthesizedAudio {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Decode a provider's base64 payload
    pub fn from_base64(encoded: &str) -> Result<Self, SynthesisError> {
        BASE64
            .decode(encoded.trim())
            .map(Self::new)
            .map_err(|e| SynthesisError::Decode(e.to_string()))
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Every way a synthesis call can fail. Never retried by callers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    #[error("Google Cloud API key not configured")]
    NotConfigured,

    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("TTS request failed: {0}")]
    Transport(String),

    #[error("Invalid audio content: {0}")]
    Decode(String),

    #[error("No audio content in response")]
    EmptyAudio,
}

/// Repository for speech synthesis.
/// Abstracts the underlying TTS provider so the request flow can be tested
/// without network access.
///
/// Implementations must issue exactly one provider call per invocation.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the provider voice `voice_id` at `speed`
    ///
    /// Returns MP3 audio ready for playback
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        speed: f64,
    ) -> Result<SynthesizedAudio, SynthesisError>;

    /// Whether credentials are present for the provider
    fn is_configured(&self) -> bool;
}
