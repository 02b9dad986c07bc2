use super::dto::TtsRequest;
use crate::domain::voice;

/// Longest accepted text, in UTF-16 code units. Client-side counters are advisory.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Length of `text` as browsers report it: UTF-16 code units, so characters
/// outside the Basic Multilingual Plane (emoji) count twice.
pub fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub speed: f64,
    pub user_id: Option<String>,
}

impl SynthesisRequest {
    pub fn character_count(&self) -> usize {
        text_length(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields: text, voice, speed")]
    MissingFields,
    #[error("Text too long. Maximum {} characters.", MAX_TEXT_CHARS)]
    TextTooLong { length: usize },
    #[error("Unknown voice: {0}")]
    UnknownVoice(String),
    #[error("Unsupported speed: {0}")]
    UnsupportedSpeed(f64),
}

#[derive(Debug, Clone, Copy)]
pub struct RequestValidator {
    strict_catalog: bool,
}

impl RequestValidator {
    /// With `strict_catalog`, voice and speed must come from the voice catalog.
    /// Otherwise any voice id is passed through and speed only has to be in
    /// the provider's range.
    pub fn new(strict_catalog: bool) -> Self {
        Self { strict_catalog }
    }

    pub fn validate(&self, request: TtsRequest) -> Result<SynthesisRequest, ValidationError> {
        let text = request.text.filter(|t| !t.is_empty());
        let voice_id = request.voice.filter(|v| !v.is_empty());
        let (text, voice_id, speed) = match (text, voice_id, request.speed) {
            (Some(text), Some(voice_id), Some(speed)) => (text, voice_id, speed),
            _ => return Err(ValidationError::MissingFields),
        };

        let length = text_length(&text);
        if length > MAX_TEXT_CHARS {
            return Err(ValidationError::TextTooLong { length });
        }

        if self.strict_catalog {
            if voice::find_voice(&voice_id).is_none() {
                return Err(ValidationError::UnknownVoice(voice_id));
            }
            if !voice::is_supported_speed(speed) {
                return Err(ValidationError::UnsupportedSpeed(speed));
            }
        } else if !voice::is_within_provider_range(speed) {
            return Err(ValidationError::UnsupportedSpeed(speed));
        }

        let user_id = request
            .user_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Ok(SynthesisRequest {
            text,
            voice_id,
            speed,
            user_id,
        })
    }
}
