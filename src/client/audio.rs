use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};

pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// Playable MP3 audio
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: AUDIO_MIME_TYPE,
        }
    }

    pub fn from_base64(encoded: &str) -> Result<Self, base64::DecodeError> {
        BASE64.decode(encoded.trim()).map(Self::new)
    }

    /// File name used for downloads, e.g. `hebvoice-1700000000000.mp3`
    pub fn download_file_name(at: DateTime<Utc>) -> String {
        format!("hebvoice-{}.mp3", at.timestamp_millis())
    }
}
