pub mod catalog;

use serde::Serialize;

pub use catalog::{
    default_speed, default_voice, find_voice, is_supported_speed, is_within_provider_range,
    speeds, voices, SpeedOption, VoiceOption,
};

/// Response for GET /tts/voices
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub voices: &'static [VoiceOption],
    pub speeds: &'static [SpeedOption],
}

impl CatalogResponse {
    pub fn current() -> Self {
        Self {
            voices: voices(),
            speeds: speeds(),
        }
    }
}
