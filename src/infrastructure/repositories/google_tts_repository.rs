use super::speech_repository::{SpeechSynthesizer, SynthesisError, SynthesizedAudio};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const FALLBACK_ERROR_MESSAGE: &str = "TTS generation failed";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f64,
    pitch: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Google Cloud Text-to-Speech (REST, API key auth) implementation
pub struct GoogleTtsRepository {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    language_code: String,
}

impl GoogleTtsRepository {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        api_key: Option<String>,
        language_code: String,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            language_code,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/text:synthesize", self.base_url)
    }

    /// Pull the provider's message out of an error body, if it has one
    fn error_message(body: &str) -> String {
        serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .and_then(|error| error.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsRepository {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        speed: f64,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            tracing::error!("Google Cloud API key not configured");
            SynthesisError::NotConfigured
        })?;

        let start_time = std::time::Instant::now();

        tracing::info!(
            voice = voice_id,
            speed = speed,
            language_code = %self.language_code,
            text_length = text.chars().count(),
            "Calling Google Cloud TTS"
        );

        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: &self.language_code,
                name: voice_id,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: speed,
                pitch: 0.0,
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, voice = voice_id, "Google Cloud TTS request failed");
                SynthesisError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::error_message(&body);
            tracing::error!(
                status = status.as_u16(),
                error = %message,
                voice = voice_id,
                "Google Cloud TTS returned an error"
            );
            return Err(SynthesisError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let payload: SynthesizeResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Google Cloud TTS response was not valid JSON");
            SynthesisError::Decode(e.to_string())
        })?;

        let encoded = payload
            .audio_content
            .filter(|content| !content.is_empty())
            .ok_or(SynthesisError::EmptyAudio)?;
        let audio = SynthesizedAudio::from_base64(&encoded)?;

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "google",
            voice = voice_id,
            latency_ms = duration.as_millis(),
            characters_count = text.chars().count(),
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(audio)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
