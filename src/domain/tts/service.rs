use super::dto::TtsRequest;
use super::error::TtsServiceError;
use super::validation::{RequestValidator, SynthesisRequest};
use crate::domain::history::{HistoryRecorder, NewHistoryEntry};
use crate::infrastructure::repositories::{SpeechSynthesizer, SynthesizedAudio};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TtsSynthesisResult {
    pub audio: SynthesizedAudio,
    pub character_count: usize,
    /// Only set by persistence strategies that upload audio; inline metadata never does.
    pub audio_url: Option<String>,
}

pub struct TtsService {
    speech_repo: Arc<dyn SpeechSynthesizer>,
    history_recorder: Option<Arc<HistoryRecorder>>,
    validator: RequestValidator,
}

impl TtsService {
    pub fn new(
        speech_repo: Arc<dyn SpeechSynthesizer>,
        history_recorder: Option<Arc<HistoryRecorder>>,
        validator: RequestValidator,
    ) -> Self {
        Self {
            speech_repo,
            history_recorder,
            validator,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Turn a raw request into speech
    ///
    /// This operation:
    /// - Validates the request (fields present, text length, catalog)
    /// - Calls the synthesis provider exactly once
    /// - Hands history to the recorder on a detached task when a user id is present
    ///
    /// History failures never reach the caller.
    async fn synthesize(&self, request: TtsRequest) -> Result<TtsSynthesisResult, TtsServiceError>;

    /// Whether the synthesis provider has credentials
    fn is_configured(&self) -> bool;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(&self, request: TtsRequest) -> Result<TtsSynthesisResult, TtsServiceError> {
        // 1. Validate
        let request = self.validator.validate(request).map_err(|e| {
            tracing::info!(error = %e, "TTS request rejected");
            e
        })?;
        let character_count = request.character_count();

        tracing::info!(
            voice = %request.voice_id,
            speed = request.speed,
            character_count = character_count,
            has_user = request.user_id.is_some(),
            "TTS synthesis request"
        );

        // 2. Synthesize
        let audio = self
            .speech_repo
            .synthesize(&request.text, &request.voice_id, request.speed)
            .await?;

        // 3. Persist, off the response path
        self.record_history(&request, character_count);

        // 4. Respond
        Ok(TtsSynthesisResult {
            audio,
            character_count,
            audio_url: None,
        })
    }

    fn is_configured(&self) -> bool {
        self.speech_repo.is_configured()
    }
}

impl TtsService {
    fn record_history(&self, request: &SynthesisRequest, character_count: usize) {
        let (Some(user_id), Some(recorder)) = (&request.user_id, &self.history_recorder) else {
            return;
        };

        let entry = NewHistoryEntry::new(
            user_id.clone(),
            &request.text,
            request.voice_id.clone(),
            request.speed,
            character_count,
        );
        recorder.spawn_save(entry);
    }
}
