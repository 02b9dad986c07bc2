use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

use crate::{
    domain::{
        tts::{StatusResponse, TtsRequest, TtsResponse, TtsService, TtsServiceApi},
        voice::CatalogResponse,
    },
    error::AppResult,
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /tts - Convert text to speech
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        payload: Result<Json<TtsRequest>, JsonRejection>,
    ) -> AppResult<Json<TtsResponse>> {
        let Json(request) = payload?;

        let result = controller.tts_service.synthesize(request).await?;

        Ok(Json(TtsResponse {
            success: true,
            audio_base64: result.audio.to_base64(),
            audio_url: result.audio_url,
            character_count: result.character_count,
        }))
    }

    /// GET /tts - Service status
    pub async fn status(State(controller): State<Arc<TtsController>>) -> Json<StatusResponse> {
        Json(StatusResponse {
            status: "ok".to_string(),
            api_configured: controller.tts_service.is_configured(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// GET /tts/voices - Voice and speed catalog
    pub async fn voices() -> Json<CatalogResponse> {
        Json(CatalogResponse::current())
    }
}
