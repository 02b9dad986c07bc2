use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::history::{HistoryService, HistoryServiceApi};

/// Dependencies checked by the readiness check
pub struct Readiness {
    pub history_service: Option<Arc<HistoryService>>,
    pub tts_configured: bool,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(readiness): State<Arc<Readiness>>) -> impl IntoResponse {
    let tts = if readiness.tts_configured {
        "configured"
    } else {
        "not_configured"
    };

    let history = match &readiness.history_service {
        None => "disabled",
        Some(service) => {
            if service.is_reachable().await {
                "connected"
            } else {
                "disconnected"
            }
        }
    };

    if history == "disconnected" {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "history": history,
                "tts": tts
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "history": history,
            "tts": tts
        })),
    )
}
