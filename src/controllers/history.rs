use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    domain::history::{AnalyticsResponse, HistoryListResponse, HistoryService, HistoryServiceApi},
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub user_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<i64>,
}

pub struct HistoryController {
    history_service: Option<Arc<HistoryService>>,
}

impl HistoryController {
    /// `None` means history is disabled for this deployment
    pub fn new(history_service: Option<Arc<HistoryService>>) -> Self {
        Self { history_service }
    }

    /// GET /tts/history?userId=..&limit=.. - Most recent requests of a user
    ///
    /// `userId` is asserted by the caller and not authenticated, so any caller
    /// can read the history of any user id it knows.
    pub async fn list(
        State(controller): State<Arc<HistoryController>>,
        query: Result<Query<HistoryQuery>, QueryRejection>,
    ) -> AppResult<Json<HistoryListResponse>> {
        let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

        let history_service = controller.history_service.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("History storage not configured".to_string())
        })?;

        let user_id = query
            .user_id
            .ok_or_else(|| AppError::BadRequest("userId is required".to_string()))?;

        let response = history_service.list_for_user(&user_id, query.limit).await?;
        Ok(Json(response))
    }

    /// GET /tts/analytics?days=.. - Daily usage aggregates across all users
    ///
    /// Unauthenticated: the aggregates carry no text or user ids, but any
    /// caller can read them.
    pub async fn analytics(
        State(controller): State<Arc<HistoryController>>,
        query: Result<Query<AnalyticsQuery>, QueryRejection>,
    ) -> AppResult<Json<AnalyticsResponse>> {
        let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

        let history_service = controller.history_service.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("History storage not configured".to_string())
        })?;

        let response = history_service.analytics(query.days).await?;
        Ok(Json(response))
    }
}
