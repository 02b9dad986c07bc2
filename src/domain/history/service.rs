use super::analytics::{AnalyticsResponse, DEFAULT_ANALYTICS_DAYS, MAX_ANALYTICS_DAYS};
use super::error::HistoryError;
use super::model::{HistoryEntry, HistoryListResponse};
use crate::infrastructure::repositories::HistoryRepository;
use async_trait::async_trait;
use std::sync::Arc;

pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
pub const MAX_HISTORY_LIMIT: i64 = 50;

pub struct HistoryService {
    history_repo: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    pub fn new(history_repo: Arc<dyn HistoryRepository>) -> Self {
        Self { history_repo }
    }
}

#[async_trait]
pub trait HistoryServiceApi: Send + Sync {
    /// Most recent entries for a user, newest first.
    /// `limit` defaults to 10 and is clamped to 1..=50.
    async fn list_for_user(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<HistoryListResponse, HistoryError>;

    /// Daily aggregates across all users plus window totals.
    /// `days` defaults to 30 and is clamped to 1..=365.
    async fn analytics(&self, days: Option<i64>) -> Result<AnalyticsResponse, HistoryError>;

    /// Whether the backing store answers
    async fn is_reachable(&self) -> bool;
}

#[async_trait]
impl HistoryServiceApi for HistoryService {
    async fn list_for_user(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> Result<HistoryListResponse, HistoryError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(HistoryError::Invalid("userId is required".to_string()));
        }

        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);

        let records = self.history_repo.list_by_user(user_id, limit).await?;
        tracing::debug!(user_id = %user_id, count = records.len(), "History loaded");

        Ok(HistoryListResponse::new(
            records.into_iter().map(HistoryEntry::from).collect(),
        ))
    }

    async fn analytics(&self, days: Option<i64>) -> Result<AnalyticsResponse, HistoryError> {
        let days = days
            .unwrap_or(DEFAULT_ANALYTICS_DAYS)
            .clamp(1, MAX_ANALYTICS_DAYS);

        let rows = self.history_repo.daily_analytics(days).await?;
        tracing::debug!(days, rows = rows.len(), "Analytics loaded");

        Ok(AnalyticsResponse::new(rows))
    }

    async fn is_reachable(&self) -> bool {
        match self.history_repo.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "History store unreachable");
                false
            }
        }
    }
}
