use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_ANALYTICS_DAYS: i64 = 30;
pub const MAX_ANALYTICS_DAYS: i64 = 365;

/// Aggregated synthesis activity for one UTC day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyAnalytics {
    pub date: NaiveDate,
    pub total_requests: i64,
    pub total_characters: i64,
    pub unique_users: i64,
    /// Most requested voice of the day; ties go to the smallest identifier
    pub popular_voice: Option<String>,
    pub avg_text_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsTotals {
    pub total_requests: i64,
    pub total_characters: i64,
    /// Busiest day's distinct users, not a distinct count over the window
    pub total_users: i64,
    pub avg_requests_per_day: i64,
}

/// Response for GET /tts/analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    /// Newest day first
    pub days: Vec<DailyAnalytics>,
    pub totals: AnalyticsTotals,
}

impl AnalyticsResponse {
    pub fn new(days: Vec<DailyAnalytics>) -> Self {
        let total_requests: i64 = days.iter().map(|d| d.total_requests).sum();
        let total_characters = days.iter().map(|d| d.total_characters).sum();
        let total_users = days.iter().map(|d| d.unique_users).max().unwrap_or(0);
        let avg_requests_per_day = if days.is_empty() {
            0
        } else {
            (total_requests as f64 / days.len() as f64).round() as i64
        };

        Self {
            totals: AnalyticsTotals {
                total_requests,
                total_characters,
                total_users,
                avg_requests_per_day,
            },
            days,
        }
    }
}
