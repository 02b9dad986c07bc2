pub mod analytics;
pub mod error;
pub mod model;
pub mod recorder;
pub mod service;

pub use analytics::{AnalyticsResponse, AnalyticsTotals, DailyAnalytics};
pub use error::HistoryError;
pub use model::{
    text_prefix, AudioRef, HistoryEntry, HistoryListResponse, HistoryRecord, NewHistoryEntry,
};
pub use recorder::HistoryRecorder;
pub use service::{HistoryService, HistoryServiceApi};
