use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("history store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid input: {0}")]
    Invalid(String),
}

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Database(e) => AppError::Database(e),
            HistoryError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            HistoryError::Invalid(msg) => AppError::BadRequest(msg),
        }
    }
}
