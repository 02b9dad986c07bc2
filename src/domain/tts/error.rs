use super::validation::ValidationError;
use crate::error::AppError;
use crate::infrastructure::repositories::SynthesisError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(e) => AppError::BadRequest(e.to_string()),
            TtsServiceError::Synthesis(e) => AppError::ExternalService(e.to_string()),
        }
    }
}
