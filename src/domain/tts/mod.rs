pub mod dto;
pub mod error;
pub mod service;
pub mod validation;

pub use dto::{StatusResponse, TtsRequest, TtsResponse};
pub use error::TtsServiceError;
pub use service::{TtsService, TtsServiceApi, TtsSynthesisResult};
pub use validation::{
    text_length, RequestValidator, SynthesisRequest, ValidationError, MAX_TEXT_CHARS,
};
