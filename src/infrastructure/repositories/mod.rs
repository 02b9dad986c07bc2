pub mod google_tts_repository;
pub mod history_repository;
pub mod speech_repository;

pub use google_tts_repository::GoogleTtsRepository;
pub use history_repository::{HistoryRepository, MemoryHistoryRepository, PgHistoryRepository};
pub use speech_repository::{SpeechSynthesizer, SynthesisError, SynthesizedAudio};
