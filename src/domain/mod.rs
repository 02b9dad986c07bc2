pub mod history;
pub mod tts;
pub mod voice;
