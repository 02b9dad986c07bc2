use serde::Deserialize;
use std::env;

pub const DEFAULT_TTS_API_BASE_URL: &str = "https://texttospeech.googleapis.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Google Cloud TTS
    pub google_api_key: Option<String>,
    pub tts_api_base_url: String,
    pub tts_language_code: String,
    pub tts_timeout_secs: u64,
    pub strict_catalog: bool,
    // History
    pub database_url: Option<String>,
    pub history_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            google_api_key: non_empty_var("GOOGLE_AI_API_KEY")
                .or_else(|| non_empty_var("GOOGLE_CLOUD_API_KEY")),
            tts_api_base_url: env::var("TTS_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_TTS_API_BASE_URL.to_string()),
            tts_language_code: env::var("TTS_LANGUAGE_CODE")
                .unwrap_or_else(|_| "he-IL".to_string()),
            tts_timeout_secs: env::var("TTS_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            strict_catalog: parse_flag(env::var("TTS_STRICT_CATALOG").ok(), true),
            database_url: non_empty_var("DATABASE_URL"),
            history_enabled: parse_flag(env::var("HISTORY_ENABLED").ok(), true),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Whether a provider API key was found
    pub fn api_configured(&self) -> bool {
        self.google_api_key.is_some()
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_development() {
            "hebvoice_backend=debug,tower_http=debug"
        } else {
            "hebvoice_backend=info,tower_http=info"
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => match v.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => default,
        },
        None => default,
    }
}
