use hebvoice_backend::controllers::{
    health::Readiness, history::HistoryController, tts::TtsController,
};
use hebvoice_backend::domain::history::{HistoryRecorder, HistoryService};
use hebvoice_backend::domain::tts::{RequestValidator, TtsService};
use hebvoice_backend::infrastructure::config::{Config, LogFormat};
use hebvoice_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use hebvoice_backend::infrastructure::http::{build_router, start_http_server};
use hebvoice_backend::infrastructure::repositories::{
    GoogleTtsRepository, HistoryRepository, MemoryHistoryRepository, PgHistoryRepository,
    SpeechSynthesizer,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting HebVoice Backend on {}:{}",
        config.host,
        config.port
    );

    if !config.api_configured() {
        tracing::warn!(
            "Google Cloud API key not found (GOOGLE_AI_API_KEY / GOOGLE_CLOUD_API_KEY). \
             Synthesis requests will fail until it is configured"
        );
    }

    // Create the provider HTTP client with a caller-side timeout
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.tts_timeout_secs))
        .build()?;
    tracing::info!(
        base_url = %config.tts_api_base_url,
        language_code = %config.tts_language_code,
        timeout_secs = config.tts_timeout_secs,
        "Google Cloud TTS client initialized"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let speech_repo: Arc<dyn SpeechSynthesizer> = Arc::new(GoogleTtsRepository::new(
        http_client,
        config.tts_api_base_url.clone(),
        config.google_api_key.clone(),
        config.tts_language_code.clone(),
    ));
    let history_repo = create_history_repository(&config).await?;

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let history_recorder = history_repo
        .clone()
        .map(|repo| Arc::new(HistoryRecorder::new(repo)));
    let history_service = history_repo.map(|repo| Arc::new(HistoryService::new(repo)));
    let tts_service = Arc::new(TtsService::new(
        speech_repo.clone(),
        history_recorder,
        RequestValidator::new(config.strict_catalog),
    ));

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(TtsController::new(tts_service));
    let history_controller = Arc::new(HistoryController::new(history_service.clone()));
    let readiness = Arc::new(Readiness {
        history_service,
        tts_configured: speech_repo.is_configured(),
    });

    // Start HTTP server with all routes
    let app = build_router(tts_controller, history_controller, readiness);
    start_http_server(config, app).await?;

    Ok(())
}

/// Pick the history backend: PostgreSQL when DATABASE_URL is set, process
/// memory otherwise, nothing when history is disabled
async fn create_history_repository(
    config: &Config,
) -> Result<Option<Arc<dyn HistoryRepository>>, Box<dyn std::error::Error>> {
    if !config.history_enabled {
        tracing::info!("History disabled");
        return Ok(None);
    }

    match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url).await?;
            tracing::info!("Database connection pool created");

            check_connection(&pool).await?;
            tracing::info!("Database connection verified");

            run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            let repo: Arc<dyn HistoryRepository> =
                Arc::new(PgHistoryRepository::new(Arc::new(pool)));
            Ok(Some(repo))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; history is kept in memory and lost on restart");
            let repo: Arc<dyn HistoryRepository> = Arc::new(MemoryHistoryRepository::new());
            Ok(Some(repo))
        }
    }
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_log_filter().into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
