pub mod request_id;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    health::{self, Readiness},
    history::HistoryController,
    tts::TtsController,
};
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, X_REQUEST_ID};

/// Build the application router with all routes and layers
pub fn build_router(
    tts_controller: Arc<TtsController>,
    history_controller: Arc<HistoryController>,
    readiness: Arc<Readiness>,
) -> Router {
    // Synthesis, status and catalog
    let tts_routes = Router::new()
        .route("/tts", post(TtsController::synthesize).get(TtsController::status))
        .route("/tts/voices", get(TtsController::voices))
        .with_state(tts_controller);

    // Durable history and usage aggregates
    let history_routes = Router::new()
        .route("/tts/history", get(HistoryController::list))
        .route("/tts/analytics", get(HistoryController::analytics))
        .with_state(history_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(readiness)
        .merge(tts_routes)
        .merge(history_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
