//! Playbook API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use playbook_core::clock::SystemClock;
use playbook_store::PgSnapshotRepository;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use playbook_api::config::ApiConfig;
use playbook_api::error::AppError;
use playbook_api::routes;
use playbook_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Playbook API server");

    let config = ApiConfig::from_env()?;

    let repository = PgSnapshotRepository::connect(&config.persistence).await?;
    repository.ensure_schema().await?;

    let app_state = AppState::new(Arc::new(SystemClock), Arc::new(repository));

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/scenarios", routes::scenarios::router())
        .nest("/api/v1/games", routes::games::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
