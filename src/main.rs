mod bus;
mod config;
mod config_manager;
mod error;
mod events;
mod google_service;
mod ocr;
mod routes;
mod stages;
mod state;
mod storage;
mod translate;

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ocr_translate_pipeline=debug,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (config, source) = Config::discover()?;
    info!("Loaded configuration from: {}", source);
    config.validate()?;

    let system_config = config.system_config.clone();
    info!(
        "Target languages: {}",
        config.pipeline_config.target_languages.join(", ")
    );

    let app_state = AppState::new(config)?;

    let app = Router::new()
        .merge(routes::create_routes(&app_state))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr = format!("{}:{}", system_config.host, system_config.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
