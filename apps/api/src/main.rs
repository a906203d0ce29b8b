mod config;
mod draft;
mod errors;
mod models;
mod resume_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::draft::session::SessionRegistry;
use crate::resume_client::ResumeApiClient;
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    let resume_api = ResumeApiClient::new(
        &config.resume_api_url,
        Duration::from_secs(config.resume_api_timeout_secs),
    )?;
    info!("Resume backend client initialized ({})", config.resume_api_url);

    let sessions = SessionRegistry::default();
    let _sweeper = sessions.spawn_sweeper(
        Duration::from_secs(config.session_ttl_secs),
        SESSION_SWEEP_INTERVAL,
    );
    info!("Idle editing sessions expire after {}s", config.session_ttl_secs);

    let state = AppState {
        sessions,
        resume_api,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
