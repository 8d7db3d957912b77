//! Subtitle Burner
//!
//! A small web service that accepts an uploaded video, transcribes its speech
//! with whisper, burns the resulting subtitles into the picture with ffmpeg
//! and hands the rendered file back for a single download.

mod cleanup;
mod config;
mod config_file;
mod error;
mod http;
mod pipeline;
mod state;
mod subtitle;
mod transcode;
mod transcribe;
mod upload;


use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::http::create_router;
use crate::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "subtitle-burner";

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Initialize logging
    init_logging();

    tracing::info!("{} v{} starting", APP_NAME, VERSION);

    let config = load_config()?;
    if config.uses_default_secret() {
        tracing::warn!("SECRET_KEY is not set; using the development default");
    }
    tracing::info!("Configuration loaded: {:?}", config);

    // Create application state
    let state = Arc::new(AppState::new(config.clone()));
    state.ensure_dirs()?;

    match state.transcoder.version().await {
        Some(version) => tracing::info!("Transcoder: {}", version),
        None => tracing::warn!(
            "{} is not runnable; /generate will fail until it is installed",
            config.transcoder.binary_path
        ),
    }

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = config
        .socket_addr()
        .parse()
        .map_err(|e| ServerError::BindAddress(config.socket_addr(), e))?;
    tracing::info!("Starting HTTP server on {}://{}", config.url_scheme, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Defaults, then the optional TOML file, then environment overrides
fn load_config() -> Result<ServerConfig, ServerError> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let base = if std::path::Path::new(&config_path).exists() {
        match crate::config_file::ConfigFile::from_file(&config_path) {
            Ok(cf) => cf.into_server_config(),
            Err(e) => {
                tracing::warn!(
                    "Failed to load config file {}: {}. Using defaults.",
                    config_path,
                    e
                );
                ServerConfig::default()
            }
        }
    } else {
        ServerConfig::default()
    };

    base.with_env().map_err(ServerError::Config)
}

/// Initialize logging with tracing. `LOG_FORMAT=json` switches to JSON lines.
fn init_logging() {
    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "subtitle_burner=debug,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}
