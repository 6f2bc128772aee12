//! Video Playback Service (arkiv-vp) - Main entry point
//!
//! Resolves video references against the configured CDN hosts and runs
//! the per-session playback fallback state machine behind an HTTP/SSE
//! API consumed by the Arkiv site player.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arkiv_vp::api::{self, AppState};
use arkiv_vp::config::TomlConfig;
use arkiv_vp::{PlayerEngine, Resolver};

/// Command-line arguments for arkiv-vp
#[derive(Parser, Debug)]
#[command(name = "arkiv-vp")]
#[command(about = "Video playback service for the Arkiv media site")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "ARKIV_VP_PORT")]
    port: Option<u16>,

    /// Path to the TOML configuration file
    #[arg(short, long, env = "ARKIV_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration (CLI > env > TOML > defaults)
    let config = TomlConfig::load(args.config.as_deref(), args.port)
        .context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("arkiv_vp={},tower_http=info", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Arkiv Video Playback Service on port {}", config.port);
    info!(
        "Streaming CDN: {}, storage CDN: {}, library: {}",
        config.cdn.streaming_host, config.cdn.storage_host, config.cdn.library_id
    );

    // Initialize resolver and session engine
    let resolver = Resolver::new(config.cdn.clone());
    let engine = Arc::new(PlayerEngine::new(resolver));
    info!("Player engine initialized");

    // Build the application router
    let app_state = AppState {
        engine,
        port: config.port,
    };
    let app = api::create_router(app_state);

    // Create socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    // Create and run the server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    info!("Shutdown signal received");
}
