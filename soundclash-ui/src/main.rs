//! Soundclash - timed voting battles over submitted audio tracks
//!
//! Main entry point: configuration, store startup, initial directory
//! reconciliation, then the HTTP server until shutdown.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soundclash_common::Store;
use soundclash_ui::config::{Args, Config};
use soundclash_ui::scanner::BattleScanner;
use soundclash_ui::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundclash_ui=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::resolve(args).context("Failed to resolve configuration")?;

    info!(
        "Starting Soundclash v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.listen
    );
    info!("Battles directory: {}", config.battles_dir.display());

    let store = Store::open(&config.db)
        .await
        .context("Failed to open database")?;

    // Initial scan so battles exist before the first admin rescan
    let scanner = BattleScanner::new(config.battles_dir.clone());
    let scanned = scanner
        .scan_all()
        .context("Failed to scan battles directory")?;
    let summary = store.reconcile_all(&scanned).await;
    info!(
        updated = summary.updated.len(),
        failed = summary.failed.len(),
        "initial reconciliation complete"
    );
    for (name, err) in &summary.failed {
        warn!(battle = %name, %err, "battle failed to reconcile");
    }

    if config.api_key.is_empty() {
        warn!("no API key configured, admin endpoints will reject all requests");
    }

    let state = AppState {
        store,
        config: config.server,
        battles_dir: config.battles_dir.clone(),
        api_key: config.api_key.clone(),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .context("Failed to bind to address")?;
    info!("HTTP server listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
