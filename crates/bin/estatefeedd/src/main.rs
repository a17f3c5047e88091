//! # estatefeedd — estatefeed daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise `tracing` from the configured filter
//! - Initialize the `SQLite` connection pool and run migrations
//! - Seed the demo catalog into an empty database
//! - Construct the listing service around the `SQLite` repository
//! - Build the axum router and serve it
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod demo;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use estatefeed_adapter_http_axum::sessions::SessionLimits;
use estatefeed_adapter_http_axum::state::{AppState, FeedSettings};
use estatefeed_adapter_storage_sqlite_sqlx::SqliteListingRepository;
use estatefeed_app::services::listing_service::ListingService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = estatefeed_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .with_context(|| format!("opening database {}", config.database_url()))?;

    // Services
    let listing_service = Arc::new(ListingService::new(SqliteListingRepository::new(
        db.pool().clone(),
    )));

    if config.feed.seed_demo {
        demo::seed(&listing_service)
            .await
            .context("seeding demo catalog")?;
    }

    // HTTP
    let settings = FeedSettings {
        viewer_name: config.feed.viewer_name.clone(),
        render_timeout: config.feed.render_timeout(),
        refresh_seconds: config.feed.refresh_seconds,
    };
    let limits = SessionLimits {
        max_sessions: config.feed.max_sessions,
        idle_timeout: config.feed.session_idle_timeout(),
    };
    let state = AppState::from_arc(listing_service, settings, limits);
    let app = estatefeed_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, "estatefeedd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("estatefeedd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}
