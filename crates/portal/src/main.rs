//! # Portal - demo banking portal service
//!
//! Serves the login flows, dashboard, transfers, and admin panel of a demo
//! bank on top of an in-memory ledger. The admin login is gated by a
//! month-picker CAPTCHA.
//!
//! ## Architecture
//! ```text
//! Browser → Router → Session guard → Handler → LedgerStore (RwLock)
//!                                       ↓
//!                               SessionStore (puzzles, login state)
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod captcha;
mod config;
mod device;
mod ledger;
mod routes;
mod session;
mod state;
mod views;

use config::AppConfig;
use ledger::LedgerStore;
use session::session_sweeper;
use state::AppState;

/// Portal - demo banking portal
#[derive(Parser, Debug)]
#[command(name = "portal")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/portal.toml")]
    config: String,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level, args.json_logs)?;

    info!("Starting portal v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(&args.config, &args)?;
    info!(path = %args.config, "Configuration loaded");

    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    // No persistence: every start begins from the demo dataset
    let state = AppState::new(config.clone(), LedgerStore::seeded());

    let sweeper_store = state.sessions.clone();
    let sweeper_shutdown = shutdown_tx.subscribe();
    let sweep_interval = config.session.sweep_interval_secs;
    tokio::spawn(async move {
        session_sweeper(sweeper_store, sweep_interval, sweeper_shutdown).await;
    });

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "Portal listening");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            return;
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("Portal shutdown complete");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }

    Ok(())
}
