//! Countdown HTTP Server Binary
//!
//! Main entry point for the countdown REST API server. It loads the
//! configuration, initializes the message store, sets up the HTTP router and
//! serves requests until Ctrl+C or SIGTERM.
//!
//! # Usage
//!
//! ```bash
//! # Run with the in-memory store in development mode
//! REPOSITORY_TYPE=local APP_ENV=development cargo run --bin countdown-server
//!
//! # Run against Cloudflare KV
//! CLOUDFLARE_ACCOUNT_ID=... CLOUDFLARE_API_TOKEN=... CLOUDFLARE_KV_NAMESPACE_ID=... \
//!   cargo run --bin countdown-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`, `PORT`: bind address (default: 0.0.0.0:8080)
//! - `APP_ENV`: `development` enables bulk clear (default: production)
//! - `ANNIVERSARY_MONTH`, `ANNIVERSARY_DAY`, `ANNIVERSARY_OFFSET_MINUTES`
//! - `REPOSITORY_TYPE`: `kv` or `local`
//! - `RUST_LOG`: Log filter, e.g. `info` or `birthday_countdown=debug` (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use birthday_countdown::config::AppConfig;
use birthday_countdown::db;
use birthday_countdown::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(log_filter(env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting countdown HTTP server");

    let config = AppConfig::load()?;
    let clock = config.to_clock()?;
    info!(
        anniversary = %clock.date(),
        offset = %clock.offset(),
        environment = ?config.server.environment,
        "Configuration loaded"
    );

    db::init_repository()?;
    let repository = Arc::clone(db::get_repository()?);
    info!("Message store initialized successfully");

    let state = AppState::new(repository, clock)
        .with_label(config.anniversary.label.as_str())
        .with_dev_mode(config.dev_mode());

    let app = create_router(state.clone());

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state.begin_shutdown();
}

const DEFAULT_LOG_FILTER: &str = "info";

/// Filter built from `RUST_LOG` directives, or `info` when unset or unparsable.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_keeps_per_target_directives() {
        let filter = log_filter(Some("birthday_countdown=debug".to_string()));
        assert_eq!(filter.to_string(), "birthday_countdown=debug");
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
        assert_eq!(
            log_filter(Some("birthday_countdown=loud".to_string())).to_string(),
            "info"
        );
    }
}
