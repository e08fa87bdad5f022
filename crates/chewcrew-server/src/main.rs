//! ChewCrew server binary.
//!
//! Reads its settings from `CHEWCREW_*` environment variables and logs
//! through `RUST_LOG` (default `info`).

mod config;

use chewcrew::prelude::*;
use tokio::signal::ctrl_c;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{Config, ConfigError};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ChewcrewError),
}

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = start().await {
        error!(error = %e, "ChewCrew server failed");
        std::process::exit(1);
    }
}

async fn start() -> Result<(), StartupError> {
    let config = Config::load()?;
    info!(
        bind = %config.bind,
        categories = ?config.categories,
        lookup_timeout_ms = config.service.lookup_timeout.as_millis() as u64,
        "Starting ChewCrew"
    );

    let server = ChewcrewServerBuilder::new()
        .bind(&config.bind)
        .service_config(config.service)
        .build(StaticPlaces::new(config.categories))
        .await?;

    server.run_until(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
