//! # Hub-Tracker Service
//!
//! Binary entry point for the Hub-Tracker HTTP service.
//!
//! This executable:
//! - Loads configuration from files, environment and flags
//! - Initializes logging
//! - Verifies the GitHub access token
//! - Serves webhooks until SIGINT or SIGTERM
//!
//! Exit codes: `1` bind failure, `2` server failure, `3` configuration
//! error, `4` credential verification failure.

mod handler;
mod settings;

use clap::Parser;
use handler::AcknowledgingHandler;
use hub_tracker_api::{start_server, LoggingConfig, ServiceError};
use hub_tracker_core::Tracker;
use settings::{environment_source, load_config, Cli};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let service_config = match load_config(&cli, environment_source()) {
        Ok(config) => config,
        Err(e) => {
            // Logging is configured from this file, so it is not up yet.
            eprintln!("hub-tracker: {:#}", e);
            std::process::exit(3);
        }
    };

    init_logging(&service_config.logging);

    info!("Starting Hub-Tracker Service");

    let tracker = match Tracker::connect(
        service_config.tracker.to_tracker_config(),
        Arc::new(AcknowledgingHandler),
    )
    .await
    {
        Ok(tracker) => tracker,
        Err(e) => {
            error!(error = %e, "Tracker bootstrap failed; aborting");
            std::process::exit(4);
        }
    };

    info!(
        host = %service_config.server.host,
        port = service_config.server.port,
        "Starting HTTP server"
    );

    let result = match start_server(&service_config.server, tracker.receiver()).await {
        Ok(handle) => handle.run_until(shutdown_signal()).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Server error: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }
}

fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_format {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Completes on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
