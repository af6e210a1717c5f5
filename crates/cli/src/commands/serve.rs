//! `serve` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use contracts::DeliveryMethod;
use dispatcher::DispatcherBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::ServeArgs;
use crate::config::resolve_config;
use crate::error::CliError;
use crate::server;

/// Execute the `serve` command
pub async fn run_serve(args: &ServeArgs) -> Result<()> {
    let config = resolve_config(&args.config)?;

    info!(
        bind = %config.server.bind,
        method = %config.delivery.method,
        site_name = config.delivery.resolved_site_name(),
        "Configuration loaded"
    );

    if config.delivery.method == DeliveryMethod::Unconfigured {
        warn!("No delivery method configured; every submission will be answered with a failure");
    }

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    if let Some(port) = args.metrics_port.or(config.server.metrics_port) {
        observability::init_metrics_only(port)?;
    }

    let dispatcher = DispatcherBuilder::new(config.delivery.clone())
        .build()
        .context("Failed to build dispatcher")?;

    let listener = TcpListener::bind(config.server.bind.trim())
        .await
        .map_err(|e| CliError::bind(&config.server.bind, e))?;
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;

    info!(
        addr = %addr,
        submit = server::SUBMIT_PATH,
        health = server::HEALTH_PATH,
        "Feedback relay listening"
    );

    server::serve(listener, server::router(Arc::new(dispatcher)), shutdown_signal())
        .await
        .context("Server error")?;

    info!("Feedback relay stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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

    warn!("Received shutdown signal, draining connections...");
}
