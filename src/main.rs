//! Wallet Ledger Service - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create the in-memory ledger
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured address
//! 5. On Ctrl-C / SIGTERM, stop subscribers and drain connections within the grace period

use std::future::IntoFuture;

use tracing_subscriber::EnvFilter;

use wallet_ledger::{
    app::{self, AppState},
    config::Config,
    db::Ledger,
    middleware::panic::install_panic_hook,
    shutdown,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    install_panic_hook();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    // The one ledger instance, handed to every component
    let ledger = Ledger::new();
    let (trigger, shutdown) = shutdown::channel();
    let state = AppState::new(&config, ledger, shutdown.clone());

    let app = app::router(state);

    // Bind to network address and start server
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.wait())
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            trigger.trigger();

            let grace = config.shutdown_grace();
            match tokio::time::timeout(grace, server).await {
                Ok(result) => result?,
                Err(_) => tracing::warn!(
                    "Graceful shutdown did not complete in {:?}, exiting anyway",
                    grace
                ),
            }
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
