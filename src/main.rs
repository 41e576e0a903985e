//! Budget Gate - Main application entry point
//!
//! Starts the admission-control gate in front of the Monthly Budget API:
//! every inbound request is rate limited by client origin before it can
//! reach the backend's authentication or business logic.

use std::net::SocketAddr;

use tokio::{net::TcpListener, signal};

use budget_gate::{Config, create_app, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_server().await
}

/// Run the HTTP server
async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        // Only warn if it's not a "file not found" error
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Load configuration (validated on load)
    let config = Config::load().map_err(|e| {
        std::io::Error::other(format!(
            "Failed to load configuration. Check config files and BUDGET_GATE__* env vars: {}",
            e
        ))
    })?;

    // Initialize tracing (after config is loaded so we can use logging config)
    init_tracing(&config.logging)?;

    tracing::info!("Starting Budget Gate...");
    tracing::info!(
        "Configuration loaded: listen={}:{} upstream={}",
        config.server.host,
        config.server.port,
        config.server.upstream_url
    );
    tracing::info!(
        "Rate limits: auth {}/{}s on {}, general {}/{}s on {}",
        config.rate_limit.auth.max_requests,
        config.rate_limit.auth.window_seconds,
        config.rate_limit.auth.prefix,
        config.rate_limit.general.max_requests,
        config.rate_limit.general.window_seconds,
        config.rate_limit.general.prefix
    );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let app = create_app(&config);

    tracing::info!("Gate listening on {}", addr);

    // The peer address is the last-resort client key, so the listener must
    // expose connection info to the router.
    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Gate shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
