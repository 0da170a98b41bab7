//! # KisanSetu Tracking Server
//!
//! Starts the [`TrackingSystem`], serves the REST and `/ws` routes until
//! SIGINT or SIGTERM, then stops the actors.

use clap::Parser;
use kisansetu_tracking::api::{self, AppState};
use kisansetu_tracking::config::Arguments;
use kisansetu_tracking::lifecycle::{setup_tracing, TrackingSystem};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Arguments::parse();
    setup_tracing(&args.log_filter);
    info!("running tracking server with validated arguments:\n{}", args);

    let system = TrackingSystem::new(args.system_config());
    let app = api::router(AppState::new(&system, args.default_speed_kmph));

    let served = serve(app, &args).await;
    if let Err(e) = &served {
        error!(error = %e, "Server failed");
    }

    // The router's clients are gone once `serve` returns.
    system.shutdown().await?;
    served
}

async fn serve(app: axum::Router, args: &Arguments) -> Result<(), String> {
    let listener = TcpListener::bind(args.bind_address)
        .await
        .map_err(|e| format!("Failed to bind {}: {e}", args.bind_address))?;
    info!(address = %args.bind_address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {e}"))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            return std::future::pending().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await
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
