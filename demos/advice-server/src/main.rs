use advisor::ConfigService;
use anyhow::Context;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod app_module;
mod modules;

use app_module::{ServerConfig, app_router, log_panic};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    std::panic::set_hook(Box::new(log_panic));

    tracing::info!("Starting advice server...");

    let config = ConfigService::from_env();
    let server = ServerConfig::from_config(&config)?;
    let router = app_router().context("failed to build exception handlers")?;

    let listener = tokio::net::TcpListener::bind(server.addr())
        .await
        .with_context(|| format!("failed to bind {}", server.addr()))?;

    tracing::info!("Server running on http://{}", server.addr());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Completes on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
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
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
