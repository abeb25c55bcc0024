//! Byte LRU - HTTP front end for the byte-bounded LRU cache.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use byte_lru::{api::create_router, AppState, Config};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Create the shared cache with the configured byte budget
/// 4. Start HTTP server on configured port
/// 5. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    // Flushes buffered file output when dropped at the end of main
    let _log_guard = init_tracing(config.log_dir.as_deref());

    info!("Starting Byte LRU cache server");
    info!(
        "Configuration loaded: max_bytes={}, port={}, log_dir={:?}",
        config.max_bytes, config.server_port, config.log_dir
    );

    let state = AppState::from_config(&config);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Installs the global subscriber: stdout always, plus a daily-rotated
/// `byte_lru.log` file under `log_dir` when one is configured.
///
/// Defaults to "info" level, can be overridden with RUST_LOG env var.
fn init_tracing(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "byte_lru.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "byte_lru=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
