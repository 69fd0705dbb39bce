//! Service entry point.
//!
//! Wires the configuration, stores, flusher, and HTTP server together and
//! supervises them: a fatal pipeline error (malformed batch or failed
//! archival) terminates the process after a short delay, since past the
//! archive there is no durability fallback.

use std::process;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use logsearch::config::{Config, Dependencies};
use logsearch::{http, ServerError};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Fatal error, shutting down");
        // Leave time for the failure to be visible in shipped logs.
        tokio::time::sleep(Duration::from_secs(5)).await;
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let config = Config::from_env()?;
    let deps = Dependencies::new(&config).await?;

    let state = Arc::new(http::AppState {
        auth_token: config.auth_token.clone(),
        buffer: Arc::clone(&deps.buffer),
        index_store: Arc::clone(&deps.index_store),
        index_pattern: config.index_pattern(),
    });

    let (shutdown_tx, _) = broadcast::channel(1);

    let mut flusher_handle = tokio::spawn(deps.flusher.run(shutdown_tx.subscribe()));
    let bind_addr = config.bind_addr.clone();
    let server_shutdown = shutdown_tx.subscribe();
    let mut server_handle =
        tokio::spawn(async move { http::serve(&bind_addr, state, server_shutdown).await });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            join(server_handle.await)?;
            join(flusher_handle.await)?;
        }
        result = &mut flusher_handle => {
            // The flush loop only ends on its own on a fatal pipeline error.
            let _ = shutdown_tx.send(());
            let _ = server_handle.await;
            join(result)?;
        }
        result = &mut server_handle => {
            let _ = shutdown_tx.send(());
            let _ = flusher_handle.await;
            join(result)?;
        }
    }

    Ok(())
}

/// Collapse a join result and the task's own result into one error.
fn join<E: Into<ServerError>>(
    result: Result<Result<(), E>, tokio::task::JoinError>,
) -> Result<(), ServerError> {
    result.map_err(|e| ServerError::task(e.to_string()))?.map_err(Into::into)
}
