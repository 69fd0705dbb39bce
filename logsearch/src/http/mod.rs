//! HTTP surface for the logsearch service.
//!
//! # Endpoints
//!
//! - `POST /api/ingest?token=SECRET` - buffer one raw audit event
//! - `GET /api/query?token=SECRET&...` - search the daily indices
//! - `GET /health` - index store health passthrough
//!
//! Authentication is a shared-secret token passed as a query parameter;
//! callers only ever see 200 or 401 on the authenticated endpoints (plus
//! 500 when the query path cannot reach the index store).

mod handlers;

pub use handlers::AppState;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

use crate::ServerError;
use handlers::{health, ingest, query};

/// Run the HTTP server until shutdown is signalled.
pub async fn serve(
    bind_addr: &str,
    state: Arc<AppState>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(bind_addr).await?;

    info!(address = %bind_addr, "HTTP server listening");

    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Build the axum router.
fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ingest", post(ingest))
        .route("/api/query", get(query))
        .route("/health", get(health))
        .with_state(state)
}
