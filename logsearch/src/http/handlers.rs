//! HTTP route handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{error, warn};

use logsearch_pipeline::EventBuffer;
use logsearch_repository::{build_search_body, IndexStore};
use logsearch_shared::QueryParams;

/// Shared state for handlers.
pub struct AppState {
    /// Shared secret compared against the `token` query parameter.
    pub auth_token: String,
    /// Ingest buffer appended to on `/api/ingest`.
    pub buffer: Arc<dyn EventBuffer>,
    /// Index store queried on `/api/query` and `/health`.
    pub index_store: Arc<dyn IndexStore>,
    /// Index pattern searched by the query endpoint.
    pub index_pattern: String,
}

fn authorized(state: &AppState, params: &HashMap<String, String>) -> bool {
    params.get("token").map(String::as_str) == Some(state.auth_token.as_str())
}

/// POST /api/ingest - buffer one raw audit event.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    Json(event): Json<Value>,
) -> Response {
    if !authorized(&state, &params) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    state.buffer.append(event);
    (StatusCode::OK, "OK").into_response()
}

/// GET /api/query - search the daily indices.
pub async fn query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&state, &params) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    let body = build_search_body(&QueryParams::from_map(&params));
    match state.index_store.search(&state.index_pattern, body).await {
        Ok(hits) => (StatusCode::OK, Json(hits)).into_response(),
        Err(e) => {
            error!(error = %e, "Search failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "search failed").into_response()
        }
    }
}

/// GET /health - index store health passthrough.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.index_store.health().await {
        Ok(status) => (StatusCode::OK, status).into_response(),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use logsearch_pipeline::InMemoryBuffer;
    use logsearch_repository::{CommitSummary, IndexStoreError};
    use logsearch_shared::IndexRecord;
    use serde_json::json;
    use std::sync::Mutex;

    /// Mock index store serving canned search results.
    struct MockIndexStore {
        hits: Vec<Value>,
        searched_bodies: Mutex<Vec<(String, Value)>>,
    }

    impl MockIndexStore {
        fn new(hits: Vec<Value>) -> Self {
            Self {
                hits,
                searched_bodies: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl IndexStore for MockIndexStore {
        async fn bulk_commit(
            &self,
            records: &[IndexRecord],
        ) -> Result<CommitSummary, IndexStoreError> {
            Ok(CommitSummary::all_succeeded(records.len()))
        }

        async fn search(
            &self,
            index_pattern: &str,
            body: Value,
        ) -> Result<Vec<Value>, IndexStoreError> {
            self.searched_bodies
                .lock()
                .unwrap()
                .push((index_pattern.to_string(), body));
            Ok(self.hits.clone())
        }

        async fn index_exists(&self, _name: &str) -> Result<bool, IndexStoreError> {
            Ok(true)
        }

        async fn create_index(&self, _name: &str) -> Result<(), IndexStoreError> {
            Ok(())
        }

        async fn provision(
            &self,
            _prefix: &str,
            _retention_days: u32,
        ) -> Result<(), IndexStoreError> {
            Ok(())
        }

        async fn health(&self) -> Result<String, IndexStoreError> {
            Ok("green".to_string())
        }
    }

    fn test_state(hits: Vec<Value>) -> (Arc<AppState>, Arc<InMemoryBuffer>) {
        let buffer = Arc::new(InMemoryBuffer::new());
        let state = Arc::new(AppState {
            auth_token: "secret".to_string(),
            buffer: buffer.clone(),
            index_store: Arc::new(MockIndexStore::new(hits)),
            index_pattern: "audit_log_events-*".to_string(),
        });
        (state, buffer)
    }

    fn params(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_ingest_rejects_bad_token() {
        let (state, buffer) = test_state(vec![]);

        let response = ingest(
            State(state),
            Query(params(&[("token", "wrong")])),
            Json(json!({"time": "t"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(buffer.drain_and_reset().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_rejects_missing_token() {
        let (state, buffer) = test_state(vec![]);

        let response = ingest(State(state), Query(HashMap::new()), Json(json!({}))).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(buffer.drain_and_reset().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_buffers_event() {
        let (state, buffer) = test_state(vec![]);

        let response = ingest(
            State(state),
            Query(params(&[("token", "secret")])),
            Json(json!({"time": "2024-01-01T00:00:00Z"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let pending = buffer.drain_and_reset();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0]["time"], "2024-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_query_rejects_bad_token() {
        let (state, _buffer) = test_state(vec![]);

        let response = query(State(state), Query(params(&[("token", "nope")]))).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_query_returns_hits() {
        let (state, _buffer) = test_state(vec![json!({"api_name": "GET"})]);

        let response = query(
            State(state.clone()),
            Query(params(&[
                ("token", "secret"),
                ("fp", "api_name:GET"),
                ("pageNo", "1"),
                ("pageSize", "5"),
            ])),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_query_searches_configured_pattern() {
        let hits = vec![json!({"api_name": "GET"})];
        let buffer = Arc::new(InMemoryBuffer::new());
        let index_store = Arc::new(MockIndexStore::new(hits));
        let state = Arc::new(AppState {
            auth_token: "secret".to_string(),
            buffer,
            index_store: index_store.clone(),
            index_pattern: "audit_log_events-*".to_string(),
        });

        query(
            State(state),
            Query(params(&[("token", "secret"), ("pageSize", "5")])),
        )
        .await;

        let searched = index_store.searched_bodies.lock().unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].0, "audit_log_events-*");
        assert_eq!(searched[0].1["size"], 5);
    }

    #[tokio::test]
    async fn test_health_passthrough() {
        let (state, _buffer) = test_state(vec![]);

        let response = health(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
