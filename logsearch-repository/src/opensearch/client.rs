//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `IndexStore` using
//! the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    cluster::ClusterHealthParts,
    http::{
        headers::HeaderMap,
        request::JsonBody,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        Method, StatusCode,
    },
    indices::{IndicesCreateParts, IndicesExistsParts, IndicesPutIndexTemplateParts},
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::errors::IndexStoreError;
use crate::interfaces::IndexStore;
use crate::opensearch::index_config;
use crate::types::CommitSummary;
use logsearch_shared::IndexRecord;

/// OpenSearch implementation of the index store.
///
/// Commits audit documents into daily indices with a single `_bulk` call
/// per flush cycle and serves the query endpoint's searches.
pub struct OpenSearchIndexStore {
    client: OpenSearch,
}

impl OpenSearchIndexStore {
    /// Create a new client connected to the given URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g. "http://localhost:9200")
    /// * `credentials` - Optional `(username, password)` pair for basic auth
    pub fn new(
        url: &str,
        credentials: Option<(String, String)>,
    ) -> Result<Self, IndexStoreError> {
        let parsed_url =
            Url::parse(url).map_err(|e| IndexStoreError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some((username, password)) = credentials {
            builder = builder.auth(Credentials::Basic(username, password));
        }
        let transport = builder
            .build()
            .map_err(|e| IndexStoreError::connection(e.to_string()))?;

        info!(url = %url, "Created OpenSearch client");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Extract the failed positions from a `_bulk` response body.
    ///
    /// The response reports one item per action, in request order; an item
    /// carrying an `error` object marks that document as rejected.
    fn parse_bulk_response(total: usize, response: &Value) -> CommitSummary {
        if !response["errors"].as_bool().unwrap_or(false) {
            return CommitSummary::all_succeeded(total);
        }

        let failed: Vec<usize> = response["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| item["index"]["error"].is_object())
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default();

        CommitSummary {
            total,
            succeeded: total - failed.len(),
            failed,
        }
    }

    /// Extract the `_source` of each hit from a search response body.
    fn parse_hits(response: &Value) -> Vec<Value> {
        response["hits"]["hits"]
            .as_array()
            .map(|hits| hits.iter().map(|hit| hit["_source"].clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl IndexStore for OpenSearchIndexStore {
    async fn bulk_commit(&self, records: &[IndexRecord]) -> Result<CommitSummary, IndexStoreError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(records.len() * 2);
        for record in records {
            body.push(serde_json::json!({ "index": { "_index": record.index } }).into());
            let source = serde_json::to_value(&record.document)
                .map_err(|e| IndexStoreError::bulk_commit(e.to_string()))?;
            body.push(source.into());
        }

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| IndexStoreError::bulk_commit(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(IndexStoreError::bulk_commit(format!(
                "Bulk failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| IndexStoreError::parse(e.to_string()))?;

        let summary = Self::parse_bulk_response(records.len(), &response_body);
        debug!(
            total = summary.total,
            failed = summary.failed.len(),
            "Bulk commit completed"
        );
        Ok(summary)
    }

    async fn search(
        &self,
        index_pattern: &str,
        body: Value,
    ) -> Result<Vec<Value>, IndexStoreError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index_pattern]))
            .body(body)
            .send()
            .await
            .map_err(|e| IndexStoreError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(IndexStoreError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| IndexStoreError::parse(e.to_string()))?;

        Ok(Self::parse_hits(&response_body))
    }

    async fn index_exists(&self, name: &str) -> Result<bool, IndexStoreError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| IndexStoreError::index_management(e.to_string()))?;

        Ok(response.status_code() == StatusCode::OK)
    }

    async fn create_index(&self, name: &str) -> Result<(), IndexStoreError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .send()
            .await
            .map_err(|e| IndexStoreError::index_management(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(IndexStoreError::index_management(format!(
                "Create index failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %name, "Created index");
        Ok(())
    }

    async fn provision(&self, prefix: &str, retention_days: u32) -> Result<(), IndexStoreError> {
        let index_pattern = format!("{prefix}-*");
        let policy_name = format!("delete_{prefix}_after_{retention_days}_days");

        let policy = index_config::retention_policy(&index_pattern, retention_days);
        let response = self
            .client
            .transport()
            .send(
                Method::Put,
                &format!("/_plugins/_ism/policies/{policy_name}"),
                HeaderMap::new(),
                None::<&Value>,
                Some(JsonBody::new(policy)),
                None,
            )
            .await
            .map_err(|e| IndexStoreError::provisioning(e.to_string()))?;

        let status = response.status_code();
        // A conflict means the policy already exists from an earlier start.
        if !status.is_success() && status != StatusCode::CONFLICT {
            let error_body = response.text().await.unwrap_or_default();
            return Err(IndexStoreError::provisioning(format!(
                "Retention policy install failed with status {}: {}",
                status, error_body
            )));
        }

        let template = index_config::index_template(&index_pattern);
        let response = self
            .client
            .indices()
            .put_index_template(IndicesPutIndexTemplateParts::Name(
                index_config::TEMPLATE_NAME,
            ))
            .body(template)
            .send()
            .await
            .map_err(|e| IndexStoreError::provisioning(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(IndexStoreError::provisioning(format!(
                "Index template install failed with status {}: {}",
                status, error_body
            )));
        }

        info!(
            pattern = %index_pattern,
            retention_days = retention_days,
            "Provisioned retention policy and index template"
        );
        Ok(())
    }

    async fn health(&self) -> Result<String, IndexStoreError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| IndexStoreError::connection(e.to_string()))?;

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| IndexStoreError::parse(e.to_string()))?;

        response_body["status"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| IndexStoreError::parse("health response missing status"))
    }
}
