//! Configuration for the logsearch service.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::time::Duration;

use crate::ServerError;

/// Default index name prefix for daily indices.
const DEFAULT_INDEX_PREFIX: &str = "audit_log_events";

/// Default bucket archive objects are written into.
const DEFAULT_ARCHIVE_BUCKET: &str = "audit-logs";

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Default idle poll interval for the flush loop, in milliseconds.
const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1000;

/// Basic-auth username used when only a password is configured.
const DEFAULT_OPENSEARCH_USER: &str = "elastic";

/// Indices are deleted after this many days.
pub const RETENTION_DAYS: u32 = 90;

/// Runtime configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Index store URL.
    pub opensearch_url: String,
    /// Basic-auth username for the index store.
    pub opensearch_user: Option<String>,
    /// Basic-auth password for the index store.
    pub opensearch_password: Option<String>,
    /// Object store endpoint URL.
    pub object_store_endpoint: String,
    /// Object store access key.
    pub object_store_access_key: String,
    /// Object store secret key.
    pub object_store_secret_key: String,
    /// Shared secret compared on every ingest/query request.
    pub auth_token: String,
    /// Daily index name prefix.
    pub index_prefix: String,
    /// Archive bucket name.
    pub archive_bucket: String,
    /// HTTP listen address.
    pub bind_addr: String,
    /// Idle poll interval for the flush loop.
    pub flush_interval: Duration,
}

impl Config {
    /// Load the configuration from environment variables.
    ///
    /// Required: `OPENSEARCH_URL`, `OBJECT_STORE_ENDPOINT`,
    /// `OBJECT_STORE_ACCESS_KEY`, `OBJECT_STORE_SECRET_KEY`, `AUTH_TOKEN`.
    /// A missing or empty required variable fails startup.
    pub fn from_env() -> Result<Self, ServerError> {
        Ok(Self {
            opensearch_url: required("OPENSEARCH_URL")?,
            opensearch_user: env::var("OPENSEARCH_USER").ok(),
            opensearch_password: env::var("OPENSEARCH_PASSWORD").ok(),
            object_store_endpoint: required("OBJECT_STORE_ENDPOINT")?,
            object_store_access_key: required("OBJECT_STORE_ACCESS_KEY")?,
            object_store_secret_key: required("OBJECT_STORE_SECRET_KEY")?,
            auth_token: required("AUTH_TOKEN")?,
            index_prefix: env::var("INDEX_PREFIX")
                .unwrap_or_else(|_| DEFAULT_INDEX_PREFIX.to_string()),
            archive_bucket: env::var("ARCHIVE_BUCKET")
                .unwrap_or_else(|_| DEFAULT_ARCHIVE_BUCKET.to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            flush_interval: Duration::from_millis(
                env::var("FLUSH_INTERVAL_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_FLUSH_INTERVAL_MS),
            ),
        })
    }

    /// Basic-auth credentials for the index store, when a password is set.
    pub fn opensearch_credentials(&self) -> Option<(String, String)> {
        self.opensearch_password.clone().map(|password| {
            (
                self.opensearch_user
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OPENSEARCH_USER.to_string()),
                password,
            )
        })
    }

    /// The index pattern the query endpoint searches over.
    pub fn index_pattern(&self) -> String {
        format!("{}-*", self.index_prefix)
    }
}

fn required(name: &'static str) -> Result<String, ServerError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ServerError::config(format!("Missing environment variable {name}")))
}
