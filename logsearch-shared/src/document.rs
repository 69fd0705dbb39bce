//! Document types for the audit-log index.
//!
//! An [`AuditDocument`] is the fixed-shape projection of one raw audit event;
//! an [`IndexRecord`] carries the document together with the daily index it
//! is destined for.

use serde::{Deserialize, Serialize};

/// The indexable projection of one raw audit event.
///
/// Required fields are always present; optional fields are included only
/// when the source event carried them and are omitted from the serialized
/// document otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditDocument {
    /// Event timestamp, copied unmodified from the source record.
    pub time: String,
    /// Name of the API call (e.g. `GetObject`).
    pub api_name: String,
    /// Time to first response, in nanoseconds.
    pub time_to_response_ns: u64,
    /// Remote host that issued the request.
    pub remote_host: String,
    /// Request id assigned by the server.
    pub request_id: String,
    /// User agent reported by the caller.
    pub user_agent: String,
    /// Response status text (e.g. `OK`).
    pub response_status: String,
    /// Numeric response status code.
    pub response_status_code: u16,
    /// Access key the request was authenticated with.
    pub access_key: String,
    /// Bucket the call operated on, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Object key the call operated on, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// `Content-Length` of the request, when the header was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_content_length: Option<String>,
    /// `Content-Length` of the response, when the header was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_content_length: Option<String>,
}

/// An [`AuditDocument`] tagged with the daily index it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    /// Target index name, `{prefix}-{YYYY-MM-DD}`.
    pub index: String,
    /// The document to commit.
    pub document: AuditDocument,
}

impl IndexRecord {
    /// Create a record targeting the given index.
    pub fn new(index: impl Into<String>, document: AuditDocument) -> Self {
        Self {
            index: index.into(),
            document,
        }
    }
}
