//! Record transformer implementation.
//!
//! Projects raw audit events into [`AuditDocument`]s tagged with the daily
//! index they belong to.

use chrono::NaiveDate;
use serde_json::Value;

use crate::errors::PipelineError;
use logsearch_shared::{AuditDocument, IndexRecord};

/// Transformer that projects raw events into index records.
///
/// The transformer is pure: it holds only the configured index-name prefix
/// and never talks to a store. Any required field that is absent or
/// mistyped fails the whole batch — a schema mismatch must surface
/// immediately instead of silently dropping or partially indexing records.
pub struct RecordTransformer {
    index_prefix: String,
}

impl RecordTransformer {
    /// Create a transformer targeting indices named `{prefix}-{date}`.
    pub fn new(index_prefix: impl Into<String>) -> Self {
        Self {
            index_prefix: index_prefix.into(),
        }
    }

    /// The daily index name for the given date.
    pub fn index_name(&self, date: NaiveDate) -> String {
        format!("{}-{}", self.index_prefix, date.format("%Y-%m-%d"))
    }

    /// Transform a batch of raw events into index records for `date`.
    ///
    /// Fails closed: if any event is malformed, no records are produced.
    pub fn transform(
        &self,
        batch: &[Value],
        date: NaiveDate,
    ) -> Result<Vec<IndexRecord>, PipelineError> {
        let index = self.index_name(date);

        let mut records = Vec::with_capacity(batch.len());
        for event in batch {
            records.push(IndexRecord::new(index.clone(), project(event)?));
        }
        Ok(records)
    }
}

/// Project one raw event into its fixed-shape document.
fn project(event: &Value) -> Result<AuditDocument, PipelineError> {
    let status_code = required_u64(event, "/api/statusCode", "api.statusCode")?;

    Ok(AuditDocument {
        time: required_str(event, "/time", "time")?.to_string(),
        api_name: required_str(event, "/api/name", "api.name")?.to_string(),
        time_to_response_ns: required_u64(
            event,
            "/api/timeToResponseInNS",
            "api.timeToResponseInNS",
        )?,
        remote_host: required_str(event, "/remotehost", "remotehost")?.to_string(),
        request_id: required_str(event, "/requestID", "requestID")?.to_string(),
        user_agent: required_str(event, "/userAgent", "userAgent")?.to_string(),
        response_status: required_str(event, "/api/status", "api.status")?.to_string(),
        response_status_code: u16::try_from(status_code)
            .map_err(|_| PipelineError::malformed("api.statusCode"))?,
        access_key: required_str(event, "/accessKey", "accessKey")?.to_string(),
        bucket: optional_str(event, "/api/bucket"),
        object: optional_str(event, "/api/object"),
        request_content_length: header_value(event, "/requestHeader/Content-Length"),
        response_content_length: header_value(event, "/responseHeader/Content-Length"),
    })
}

fn required_str<'a>(
    event: &'a Value,
    pointer: &str,
    field: &'static str,
) -> Result<&'a str, PipelineError> {
    event
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or(PipelineError::MalformedRecord { field })
}

fn required_u64(
    event: &Value,
    pointer: &str,
    field: &'static str,
) -> Result<u64, PipelineError> {
    event
        .pointer(pointer)
        .and_then(Value::as_u64)
        .ok_or(PipelineError::MalformedRecord { field })
}

fn optional_str(event: &Value, pointer: &str) -> Option<String> {
    event
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Header values arrive as strings, but some clients send numbers.
fn header_value(event: &Value, pointer: &str) -> Option<String> {
    match event.pointer(pointer) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
