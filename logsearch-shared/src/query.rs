//! Query parameters for the search endpoint.
//!
//! Parsed once per request from the raw query-string map and handed to the
//! search-body compiler; never persisted.

use std::collections::HashMap;

/// Default page size when `pageSize` is absent or unparseable.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Parsed search parameters.
///
/// `time_desc` and `time_asc` follow presence semantics: the flag is set
/// whenever the parameter appears in the query string, whatever its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Inclusive lower bound on `time`.
    pub time_start: Option<String>,
    /// Inclusive upper bound on `time`.
    pub time_end: Option<String>,
    /// Equality filter in `field:value` form.
    pub field_filter: Option<String>,
    /// Sort by `time` descending.
    pub time_desc: bool,
    /// Sort by `time` ascending.
    pub time_asc: bool,
    /// Zero-based page number.
    pub page_no: usize,
    /// Page size.
    pub page_size: usize,
}

impl QueryParams {
    /// Parse parameters from a query-string map.
    ///
    /// Unparseable `pageNo`/`pageSize` values fall back to the defaults
    /// (0 and [`DEFAULT_PAGE_SIZE`]).
    pub fn from_map(params: &HashMap<String, String>) -> Self {
        Self {
            time_start: params.get("timeStart").cloned(),
            time_end: params.get("timeEnd").cloned(),
            field_filter: params.get("fp").cloned(),
            time_desc: params.contains_key("timeDesc"),
            time_asc: params.contains_key("timeAsc"),
            page_no: params
                .get("pageNo")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            page_size: params
                .get("pageSize")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}
