//! Search-body builders.
//!
//! This module compiles parsed query parameters into a full search request
//! body for the daily audit-log indices.

use serde_json::{json, Map, Value};

use logsearch_shared::QueryParams;

/// Build a search request body from query parameters.
///
/// The builder produces:
/// - a single `range` clause on `time` carrying `gte` and/or `lte` for
///   whichever bounds are present;
/// - a `term` clause on the untokenized (`.keyword`) form of the filter
///   field, when `fp` holds a `field:value` pair;
/// - `from`/`size` pagination (`from = page_no * page_size`);
/// - a `sort` list with a descending and/or ascending `time` entry,
///   descending first when both flags are set.
///
/// The boolean query is attached only when at least one `must` clause
/// exists; an all-absent-filter request is an unfiltered paginated listing.
/// Conflicting sort flags are passed through untouched; choosing a sensible
/// combination is the caller's responsibility.
pub fn build_search_body(params: &QueryParams) -> Value {
    let mut must: Vec<Value> = Vec::new();

    let mut bounds = Map::new();
    if let Some(start) = &params.time_start {
        bounds.insert("gte".to_string(), json!(start));
    }
    if let Some(end) = &params.time_end {
        bounds.insert("lte".to_string(), json!(end));
    }
    if !bounds.is_empty() {
        must.push(json!({ "range": { "time": Value::Object(bounds) } }));
    }

    // `fp` splits on the first colon; a filter with no colon is ignored.
    if let Some(filter) = &params.field_filter {
        if let Some((field, value)) = filter.split_once(':') {
            let mut term = Map::new();
            term.insert(format!("{field}.keyword"), json!(value));
            must.push(json!({ "term": Value::Object(term) }));
        }
    }

    let mut sort: Vec<Value> = Vec::new();
    if params.time_desc {
        sort.push(json!({ "time": "desc" }));
    }
    if params.time_asc {
        sort.push(json!({ "time": "asc" }));
    }

    let mut body = json!({
        "from": params.page_no * params.page_size,
        "size": params.page_size,
        "sort": sort,
    });

    if !must.is_empty() {
        body["query"] = json!({ "bool": { "must": must } });
    }

    body
}
