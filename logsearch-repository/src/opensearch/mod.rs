//! OpenSearch implementation of the index store.
//!
//! This module provides a concrete implementation of `IndexStore` using
//! OpenSearch as the backend, plus the search-body builder for the query
//! endpoint.

mod client;
mod index_config;
mod queries;

pub use client::OpenSearchIndexStore;
pub use queries::build_search_body;
