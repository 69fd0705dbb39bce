//! Interface definitions for the external stores.
//!
//! This module defines the abstract `IndexStore` and `ArchiveStore` traits
//! that allow for dependency injection and swappable backend
//! implementations.

mod archive_store;
mod index_store;

pub use archive_store::ArchiveStore;
pub use index_store::IndexStore;
