//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend.

mod connection_config;
mod provider;

pub use connection_config::ConnectionConfig;
pub use provider::OpenSearchProvider;
