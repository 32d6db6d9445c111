//! Error types for the catalog fetcher.
//! Defines the errors that can occur while retrieving and extracting one
//! catalog entry.
use thiserror::Error;

/// Represents errors that can occur while fetching a catalog entry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    /// The catalog could not be reached, answered with an error status, or
    /// returned a body that could not be decoded.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The catalog has no usable entry for the identifier.
    #[error("No catalog entry for identifier {0}")]
    NotFound(String),
    /// A numeric field in the catalog entry was malformed.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound(identifier.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<quick_xml::de::DeError> for FetchError {
    fn from(err: quick_xml::de::DeError) -> Self {
        Self::Transport(format!("Catalog response could not be decoded: {}", err))
    }
}
