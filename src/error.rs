//! Error types for px-gallery

use thiserror::Error;

use crate::types::{MediaKind, RetrievalMode};

/// Classification of catalog failures.
///
/// The controller stores every failure the same way; the kind only drives
/// user messaging and whether an immediate retry is sensible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Transport failure, unexpected status or malformed body. Retry-safe.
    Network,
    /// Quota exhausted upstream. Retry-safe, but not right away.
    RateLimit,
    /// The catalog rejected the request input.
    InvalidQuery,
}

impl FetchErrorKind {
    /// Whether retrying without user input is expected to help
    pub fn is_retry_safe(self) -> bool {
        !matches!(self, Self::InvalidQuery)
    }
}

/// Failure of a single catalog request
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit reached: {0}")]
    RateLimited(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed catalog response: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Network(_) => FetchErrorKind::Network,
            Self::RateLimited(_) => FetchErrorKind::RateLimit,
            Self::InvalidQuery(_) => FetchErrorKind::InvalidQuery,
            Self::Http(_) | Self::Json(_) => FetchErrorKind::Network,
        }
    }
}

/// Contract violations by the caller of the controller.
///
/// These are returned as `Err` and never folded into a kind's `error` slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("mode {mode} is not available for {kind}")]
    InvalidMode { kind: MediaKind, mode: RetrievalMode },

    #[error("{mode} mode has no further pages")]
    NotSupported { mode: RetrievalMode },
}

/// Application-level error (configuration and filesystem)
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
