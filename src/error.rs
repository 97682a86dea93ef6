//! Error types shared across the crate.
//!
//! Catalog failures are split from "nothing found" results: an empty search is
//! never an error, only transport, authorization and decoding problems are.

use thiserror::Error;

/// Errors returned by a [`crate::spotify::CatalogClient`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Connection failures, timeouts and other low-level networking issues.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The access token was rejected or is missing required scopes.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The catalog asked us to back off for longer than we are willing to wait.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// Any other non-success status code.
    #[error("Catalog returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Failed to decode catalog response: {0}")]
    Decode(String),

    /// The request was rejected before being sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CatalogError {
    /// Whether the error is worth retrying at a call site.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Http(_) | CatalogError::RateLimited { .. } => true,
            CatalogError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return CatalogError::Decode(err.to_string());
        }

        match err.status() {
            Some(status) if status.as_u16() == 401 => CatalogError::Unauthorized(err.to_string()),
            Some(status) => CatalogError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => CatalogError::Http(err.to_string()),
        }
    }
}

/// Problems with the runtime configuration. All of them are fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(String),

    #[error("Invalid value '{value}' for {var}")]
    InvalidValue { var: String, value: String },

    #[error("No access token found. Authorize with your OAuth helper or set SPOTIFY_ACCESS_TOKEN ({0})")]
    MissingToken(String),

    #[error("Cannot load environment: {0}")]
    Environment(String),
}

/// Failures of the collaborators that turn web pages and free text into names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Failed to fetch page: {0}")]
    Fetch(String),

    #[error("Page fetch returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Cannot read input: {0}")]
    Io(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Fetch(err.to_string())
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err.to_string())
    }
}
