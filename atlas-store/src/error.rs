//! Store error types.

use serde::Deserialize;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a workspace store binding.
///
/// Every variant is a remote-call failure from the engine's point of view
/// except `MissingConfiguration`, which is raised before any request is made.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport failure (connect, TLS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The store answered with a non-success status.
    #[error("API request failed ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The request could not be expressed for this store.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The store answered with a body we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure injected into the in-memory store.
    #[error("injected failure: {0}")]
    Injected(String),
}

/// Error body returned by the Notion API.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl StoreError {
    /// Maps a non-success HTTP response to an error, decoding the store's
    /// `{code, message}` body when present.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            401 => StoreError::Auth(message),
            404 => StoreError::NotFound(message),
            _ => StoreError::Api {
                status,
                code: parsed.code.unwrap_or_else(|| "unknown".to_string()),
                message,
            },
        }
    }

    /// Returns true if this error represents a 429 rate-limit response.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            StoreError::Api { status, .. } => *status == 429,
            StoreError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 429),
            _ => false,
        }
    }
}
