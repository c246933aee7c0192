//! Error taxonomy for the weather API client.

use serde::Deserialize;
use thiserror::Error;

/// Structured error body the server attaches to non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure: the request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server error (HTTP {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    /// A success status carried a payload that did not decode.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a `Server` error from a status code and raw body, pulling out
    /// the structured `detail` field when the body carries one.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body).ok().map(|b| b.detail);
        Self::Server { status, detail }
    }

    /// Server-provided human-readable detail, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for transport-level failures.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Message for UI display: the server's detail when present, otherwise
    /// the caller's flow-specific fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.detail() {
            Some(detail) if !detail.is_empty() => detail.to_string(),
            _ => fallback.to_string(),
        }
    }
}
