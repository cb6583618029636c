//! Marketplace API errors.

use thiserror::Error;

/// Transport-level failures talking to the marketplace server.
///
/// Application-level rejections (`ok: false`) are not errors here; they
/// arrive as an [`ApiReply`](super::ApiReply).
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, TLS).
    #[error("Marketplace request failed: {0}")]
    Request(String),

    /// A successful response carried a body that is not the expected JSON.
    #[error("Marketplace response error: {0}")]
    Decode(String),

    /// The endpoint URL could not be built.
    #[error("Invalid marketplace URL: {0}")]
    InvalidUrl(String),
}
