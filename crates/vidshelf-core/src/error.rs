//! Error types for the listing and text collaborators.
//!
//! Errors never reach the user: [`ResourceCache`](crate::ResourceCache)
//! degrades them to an empty listing or empty text. They exist so fetchers
//! can report what went wrong and the cache can log it.

use thiserror::Error;

/// Network/fetch-related errors for listing and text requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Browser window not available
    #[error("Browser window not available")]
    NoWindow,
    /// Failed to create HTTP request
    #[error("Failed to create request")]
    RequestCreationFailed,
    /// Network request failed (CORS, connection reset, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// HTTP error response (non-2xx status)
    #[error("HTTP error: {0}")]
    HttpError(u16),
    /// Failed to read response body
    #[error("Failed to read response")]
    ResponseReadFailed,
    /// Invalid response content (not text)
    #[error("Invalid response content")]
    InvalidContent,
    /// Listing body is not a JSON array
    #[error("JSON parse error: {0}")]
    JsonParseError(String),
}
