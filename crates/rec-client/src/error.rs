//! Error type for talking to the recommendation service.

use thiserror::Error;

/// Message used when the service fails without saying why.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Errors that can occur when fetching recommendations.
///
/// The variants only exist for logging and tests; callers surface the
/// `Display` text to the user as-is, so a service-provided message is
/// rendered verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendationFetchError {
    /// The service answered with a non-success status
    #[error("{message}")]
    Service { status: u16, message: String },

    /// The request never got an answer (unreachable host, broken connection, ...)
    #[error("Failed to reach recommendation service: {0}")]
    Transport(String),

    /// The service answered with success but the body could not be decoded
    #[error("Invalid response from recommendation service: {0}")]
    InvalidResponse(String),
}

impl RecommendationFetchError {
    /// Build a `Service` error, falling back to the generic message when the
    /// service didn't provide a usable one.
    pub fn service(status: u16, message: Option<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
        RecommendationFetchError::Service { status, message }
    }
}

impl From<reqwest::Error> for RecommendationFetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RecommendationFetchError::InvalidResponse(err.to_string())
        } else {
            RecommendationFetchError::Transport(err.to_string())
        }
    }
}
