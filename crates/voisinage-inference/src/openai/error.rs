//! Mapping of OpenAI-compatible HTTP failures onto voisinage errors.

use voisinage_core::Error;

use super::types::OpenAIErrorResponse;

/// Failure classes reported by an OpenAI-compatible endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Invalid authentication credentials.
    AuthenticationError,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Image or prompt rejected as too large.
    PayloadTooLarge,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl OpenAIErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) | (403, _) => Self::AuthenticationError,
            (429, _) => Self::RateLimitExceeded,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (413, _) => Self::PayloadTooLarge,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Only rate limiting is retried automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded)
    }
}

/// Extract a readable message from an error body, falling back to the raw
/// text when it is not the standard `{"error": {...}}` envelope.
pub fn error_message(body: &str) -> (String, String) {
    match serde_json::from_str::<OpenAIErrorResponse>(body) {
        Ok(parsed) => (
            parsed.error.message,
            parsed.error.error_type.unwrap_or_default(),
        ),
        Err(_) => (body.trim().to_string(), String::new()),
    }
}

/// Convert a non-success, non-429 response into an [`Error::Request`]
/// carrying the status and the response body.
pub fn to_voisinage_error(status: u16, body: &str) -> Error {
    let (message, error_type) = error_message(body);
    let label = match OpenAIErrorCode::from_response(status, &error_type) {
        OpenAIErrorCode::AuthenticationError => "authentication failed",
        OpenAIErrorCode::RateLimitExceeded => "rate limit exceeded",
        OpenAIErrorCode::ModelNotFound => "model not found",
        OpenAIErrorCode::PayloadTooLarge => "payload too large",
        OpenAIErrorCode::ServerError => "server error",
        OpenAIErrorCode::Unknown => "unexpected status",
    };
    Error::Request(format!("{} (HTTP {}): {}", label, status, message))
}
