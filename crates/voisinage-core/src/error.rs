//! Error types for voisinage.

use thiserror::Error;

/// Result type alias using voisinage's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for voisinage operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration (e.g. no API credential)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote service kept answering HTTP 429 after all retries
    #[error("Rate limited after {attempts} attempts: {message}")]
    RateLimited { attempts: u32, message: String },

    /// Model response could not be turned into an analysis result
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Latitude/longitude outside the valid range or not finite
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation abandoned by its caller
    #[error("Operation cancelled")]
    Cancelled,

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the caller may reasonably offer a manual retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Analysis(_) | Self::Request(_)
        )
    }

    /// Short message suitable for an end-user error panel.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Config(_) => "Image analysis is not configured.",
            Self::RateLimited { .. } => {
                "The analysis service is busy right now. Please try again later."
            }
            Self::Analysis(_) => "The image could not be analyzed. You can retry.",
            Self::Request(_) => "The analysis service could not be reached. You can retry.",
            Self::InvalidInput(_) => "This file cannot be analyzed.",
            Self::Cancelled => "Analysis cancelled.",
            _ => "Something went wrong.",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");
    }

    #[test]
    fn test_error_display_rate_limited() {
        let err = Error::RateLimited {
            attempts: 4,
            message: "slow down".to_string(),
        };
        assert_eq!(err.to_string(), "Rate limited after 4 attempts: slow down");
    }

    #[test]
    fn test_error_display_analysis() {
        let err = Error::Analysis("no JSON object".to_string());
        assert_eq!(err.to_string(), "Analysis error: no JSON object");
    }

    #[test]
    fn test_error_display_invalid_coordinate() {
        let err = Error::InvalidCoordinate("lat=NaN".to_string());
        assert_eq!(err.to_string(), "Invalid coordinate: lat=NaN");
    }

    #[test]
    fn test_error_display_cancelled() {
        assert_eq!(Error::Cancelled.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_retryable_classification() {
        assert!(Error::RateLimited {
            attempts: 1,
            message: String::new()
        }
        .is_retryable());
        assert!(Error::Analysis("bad".to_string()).is_retryable());
        assert!(!Error::Config("no key".to_string()).is_retryable());
        assert!(!Error::Cancelled.is_retryable());
    }

    #[test]
    fn test_user_message_rate_limit_says_try_later() {
        let err = Error::RateLimited {
            attempts: 4,
            message: String::new(),
        };
        assert!(err.user_message().contains("try again later"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
