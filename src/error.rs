//! Error types for the RunningHub Rust SDK

use thiserror::Error;

use crate::classify::{classify_with, ErrorInfo};

/// Result type alias for SDK operations
pub type Result<T, E = SdkError> = std::result::Result<T, E>;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// A required argument was empty or pointed at nothing.
    /// Raised before any network call is issued.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(u16),

    /// The response envelope carried a non-zero application code
    #[error("{operation} fail, code: {code}, msg: {msg}")]
    Api {
        operation: &'static str,
        code: i64,
        msg: String,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout errors
    #[error("Operation timed out")]
    Timeout,

    /// Fetching a remote resource failed
    #[error("Download failed: {0}")]
    Download(String),

    /// Invalid configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl SdkError {
    /// Application code carried by an [`SdkError::Api`] error.
    pub fn code(&self) -> Option<i64> {
        match self {
            SdkError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Classifies an application error against the known code table.
    ///
    /// Returns `None` for errors that never reached the application layer.
    pub fn error_info(&self) -> Option<ErrorInfo> {
        match self {
            SdkError::Api { code, msg, .. } => {
                Some(classify_with(*code, String::new(), msg.clone(), None))
            }
            _ => None,
        }
    }
}

/// Rejects an empty required argument before any network call is made.
pub(crate) fn require(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SdkError::InvalidArgument(format!("{} cannot be empty", name)));
    }
    Ok(())
}
