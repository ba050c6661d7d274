//! Fetch error types
//!
//! Failures a request against the encounter API can end in. The type is
//! transport-agnostic so the browser and native clients report the same
//! taxonomy to the view layer.

use thiserror::Error;

/// Errors that can occur while fetching from the encounter API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Could not reach the server (DNS, connection refused, CORS, ...)
    #[error("Network error: {0}")]
    Transport(String),

    /// The server did not answer in time
    #[error("Request timeout")]
    Timeout,

    /// The requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected shape
    #[error("Parse error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Message suitable for showing to the user in place of the content
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Transport(_) | FetchError::Timeout => {
                "Unable to reach the encounter service. Check your connection and try again."
                    .to_string()
            }
            FetchError::NotFound(_) => {
                "The encounter you're looking for doesn't exist.".to_string()
            }
            FetchError::Api { status, .. } => {
                format!("The encounter service returned an error (HTTP {}).", status)
            }
            FetchError::Decode(_) => {
                "The encounter service sent a response that could not be read.".to_string()
            }
        }
    }

    /// Short heading for the failure panel
    pub fn title(&self) -> &'static str {
        match self {
            FetchError::NotFound(_) => "Encounter Not Found",
            FetchError::Transport(_) | FetchError::Timeout => "Connection Problem",
            FetchError::Api { .. } | FetchError::Decode(_) => "Something Went Wrong",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
