//! Error types for remote gateway operations

use thiserror::Error;

/// Error type covering every request the client issues
///
/// Display strings are shown verbatim in the UI error field, so they stay
/// short and human-readable.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No bearer token was available for an authenticated endpoint
    #[error("Not authenticated")]
    MissingToken,

    /// Transport-level failure (connect, timeout, TLS)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{endpoint} returned HTTP {code}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Short endpoint label for the message
        endpoint: &'static str,
    },

    /// The response body did not match the expected shape
    #[error("Unexpected response from {endpoint}")]
    Decode {
        /// Short endpoint label for the message
        endpoint: &'static str,
    },
}

impl GatewayError {
    /// True when the failure came from an expired or missing token
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::Status { code: 401, .. } | Self::Status { code: 403, .. }
        )
    }
}
