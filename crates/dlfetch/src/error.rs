//! Error types for dlfetch

use thiserror::Error;

/// Result type alias for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Why a URL could not be turned into text
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL did not parse or uses a scheme we cannot fetch
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Parser or scheme complaint
        reason: String,
    },

    /// HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport failure (DNS, connect, TLS, timeout)
    #[error("Request to {url} failed: {source}")]
    Request {
        /// URL being fetched
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("Request to {url} returned HTTP {status}")]
    Status {
        /// URL being fetched
        url: String,
        /// Status code received
        status: u16,
    },

    /// Response body could not be read as text
    #[error("Failed to read body of {url}: {source}")]
    Body {
        /// URL being fetched
        url: String,
        /// Underlying decode error
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Transport failures and 5xx answers are transient; bad URLs and 4xx are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Request { .. } => true,
            FetchError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// URL the failure relates to, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::InvalidUrl { url, .. }
            | FetchError::Request { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Body { url, .. } => Some(url),
            FetchError::Client(_) => None,
        }
    }
}
