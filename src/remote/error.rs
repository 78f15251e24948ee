//! Remote fetch failure taxonomy

use thiserror::Error;

/// A failed remote call. Never retried by the client.
#[derive(Debug, Error)]
pub enum RemoteFetchError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response body is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for RemoteFetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteFetchError::Timeout
        } else {
            RemoteFetchError::Transport(e)
        }
    }
}

/// Outcome of a remote call that did not produce images
#[derive(Debug, Error)]
pub enum FetchError {
    /// The call's cancellation token fired before it settled
    #[error("fetch cancelled")]
    Cancelled,

    #[error(transparent)]
    Remote(#[from] RemoteFetchError),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
