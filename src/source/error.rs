//! Error types for fetching readings.

use thiserror::Error;

/// Errors that can occur during one fetch cycle.
///
/// None of these are fatal: the polling loop turns every variant into a
/// disconnected indicator and tries again on the next tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("Backend returned status {0}")]
    Status(u16),

    /// The backend reported an error in the payload.
    #[error("Backend reported error: {0}")]
    Remote(String),

    /// The payload was not a valid reading.
    #[error("Failed to decode reading: {0}")]
    Decode(String),

    /// Reading the local source failed.
    #[error("Read error: {0}")]
    Io(String),
}

impl FetchError {
    /// True for failures at the transport level (as opposed to the
    /// backend reporting a problem).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FetchError::Transport(_) | FetchError::Timeout | FetchError::Status(_) | FetchError::Io(_)
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Io(err.to_string())
    }
}
