//! Notification errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The mail relay returned a non-2xx response.
    #[error("unexpected response from mail relay: {0}")]
    UnexpectedResponse(String),
}
