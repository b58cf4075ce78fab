//! M-Pesa client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MpesaError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx response or an unexpected body.
    #[error("unexpected response from M-Pesa: {0}")]
    UnexpectedResponse(String),

    /// The gateway answered but did not accept the STK push.
    #[error("STK push rejected with code {code}: {description}")]
    Rejected { code: String, description: String },
}
