use thiserror::Error;

/// Errors produced by [`SVClient`](crate::svclient::SVClient).
///
/// A [`ClientError::Rejected`] means the server was reached and answered, but did not accept the
/// request. Every other variant means the server's answer was never understood.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Sign in required")]
    Unauthorized,
}
