//! Helper API gateway client.
//!
//! Every backend endpoint answers with the `{success, message, data}`
//! envelope. [`HelperClient`] attaches the admin's bearer token, unwraps
//! the envelope and classifies failures so callers can tell an expired
//! session ([`HelperError::Unauthorized`]) apart from everything else.

mod client;
mod credentials;

pub use client::HelperClient;
pub use credentials::{BearerToken, Credentials, SessionScope};

use thiserror::Error;

/// Errors that can occur when talking to the Helper backend.
#[derive(Debug, Error)]
pub enum HelperError {
    /// Transport failure: connect, timeout, TLS.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the token (HTTP 401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-2xx response.
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the envelope, or the canonical reason.
        message: String,
    },

    /// The body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A 2xx envelope without the `data` the caller needed.
    #[error("Response had no data: {0}")]
    MissingData(String),
}

impl HelperError {
    /// Whether this error means the session is no longer valid.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Text suitable for showing to the admin in a banner or dialog.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "The Helper API did not respond in time.".to_string(),
            Self::Http(_) => "Could not reach the Helper API.".to_string(),
            Self::Unauthorized => "Your session has expired.".to_string(),
            Self::Status { message, .. } => message.clone(),
            Self::Parse(_) | Self::MissingData(_) => {
                "The Helper API returned an unexpected response.".to_string()
            }
        }
    }
}
