//! Errors produced while requesting an ephemeral key.
//!
//! The `Display` text of a [`KeyError`] is the message shown to the user after
//! the `"Error: "` prefix, so keep it short and human-readable.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The request never produced a response (connect failure, timeout, …).
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("HTTP {code} {reason}")]
    Status { code: u16, reason: String },

    /// A response arrived but its body could not be read as text.
    #[error("unreadable response body: {0}")]
    Body(String),

    /// The configured backend URL cannot be used as an endpoint.
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl KeyError {
    /// Build a [`KeyError::Status`] from a status code, using the canonical
    /// reason phrase when one exists.
    pub fn status(code: reqwest::StatusCode) -> Self {
        KeyError::Status {
            code: code.as_u16(),
            reason: code.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    /// `true` for failures that happened after a response was received but
    /// while reading its body.
    pub fn is_body(&self) -> bool {
        matches!(self, KeyError::Body(_))
    }
}
