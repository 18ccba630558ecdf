//! API error types.

use thiserror::Error;

/// Body TestRail returns from `add_user` when the email is taken.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "The Email Address is already in use by another user.";

/// Errors that can occur when calling the TestRail API.
///
/// Callers treat every variant the same way (log, skip, continue); the split
/// exists for diagnostics.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// The HTTP client could not be constructed.
    #[error("client setup failed: {0}")]
    Setup(String),
}

impl ApiError {
    /// True for the `add_user` rejection of an already-registered email.
    #[must_use]
    pub fn is_duplicate_email(&self) -> bool {
        matches!(self, Self::Api { message, .. } if message.contains(DUPLICATE_EMAIL_MESSAGE))
    }

    /// HTTP status, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
