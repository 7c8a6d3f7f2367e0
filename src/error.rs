//! Error type shared by every operation that touches the remote service.
//!
//! The request executor never panics or throws past its boundary: every
//! failure is returned as one of these tagged kinds and propagated unchanged
//! by the cache and the mutation paths. Nothing here is fatal; callers can
//! always retry the user action.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Transport failure with no server response.
    #[error("Network error: {0}")]
    Network(String),

    /// The server responded with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The server responded with a success status but a body that does not
    /// decode into the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Locally detected before any network call was made.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A 401-class response while authenticated, or an operation that
    /// requires a session evaluated without one. Callers route to login.
    #[error("Session expired or missing, please log in")]
    SessionExpired,
}

impl ApiError {
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::SessionExpired | Self::Http { status: 401 | 403, .. }
        )
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
