//! Auth error types.

use taskhub_core::ValidationErrors;

/// Errors that can occur during authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Credentials failed local checks; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The backend refused the request.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Backend message, or a per-operation fallback.
        message: String,
    },

    /// A success response carried no access token.
    #[error("response did not include an access token")]
    MissingToken,

    /// No session is stored.
    #[error("not signed in")]
    NotAuthenticated,

    /// Refresh was impossible or failed; the session has been cleared.
    #[error("session expired: {0}")]
    SessionExpired(String),
}

impl AuthError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
