//! Transport and gateway error types.
//!
//! [`TransportError`] is what a [`Transport`](crate::Transport) can fail
//! with before a response exists. Gateways fold it, together with backend
//! rejections, into the single [`ApiError`] every caller sees.

use taskhub_auth::AuthError;
use taskhub_core::ValidationErrors;

/// A request that produced no usable response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, timeout, or protocol failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The session could not be refreshed after a 401.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Test or in-memory transports reporting a failure.
    #[error("{0}")]
    Other(String),
}

/// What kind of failure an [`ApiError`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Client-side checks failed; nothing was sent.
    Validation,
    /// The backend answered with a failure.
    Rejected,
    /// The requested entity does not exist.
    NotFound,
    /// No session, or the session expired and could not be refreshed.
    Unauthorized,
    /// No response arrived.
    Transport,
    /// The backend answered success with a payload this client cannot read.
    Malformed,
}

/// The single error type returned by every gateway operation.
///
/// `Display` is the human-readable message alone, ready to show the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Failure category.
    pub kind: ApiErrorKind,
    /// Message extracted from the backend, or a per-operation fallback.
    pub message: String,
    /// HTTP status, when a response arrived.
    pub status: Option<u16>,
}

impl ApiError {
    /// Build an error of `kind`.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
        }
    }

    /// A backend rejection.
    pub fn rejected(message: impl Into<String>, status: u16) -> Self {
        Self::new(ApiErrorKind::Rejected, message, Some(status))
    }

    /// A missing entity.
    pub fn not_found(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::new(ApiErrorKind::NotFound, message, status)
    }

    /// A transport failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, message, None)
    }

    /// A client-side check failure that is not tied to a form.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message, None)
    }

    /// Whether this is a [`ApiErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }

    /// Whether the user must sign in again.
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::new(ApiErrorKind::Validation, errors.to_string(), None)
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Auth(
                AuthError::SessionExpired(_) | AuthError::NotAuthenticated,
            ) => Self::new(
                ApiErrorKind::Unauthorized,
                "Session expired, please log in again",
                Some(401),
            ),
            TransportError::Auth(other) => {
                Self::new(ApiErrorKind::Unauthorized, other.to_string(), other.status())
            }
            TransportError::Http(e) if e.is_timeout() => Self::transport("Request timed out"),
            TransportError::Http(e) => Self::transport(format!("Network error: {e}")),
            TransportError::Other(message) => Self::transport(message),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
