//! # taskhub-auth
//!
//! Authentication for the TaskHub client.
//!
//! - [`Session`]: access token, optional refresh token, optional user
//! - [`SessionStore`]: where the session persists ([`FileSessionStore`] with
//!   0o600 permissions, or [`MemorySessionStore`])
//! - [`AuthService`]: the single session owner; login, signup, one-shot
//!   refresh after a 401, logout, and [`SessionEvent`] notifications

#![deny(unsafe_code)]

pub mod errors;
pub mod service;
pub mod session;
pub mod store;

pub use errors::AuthError;
pub use service::AuthService;
pub use session::{Session, SessionEvent};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
