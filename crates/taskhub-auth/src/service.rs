//! The authentication service: owns the session and talks to `/auth/*`.
//!
//! There is exactly one [`AuthService`] per client. The HTTP transport
//! borrows the access token from it for every request and hands a 401 back
//! via [`AuthService::refresh_after_unauthorized`]. Refreshes are serialized
//! on a `tokio::sync::Mutex`, so a burst of 401s costs a single round trip.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Value, json};
use taskhub_core::{Credentials, RawEnvelope, SignupRequest, User, Validate, extract_message};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::errors::AuthError;
use crate::session::{Session, SessionEvent};
use crate::store::SessionStore;

const EVENT_CAPACITY: usize = 16;

/// Session owner and `/auth/*` client.
pub struct AuthService {
    client: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    session: RwLock<Option<Session>>,
    refresh_lock: tokio::sync::Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Create a service, restoring any session held by `store`.
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let restored = store.load();
        if restored.is_some() {
            debug!("restored stored session");
        }
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            session: RwLock::new(restored),
            refresh_lock: tokio::sync::Mutex::new(()),
            events,
        }
    }

    /// Base URL all `/auth/*` routes are joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Session access ──────────────────────────────────────────────

    /// Current session, if signed in.
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    /// Current access token, if signed in.
    pub fn access_token(&self) -> Option<String> {
        self.session.read().as_ref().map(|s| s.access_token.clone())
    }

    /// The signed-in account, if known.
    pub fn current_user(&self) -> Option<User> {
        self.session.read().as_ref().and_then(|s| s.user.clone())
    }

    /// Whether a session is held.
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    /// Replace the session in memory and in the store.
    pub fn set_session(&self, session: Session) -> Result<(), AuthError> {
        *self.session.write() = Some(session.clone());
        self.store.save(&session)
    }

    /// Drop the session from memory and the store.
    pub fn clear_session(&self) {
        *self.session.write() = None;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored session");
        }
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // no receivers is fine
        let _ = self.events.send(event);
    }

    // ── Flows ───────────────────────────────────────────────────────

    /// Sign in with email and password.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        credentials.validate()?;
        let body = self
            .post_json("/auth/login", credentials, None, "Login failed")
            .await?;
        let session = Session::from_response(&body).ok_or(AuthError::MissingToken)?;
        self.set_session(session.clone())?;
        info!("signed in");
        self.emit(SessionEvent::SignedIn(session.user.clone()));
        Ok(session)
    }

    /// Create an account and sign in.
    #[tracing::instrument(skip_all)]
    pub async fn signup(&self, request: &SignupRequest) -> Result<Session, AuthError> {
        request.validate()?;
        let body = self
            .post_json("/auth/signup", request, None, "Signup failed")
            .await?;
        let session = Session::from_response(&body).ok_or(AuthError::MissingToken)?;
        self.set_session(session.clone())?;
        info!("account created");
        self.emit(SessionEvent::SignedIn(session.user.clone()));
        Ok(session)
    }

    /// Recover from a 401 received while using `rejected_token`.
    ///
    /// Returns the token to retry with. When another caller already replaced
    /// `rejected_token`, that newer token is returned without a round trip.
    /// On any refresh failure the session is cleared, [`SessionEvent::Expired`]
    /// is emitted, and [`AuthError::SessionExpired`] returned.
    #[tracing::instrument(skip_all)]
    pub async fn refresh_after_unauthorized(
        &self,
        rejected_token: &str,
    ) -> Result<String, AuthError> {
        let _guard = self.refresh_lock.lock().await;

        let Some(current) = self.session() else {
            return Err(AuthError::NotAuthenticated);
        };
        if current.access_token != rejected_token {
            debug!("token already refreshed by a concurrent request");
            return Ok(current.access_token);
        }
        let Some(refresh_token) = current.refresh_token.clone() else {
            return Err(self.expire("no refresh token stored".to_string()));
        };

        let body = json!({ "refreshToken": refresh_token });
        let response = self
            .post_json("/auth/refresh", &body, None, "Token refresh failed")
            .await;
        let fresh = match response {
            Ok(body) => Session::from_response(&body),
            Err(e) => return Err(self.expire(e.to_string())),
        };
        let Some(fresh) = fresh else {
            return Err(self.expire("refresh response did not include an access token".to_string()));
        };

        let merged = current.refreshed(fresh);
        let token = merged.access_token.clone();
        if let Err(e) = self.set_session(merged) {
            warn!(error = %e, "failed to persist refreshed session");
        }
        info!("access token refreshed");
        self.emit(SessionEvent::Refreshed);
        Ok(token)
    }

    /// Sign out. The backend call is best effort; local state is always cleared.
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self) {
        if let Some(token) = self.access_token() {
            if let Err(e) = self
                .post_json("/auth/logout", &json!({}), Some(&token), "Logout failed")
                .await
            {
                debug!(error = %e, "logout request failed, clearing locally");
            }
        }
        self.clear_session();
        self.emit(SessionEvent::SignedOut);
    }

    fn expire(&self, reason: String) -> AuthError {
        warn!(%reason, "session expired");
        self.clear_session();
        self.emit(SessionEvent::Expired);
        AuthError::SessionExpired(reason)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
        fallback: &str,
    ) -> Result<Value, AuthError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let parsed: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        let backend_failed = RawEnvelope::from_value(&parsed).is_some_and(|env| !env.is_success());
        if !status.is_success() || backend_failed {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: extract_message(&parsed).unwrap_or_else(|| fallback.to_string()),
            });
        }
        Ok(parsed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
