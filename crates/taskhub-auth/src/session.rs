//! Session state and the events emitted when it changes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskhub_core::User;

/// The signed-in session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token attached to every request.
    pub access_token: String,
    /// Token exchanged at `/auth/refresh` after a 401.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// The signed-in account, when the backend returned it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Session {
    /// A session holding only an access token.
    pub fn with_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            user: None,
        }
    }

    /// Parse an auth response body.
    ///
    /// The payload may sit at the top level or under `data`. The access token
    /// is read from `accessToken`, `token` or `access_token`; the refresh
    /// token from `refreshToken` or `refresh_token`. Returns `None` when no
    /// access token is present.
    pub fn from_response(body: &Value) -> Option<Self> {
        let payload = body
            .get("data")
            .filter(|d| d.is_object())
            .unwrap_or(body);

        let access_token = first_string(payload, &["accessToken", "token", "access_token"])?;
        let refresh_token = first_string(payload, &["refreshToken", "refresh_token"]);
        let user = payload
            .get("user")
            .and_then(|u| serde_json::from_value::<User>(u.clone()).ok());

        Some(Self {
            access_token,
            refresh_token,
            user,
        })
    }

    /// Fold a refresh response into this session.
    ///
    /// Keeps the stored refresh token and user when the response omits them.
    #[must_use]
    pub fn refreshed(&self, fresh: Self) -> Self {
        Self {
            access_token: fresh.access_token,
            refresh_token: fresh.refresh_token.or_else(|| self.refresh_token.clone()),
            user: fresh.user.or_else(|| self.user.clone()),
        }
    }
}

fn first_string(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

/// Session lifecycle notifications.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// Login or signup succeeded.
    SignedIn(Option<User>),
    /// The access token was replaced after a 401.
    Refreshed,
    /// Refresh failed; the user must sign in again.
    Expired,
    /// Explicit logout.
    SignedOut,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
