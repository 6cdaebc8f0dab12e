//! Backend response envelope.
//!
//! Every backend response body has the shape
//!
//! ```json
//! { "success": true, "message": "...", "data": { ... } }
//! ```
//!
//! where `message` may be a string, an array of strings, or an array of
//! `{ "message": ... }` field errors, and list endpoints put either a bare
//! array or `{ items|tasks|projects|activities, pagination }` under `data`.
//! This module parses the wrapper and extracts a human-readable message; it
//! never decides what a failure *means*, that is the gateway's job.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::pagination::{Page, Pagination};

/// The envelope with its payload left undecoded.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawEnvelope {
    /// `success` flag; absent is treated as success.
    #[serde(default)]
    pub success: Option<bool>,
    /// Free-form message (string or array).
    #[serde(default)]
    pub message: Option<Value>,
    /// Field errors, when the backend reports them separately.
    #[serde(default)]
    pub errors: Option<Value>,
    /// Payload.
    #[serde(default)]
    pub data: Option<Value>,
}

impl RawEnvelope {
    /// Parse an envelope from a response body.
    ///
    /// Returns `None` when the body is not a JSON object.
    pub fn from_value(body: &Value) -> Option<Self> {
        if !body.is_object() {
            return None;
        }
        serde_json::from_value(body.clone()).ok()
    }

    /// Whether the backend reported success.
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(true)
    }

    /// Human-readable message from this envelope, if it carries one.
    pub fn message_text(&self) -> Option<String> {
        self.errors
            .as_ref()
            .and_then(join_messages)
            .or_else(|| self.message.as_ref().and_then(join_messages))
            .or_else(|| {
                self.message
                    .as_ref()
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            })
    }
}

/// Extract a message from an arbitrary response body.
///
/// Priority: field-error array (`errors[]`, then `message[]`) joined by
/// `", "`, then a single `message` string. Returns `None` when the body has
/// nothing usable so the caller can fall back to an operation-specific text.
pub fn extract_message(body: &Value) -> Option<String> {
    RawEnvelope::from_value(body).and_then(|env| env.message_text())
}

/// Join an array of strings or `{message}` objects. `None` for non-arrays or
/// arrays with no usable entries.
fn join_messages(value: &Value) -> Option<String> {
    let items = value.as_array()?;
    let parts: Vec<&str> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj
                .get("message")
                .or_else(|| obj.get("msg"))
                .and_then(Value::as_str),
            _ => None,
        })
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// The two list shapes the backend produces.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    /// A bare array: full list, no server pagination.
    Bare(Vec<T>),
    /// Items wrapped with pagination.
    Wrapped(WrappedList<T>),
}

/// `{ items, pagination }`, with the items key named after the resource on
/// some endpoints.
#[derive(Debug, Deserialize)]
pub struct WrappedList<T> {
    /// Items in server order.
    #[serde(alias = "tasks", alias = "projects", alias = "activities")]
    pub items: Vec<T>,
    /// Server pagination.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> ListPayload<T> {
    /// Normalize into the uniform [`Page`].
    pub fn into_page(self) -> Page<T> {
        match self {
            Self::Bare(items) => Page::unpaged(items),
            Self::Wrapped(list) => Page {
                items: list.items,
                pagination: list.pagination,
            },
        }
    }
}

impl<T: DeserializeOwned> ListPayload<T> {
    /// Decode a list payload; a missing/`null` payload is an empty list.
    pub fn decode(data: Option<Value>) -> Result<Page<T>, serde_json::Error> {
        match data {
            None | Some(Value::Null) => Ok(Page::default()),
            Some(value) => serde_json::from_value::<Self>(value).map(Self::into_page),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
