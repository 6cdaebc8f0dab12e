//! Backend connection and session persistence settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use taskhub_core::StatusDialect;

/// Backend connection settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Base URL every route is joined onto.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Spelling of task statuses sent to the backend.
    pub status_dialect: StatusDialect,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_ms: 30_000,
            status_dialect: StatusDialect::Standard,
        }
    }
}

impl ApiSettings {
    /// Base URL without a trailing slash.
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Session persistence settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Whether the session survives process restarts.
    pub persist: bool,
    /// Session file; `~/` is expanded. Defaults to `~/.taskhub/session.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            persist: true,
            file: None,
        }
    }
}

impl SessionSettings {
    /// Resolved session file path.
    pub fn resolved_file(&self) -> PathBuf {
        match self.file.as_deref() {
            Some(path) => expand_home(path),
            None => home_dir().join(".taskhub").join("session.json"),
        }
    }
}

pub(crate) fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

pub(crate) fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_file_under_taskhub_dir() {
        let path = SessionSettings::default().resolved_file();
        assert!(path.ends_with(".taskhub/session.json"));
    }

    #[test]
    fn explicit_absolute_file_is_kept() {
        let settings = SessionSettings {
            persist: true,
            file: Some("/var/tmp/s.json".into()),
        };
        assert_eq!(settings.resolved_file(), PathBuf::from("/var/tmp/s.json"));
    }

    #[test]
    fn tilde_is_expanded() {
        let path = expand_home("~/x/y.json");
        assert!(!path.starts_with("~"));
        assert!(path.ends_with("x/y.json"));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let api = ApiSettings {
            base_url: "https://h/api/".into(),
            ..Default::default()
        };
        assert_eq!(api.trimmed_base_url(), "https://h/api");
    }
}
