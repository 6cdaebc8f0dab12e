//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`,
//! so a settings file only needs the keys it changes.

mod api;
mod sync;

pub use api::*;
pub use sync::*;

use serde::{Deserialize, Serialize};
use taskhub_core::logging::LogFormat;

/// Root settings type for the TaskHub client.
///
/// ```json
/// {
///   "api": { "baseUrl": "https://tasks.example.com/api", "statusDialect": "legacy" },
///   "sync": { "pageSize": 10 }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Settings schema version.
    pub version: String,
    /// Backend connection settings.
    pub api: ApiSettings,
    /// Session persistence settings.
    pub session: SessionSettings,
    /// Collection synchronization settings.
    pub sync: SyncSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            api: ApiSettings::default(),
            session: SessionSettings::default(),
            sync: SyncSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Log level for the stderr subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug-level.
    Debug,
    /// Info-level.
    Info,
    /// Warning-level (default).
    #[default]
    Warn,
    /// Error-level.
    Error,
}

impl LogLevel {
    /// Convert to a tracing filter string.
    pub fn as_filter_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level written to stderr (`RUST_LOG` wins when set).
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_json_fills_defaults() {
        let settings: ClientSettings =
            serde_json::from_value(json!({"logging": {"level": "debug"}})).unwrap();
        assert_eq!(settings.logging.level, LogLevel::Debug);
        assert_eq!(settings.logging.format, LogFormat::Compact);
        assert_eq!(settings.api.timeout_ms, 30_000);
    }

    #[test]
    fn round_trips_camel_case_keys() {
        let value = serde_json::to_value(ClientSettings::default()).unwrap();
        assert!(value["api"].get("baseUrl").is_some());
        assert!(value["sync"].get("searchDebounceMs").is_some());
    }

    #[test]
    fn level_filter_strings() {
        assert_eq!(LogLevel::Warn.as_filter_str(), "warn");
        assert_eq!(LogLevel::Trace.as_filter_str(), "trace");
    }
}
