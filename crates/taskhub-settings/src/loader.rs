//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`ClientSettings::default()`]
//! 2. If the settings file exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. Reject values no client could work with
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use taskhub_core::StatusDialect;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::{ClientSettings, LogLevel, home_dir};

/// Env var naming an alternative settings file.
pub const SETTINGS_PATH_ENV: &str = "TASKHUB_SETTINGS";

/// Resolve the settings file path: `$TASKHUB_SETTINGS` or `~/.taskhub/settings.json`.
pub fn settings_path() -> PathBuf {
    match std::env::var(SETTINGS_PATH_ENV) {
        Ok(path) if !path.is_empty() => crate::types::expand_home(&path),
        _ => home_dir().join(".taskhub").join("settings.json"),
    }
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<ClientSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with process env var overrides.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<ClientSettings> {
    load_settings_with_env(path, |name| std::env::var(name).ok())
}

/// Load settings from `path`, reading overrides through `env`.
pub fn load_settings_with_env<F>(path: &Path, env: F) -> Result<ClientSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = serde_json::to_value(ClientSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: ClientSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings, &env);
    check(&settings)?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `TASKHUB_*` overrides read through `env`.
///
/// Invalid values are ignored with a warning.
pub fn apply_env_overrides<F>(settings: &mut ClientSettings, env: &F)
where
    F: Fn(&str) -> Option<String>,
{
    // ── API ─────────────────────────────────────────────────────────
    if let Some(v) = read_string(env, "TASKHUB_API_URL") {
        settings.api.base_url = v;
    }
    if let Some(v) = read_u64(env, "TASKHUB_TIMEOUT_MS", 1000, 600_000) {
        settings.api.timeout_ms = v;
    }
    if let Some(v) = read_enum::<StatusDialect, _>(env, "TASKHUB_STATUS_DIALECT") {
        settings.api.status_dialect = v;
    }

    // ── Session ─────────────────────────────────────────────────────
    if let Some(v) = read_string(env, "TASKHUB_SESSION_FILE") {
        settings.session.file = Some(v);
    }

    // ── Sync ────────────────────────────────────────────────────────
    if let Some(v) = read_u64(env, "TASKHUB_SEARCH_DEBOUNCE_MS", 0, 10_000) {
        settings.sync.search_debounce_ms = v;
    }
    if let Some(v) = read_u32(env, "TASKHUB_PAGE_SIZE", 1, 100) {
        settings.sync.page_size = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read_enum::<LogLevel, _>(env, "TASKHUB_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

fn check(settings: &ClientSettings) -> Result<()> {
    let url = settings.api.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(SettingsError::InvalidValue(format!(
            "api.baseUrl must start with http:// or https://, got {url:?}"
        )));
    }
    if settings.sync.page_size == 0 {
        return Err(SettingsError::InvalidValue(
            "sync.pageSize must be at least 1".to_string(),
        ));
    }
    Ok(())
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a lowercase serde enum name (`"legacy"`, `"debug"`, ...).
pub fn parse_enum<T: serde::de::DeserializeOwned>(val: &str) -> Option<T> {
    serde_json::from_value(Value::String(val.trim().to_lowercase())).ok()
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_string<F: Fn(&str) -> Option<String>>(env: &F, name: &str) -> Option<String> {
    env(name).filter(|v| !v.trim().is_empty())
}

fn read_u64<F: Fn(&str) -> Option<String>>(env: &F, name: &str, min: u64, max: u64) -> Option<u64> {
    let val = env(name)?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

fn read_u32<F: Fn(&str) -> Option<String>>(env: &F, name: &str, min: u32, max: u32) -> Option<u32> {
    let val = env(name)?;
    let result = parse_u32_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u32 env var, ignoring");
    }
    result
}

fn read_enum<T, F>(env: &F, name: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
    F: Fn(&str) -> Option<String>,
{
    let val = env(name)?;
    let result = parse_enum(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "unrecognized env var value, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
