//! # taskhub-settings
//!
//! Configuration for the TaskHub client, loaded from three layers (in
//! priority order):
//! 1. **Compiled defaults**: [`ClientSettings::default()`]
//! 2. **User file**: `~/.taskhub/settings.json`, or `$TASKHUB_SETTINGS`
//!    (deep-merged over defaults)
//! 3. **Environment variables**: `TASKHUB_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    deep_merge, load_settings, load_settings_from_path, load_settings_with_env, settings_path,
};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = ClientSettings::default();
        let _path = settings_path();
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = ClientSettings::default();
        assert_eq!(settings.version, "0.1.0");
        assert_eq!(settings.api.base_url, "http://localhost:5000/api");
        assert_eq!(settings.api.timeout_ms, 30_000);
        assert!(settings.session.persist);
        assert_eq!(settings.sync.search_debounce_ms, 500);
    }
}
