//! Wiring: settings in, authenticated API client out.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use taskhub_auth::{AuthService, FileSessionStore, MemorySessionStore, SessionStore};
use taskhub_client::{ApiClient, HttpTransport};
use taskhub_settings::ClientSettings;
use tracing::debug;

/// Everything a command needs.
pub struct App {
    /// Effective settings.
    pub settings: ClientSettings,
    /// Session owner.
    pub auth: Arc<AuthService>,
    /// Gateway factory.
    pub api: ApiClient,
    /// Print JSON instead of text.
    pub json: bool,
}

impl App {
    /// Build the HTTP stack described by `settings`.
    pub fn build(settings: ClientSettings, json: bool) -> Result<Self> {
        let base_url = settings.api.trimmed_base_url().to_string();
        let client = HttpTransport::build_client(Duration::from_millis(settings.api.timeout_ms))
            .context("Failed to build HTTP client")?;

        let store: Arc<dyn SessionStore> = if settings.session.persist {
            let path = settings.session.resolved_file();
            debug!(path = %path.display(), "using file session store");
            Arc::new(FileSessionStore::new(path))
        } else {
            Arc::new(MemorySessionStore::new())
        };

        let auth = Arc::new(AuthService::new(client.clone(), base_url.clone(), store));
        let transport = HttpTransport::new(client, base_url, Arc::clone(&auth));
        let api = ApiClient::new(Arc::new(transport), settings.api.status_dialect);

        Ok(Self {
            settings,
            auth,
            api,
            json,
        })
    }

    /// Page size for list commands without `--limit`.
    pub fn page_size(&self) -> u32 {
        self.settings.sync.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_memory_store() {
        let mut settings = ClientSettings::default();
        settings.session.persist = false;
        let app = App::build(settings, false).unwrap();
        assert!(!app.auth.is_authenticated());
        assert_eq!(app.auth.base_url(), "http://localhost:5000/api");
        assert_eq!(app.page_size(), 6);
    }
}
