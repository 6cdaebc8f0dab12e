//! Collection synchronization settings.

use serde::{Deserialize, Serialize};

/// Collection synchronization settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncSettings {
    /// Quiet period before a typed search is applied.
    pub search_debounce_ms: u64,
    /// Default page size for project and task lists.
    pub page_size: u32,
    /// Default page size for the activity feed.
    pub activity_page_size: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            search_debounce_ms: 500,
            page_size: 6,
            activity_page_size: 10,
        }
    }
}

impl SyncSettings {
    /// Debounce window as a [`std::time::Duration`].
    pub fn search_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = SyncSettings::default();
        assert_eq!(s.page_size, 6);
        assert_eq!(s.activity_page_size, 10);
        assert_eq!(s.search_debounce().as_millis(), 500);
    }
}
