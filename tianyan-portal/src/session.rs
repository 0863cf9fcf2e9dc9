//! Session-scoped storage and the typed state kept in it.
//!
//! Storage is a flat string map with the two keys the results page reads:
//! `content` (JSON list of records) and `search` (the raw query). It lives
//! for one client run. [`SessionState`] is the typed view over those keys.

use crate::error::PortalError;
use crate::record::{MAX_RESULTS, ResultSet};
use dashmap::DashMap;
use std::sync::Arc;

pub const CONTENT_KEY: &str = "content";
pub const SEARCH_KEY: &str = "search";

/// Key/value store scoped to one session.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String);
    fn remove_item(&self, key: &str);
}

/// In-process storage; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    items: Arc<DashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).map(|v| v.value().clone())
    }

    fn set_item(&self, key: &str, value: String) {
        self.items.insert(key.to_string(), value);
    }

    fn remove_item(&self, key: &str) {
        self.items.remove(key);
    }
}

/// What a search leaves behind for the results view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub query: String,
    pub results: ResultSet,
}

impl SessionState {
    pub fn new(query: impl Into<String>, results: ResultSet) -> Self {
        Self {
            query: query.into(),
            results,
        }
    }

    /// Overwrite both keys.
    pub fn save(&self, storage: &dyn SessionStorage) -> Result<(), PortalError> {
        let content = serde_json::to_string(&self.results).map_err(PortalError::SessionEncode)?;
        storage.set_item(CONTENT_KEY, content);
        storage.set_item(SEARCH_KEY, self.query.clone());
        tracing::debug!(
            target: "portal.session",
            records = self.results.len(),
            "session.saved"
        );
        Ok(())
    }

    /// Read both keys back; either one missing is an error.
    ///
    /// ```
    /// use tianyan_portal::{MemorySessionStorage, PortalError, SessionState};
    ///
    /// let storage = MemorySessionStorage::new();
    /// assert!(matches!(
    ///     SessionState::load(&storage),
    ///     Err(PortalError::SessionMissing("content"))
    /// ));
    ///
    /// SessionState::new("rust", Default::default()).save(&storage).unwrap();
    /// assert_eq!(SessionState::load(&storage).unwrap().query, "rust");
    /// ```
    pub fn load(storage: &dyn SessionStorage) -> Result<Self, PortalError> {
        let content = storage
            .get_item(CONTENT_KEY)
            .ok_or(PortalError::SessionMissing(CONTENT_KEY))?;
        let query = storage
            .get_item(SEARCH_KEY)
            .ok_or(PortalError::SessionMissing(SEARCH_KEY))?;
        let stored: ResultSet =
            serde_json::from_str(&content).map_err(|source| PortalError::SessionCorrupt {
                key: CONTENT_KEY,
                source,
            })?;
        // Another writer may have left duplicates or an oversized list.
        let results = ResultSet::from_records(stored, MAX_RESULTS);
        Ok(Self { query, results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MAX_RESULTS, SearchResultRecord};

    fn sample() -> SessionState {
        let records = (0..3).map(|i| {
            SearchResultRecord::new(format!("t{i}"), format!("http://h/{i}"), "k").unwrap()
        });
        SessionState::new("query", ResultSet::from_records(records, MAX_RESULTS))
    }

    #[test]
    fn save_then_load_returns_same_state() {
        let storage = MemorySessionStorage::new();
        let state = sample();
        state.save(&storage).unwrap();
        assert_eq!(SessionState::load(&storage).unwrap(), state);
    }

    #[test]
    fn content_uses_results_page_schema() {
        let storage = MemorySessionStorage::new();
        sample().save(&storage).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&storage.get_item(CONTENT_KEY).unwrap()).unwrap();
        assert_eq!(raw[0]["TTitle"], "t0");
        assert_eq!(raw[2]["THref"], "http://h/2");
        assert_eq!(storage.get_item(SEARCH_KEY).as_deref(), Some("query"));
    }

    #[test]
    fn new_search_overwrites_previous() {
        let storage = MemorySessionStorage::new();
        sample().save(&storage).unwrap();
        SessionState::new("second", ResultSet::default())
            .save(&storage)
            .unwrap();
        let loaded = SessionState::load(&storage).unwrap();
        assert_eq!(loaded.query, "second");
        assert!(loaded.results.is_empty());
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn missing_query_is_reported() {
        let storage = MemorySessionStorage::new();
        sample().save(&storage).unwrap();
        storage.remove_item(SEARCH_KEY);
        assert!(matches!(
            SessionState::load(&storage),
            Err(PortalError::SessionMissing(SEARCH_KEY))
        ));
    }

    #[test]
    fn garbage_content_is_reported() {
        let storage = MemorySessionStorage::new();
        storage.set_item(CONTENT_KEY, "{not json".into());
        storage.set_item(SEARCH_KEY, "q".into());
        assert!(matches!(
            SessionState::load(&storage),
            Err(PortalError::SessionCorrupt { key: CONTENT_KEY, .. })
        ));
    }

    #[test]
    fn external_writer_with_same_shape_is_readable() {
        let storage = MemorySessionStorage::new();
        storage.set_item(
            CONTENT_KEY,
            r#"[{"TTitle":"x","THref":"http://x","TKeywords":"y"}]"#.into(),
        );
        storage.set_item(SEARCH_KEY, "x".into());
        let state = SessionState::load(&storage).unwrap();
        assert_eq!(state.results.as_slice()[0].keywords(), "y");
    }

    #[test]
    fn external_content_is_deduplicated_and_capped() {
        let storage = MemorySessionStorage::new();
        let mut items = vec![serde_json::json!({"TTitle": "dup", "THref": "http://d"}); 3];
        items.extend((0..250).map(|i| {
            serde_json::json!({"TTitle": format!("t{i}"), "THref": format!("http://h/{i}")})
        }));
        storage.set_item(CONTENT_KEY, serde_json::Value::from(items).to_string());
        storage.set_item(SEARCH_KEY, "q".into());

        let state = SessionState::load(&storage).unwrap();
        assert_eq!(state.results.len(), MAX_RESULTS);
        assert_eq!(state.results.as_slice()[0].title(), "dup");
        assert_eq!(state.results.as_slice()[1].title(), "t0");
    }

    #[test]
    fn external_record_with_empty_href_is_corrupt() {
        let storage = MemorySessionStorage::new();
        storage.set_item(CONTENT_KEY, r#"[{"TTitle":"x","THref":""}]"#.into());
        storage.set_item(SEARCH_KEY, "x".into());
        assert!(matches!(
            SessionState::load(&storage),
            Err(PortalError::SessionCorrupt { key: CONTENT_KEY, .. })
        ));
    }
}
