//! Owned configuration cache
//!
//! Holds the last fetched `ConfigSnapshot`, a version per provider family and
//! a derived cache of display rows keyed by the family's configuration key.
//!
//! The store is a single handle shared by reference (`Arc<ConfigStore>`);
//! there is no global instance. The state lock is never held across an
//! await. Two async gates order the remote work instead:
//! - the fetch gate makes a second fetch wait for the first, then reuse its
//!   result unless a refresh was forced
//! - one write gate per family serializes list rewrites of that family

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use tokio::sync::{Mutex, MutexGuard};

use crate::accounts::rows::{ProviderRow, ProviderSection, DEFAULT_KEY_PREVIEW_LEN};
use crate::logging::SharedLogger;
use crate::remote::{ConfigSource, RemoteResult};
use crate::types::{ConfigSnapshot, ProviderEntry, ProviderFamily, SnapshotVersion};
use crate::{log_debug, log_warn};

fn slot(family: ProviderFamily) -> usize {
    match family {
        ProviderFamily::Gemini => 0,
        ProviderFamily::Claude => 1,
        ProviderFamily::Codex => 2,
    }
}

#[derive(Default)]
struct StoreState {
    snapshot: Option<ConfigSnapshot>,
    versions: [SnapshotVersion; 3],
    derived: HashMap<&'static str, (SnapshotVersion, Vec<ProviderRow>)>,
}

pub struct ConfigStore {
    state: RwLock<StoreState>,
    fetch_gate: Mutex<()>,
    write_gates: [Mutex<()>; 3],
    preview_len: AtomicUsize,
    logger: SharedLogger,
}

impl ConfigStore {
    /// Create an empty (not yet loaded) store
    pub fn new(logger: SharedLogger) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            fetch_gate: Mutex::new(()),
            write_gates: [Mutex::new(()), Mutex::new(()), Mutex::new(())],
            preview_len: AtomicUsize::new(DEFAULT_KEY_PREVIEW_LEN),
            logger,
        }
    }

    /// Number of key characters shown in provider rows (at least 1)
    pub fn with_preview_len(self, len: usize) -> Self {
        self.set_preview_len(len);
        self
    }

    /// Change the key preview length, dropping rows built with the old one
    pub fn set_preview_len(&self, len: usize) {
        let len = len.max(1);
        if self.preview_len.swap(len, Ordering::SeqCst) != len {
            self.state.write().derived.clear();
        }
    }

    pub fn preview_len(&self) -> usize {
        self.preview_len.load(Ordering::SeqCst)
    }

    /// Whether a snapshot has been fetched at least once
    pub fn is_loaded(&self) -> bool {
        self.state.read().snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<ConfigSnapshot> {
        self.state.read().snapshot.clone()
    }

    pub fn version(&self, family: ProviderFamily) -> SnapshotVersion {
        self.state.read().versions[slot(family)]
    }

    /// Current list of `family` together with its version, read atomically
    pub fn entries(&self, family: ProviderFamily) -> Option<(Vec<ProviderEntry>, SnapshotVersion)> {
        let state = self.state.read();
        state
            .snapshot
            .as_ref()
            .map(|s| (s.entries(family).to_vec(), state.versions[slot(family)]))
    }

    /// Return the cached snapshot, fetching it when absent or when forced
    ///
    /// A fetch that fails leaves the cache untouched.
    pub async fn fetch_config(
        &self,
        source: &dyn ConfigSource,
        force_refresh: bool,
    ) -> RemoteResult<ConfigSnapshot> {
        let _gate = self.fetch_gate.lock().await;

        if !force_refresh {
            if let Some(snapshot) = self.snapshot() {
                log_debug!(self.logger, "Config cache hit");
                return Ok(snapshot);
            }
        }

        let snapshot = source.fetch_config().await?;
        self.replace(snapshot.clone());
        log_debug!(
            self.logger,
            "Config fetched: {} provider entries",
            snapshot.total_providers()
        );
        Ok(snapshot)
    }

    /// Install a new snapshot, bumping every family version
    pub fn replace(&self, snapshot: ConfigSnapshot) {
        let mut state = self.state.write();
        state.snapshot = Some(snapshot);
        for version in state.versions.iter_mut() {
            version.bump();
        }
        state.derived.clear();
    }

    /// Replace the cached list of one family after a successful persist
    ///
    /// Returns the new version, or `None` when nothing is loaded yet.
    pub fn update_config_value(
        &self,
        family: ProviderFamily,
        entries: Vec<ProviderEntry>,
    ) -> Option<SnapshotVersion> {
        let mut state = self.state.write();
        let Some(snapshot) = state.snapshot.as_mut() else {
            log_warn!(self.logger, "Ignoring update of {}: config not loaded", family.cache_key());
            return None;
        };
        snapshot.set_entries(family, entries);
        Some(state.versions[slot(family)].bump())
    }

    /// Drop derived data cached under `key`
    ///
    /// Returns whether anything was cached.
    pub fn clear_cache(&self, key: &str) -> bool {
        self.state.write().derived.remove(key).is_some()
    }

    pub fn is_cached(&self, key: &str) -> bool {
        self.state.read().derived.contains_key(key)
    }

    /// Display rows of one family, memoised until cleared or the list changes
    pub fn provider_rows(&self, family: ProviderFamily) -> Vec<ProviderRow> {
        let key = family.cache_key();
        {
            let state = self.state.read();
            let current = state.versions[slot(family)];
            match (&state.snapshot, state.derived.get(key)) {
                (None, _) => return Vec::new(),
                (Some(_), Some((version, rows))) if *version == current => return rows.clone(),
                _ => {}
            }
        }

        let mut state = self.state.write();
        let version = state.versions[slot(family)];
        let rows = match &state.snapshot {
            Some(snapshot) => ProviderRow::for_entries(family, snapshot.entries(family), self.preview_len()),
            None => return Vec::new(),
        };
        state.derived.insert(key, (version, rows.clone()));
        rows
    }

    /// Non-empty provider sections in display order
    pub fn provider_sections(&self) -> Vec<ProviderSection> {
        ProviderFamily::ALL
            .into_iter()
            .map(|family| ProviderSection::new(family, self.provider_rows(family)))
            .filter(|section| !section.is_empty())
            .collect()
    }

    /// Serialize rewrites of one family's list
    pub(crate) async fn lock_family(&self, family: ProviderFamily) -> MutexGuard<'_, ()> {
        self.write_gates[slot(family)].lock().await
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("ConfigStore")
            .field("loaded", &state.snapshot.is_some())
            .field("versions", &state.versions)
            .field("cached", &state.derived.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::remote::MemoryProviderStore;
    use std::sync::Arc;

    fn store() -> ConfigStore {
        ConfigStore::new(Arc::new(NoOpLogger))
    }

    fn sample_config() -> ConfigSnapshot {
        ConfigSnapshot::default()
            .with_entries(ProviderFamily::Gemini, vec![ProviderEntry::new("gemini-key-1")])
            .with_entries(
                ProviderFamily::Codex,
                vec![ProviderEntry::new("codex-key-1"), ProviderEntry::new("codex-key-2")],
            )
    }

    #[tokio::test]
    async fn test_fetch_uses_cache_unless_forced() {
        let remote = MemoryProviderStore::with_config(sample_config());
        let store = store();
        assert!(!store.is_loaded());

        let first = store.fetch_config(&remote, false).await.unwrap();
        assert_eq!(first.total_providers(), 3);
        assert_eq!(remote.fetch_calls(), 1);

        // Cached
        store.fetch_config(&remote, false).await.unwrap();
        assert_eq!(remote.fetch_calls(), 1);

        // Forced
        remote.set_entries(ProviderFamily::Claude, vec![ProviderEntry::new("claude-key")]);
        let refreshed = store.fetch_config(&remote, true).await.unwrap();
        assert_eq!(remote.fetch_calls(), 2);
        assert_eq!(refreshed.total_providers(), 4);
        assert_eq!(store.snapshot(), Some(refreshed));
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_result() {
        let remote = MemoryProviderStore::with_config(sample_config());
        let store = store();

        let (a, b) = futures::join!(store.fetch_config(&remote, false), store.fetch_config(&remote, false));
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(remote.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_cache() {
        let remote = MemoryProviderStore::with_config(sample_config());
        let store = store();
        store.fetch_config(&remote, false).await.unwrap();
        let version = store.version(ProviderFamily::Gemini);

        remote.set_failing_fetches(true);
        assert!(store.fetch_config(&remote, true).await.is_err());
        assert_eq!(store.snapshot(), Some(sample_config()));
        assert_eq!(store.version(ProviderFamily::Gemini), version);
    }

    #[test]
    fn test_update_bumps_only_that_family() {
        let store = store();
        assert_eq!(store.update_config_value(ProviderFamily::Gemini, vec![]), None);

        store.replace(sample_config());
        let gemini = store.version(ProviderFamily::Gemini);
        let codex = store.version(ProviderFamily::Codex);

        let next = store
            .update_config_value(ProviderFamily::Gemini, vec![ProviderEntry::new("a"), ProviderEntry::new("b")])
            .unwrap();
        assert!(next > gemini);
        assert_eq!(store.version(ProviderFamily::Codex), codex);

        let (entries, version) = store.entries(ProviderFamily::Gemini).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(version, next);
        assert_eq!(store.entries(ProviderFamily::Codex).unwrap().0.len(), 2);
    }

    #[test]
    fn test_rows_are_cached_and_cleared() {
        let store = store();
        assert!(store.provider_rows(ProviderFamily::Gemini).is_empty());
        assert!(!store.is_cached("gemini-api-key"));

        store.replace(sample_config());
        let rows = store.provider_rows(ProviderFamily::Gemini);
        assert_eq!(rows[0].key_preview, "gemini-k...");
        assert!(store.is_cached("gemini-api-key"));
        assert!(!store.is_cached("codex-api-key"));

        assert!(store.clear_cache("gemini-api-key"));
        assert!(!store.is_cached("gemini-api-key"));
        assert!(!store.clear_cache("gemini-api-key"));
    }

    #[test]
    fn test_rows_follow_updates() {
        let store = store().with_preview_len(4);
        store.replace(sample_config());
        assert!(store.provider_rows(ProviderFamily::Gemini)[0].enabled);

        store.update_config_value(
            ProviderFamily::Gemini,
            vec![ProviderEntry::new("gemini-key-1").with_excluded_models(["all"])],
        );
        let rows = store.provider_rows(ProviderFamily::Gemini);
        assert!(!rows[0].enabled);
        assert_eq!(rows[0].key_preview, "gemi...");
    }

    #[test]
    fn test_preview_len_is_clamped_and_rebuilds_rows() {
        let store = store().with_preview_len(0);
        assert_eq!(store.preview_len(), 1);

        store.replace(sample_config());
        assert_eq!(store.provider_rows(ProviderFamily::Gemini)[0].key_preview, "g...");

        store.set_preview_len(6);
        assert!(!store.is_cached("gemini-api-key"));
        assert_eq!(store.provider_rows(ProviderFamily::Gemini)[0].key_preview, "gemini...");
    }

    #[test]
    fn test_sections_skip_empty_families() {
        let store = store();
        store.replace(sample_config());
        let families: Vec<ProviderFamily> = store.provider_sections().iter().map(|s| s.family).collect();
        assert_eq!(families, vec![ProviderFamily::Gemini, ProviderFamily::Codex]);
    }
}
