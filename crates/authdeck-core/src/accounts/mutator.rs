//! Enable/disable toggles for auth files and provider entries
//!
//! Every remote failure stops here: it is logged, turned into an error
//! notification and reported as `ToggleOutcome::Failed`. Local state only
//! changes after the remote write succeeded.

use std::sync::Arc;

use serde::Serialize;

use super::collection::AuthFileCollection;
use crate::config::ConfigStore;
use crate::logging::SharedLogger;
use crate::notify::{Notification, NotificationMessage, SharedNotifier};
use crate::remote::{AuthFilesApi, ProvidersApi};
use crate::types::{ProviderFamily, SnapshotVersion};
use crate::{log_debug, log_error, log_info};

/// Why a toggle did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Connection status is anything but connected
    Disconnected,
    /// The owning collection has not been fetched yet
    NotLoaded,
    /// No entry at the requested position (or with the requested name)
    StaleIndex,
    /// The list changed since the toggle was computed
    StaleSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "camelCase")]
pub enum ToggleOutcome {
    /// Persisted remotely and patched locally
    Applied,
    /// Nothing was sent
    Skipped(SkipReason),
    /// The remote call failed; local state unchanged
    Failed,
}

impl ToggleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ToggleOutcome::Applied)
    }
}

/// Request to enable or disable one provider entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderToggle {
    pub family: ProviderFamily,
    pub index: usize,
    pub enabled: bool,
    /// Family version the caller rendered from; `None` skips the check
    pub version: Option<SnapshotVersion>,
}

impl ProviderToggle {
    pub fn new(family: ProviderFamily, index: usize, enabled: bool) -> Self {
        Self {
            family,
            index,
            enabled,
            version: None,
        }
    }

    /// Reject the toggle if the family list moved past `version`
    pub fn at_version(mut self, version: SnapshotVersion) -> Self {
        self.version = Some(version);
        self
    }
}

/// Translates toggle intents into remote writes and local patches
pub struct ToggleMutator {
    auth_files: Arc<dyn AuthFilesApi>,
    providers: Arc<dyn ProvidersApi>,
    config: Arc<ConfigStore>,
    notifier: SharedNotifier,
    logger: SharedLogger,
}

impl ToggleMutator {
    pub fn new(
        auth_files: Arc<dyn AuthFilesApi>,
        providers: Arc<dyn ProvidersApi>,
        config: Arc<ConfigStore>,
        notifier: SharedNotifier,
        logger: SharedLogger,
    ) -> Self {
        Self {
            auth_files,
            providers,
            config,
            notifier,
            logger,
        }
    }

    /// Set the disabled flag of one auth file
    ///
    /// The remote call is keyed by name, so it is issued even when the name
    /// is not in the local snapshot; the local patch then touches nothing.
    pub async fn toggle_auth_file(
        &self,
        collection: &AuthFileCollection,
        name: &str,
        disabled: bool,
    ) -> ToggleOutcome {
        if !collection.is_loaded() {
            return ToggleOutcome::Skipped(SkipReason::NotLoaded);
        }

        if let Err(e) = self.auth_files.update_status(name, disabled).await {
            log_error!(self.logger, "[Accounts] Failed to update status of {}: {}", name, e);
            self.notifier
                .notify(Notification::error(NotificationMessage::StatusUpdateFailed));
            return ToggleOutcome::Failed;
        }

        match collection.set_disabled(name, disabled) {
            Some(version) => {
                log_info!(
                    self.logger,
                    "[Accounts] {} {} ({})",
                    if disabled { "Disabled" } else { "Enabled" },
                    name,
                    version
                );
            }
            None => {
                log_debug!(self.logger, "[Accounts] {} no longer in the local listing", name);
            }
        }
        self.notifier.notify(Notification::success(
            NotificationMessage::StatusUpdateSuccess { disabled },
        ));
        ToggleOutcome::Applied
    }

    /// Rewrite one provider entry and persist the whole family list
    ///
    /// Holds the family's write gate from the read of the list until the
    /// cache is updated, so two toggles of one family never interleave.
    pub async fn toggle_provider(&self, toggle: ProviderToggle) -> ToggleOutcome {
        let family = toggle.family;
        let _gate = self.config.lock_family(family).await;

        let Some((entries, current)) = self.config.entries(family) else {
            return ToggleOutcome::Skipped(SkipReason::NotLoaded);
        };
        if let Some(expected) = toggle.version {
            if expected != current {
                log_debug!(
                    self.logger,
                    "[Accounts] Ignoring {} toggle computed at {}, list is at {}",
                    family,
                    expected,
                    current
                );
                return ToggleOutcome::Skipped(SkipReason::StaleSnapshot);
            }
        }
        let Some(target) = entries.get(toggle.index) else {
            log_debug!(
                self.logger,
                "[Accounts] Ignoring {} toggle at index {}: list has {} entries",
                family,
                toggle.index,
                entries.len()
            );
            return ToggleOutcome::Skipped(SkipReason::StaleIndex);
        };
        let preview = target.key_preview(4);

        let updated: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                if i == toggle.index {
                    entry.toggled(toggle.enabled)
                } else {
                    entry.clone()
                }
            })
            .collect();

        if let Err(e) = self.providers.save(family, &updated).await {
            log_error!(self.logger, "[Accounts] Failed to save {} list: {}", family, e);
            self.notifier
                .notify(Notification::error(NotificationMessage::UpdateFailed));
            return ToggleOutcome::Failed;
        }

        let key = family.cache_key();
        if let Some(version) = self.config.update_config_value(family, updated) {
            log_info!(
                self.logger,
                "[Accounts] {} {} entry {} ({})",
                if toggle.enabled { "Enabled" } else { "Disabled" },
                family,
                preview,
                version
            );
        }
        self.config.clear_cache(key);
        self.notifier
            .notify(Notification::success(NotificationMessage::ConfigEnabled));
        ToggleOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::notify::MemoryNotifier;
    use crate::remote::{MemoryAuthFiles, MemoryProviderStore};
    use crate::types::{AuthFileEntry, AuthFileType, ConfigSnapshot, ProviderEntry};

    struct Harness {
        auth_files: Arc<MemoryAuthFiles>,
        providers: Arc<MemoryProviderStore>,
        config: Arc<ConfigStore>,
        notifier: Arc<MemoryNotifier>,
        mutator: ToggleMutator,
    }

    fn harness(files: Vec<AuthFileEntry>, config: ConfigSnapshot) -> Harness {
        let auth_files = Arc::new(MemoryAuthFiles::with_files(files));
        let providers = Arc::new(MemoryProviderStore::with_config(config.clone()));
        let store = Arc::new(ConfigStore::new(Arc::new(NoOpLogger)));
        store.replace(config);
        let notifier = Arc::new(MemoryNotifier::new());
        let mutator = ToggleMutator::new(
            auth_files.clone(),
            providers.clone(),
            store.clone(),
            notifier.clone(),
            Arc::new(NoOpLogger),
        );
        Harness {
            auth_files,
            providers,
            config: store,
            notifier,
            mutator,
        }
    }

    fn gemini_config() -> ConfigSnapshot {
        ConfigSnapshot::default()
            .with_entries(
                ProviderFamily::Gemini,
                vec![
                    ProviderEntry::new("gemini-key-1").with_excluded_models(["all"]),
                    ProviderEntry::new("gemini-key-2"),
                ],
            )
            .with_entries(ProviderFamily::Claude, vec![ProviderEntry::new("claude-key")])
    }

    #[tokio::test]
    async fn test_enable_gemini_entry() {
        let h = harness(vec![], gemini_config());
        h.config.provider_rows(ProviderFamily::Gemini);
        assert!(h.config.is_cached("gemini-api-key"));

        let outcome = h
            .mutator
            .toggle_provider(ProviderToggle::new(ProviderFamily::Gemini, 0, true))
            .await;
        assert_eq!(outcome, ToggleOutcome::Applied);

        // The whole list is persisted, only entry 0 changed
        let saves = h.providers.saves();
        assert_eq!(saves.len(), 1);
        let (family, saved) = &saves[0];
        assert_eq!(*family, ProviderFamily::Gemini);
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].excluded_models, Some(vec![]));
        assert_eq!(saved[1], gemini_config().gemini_api_keys[1]);

        let (entries, _) = h.config.entries(ProviderFamily::Gemini).unwrap();
        assert_eq!(&entries, saved);
        assert!(!h.config.is_cached("gemini-api-key"));
        assert_eq!(
            h.notifier.last(),
            Some(Notification::success(NotificationMessage::ConfigEnabled))
        );
    }

    #[tokio::test]
    async fn test_disable_keeps_other_exclusions() {
        let config = ConfigSnapshot::default().with_entries(
            ProviderFamily::Codex,
            vec![ProviderEntry::new("codex-key").with_excluded_models(["gpt-3"])],
        );
        let h = harness(vec![], config);

        let outcome = h
            .mutator
            .toggle_provider(ProviderToggle::new(ProviderFamily::Codex, 0, false))
            .await;
        assert!(outcome.is_applied());

        let (entries, _) = h.config.entries(ProviderFamily::Codex).unwrap();
        assert_eq!(
            entries[0].excluded_models,
            Some(vec!["gpt-3".to_string(), "all".to_string()])
        );
        assert!(!entries[0].is_enabled());
    }

    #[tokio::test]
    async fn test_toggle_keeps_uninterpreted_fields() {
        let config: ConfigSnapshot = serde_json::from_str(
            r#"{"claudeApiKeys": [
                {"apiKey": "sk-1", "priority": 5, "cloak": {"mode": "auto"}},
                {"apiKey": "sk-2", "priority": 9}
            ]}"#,
        )
        .unwrap();
        let h = harness(vec![], config);

        let outcome = h
            .mutator
            .toggle_provider(ProviderToggle::new(ProviderFamily::Claude, 0, false))
            .await;
        assert!(outcome.is_applied());

        let saves = h.providers.saves();
        let persisted = serde_json::to_value(&saves[0].1).unwrap();
        assert_eq!(persisted[0]["priority"], 5);
        assert_eq!(persisted[0]["cloak"]["mode"], "auto");
        assert_eq!(persisted[0]["excludedModels"], serde_json::json!(["all"]));
        assert_eq!(persisted[1]["priority"], 9);
        assert!(persisted[1].get("excludedModels").is_none());
    }

    #[tokio::test]
    async fn test_out_of_bounds_index_is_noop() {
        let h = harness(vec![], gemini_config());
        let before = h.config.snapshot();
        let version = h.config.version(ProviderFamily::Gemini);

        let outcome = h
            .mutator
            .toggle_provider(ProviderToggle::new(ProviderFamily::Gemini, 5, true))
            .await;
        assert_eq!(outcome, ToggleOutcome::Skipped(SkipReason::StaleIndex));
        assert!(h.providers.saves().is_empty());
        assert_eq!(h.config.snapshot(), before);
        assert_eq!(h.config.version(ProviderFamily::Gemini), version);
        assert!(h.notifier.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_cache() {
        let h = harness(vec![], gemini_config());
        h.providers.set_failing_saves(true);
        let before = h.config.snapshot();

        let outcome = h
            .mutator
            .toggle_provider(ProviderToggle::new(ProviderFamily::Gemini, 0, true))
            .await;
        assert_eq!(outcome, ToggleOutcome::Failed);
        assert_eq!(h.config.snapshot(), before);
        assert_eq!(
            h.notifier.last(),
            Some(Notification::error(NotificationMessage::UpdateFailed))
        );
    }

    #[tokio::test]
    async fn test_families_are_independent() {
        let h = harness(vec![], gemini_config());
        let claude = h.config.version(ProviderFamily::Claude);
        let claude_entries = h.config.entries(ProviderFamily::Claude).unwrap().0;

        let (a, b) = futures::join!(
            h.mutator
                .toggle_provider(ProviderToggle::new(ProviderFamily::Gemini, 1, false)),
            h.mutator
                .toggle_provider(ProviderToggle::new(ProviderFamily::Codex, 0, false)),
        );
        assert!(a.is_applied());
        assert_eq!(b, ToggleOutcome::Skipped(SkipReason::StaleIndex));

        assert_eq!(h.config.version(ProviderFamily::Claude), claude);
        assert_eq!(h.config.entries(ProviderFamily::Claude).unwrap().0, claude_entries);
        assert!(h.providers.saves().iter().all(|(f, _)| *f == ProviderFamily::Gemini));
    }

    #[tokio::test]
    async fn test_same_family_toggles_do_not_lose_updates() {
        let h = harness(vec![], gemini_config());

        let (a, b) = futures::join!(
            h.mutator
                .toggle_provider(ProviderToggle::new(ProviderFamily::Gemini, 0, true)),
            h.mutator
                .toggle_provider(ProviderToggle::new(ProviderFamily::Gemini, 1, false)),
        );
        assert!(a.is_applied());
        assert!(b.is_applied());

        let (entries, _) = h.config.entries(ProviderFamily::Gemini).unwrap();
        assert!(entries[0].is_enabled());
        assert!(!entries[1].is_enabled());
        assert_eq!(h.providers.config().gemini_api_keys, entries);
    }

    #[tokio::test]
    async fn test_stale_version_is_rejected() {
        let h = harness(vec![], gemini_config());
        let rendered = h.config.version(ProviderFamily::Gemini);

        let first = h
            .mutator
            .toggle_provider(ProviderToggle::new(ProviderFamily::Gemini, 0, true).at_version(rendered))
            .await;
        assert!(first.is_applied());

        let second = h
            .mutator
            .toggle_provider(ProviderToggle::new(ProviderFamily::Gemini, 1, false).at_version(rendered))
            .await;
        assert_eq!(second, ToggleOutcome::Skipped(SkipReason::StaleSnapshot));
        assert_eq!(h.providers.saves().len(), 1);
    }

    #[tokio::test]
    async fn test_provider_not_loaded() {
        let providers: Arc<MemoryProviderStore> = Arc::new(MemoryProviderStore::new());
        let mutator = ToggleMutator::new(
            Arc::new(MemoryAuthFiles::new()),
            providers.clone(),
            Arc::new(ConfigStore::new(Arc::new(NoOpLogger))),
            Arc::new(MemoryNotifier::new()),
            Arc::new(NoOpLogger),
        );
        let outcome = mutator
            .toggle_provider(ProviderToggle::new(ProviderFamily::Claude, 0, true))
            .await;
        assert_eq!(outcome, ToggleOutcome::Skipped(SkipReason::NotLoaded));
        assert!(providers.saves().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_auth_file() {
        let files = vec![
            AuthFileEntry::new("a.json").with_type(AuthFileType::Codex),
            AuthFileEntry::new("b.json").with_type(AuthFileType::Claude),
        ];
        let h = harness(files.clone(), ConfigSnapshot::default());
        let collection = AuthFileCollection::new();
        collection.replace(files.clone());

        let outcome = h.mutator.toggle_auth_file(&collection, "b.json", true).await;
        assert_eq!(outcome, ToggleOutcome::Applied);
        assert_eq!(h.auth_files.updates(), vec![("b.json".to_string(), true)]);

        let local = collection.snapshot().unwrap();
        assert_eq!(local[0], files[0]);
        assert!(local[1].disabled);
        assert_eq!(
            h.notifier.last(),
            Some(Notification::success(NotificationMessage::StatusUpdateSuccess { disabled: true }))
        );
    }

    #[tokio::test]
    async fn test_auth_file_failure_leaves_collection() {
        let files = vec![AuthFileEntry::new("a.json")];
        let h = harness(files.clone(), ConfigSnapshot::default());
        let collection = AuthFileCollection::new();
        let version = collection.replace(files.clone());

        h.auth_files.set_failing(true);
        let outcome = h.mutator.toggle_auth_file(&collection, "a.json", true).await;
        assert_eq!(outcome, ToggleOutcome::Failed);
        assert_eq!(collection.snapshot(), Some(files));
        assert_eq!(collection.version(), version);
        assert_eq!(
            h.notifier.last(),
            Some(Notification::error(NotificationMessage::StatusUpdateFailed))
        );
    }

    #[tokio::test]
    async fn test_auth_file_not_loaded() {
        let h = harness(vec![AuthFileEntry::new("a.json")], ConfigSnapshot::default());
        let outcome = h
            .mutator
            .toggle_auth_file(&AuthFileCollection::new(), "a.json", true)
            .await;
        assert_eq!(outcome, ToggleOutcome::Skipped(SkipReason::NotLoaded));
        assert!(h.auth_files.updates().is_empty());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(ToggleOutcome::Skipped(SkipReason::StaleIndex)).unwrap();
        assert_eq!(json["outcome"], "skipped");
        assert_eq!(json["reason"], "staleIndex");
    }
}
