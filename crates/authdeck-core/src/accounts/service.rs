//! Accounts service: fetches, views and toggles behind one handle
//!
//! Every operation first checks the connection status and is skipped
//! silently when not connected. Remote failures become notifications; none
//! of the public methods return an error.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{watch, Mutex};

use super::aggregator::{aggregate, filter_files, AccountsView};
use super::collection::AuthFileCollection;
use super::mutator::{ProviderToggle, SkipReason, ToggleMutator, ToggleOutcome};
use super::rows::{AuthFileRow, ProviderSection};
use crate::config::{AccountsSettings, ConfigStore};
use crate::logging::SharedLogger;
use crate::notify::{Notification, NotificationMessage, SharedNotifier};
use crate::remote::{AuthFilesApi, ConfigSource, ProvidersApi};
use crate::types::{ConnectionStatus, ProviderFamily, SnapshotVersion, TypeFilter};
use crate::{log_debug, log_error, log_warn};

/// Remote collaborators of the service
#[derive(Clone)]
pub struct Collaborators {
    pub auth_files: Arc<dyn AuthFilesApi>,
    pub providers: Arc<dyn ProvidersApi>,
    pub config_source: Arc<dyn ConfigSource>,
}

impl Collaborators {
    pub fn new(
        auth_files: Arc<dyn AuthFilesApi>,
        providers: Arc<dyn ProvidersApi>,
        config_source: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            auth_files,
            providers,
            config_source,
        }
    }
}

/// Result of one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RefreshOutcome {
    Refreshed,
    /// Not connected; nothing was fetched
    Skipped,
    /// The fetch failed; the last known good snapshot is kept
    Failed,
}

/// Outcomes of the two fetches issued by `load`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub files: RefreshOutcome,
    pub providers: RefreshOutcome,
}

pub struct AccountsService {
    collaborators: Collaborators,
    files: AuthFileCollection,
    config: Arc<ConfigStore>,
    mutator: ToggleMutator,
    connection: watch::Receiver<ConnectionStatus>,
    file_gate: Mutex<()>,
    settings: AccountsSettings,
    notifier: SharedNotifier,
    logger: SharedLogger,
}

impl AccountsService {
    /// Create a service over a shared configuration store
    pub fn new(
        collaborators: Collaborators,
        config: Arc<ConfigStore>,
        connection: watch::Receiver<ConnectionStatus>,
        notifier: SharedNotifier,
        logger: SharedLogger,
    ) -> Self {
        let mutator = ToggleMutator::new(
            collaborators.auth_files.clone(),
            collaborators.providers.clone(),
            config.clone(),
            notifier.clone(),
            logger.clone(),
        );
        Self {
            collaborators,
            files: AuthFileCollection::new(),
            config,
            mutator,
            connection,
            file_gate: Mutex::new(()),
            settings: AccountsSettings::default(),
            notifier,
            logger,
        }
    }

    /// Apply settings; the key preview length goes to the configuration store
    pub fn with_settings(mut self, settings: AccountsSettings) -> Self {
        self.config.set_preview_len(settings.api_key_preview_len);
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &AccountsSettings {
        &self.settings
    }

    pub fn config_store(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connection.borrow().is_connected()
    }

    /// Fetch the file listing and, unless cached, the configuration
    ///
    /// Both fetches run concurrently. A failed file fetch is only logged; a
    /// failed configuration fetch is also notified.
    pub async fn load(&self) -> LoadReport {
        if !self.is_connected() {
            log_debug!(self.logger, "[Accounts] Not connected, skipping load");
            return LoadReport {
                files: RefreshOutcome::Skipped,
                providers: RefreshOutcome::Skipped,
            };
        }

        let (files, providers) = futures::join!(self.fetch_files(false), self.fetch_config(false));
        LoadReport { files, providers }
    }

    /// Re-fetch the file listing
    pub async fn refresh_files(&self) -> RefreshOutcome {
        if !self.is_connected() {
            return RefreshOutcome::Skipped;
        }
        self.fetch_files(true).await
    }

    /// Re-fetch the configuration, bypassing the cache
    pub async fn refresh_providers(&self) -> RefreshOutcome {
        if !self.is_connected() {
            return RefreshOutcome::Skipped;
        }
        self.fetch_config(true).await
    }

    async fn fetch_files(&self, notify: bool) -> RefreshOutcome {
        let _gate = self.file_gate.lock().await;

        match self.collaborators.auth_files.list().await {
            Ok(list) => {
                let count = list.files.len();
                let version = self.files.replace(list.files);
                log_debug!(self.logger, "[Accounts] Loaded {} auth files ({})", count, version);
                RefreshOutcome::Refreshed
            }
            Err(e) => {
                log_error!(self.logger, "[Accounts] Failed to load auth files: {}", e);
                if self.files.settle_empty() {
                    log_warn!(self.logger, "[Accounts] No auth files loaded yet, showing an empty list");
                }
                if notify {
                    self.notifier
                        .notify(Notification::error(NotificationMessage::RefreshFailed));
                }
                RefreshOutcome::Failed
            }
        }
    }

    async fn fetch_config(&self, force_refresh: bool) -> RefreshOutcome {
        match self
            .config
            .fetch_config(self.collaborators.config_source.as_ref(), force_refresh)
            .await
        {
            Ok(_) => RefreshOutcome::Refreshed,
            Err(e) => {
                log_error!(self.logger, "[Accounts] Failed to load config: {}", e);
                self.notifier
                    .notify(Notification::error(NotificationMessage::RefreshFailed));
                RefreshOutcome::Failed
            }
        }
    }

    /// Filtered files and combined statistics, or `Loading`
    pub fn view(&self, filter: TypeFilter) -> AccountsView {
        let files = self.files.snapshot();
        let config = self.config.snapshot();
        aggregate(files.as_deref(), config.as_ref(), filter)
    }

    /// View under the configured default filter
    pub fn default_view(&self) -> AccountsView {
        self.view(self.settings.default_filter)
    }

    /// Display rows of the filtered files; empty until loaded
    pub fn auth_file_rows(&self, filter: TypeFilter) -> Vec<AuthFileRow> {
        self.files
            .snapshot()
            .map(|files| filter_files(&files, filter).iter().map(AuthFileRow::from).collect())
            .unwrap_or_default()
    }

    pub fn provider_sections(&self) -> Vec<ProviderSection> {
        self.config.provider_sections()
    }

    pub fn files_version(&self) -> SnapshotVersion {
        self.files.version()
    }

    pub fn provider_version(&self, family: ProviderFamily) -> SnapshotVersion {
        self.config.version(family)
    }

    pub async fn toggle_auth_file(&self, name: &str, disabled: bool) -> ToggleOutcome {
        if !self.is_connected() {
            return ToggleOutcome::Skipped(SkipReason::Disconnected);
        }
        self.mutator.toggle_auth_file(&self.files, name, disabled).await
    }

    /// Toggle one provider entry
    ///
    /// With `refresh_on_stale_toggle`, a toggle rejected as stale is followed
    /// by a forced configuration refresh. The toggle itself is not retried.
    pub async fn toggle_provider(&self, toggle: ProviderToggle) -> ToggleOutcome {
        if !self.is_connected() {
            return ToggleOutcome::Skipped(SkipReason::Disconnected);
        }

        let outcome = self.mutator.toggle_provider(toggle).await;
        if self.settings.refresh_on_stale_toggle
            && matches!(
                outcome,
                ToggleOutcome::Skipped(SkipReason::StaleIndex | SkipReason::StaleSnapshot)
            )
        {
            log_debug!(self.logger, "[Accounts] Refreshing config after stale {} toggle", toggle.family);
            self.fetch_config(true).await;
        }
        outcome
    }
}

impl std::fmt::Debug for AccountsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountsService")
            .field("connection", &*self.connection.borrow())
            .field("files_loaded", &self.files.is_loaded())
            .field("config", &self.config)
            .field("settings", &self.settings)
            .finish()
    }
}
