//! Authdeck Core
//!
//! Administrative core for credential auth files and provider API-key
//! configurations (Gemini, Claude, Codex). Decides which entries are enabled,
//! aggregates statistics across both collections and turns enable/disable
//! intents into remote writes plus local patches.
//!
//! The remote management service, connection tracking and rendering live in
//! the host application and are injected as traits and channels.
//!
//! ```rust,ignore
//! use authdeck_core::{AccountsService, Collaborators, ConfigStore, ProviderToggle, TypeFilter};
//!
//! let config = Arc::new(ConfigStore::new(logger.clone()));
//! let service = AccountsService::new(collaborators, config, connection_rx, notifier, logger)
//!     .with_settings(settings);
//!
//! service.load().await;
//! let view = service.view(TypeFilter::All);
//!
//! let toggle = ProviderToggle::new(ProviderFamily::Gemini, 0, true)
//!     .at_version(service.provider_version(ProviderFamily::Gemini));
//! service.toggle_provider(toggle).await;
//! ```

pub mod types;
pub mod logging;
pub mod notify;
pub mod remote;
pub mod config;
pub mod accounts;

// Re-export commonly used types
pub use types::{
    AuthFileEntry, AuthFileList, AuthFileType, TypeFilter,
    ConfigSnapshot, ModelAlias, ProviderEntry, ProviderFamily,
    SnapshotVersion, ConnectionStatus,
};

pub use logging::{Logger, LogLevel, NoOpLogger, ConsoleLogger, TracingLogger};

pub use notify::{Notification, NotificationLevel, NotificationMessage, Notifier, MemoryNotifier, LoggingNotifier};

pub use remote::{
    RemoteError, RemoteResult,
    AuthFilesApi, ProvidersApi, ConfigSource,
    MemoryAuthFiles, MemoryProviderStore,
};

pub use config::{ConfigStore, AccountsSettings, SettingsFile, SettingsLevel, SettingsError, SettingsResult};

pub use accounts::{
    AccountsService, Collaborators, LoadReport, RefreshOutcome,
    AccountsStats, AccountsView, AuthFileCollection,
    ProviderToggle, SkipReason, ToggleMutator, ToggleOutcome,
    AuthFileRow, ProviderRow, ProviderSection,
};
