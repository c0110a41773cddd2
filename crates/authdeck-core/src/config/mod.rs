//! Configuration: the provider config cache and operator settings
//!
//! - `ConfigStore`: owned cache of the remote configuration snapshot
//! - `SettingsFile`: YAML settings (user/workspace level)

mod store;
mod settings;

pub use store::ConfigStore;
pub use settings::{
    AccountsSettings, PartialSettings, SettingsError, SettingsFile, SettingsLevel, SettingsResult,
};
