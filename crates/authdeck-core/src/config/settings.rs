//! Operator settings loaded from YAML
//!
//! User-level (`~/.config/authdeck/settings.yaml`) and workspace-level
//! (`.config/authdeck/settings.yaml`) files. Workspace values override user
//! values field by field; a missing file contributes nothing.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accounts::rows::DEFAULT_KEY_PREVIEW_LEN;
use crate::logging::ConsoleLogger;
use crate::types::TypeFilter;

/// Errors that can occur while loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Settings for the accounts surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsSettings {
    /// Characters of an API key shown before the ellipsis
    pub api_key_preview_len: usize,
    /// Filter selected when the view opens
    pub default_filter: TypeFilter,
    /// Prefix for `ConsoleLogger` lines
    pub log_prefix: String,
    /// Force a provider refresh after a toggle is rejected as stale
    pub refresh_on_stale_toggle: bool,
}

impl Default for AccountsSettings {
    fn default() -> Self {
        Self {
            api_key_preview_len: DEFAULT_KEY_PREVIEW_LEN,
            default_filter: TypeFilter::All,
            log_prefix: "[authdeck]".to_string(),
            refresh_on_stale_toggle: false,
        }
    }
}

/// Settings as read from one file, every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartialSettings {
    pub api_key_preview_len: Option<usize>,
    pub default_filter: Option<TypeFilter>,
    pub log_prefix: Option<String>,
    pub refresh_on_stale_toggle: Option<bool>,
}

impl AccountsSettings {
    /// Overlay the fields present in `partial`
    pub fn merged(mut self, partial: PartialSettings) -> Self {
        if let Some(len) = partial.api_key_preview_len {
            self.api_key_preview_len = len;
        }
        if let Some(filter) = partial.default_filter {
            self.default_filter = filter;
        }
        if let Some(prefix) = partial.log_prefix {
            self.log_prefix = prefix;
        }
        if let Some(refresh) = partial.refresh_on_stale_toggle {
            self.refresh_on_stale_toggle = refresh;
        }
        self
    }

    pub fn validate(&self) -> SettingsResult<()> {
        if self.api_key_preview_len == 0 {
            return Err(SettingsError::Invalid(
                "api_key_preview_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Console logger writing under the configured prefix
    pub fn console_logger(&self) -> ConsoleLogger {
        ConsoleLogger::with_prefix(self.log_prefix.as_str())
    }

    /// Defaults overlaid by each file in order, then validated
    pub fn resolve_from(files: &[&SettingsFile]) -> SettingsResult<Self> {
        let mut settings = Self::default();
        for file in files {
            settings = settings.merged(file.load_partial()?);
        }
        settings.validate()?;
        Ok(settings)
    }

    /// User settings overlaid by workspace settings when a root is given
    pub fn resolve(workspace_root: Option<&Path>) -> SettingsResult<Self> {
        let user = SettingsFile::user();
        match workspace_root {
            Some(root) => Self::resolve_from(&[&user, &SettingsFile::workspace(root)]),
            None => Self::resolve_from(&[&user]),
        }
    }
}

/// Settings file level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsLevel {
    User,
    Workspace,
}

impl SettingsLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsLevel::User => "user",
            SettingsLevel::Workspace => "workspace",
        }
    }
}

/// One YAML settings file with a read cache
pub struct SettingsFile {
    path: PathBuf,
    level: SettingsLevel,
    cache: RwLock<Option<AccountsSettings>>,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>, level: SettingsLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// User-level file under the platform config directory
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("authdeck").join("settings.yaml"), SettingsLevel::User)
    }

    /// Workspace-level file (`.config/authdeck/settings.yaml` under `root`)
    pub fn workspace(root: impl AsRef<Path>) -> Self {
        let path = root.as_ref().join(".config").join("authdeck").join("settings.yaml");
        Self::new(path, SettingsLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> SettingsLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Fields present in the file; empty when the file is missing or blank
    pub fn load_partial(&self) -> SettingsResult<PartialSettings> {
        if !self.exists() {
            return Ok(PartialSettings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(PartialSettings::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// This file alone over the defaults, cached after the first read
    pub fn get(&self) -> SettingsResult<AccountsSettings> {
        if let Some(settings) = self.cache.read().as_ref() {
            return Ok(settings.clone());
        }
        self.reload()
    }

    /// Re-read from disk, replacing the cache
    pub fn reload(&self) -> SettingsResult<AccountsSettings> {
        let settings = AccountsSettings::resolve_from(&[self])?;
        *self.cache.write() = Some(settings.clone());
        Ok(settings)
    }

    /// Write the full settings, creating parent directories
    pub fn save(&self, settings: &AccountsSettings) -> SettingsResult<()> {
        settings.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_yaml::to_string(settings)?)?;
        *self.cache.write() = Some(settings.clone());
        Ok(())
    }
}

impl std::fmt::Debug for SettingsFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsFile")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Logger;
    use crate::types::AuthFileType;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let file = SettingsFile::new(dir.path().join("settings.yaml"), SettingsLevel::User);

        assert!(!file.exists());
        assert_eq!(file.get().unwrap(), AccountsSettings::default());
        assert_eq!(file.get().unwrap().api_key_preview_len, 8);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.yaml");
        let file = SettingsFile::new(&path, SettingsLevel::User);

        let settings = AccountsSettings {
            api_key_preview_len: 12,
            default_filter: TypeFilter::Type(AuthFileType::Claude),
            ..AccountsSettings::default()
        };
        file.save(&settings).unwrap();
        assert!(file.exists());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("default_filter: claude"));

        assert_eq!(file.reload().unwrap(), settings);
    }

    #[test]
    fn test_workspace_overrides_user() {
        let dir = tempdir().unwrap();
        let user = SettingsFile::new(dir.path().join("user.yaml"), SettingsLevel::User);
        fs::write(user.path(), "api_key_preview_len: 6\nlog_prefix: \"[ops]\"\n").unwrap();

        let workspace = SettingsFile::workspace(dir.path());
        fs::create_dir_all(workspace.path().parent().unwrap()).unwrap();
        fs::write(workspace.path(), "api_key_preview_len: 10\nrefresh_on_stale_toggle: true\n").unwrap();

        let resolved = AccountsSettings::resolve_from(&[&user, &workspace]).unwrap();
        assert_eq!(resolved.api_key_preview_len, 10);
        assert_eq!(resolved.log_prefix, "[ops]");
        assert!(resolved.refresh_on_stale_toggle);
        assert_eq!(resolved.default_filter, TypeFilter::All);

        // Doesn't panic
        resolved.console_logger().info("resolved settings");
    }

    #[test]
    fn test_invalid_values() {
        let dir = tempdir().unwrap();
        let file = SettingsFile::new(dir.path().join("settings.yaml"), SettingsLevel::User);

        fs::write(file.path(), "api_key_preview_len: 0\n").unwrap();
        assert!(matches!(file.reload(), Err(SettingsError::Invalid(_))));

        fs::write(file.path(), "default_filter: openai\n").unwrap();
        assert!(matches!(file.reload(), Err(SettingsError::Yaml(_))));

        assert!(file.save(&AccountsSettings { api_key_preview_len: 0, ..Default::default() }).is_err());
    }

    #[test]
    fn test_blank_file() {
        let dir = tempdir().unwrap();
        let file = SettingsFile::new(dir.path().join("settings.yaml"), SettingsLevel::Workspace);
        fs::write(file.path(), "\n").unwrap();
        assert_eq!(file.load_partial().unwrap(), PartialSettings::default());
        assert_eq!(file.level().as_str(), "workspace");
    }
}
