//! Collaborator traits for the remote management service

use async_trait::async_trait;

use super::error::RemoteResult;
use crate::types::{AuthFileList, ConfigSnapshot, ProviderEntry, ProviderFamily};

/// Listing and status updates for auth files
///
/// Implementations:
/// - `MemoryAuthFiles`: In-memory for testing
/// - HTTP adapter in the host application
#[async_trait]
pub trait AuthFilesApi: Send + Sync {
    /// List every auth file known to the service
    async fn list(&self) -> RemoteResult<AuthFileList>;

    /// Set the disabled flag of one file
    async fn update_status(&self, name: &str, disabled: bool) -> RemoteResult<()>;
}

/// Whole-list persistence for the provider families
///
/// Each call replaces the remote list for that family; there is no
/// per-element patch.
#[async_trait]
pub trait ProvidersApi: Send + Sync {
    async fn save_gemini_keys(&self, entries: &[ProviderEntry]) -> RemoteResult<()>;

    async fn save_claude_configs(&self, entries: &[ProviderEntry]) -> RemoteResult<()>;

    async fn save_codex_configs(&self, entries: &[ProviderEntry]) -> RemoteResult<()>;

    /// Dispatch to the save call of `family`
    async fn save(&self, family: ProviderFamily, entries: &[ProviderEntry]) -> RemoteResult<()> {
        match family {
            ProviderFamily::Gemini => self.save_gemini_keys(entries).await,
            ProviderFamily::Claude => self.save_claude_configs(entries).await,
            ProviderFamily::Codex => self.save_codex_configs(entries).await,
        }
    }
}

/// Source of the process-wide configuration
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn fetch_config(&self) -> RemoteResult<ConfigSnapshot>;
}
