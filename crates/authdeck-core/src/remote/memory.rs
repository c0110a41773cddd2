//! In-memory management service for testing and embedding

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::{RemoteError, RemoteResult};
use super::traits::{AuthFilesApi, ConfigSource, ProvidersApi};
use crate::types::{AuthFileEntry, AuthFileList, ConfigSnapshot, ProviderEntry, ProviderFamily};

/// In-memory auth-file service
///
/// Records every status update and can be switched into a failing mode to
/// exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryAuthFiles {
    files: RwLock<Vec<AuthFileEntry>>,
    updates: RwLock<Vec<(String, bool)>>,
    list_calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryAuthFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(files: Vec<AuthFileEntry>) -> Self {
        Self {
            files: RwLock::new(files),
            ..Self::default()
        }
    }

    /// Replace the stored files (simulates a change made elsewhere)
    pub fn set_files(&self, files: Vec<AuthFileEntry>) {
        *self.files.write() = files;
    }

    pub fn files(&self) -> Vec<AuthFileEntry> {
        self.files.read().clone()
    }

    /// Make every subsequent call fail with a transport error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Status updates received so far, in order
    pub fn updates(&self) -> Vec<(String, bool)> {
        self.updates.read().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> RemoteResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RemoteError::transport("memory service offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AuthFilesApi for MemoryAuthFiles {
    async fn list(&self) -> RemoteResult<AuthFileList> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(AuthFileList::from(self.files()))
    }

    async fn update_status(&self, name: &str, disabled: bool) -> RemoteResult<()> {
        self.check()?;
        self.updates.write().push((name.to_string(), disabled));

        let mut files = self.files.write();
        match files.iter_mut().find(|f| f.name == name) {
            Some(file) => {
                file.disabled = disabled;
                Ok(())
            }
            None => Err(RemoteError::server(404, format!("auth file not found: {}", name))),
        }
    }
}

/// In-memory provider configuration service
///
/// Serves as both the config source and the list persistence target, so a
/// save followed by a fetch returns what was saved.
#[derive(Debug, Default)]
pub struct MemoryProviderStore {
    config: RwLock<ConfigSnapshot>,
    saves: RwLock<Vec<(ProviderFamily, Vec<ProviderEntry>)>>,
    fetch_calls: AtomicUsize,
    failing_saves: AtomicBool,
    failing_fetches: AtomicBool,
}

impl MemoryProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConfigSnapshot) -> Self {
        Self {
            config: RwLock::new(config),
            ..Self::default()
        }
    }

    pub fn config(&self) -> ConfigSnapshot {
        self.config.read().clone()
    }

    /// Replace one family's list without recording a save
    pub fn set_entries(&self, family: ProviderFamily, entries: Vec<ProviderEntry>) {
        self.config.write().set_entries(family, entries);
    }

    pub fn set_failing_saves(&self, failing: bool) {
        self.failing_saves.store(failing, Ordering::SeqCst);
    }

    pub fn set_failing_fetches(&self, failing: bool) {
        self.failing_fetches.store(failing, Ordering::SeqCst);
    }

    /// Every list persisted so far, in order
    pub fn saves(&self) -> Vec<(ProviderFamily, Vec<ProviderEntry>)> {
        self.saves.read().clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn store(&self, family: ProviderFamily, entries: &[ProviderEntry]) -> RemoteResult<()> {
        if self.failing_saves.load(Ordering::SeqCst) {
            return Err(RemoteError::server(500, format!("failed to save {}", family.cache_key())));
        }
        self.saves.write().push((family, entries.to_vec()));
        self.config.write().set_entries(family, entries.to_vec());
        Ok(())
    }
}

#[async_trait]
impl ProvidersApi for MemoryProviderStore {
    async fn save_gemini_keys(&self, entries: &[ProviderEntry]) -> RemoteResult<()> {
        self.store(ProviderFamily::Gemini, entries)
    }

    async fn save_claude_configs(&self, entries: &[ProviderEntry]) -> RemoteResult<()> {
        self.store(ProviderFamily::Claude, entries)
    }

    async fn save_codex_configs(&self, entries: &[ProviderEntry]) -> RemoteResult<()> {
        self.store(ProviderFamily::Codex, entries)
    }
}

#[async_trait]
impl ConfigSource for MemoryProviderStore {
    async fn fetch_config(&self) -> RemoteResult<ConfigSnapshot> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_fetches.load(Ordering::SeqCst) {
            return Err(RemoteError::transport("memory service offline"));
        }
        Ok(self.config())
    }
}
