//! Local snapshot of the auth-file listing

use parking_lot::RwLock;

use crate::types::{AuthFileEntry, SnapshotVersion};

#[derive(Debug, Default)]
struct CollectionState {
    files: Option<Vec<AuthFileEntry>>,
    version: SnapshotVersion,
}

/// Auth files as of the last successful fetch or status write
///
/// Starts out not loaded. Every change bumps the version.
#[derive(Debug, Default)]
pub struct AuthFileCollection {
    state: RwLock<CollectionState>,
}

impl AuthFileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().files.is_some()
    }

    pub fn snapshot(&self) -> Option<Vec<AuthFileEntry>> {
        self.state.read().files.clone()
    }

    pub fn version(&self) -> SnapshotVersion {
        self.state.read().version
    }

    /// Install a freshly fetched listing
    pub fn replace(&self, files: Vec<AuthFileEntry>) -> SnapshotVersion {
        let mut state = self.state.write();
        state.files = Some(files);
        state.version.bump()
    }

    /// Settle an unloaded collection as empty; a loaded one is left alone
    pub fn settle_empty(&self) -> bool {
        let mut state = self.state.write();
        if state.files.is_some() {
            return false;
        }
        state.files = Some(Vec::new());
        state.version.bump();
        true
    }

    /// Patch the `disabled` flag of the first entry named `name`
    ///
    /// Returns the new version, or `None` when no such entry exists.
    pub fn set_disabled(&self, name: &str, disabled: bool) -> Option<SnapshotVersion> {
        let mut state = self.state.write();
        let entry = state.files.as_mut()?.iter_mut().find(|f| f.name == name)?;
        entry.disabled = disabled;
        Some(state.version.bump())
    }
}
