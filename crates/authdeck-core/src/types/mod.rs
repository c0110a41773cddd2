//! Core types shared across the crate
//!
//! Auth files, provider entries, the configuration snapshot and the small
//! value types that tie them together.

mod auth_file;
mod provider;
mod snapshot;
mod connection;

pub use auth_file::{AuthFileEntry, AuthFileList, AuthFileType, TypeFilter};
pub use provider::{ConfigSnapshot, ModelAlias, ProviderEntry, ProviderFamily};
pub use snapshot::SnapshotVersion;
pub use connection::ConnectionStatus;
