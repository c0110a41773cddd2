//! Remote management service collaborators
//!
//! The core never talks to the network itself. It depends on:
//! - `AuthFilesApi`: list auth files and update their status
//! - `ProvidersApi`: replace a provider family's list
//! - `ConfigSource`: fetch the configuration snapshot
//!
//! `MemoryAuthFiles` and `MemoryProviderStore` implement them in memory.

mod error;
mod traits;
mod memory;

pub use error::{RemoteError, RemoteResult};
pub use traits::{AuthFilesApi, ConfigSource, ProvidersApi};
pub use memory::{MemoryAuthFiles, MemoryProviderStore};
