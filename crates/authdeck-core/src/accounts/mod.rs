//! Accounts: enablement, aggregation and toggles
//!
//! - `enablement`: sentinel rule deciding whether a provider entry is enabled
//! - `aggregator`: filtered file view and combined statistics
//! - `mutator`: toggle intents to remote writes and local patches
//! - `service`: connection-gated entry point tying it together

pub mod enablement;
pub mod rows;
mod aggregator;
mod collection;
mod mutator;
mod service;

pub use aggregator::{aggregate, compute_stats, filter_files, AccountsStats, AccountsView};
pub use collection::AuthFileCollection;
pub use mutator::{ProviderToggle, SkipReason, ToggleMutator, ToggleOutcome};
pub use rows::{all_sections_empty, format_file_size, AuthFileRow, ProviderRow, ProviderSection};
pub use service::{AccountsService, Collaborators, LoadReport, RefreshOutcome};
