//! Filtered file view and combined statistics
//!
//! Statistics are recomputed from both snapshots on every pass and never
//! patched incrementally. `total_enabled + total_disabled` always equals the
//! filtered file count plus the unfiltered provider count.

use serde::Serialize;

use crate::types::{AuthFileEntry, ConfigSnapshot, TypeFilter};

/// Counts across auth files (filtered) and provider entries (unfiltered)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsStats {
    pub total_auth_files: usize,
    pub total_providers: usize,
    pub total_enabled: usize,
    pub total_disabled: usize,
}

impl AccountsStats {
    /// Entries counted by the enabled/disabled partition
    pub fn total(&self) -> usize {
        self.total_enabled + self.total_disabled
    }
}

/// Stable filter; `All` returns every entry in source order
pub fn filter_files(files: &[AuthFileEntry], filter: TypeFilter) -> Vec<AuthFileEntry> {
    files.iter().filter(|f| filter.matches(f)).cloned().collect()
}

pub fn compute_stats(filtered: &[AuthFileEntry], config: &ConfigSnapshot) -> AccountsStats {
    let mut stats = AccountsStats {
        total_auth_files: filtered.len(),
        total_providers: config.total_providers(),
        ..AccountsStats::default()
    };

    let files = filtered.iter().map(AuthFileEntry::is_enabled);
    let providers = config.iter().map(|(_, _, entry)| entry.is_enabled());
    for enabled in files.chain(providers) {
        if enabled {
            stats.total_enabled += 1;
        } else {
            stats.total_disabled += 1;
        }
    }
    stats
}

/// Result of one aggregation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AccountsView {
    /// At least one collection has not completed its first fetch
    Loading,
    Ready {
        files: Vec<AuthFileEntry>,
        stats: AccountsStats,
    },
}

impl AccountsView {
    pub fn is_loading(&self) -> bool {
        matches!(self, AccountsView::Loading)
    }

    pub fn stats(&self) -> Option<&AccountsStats> {
        match self {
            AccountsView::Loading => None,
            AccountsView::Ready { stats, .. } => Some(stats),
        }
    }

    pub fn files(&self) -> &[AuthFileEntry] {
        match self {
            AccountsView::Loading => &[],
            AccountsView::Ready { files, .. } => files,
        }
    }
}

/// Combine both snapshots; `None` means that source is still loading
pub fn aggregate(
    files: Option<&[AuthFileEntry]>,
    config: Option<&ConfigSnapshot>,
    filter: TypeFilter,
) -> AccountsView {
    match (files, config) {
        (Some(files), Some(config)) => {
            let files = filter_files(files, filter);
            let stats = compute_stats(&files, config);
            AccountsView::Ready { files, stats }
        }
        _ => AccountsView::Loading,
    }
}
