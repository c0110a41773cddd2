//! Display rows for auth files and provider entries
//!
//! Rows are what a list renders: masked keys, human sizes and a plain
//! `enabled` flag. Nothing here exposes the exclusion list.

use serde::Serialize;

use crate::types::{AuthFileEntry, ProviderEntry, ProviderFamily};

/// Default number of key characters shown in a preview
pub const DEFAULT_KEY_PREVIEW_LEN: usize = 8;

const KIB: f64 = 1024.0;

/// Human-readable byte count (`512 B`, `1.5 KB`, `3.0 MB`)
pub fn format_file_size(bytes: u64) -> String {
    let value = bytes as f64;
    if value < KIB {
        format!("{} B", bytes)
    } else if value < KIB * KIB {
        format!("{:.1} KB", value / KIB)
    } else if value < KIB * KIB * KIB {
        format!("{:.1} MB", value / (KIB * KIB))
    } else {
        format!("{:.1} GB", value / (KIB * KIB * KIB))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthFileRow {
    pub name: String,
    /// Type tag as reported, or `unknown`
    pub type_label: String,
    pub size_label: Option<String>,
    pub enabled: bool,
    pub runtime_only: bool,
}

impl From<&AuthFileEntry> for AuthFileRow {
    fn from(entry: &AuthFileEntry) -> Self {
        Self {
            name: entry.name.clone(),
            type_label: entry.type_tag().to_string(),
            size_label: entry.size.map(format_file_size),
            enabled: entry.is_enabled(),
            runtime_only: entry.runtime_only,
        }
    }
}

/// One provider entry, addressed by family and position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRow {
    pub family: ProviderFamily,
    pub index: usize,
    pub key_preview: String,
    pub base_url: Option<String>,
    pub enabled: bool,
}

impl ProviderRow {
    pub fn new(family: ProviderFamily, index: usize, entry: &ProviderEntry, preview_len: usize) -> Self {
        Self {
            family,
            index,
            key_preview: entry.key_preview(preview_len),
            base_url: entry.base_url.clone(),
            enabled: entry.is_enabled(),
        }
    }

    /// Rows for a whole family list
    pub fn for_entries(family: ProviderFamily, entries: &[ProviderEntry], preview_len: usize) -> Vec<Self> {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Self::new(family, index, entry, preview_len))
            .collect()
    }
}

/// Rows of one family under its title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSection {
    pub family: ProviderFamily,
    pub title: &'static str,
    pub rows: Vec<ProviderRow>,
}

impl ProviderSection {
    pub fn new(family: ProviderFamily, rows: Vec<ProviderRow>) -> Self {
        Self {
            family,
            title: family.title(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// True when no section has any row (renders the empty state)
pub fn all_sections_empty(sections: &[ProviderSection]) -> bool {
    sections.iter().all(ProviderSection::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthFileType;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.0 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn test_auth_file_row() {
        let entry = AuthFileEntry::new("codex-user.json")
            .with_type(AuthFileType::Codex)
            .with_size(2048)
            .with_disabled(true);
        let row = AuthFileRow::from(&entry);
        assert_eq!(row.type_label, "codex");
        assert_eq!(row.size_label.as_deref(), Some("2.0 KB"));
        assert!(!row.enabled);

        let bare = AuthFileRow::from(&AuthFileEntry::new("x.json").runtime_only());
        assert_eq!(bare.type_label, "unknown");
        assert_eq!(bare.size_label, None);
        assert!(bare.enabled);
        assert!(bare.runtime_only);

        let compat = AuthFileRow::from(&AuthFileEntry::new("y.json").with_type_tag("openai-compat"));
        assert_eq!(compat.type_label, "openai-compat");
    }

    #[test]
    fn test_provider_rows() {
        let entries = vec![
            ProviderEntry::new("sk-ant-0123456789").with_base_url("https://proxy.local"),
            ProviderEntry::new("sk-ant-abcdefghij").with_excluded_models(["*"]),
        ];
        let rows = ProviderRow::for_entries(ProviderFamily::Claude, &entries, DEFAULT_KEY_PREVIEW_LEN);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key_preview, "sk-ant-0...");
        assert_eq!(rows[0].base_url.as_deref(), Some("https://proxy.local"));
        assert!(rows[0].enabled);
        assert_eq!(rows[1].index, 1);
        assert!(!rows[1].enabled);

        let json = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(json["keyPreview"], "sk-ant-a...");
        assert!(json.get("excludedModels").is_none());
    }

    #[test]
    fn test_sections_empty() {
        let sections = vec![
            ProviderSection::new(ProviderFamily::Gemini, vec![]),
            ProviderSection::new(ProviderFamily::Codex, vec![]),
        ];
        assert!(all_sections_empty(&sections));
        assert_eq!(sections[1].title, "Codex");
    }
}
