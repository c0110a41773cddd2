//! Provider API-key entries and the configuration snapshot that owns them

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::accounts::enablement;

/// One of the three key-based provider lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    Gemini,
    Claude,
    Codex,
}

impl ProviderFamily {
    /// Families in display order
    pub const ALL: [ProviderFamily; 3] = [
        ProviderFamily::Gemini,
        ProviderFamily::Claude,
        ProviderFamily::Codex,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ProviderFamily::Gemini => "gemini",
            ProviderFamily::Claude => "claude",
            ProviderFamily::Codex => "codex",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ProviderFamily::Gemini => "Gemini",
            ProviderFamily::Claude => "Claude",
            ProviderFamily::Codex => "Codex",
        }
    }

    /// Configuration key of this family's list, also used as its cache tag
    pub fn cache_key(&self) -> &'static str {
        match self {
            ProviderFamily::Gemini => "gemini-api-key",
            ProviderFamily::Claude => "claude-api-key",
            ProviderFamily::Codex => "codex-api-key",
        }
    }

    /// Resolve a family from its configuration key
    pub fn from_cache_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.cache_key() == key)
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Upstream model name with an optional local alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelAlias {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A configured API credential for one provider family
///
/// Enablement is carried by `excluded_models`; use [`ProviderEntry::is_enabled`]
/// rather than inspecting the list.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEntry {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<ModelAlias>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_models: Option<Vec<String>>,
    /// Fields this crate does not interpret, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderEntry {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            proxy_url: None,
            prefix: None,
            models: None,
            headers: None,
            excluded_models: None,
            extra: Map::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    pub fn with_excluded_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_models = Some(models.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_enabled(&self) -> bool {
        enablement::is_enabled(self.excluded_models.as_deref())
    }

    /// Copy of this entry with its exclusion list rewritten for `enabled`
    pub fn toggled(&self, enabled: bool) -> Self {
        Self {
            excluded_models: Some(enablement::apply(self.excluded_models.as_deref(), enabled)),
            ..self.clone()
        }
    }

    /// First `len` characters of the key followed by an ellipsis
    pub fn key_preview(&self, len: usize) -> String {
        let head: String = self.api_key.chars().take(len).collect();
        format!("{}...", head)
    }
}

impl fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("api_key", &self.key_preview(4))
            .field("base_url", &self.base_url)
            .field("proxy_url", &self.proxy_url)
            .field("prefix", &self.prefix)
            .field("models", &self.models)
            .field("excluded_models", &self.excluded_models)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Process-wide configuration as returned by the remote service
///
/// Only the three provider lists are interpreted; everything else is carried
/// through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub gemini_api_keys: Vec<ProviderEntry>,
    #[serde(default)]
    pub claude_api_keys: Vec<ProviderEntry>,
    #[serde(default)]
    pub codex_api_keys: Vec<ProviderEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigSnapshot {
    pub fn entries(&self, family: ProviderFamily) -> &[ProviderEntry] {
        match family {
            ProviderFamily::Gemini => &self.gemini_api_keys,
            ProviderFamily::Claude => &self.claude_api_keys,
            ProviderFamily::Codex => &self.codex_api_keys,
        }
    }

    /// Replace one family's list wholesale
    pub fn set_entries(&mut self, family: ProviderFamily, entries: Vec<ProviderEntry>) {
        match family {
            ProviderFamily::Gemini => self.gemini_api_keys = entries,
            ProviderFamily::Claude => self.claude_api_keys = entries,
            ProviderFamily::Codex => self.codex_api_keys = entries,
        }
    }

    pub fn with_entries(mut self, family: ProviderFamily, entries: Vec<ProviderEntry>) -> Self {
        self.set_entries(family, entries);
        self
    }

    /// Number of entries across all three families
    pub fn total_providers(&self) -> usize {
        ProviderFamily::ALL.iter().map(|f| self.entries(*f).len()).sum()
    }

    /// Every entry tagged with its family and position
    pub fn iter(&self) -> impl Iterator<Item = (ProviderFamily, usize, &ProviderEntry)> + '_ {
        ProviderFamily::ALL.into_iter().flat_map(move |family| {
            self.entries(family)
                .iter()
                .enumerate()
                .map(move |(index, entry)| (family, index, entry))
        })
    }
}
