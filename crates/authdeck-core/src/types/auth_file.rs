//! Auth file records and the type filter

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Provider family an auth file was issued for
///
/// Parsing a tag not in this list gives `Unknown`. Entries keep the raw tag
/// they were listed with (`AuthFileEntry::type_tag`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthFileType {
    GeminiCli,
    Codex,
    Claude,
    Vertex,
    Qwen,
    AiStudio,
    IFlow,
    Antigravity,
    Gemini,
    Unknown,
}

impl AuthFileType {
    /// Stable identifier as used by the remote service
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthFileType::GeminiCli => "gemini-cli",
            AuthFileType::Codex => "codex",
            AuthFileType::Claude => "claude",
            AuthFileType::Vertex => "vertex",
            AuthFileType::Qwen => "qwen",
            AuthFileType::AiStudio => "aistudio",
            AuthFileType::IFlow => "iflow",
            AuthFileType::Antigravity => "antigravity",
            AuthFileType::Gemini => "gemini",
            AuthFileType::Unknown => "unknown",
        }
    }

    /// Human-readable label for filter tags
    pub fn label(&self) -> &'static str {
        match self {
            AuthFileType::GeminiCli => "GeminiCLI",
            AuthFileType::Codex => "Codex",
            AuthFileType::Claude => "Claude",
            AuthFileType::Vertex => "Vertex",
            AuthFileType::Qwen => "Qwen",
            AuthFileType::AiStudio => "AIStudio",
            AuthFileType::IFlow => "iFlow",
            AuthFileType::Antigravity => "Antigravity",
            AuthFileType::Gemini => "Gemini",
            AuthFileType::Unknown => "Unknown",
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "gemini-cli" => AuthFileType::GeminiCli,
            "codex" => AuthFileType::Codex,
            "claude" => AuthFileType::Claude,
            "vertex" => AuthFileType::Vertex,
            "qwen" => AuthFileType::Qwen,
            "aistudio" => AuthFileType::AiStudio,
            "iflow" => AuthFileType::IFlow,
            "antigravity" => AuthFileType::Antigravity,
            "gemini" => AuthFileType::Gemini,
            _ => AuthFileType::Unknown,
        }
    }
}

impl From<String> for AuthFileType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<AuthFileType> for String {
    fn from(value: AuthFileType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AuthFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A credential file known to the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthFileEntry {
    /// Unique within one listing
    pub name: String,
    /// Type tag exactly as reported by the remote
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    /// Size in bytes (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_index: Option<String>,
    /// Exists only in the running service, not on disk
    #[serde(default)]
    pub runtime_only: bool,
}

impl AuthFileEntry {
    /// Create an enabled entry with no type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_type: None,
            disabled: false,
            size: None,
            provider: None,
            auth_index: None,
            runtime_only: false,
        }
    }

    pub fn with_type(mut self, file_type: AuthFileType) -> Self {
        self.file_type = Some(file_type.as_str().to_string());
        self
    }

    /// Set a type tag that need not be one of the known types
    pub fn with_type_tag(mut self, tag: impl Into<String>) -> Self {
        self.file_type = Some(tag.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn runtime_only(mut self) -> Self {
        self.runtime_only = true;
        self
    }

    /// Type of the file, `Unknown` when the remote did not report one
    pub fn kind(&self) -> AuthFileType {
        self.file_type
            .as_deref()
            .map(AuthFileType::parse)
            .unwrap_or(AuthFileType::Unknown)
    }

    /// Raw type tag, or `unknown` when none was reported
    pub fn type_tag(&self) -> &str {
        self.file_type.as_deref().unwrap_or("unknown")
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }
}

/// Response shape of the auth-file listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFileList {
    #[serde(default)]
    pub files: Vec<AuthFileEntry>,
}

impl From<Vec<AuthFileEntry>> for AuthFileList {
    fn from(files: Vec<AuthFileEntry>) -> Self {
        Self { files }
    }
}

/// Selected type filter for the auth-file view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeFilter {
    /// No filtering
    #[default]
    All,
    /// Only files of this type
    Type(AuthFileType),
}

/// Filter tags in the order operators see them
const CATALOGUE: [TypeFilter; 10] = [
    TypeFilter::All,
    TypeFilter::Type(AuthFileType::GeminiCli),
    TypeFilter::Type(AuthFileType::Antigravity),
    TypeFilter::Type(AuthFileType::Codex),
    TypeFilter::Type(AuthFileType::Claude),
    TypeFilter::Type(AuthFileType::IFlow),
    TypeFilter::Type(AuthFileType::Vertex),
    TypeFilter::Type(AuthFileType::Qwen),
    TypeFilter::Type(AuthFileType::Gemini),
    TypeFilter::Type(AuthFileType::AiStudio),
];

impl TypeFilter {
    /// All selectable filter tags, `All` first
    pub fn catalogue() -> &'static [TypeFilter] {
        &CATALOGUE
    }

    pub fn id(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Type(t) => t.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeFilter::All => "All",
            TypeFilter::Type(t) => t.label(),
        }
    }

    /// Whether an entry belongs in the filtered view
    pub fn matches(&self, entry: &AuthFileEntry) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Type(t) => entry.type_tag() == t.as_str(),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(TypeFilter::All);
        }
        match AuthFileType::parse(s) {
            AuthFileType::Unknown if s != "unknown" => Err(format!("Unknown type filter: {}", s)),
            t => Ok(TypeFilter::Type(t)),
        }
    }
}

impl TryFrom<String> for TypeFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeFilter> for String {
    fn from(value: TypeFilter) -> Self {
        value.id().to_string()
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
