use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Result of writing one label identifier.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WriteReport {
    pub schema_version: u32,
    pub reference: String,
    pub identifier: String,
    /// "legacy-tree" | "xliff" | "unknown"
    pub format: String,
    pub path: Option<String>,
    /// "written" | "already-present" | "unsupported" | "malformed"
    pub status: String,
    pub written: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LanguageFileStatus {
    pub language: String,
    pub path: String,
    pub ok: bool,
}

/// Result of scaffolding a label file without adding labels.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EnsureReport {
    pub schema_version: u32,
    pub reference: String,
    pub format: String,
    pub path: Option<String>,
    pub files: Vec<LanguageFileStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LanguagePath {
    pub language: String,
    pub path: String,
}

/// Where a reference would be written, computed without touching disk.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResolveReport {
    pub schema_version: u32,
    pub reference: String,
    pub requested_path: String,
    pub format: String,
    pub path: Option<String>,
    /// True when an existing XLIFF sibling replaced a legacy `.xml` reference.
    pub migrated: bool,
    pub languages: Vec<LanguagePath>,
}
