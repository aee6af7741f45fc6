use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Language key as stored in label files (`default`, `da`, `de`, ...).
pub type LanguageCode = String;

/// Language that is always present and maps to the unprefixed file.
pub const DEFAULT_LANGUAGE: &str = "default";

/// Errors with a meaning callers may want to match on.
#[derive(Debug, Error)]
pub enum FlllError {
    #[error("cowardly refusing to create an invalid LLL reference called \"{identifier}\" - it contains invalid characters")]
    InvalidIdentifier { identifier: String },
    #[error("{}: document has no <{missing}> element", .path.display())]
    MalformedDocument { path: PathBuf, missing: &'static str },
    #[error("{}: {message}", .path.display())]
    Xml { path: PathBuf, message: String },
}

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._]+$").unwrap());

/// A label key such as `my.module.label`. Only `[A-Za-z0-9._]` is allowed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelIdentifier(String);

impl LabelIdentifier {
    pub fn parse(raw: &str) -> std::result::Result<Self, FlllError> {
        if IDENTIFIER_RE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(FlllError::InvalidIdentifier {
                identifier: raw.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LabelIdentifier {
    type Error = FlllError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LabelIdentifier> for String {
    fn from(value: LabelIdentifier) -> Self {
        value.0
    }
}

impl fmt::Display for LabelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-disk format backing a label file, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
    /// `T3locallang` XML holding every language in one document.
    LegacyTree,
    /// XLIFF 1.0, one file per language.
    Xliff,
    Unknown,
}

impl FormatKind {
    /// Format that wins when a file exists in both formats.
    pub const PREFERRED: FormatKind = FormatKind::Xliff;

    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "xml" => FormatKind::LegacyTree,
            "xlf" => FormatKind::Xliff,
            _ => FormatKind::Unknown,
        }
    }

    pub fn detect(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(FormatKind::Unknown)
    }

    pub fn extension(self) -> Option<&'static str> {
        match self {
            FormatKind::LegacyTree => Some("xml"),
            FormatKind::Xliff => Some("xlf"),
            FormatKind::Unknown => None,
        }
    }

    pub fn is_supported(self) -> bool {
        self != FormatKind::Unknown
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FormatKind::LegacyTree => "legacy-tree",
            FormatKind::Xliff => "xliff",
            FormatKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dotted_identifiers() {
        for id in ["void", "my.module.label", "Label_1", "a.b_c.D9"] {
            assert!(LabelIdentifier::parse(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn rejects_identifiers_with_other_characters() {
        for id in ["this-is-an-invalid-id", "", "white space", "ümlaut", "a/b", "x:y"] {
            let err = LabelIdentifier::parse(id).unwrap_err();
            assert!(matches!(err, FlllError::InvalidIdentifier { .. }), "{id:?}");
        }
    }

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(FormatKind::detect(Path::new("/a/locallang.xml")), FormatKind::LegacyTree);
        assert_eq!(FormatKind::detect(Path::new("/a/locallang.xlf")), FormatKind::Xliff);
        assert_eq!(FormatKind::detect(Path::new("/a/labels.json")), FormatKind::Unknown);
        assert_eq!(FormatKind::detect(Path::new("/dev/null")), FormatKind::Unknown);
        assert_eq!(FormatKind::detect(Path::new("/a/LANG.XLF")), FormatKind::Unknown);
    }

    #[test]
    fn identifier_deserializes_through_validation() {
        let ok: std::result::Result<LabelIdentifier, _> =
            serde_json::from_str("\"my.label\"");
        assert!(ok.is_ok());
        let bad: std::result::Result<LabelIdentifier, _> =
            serde_json::from_str("\"my-label\"");
        assert!(bad.is_err());
    }
}
