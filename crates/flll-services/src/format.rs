use crate::{cache::DocumentCache, legacy::LegacyTree, xliff::Xliff, Result};
use flll_core::{FormatKind, LabelIdentifier, LanguageCode};
use std::path::{Path, PathBuf};

/// Canonical format and file for a label reference, decided once before any
/// scaffolding or merging happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub kind: FormatKind,
    pub path: PathBuf,
    /// Set when an existing file in the preferred format replaced the request.
    pub migrated: bool,
}

/// Detect the format of `path`; `None` for unsupported extensions.
///
/// A request for the legacy format is redirected to the sibling file with the
/// preferred extension when that file already exists.
pub fn resolve_format(path: &Path) -> Option<ResolvedFile> {
    let kind = FormatKind::detect(path);
    if !kind.is_supported() {
        return None;
    }
    if kind != FormatKind::PREFERRED {
        if let Some(ext) = FormatKind::PREFERRED.extension() {
            let preferred = path.with_extension(ext);
            if preferred.exists() {
                tracing::info!(event = "format_migrated", from = %path.display(), to = %preferred.display());
                return Some(ResolvedFile {
                    kind: FormatKind::PREFERRED,
                    path: preferred,
                    migrated: true,
                });
            }
        }
    }
    Some(ResolvedFile {
        kind,
        path: path.to_path_buf(),
        migrated: false,
    })
}

/// Serialized document waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub path: PathBuf,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The identifier exists already; nothing needs writing.
    AlreadyPresent,
    /// Documents changed by the merge, in processing order.
    Changed(Vec<PendingWrite>),
}

impl MergeOutcome {
    /// Serialized text of the last document changed.
    pub fn source(&self) -> Option<&str> {
        match self {
            MergeOutcome::AlreadyPresent => None,
            MergeOutcome::Changed(writes) => writes.last().map(|w| w.source.as_str()),
        }
    }

    pub fn is_already_present(&self) -> bool {
        matches!(self, MergeOutcome::AlreadyPresent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageStatus {
    pub language: LanguageCode,
    pub path: PathBuf,
    pub ok: bool,
}

/// Scaffolding and merging for one on-disk format.
pub trait LabelFormat {
    fn kind(&self) -> FormatKind;

    /// File holding each language, for the label file at `path`.
    fn language_paths(&self, path: &Path, languages: &[LanguageCode]) -> Vec<(LanguageCode, PathBuf)>;

    /// Make sure every language has the minimal structure on disk.
    fn ensure(
        &self,
        cache: &mut DocumentCache,
        path: &Path,
        languages: &[LanguageCode],
    ) -> Result<Vec<LanguageStatus>>;

    /// Insert `identifier` for every language, in memory only.
    fn merge(
        &self,
        cache: &mut DocumentCache,
        path: &Path,
        identifier: &LabelIdentifier,
        languages: &[LanguageCode],
    ) -> Result<MergeOutcome>;
}

/// Handler for `kind`; `None` for [`FormatKind::Unknown`].
pub fn format_for(kind: FormatKind, site_root: &Path) -> Option<Box<dyn LabelFormat>> {
    match kind {
        FormatKind::LegacyTree => Some(Box::new(LegacyTree)),
        FormatKind::Xliff => Some(Box::new(Xliff::new(Some(site_root.to_path_buf())))),
        FormatKind::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extensions_resolve_to_nothing() {
        assert!(resolve_format(Path::new("/dev/null")).is_none());
        assert!(resolve_format(Path::new("/tmp/labels.json")).is_none());
    }

    #[test]
    fn legacy_stays_legacy_without_xliff_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locallang.xml");
        let resolved = resolve_format(&path).unwrap();
        assert_eq!(resolved.kind, FormatKind::LegacyTree);
        assert_eq!(resolved.path, path);
        assert!(!resolved.migrated);
    }

    #[test]
    fn existing_xliff_sibling_supersedes_legacy_request() {
        let dir = tempfile::tempdir().unwrap();
        let legacy = dir.path().join("locallang.xml");
        let xliff = dir.path().join("locallang.xlf");
        std::fs::write(&xliff, "<xliff/>").unwrap();

        let resolved = resolve_format(&legacy).unwrap();
        assert_eq!(resolved.kind, FormatKind::Xliff);
        assert_eq!(resolved.path, xliff);
        assert!(resolved.migrated);
    }

    #[test]
    fn handlers_match_their_kind() {
        let root = Path::new("/var/www");
        assert_eq!(format_for(FormatKind::LegacyTree, root).unwrap().kind(), FormatKind::LegacyTree);
        assert_eq!(format_for(FormatKind::Xliff, root).unwrap().kind(), FormatKind::Xliff);
        assert!(format_for(FormatKind::Unknown, root).is_none());
    }

    #[test]
    fn source_is_the_last_changed_document() {
        let outcome = MergeOutcome::Changed(vec![
            PendingWrite { path: "a.xlf".into(), source: "first".into() },
            PendingWrite { path: "da.a.xlf".into(), source: "last".into() },
        ]);
        assert_eq!(outcome.source(), Some("last"));
        assert_eq!(MergeOutcome::AlreadyPresent.source(), None);
    }
}
