use crate::format::{format_for, resolve_format, LabelFormat, LanguageStatus, MergeOutcome, ResolvedFile};
use crate::languages::{language_keys, LanguageRegistry, StaticLanguages};
use crate::{cache::DocumentCache, fsio::write_file, reference::{is_within_site, resolve_reference}, xliff::Xliff, Result};
use color_eyre::eyre::eyre;
use flll_core::{FormatKind, LabelIdentifier, LanguageCode};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The extension is not a label file format; nothing was touched.
    Unsupported { path: PathBuf },
    /// The existing file lacks required structure; nothing was written.
    Malformed { file: ResolvedFile },
    AlreadyPresent { file: ResolvedFile },
    Written { file: ResolvedFile, written: Vec<PathBuf> },
}

impl WriteOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            WriteOutcome::Unsupported { .. } => "unsupported",
            WriteOutcome::Malformed { .. } => "malformed",
            WriteOutcome::AlreadyPresent { .. } => "already-present",
            WriteOutcome::Written { .. } => "written",
        }
    }

    pub fn file(&self) -> Option<&ResolvedFile> {
        match self {
            WriteOutcome::Unsupported { .. } => None,
            WriteOutcome::Malformed { file }
            | WriteOutcome::AlreadyPresent { file }
            | WriteOutcome::Written { file, .. } => Some(file),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        match self {
            WriteOutcome::Written { written, .. } => written,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    Unsupported { path: PathBuf },
    Ensured { file: ResolvedFile, files: Vec<LanguageStatus> },
}

/// Where a reference would go, without touching disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub requested: PathBuf,
    pub file: Option<ResolvedFile>,
    pub languages: Vec<(LanguageCode, PathBuf)>,
}

/// Writes label identifiers into label files below a site root.
///
/// Owns the document cache for its lifetime: documents touched by one call
/// are reused by the next until [`LabelWriter::reset`].
pub struct LabelWriter<R = StaticLanguages> {
    site_root: PathBuf,
    registry: R,
    cache: DocumentCache,
    clock: Option<fn() -> String>,
}

impl<R: LanguageRegistry> LabelWriter<R> {
    pub fn new(site_root: impl Into<PathBuf>, registry: R) -> Self {
        Self {
            site_root: site_root.into(),
            registry,
            cache: DocumentCache::new(),
            clock: None,
        }
    }

    /// Use `clock` for XLIFF `date` stamps instead of the system time.
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Forget every cached document; the next call re-reads from disk.
    pub fn reset(&mut self) {
        self.cache.reset();
    }

    fn format(&self, kind: FormatKind) -> Result<Box<dyn LabelFormat>> {
        if let (FormatKind::Xliff, Some(clock)) = (kind, self.clock) {
            return Ok(Box::new(
                Xliff::new(Some(self.site_root.clone())).with_clock(clock),
            ));
        }
        format_for(kind, &self.site_root).ok_or_else(|| eyre!("no handler for {kind} files"))
    }

    /// Absolute path for `reference` and the file it maps to. References
    /// leaving the site root or with an unsupported extension map to `None`.
    fn locate(&self, reference: &str) -> (PathBuf, Option<ResolvedFile>) {
        let requested = resolve_reference(reference, &self.site_root);
        if !is_within_site(&requested, &self.site_root) {
            tracing::warn!(event = "reference_outside_site", path = %requested.display());
            return (requested, None);
        }
        let file = resolve_format(&requested);
        if file.is_none() {
            tracing::debug!(event = "unsupported_extension", path = %requested.display());
        }
        (requested, file)
    }

    /// Insert `identifier` into every language of the file `reference` names.
    pub fn write_label(&mut self, reference: &str, identifier: &str) -> Result<WriteOutcome> {
        let identifier = LabelIdentifier::parse(identifier)?;
        let (requested, file) = self.locate(reference);
        let Some(file) = file else {
            return Ok(WriteOutcome::Unsupported { path: requested });
        };

        let languages = language_keys(&self.registry)?;
        let format = self.format(file.kind)?;

        let ensured = format.ensure(&mut self.cache, &file.path, &languages)?;
        if ensured.iter().any(|s| !s.ok) {
            tracing::warn!(event = "scaffold_failed", path = %file.path.display(), format = %file.kind);
            return Ok(WriteOutcome::Malformed { file });
        }

        let merged = self.merge_and_write(format.as_ref(), &file.path, &identifier, &languages);
        let written = match merged {
            Ok(written) => written,
            Err(err) => {
                // Cached documents may hold changes that never reached disk.
                for (_, path) in format.language_paths(&file.path, &languages) {
                    self.cache.remove(&path);
                }
                tracing::warn!(event = "label_write_failed", path = %file.path.display(), identifier = %identifier);
                return Err(err);
            }
        };

        match written {
            None => {
                tracing::info!(event = "label_present", path = %file.path.display(), identifier = %identifier);
                Ok(WriteOutcome::AlreadyPresent { file })
            }
            Some(written) => {
                tracing::info!(
                    event = "label_written",
                    path = %file.path.display(),
                    identifier = %identifier,
                    files = written.len()
                );
                Ok(WriteOutcome::Written { file, written })
            }
        }
    }

    /// Merge in memory, then write every changed document. `None` when the
    /// identifier was already present.
    fn merge_and_write(
        &mut self,
        format: &dyn LabelFormat,
        path: &Path,
        identifier: &LabelIdentifier,
        languages: &[LanguageCode],
    ) -> Result<Option<Vec<PathBuf>>> {
        let MergeOutcome::Changed(writes) = format.merge(&mut self.cache, path, identifier, languages)? else {
            return Ok(None);
        };
        let mut written = Vec::with_capacity(writes.len());
        for w in writes {
            write_file(&w.path, &w.source)?;
            written.push(w.path);
        }
        Ok(Some(written))
    }

    /// Scaffold the file `reference` names for every language, adding no labels.
    pub fn ensure_file(&mut self, reference: &str) -> Result<EnsureOutcome> {
        let (requested, file) = self.locate(reference);
        let Some(file) = file else {
            return Ok(EnsureOutcome::Unsupported { path: requested });
        };
        let languages = language_keys(&self.registry)?;
        let files = self
            .format(file.kind)?
            .ensure(&mut self.cache, &file.path, &languages)?;
        tracing::info!(event = "file_ensured", path = %file.path.display(), languages = languages.len());
        Ok(EnsureOutcome::Ensured { file, files })
    }

    pub fn resolve(&self, reference: &str) -> Result<Resolution> {
        let (requested, file) = self.locate(reference);
        let languages = match &file {
            Some(f) => {
                let codes = language_keys(&self.registry)?;
                self.format(f.kind)?.language_paths(&f.path, &codes)
            }
            None => Vec::new(),
        };
        Ok(Resolution {
            requested,
            file,
            languages,
        })
    }
}
