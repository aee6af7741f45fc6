//! XLIFF 1.0 files: one file per language (`lang.xlf`, `da.lang.xlf`, ...),
//! each with a `body` of `trans-unit` nodes in insertion order.

use crate::format::{LabelFormat, LanguageStatus, MergeOutcome, PendingWrite};
use crate::paths::{ensure_extension, for_language, product_name};
use crate::{cache::DocumentCache, fsio::write_file, Result};
use flll_core::{FlllError, FormatKind, LabelIdentifier, LanguageCode};
use flll_xml::{Document, Element};
use std::path::{Path, PathBuf};

const EXTENSION: &str = "xlf";

/// Empty XLIFF file with `header` and `body`.
pub fn template() -> Document {
    Document::new(
        Element::new("xliff").with_attr("version", "1.0").with_child(
            Element::new("file")
                .with_attr("source-language", "en")
                .with_attr("datatype", "plaintext")
                .with_attr("original", "messages")
                .with_attr("date", "")
                .with_attr("product-name", "")
                .with_child(Element::new("header"))
                .with_child(Element::new("body")),
        ),
    )
}

fn trans_unit(identifier: &LabelIdentifier) -> Element {
    Element::new("trans-unit")
        .with_attr("id", identifier.as_str())
        .with_attr("xml:space", "preserve")
        .with_child(Element::new("source").with_text(identifier.as_str()))
}

/// Local time in ISO-8601 with offset, e.g. `2024-05-01T13:45:00+02:00`.
pub fn iso_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}

/// [`LabelFormat`] for `.xlf` label files.
#[derive(Debug, Clone)]
pub struct Xliff {
    site_root: Option<PathBuf>,
    clock: fn() -> String,
}

impl Default for Xliff {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Xliff {
    pub fn new(site_root: Option<PathBuf>) -> Self {
        Self {
            site_root,
            clock: iso_timestamp,
        }
    }

    /// Use `clock` for the `date` attribute instead of the system time.
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    /// Scaffold the file for a single language.
    ///
    /// Writes the template when the file is missing and stamps `product-name`
    /// when the document enters the cache.
    pub fn ensure_one(&self, cache: &mut DocumentCache, path: &Path, language: &str) -> Result<bool> {
        let path = for_language(&ensure_extension(path, EXTENSION), language);
        if !path.exists() {
            write_file(&path, &template().to_xml_string()?)?;
            tracing::info!(event = "xliff_template_written", path = %path.display(), language = %language);
        }
        if cache.contains(&path) {
            return Ok(path.exists());
        }
        let product = product_name(self.site_root.as_deref(), &path);
        let doc = cache.load(&path)?;
        match doc.find_mut("file") {
            Some(file) => file.set_attr("product-name", &product),
            None => {
                tracing::warn!(event = "xliff_scaffold_malformed", path = %path.display(), missing = "file");
                return Ok(false);
            }
        }
        Ok(path.exists())
    }

    /// Scaffold every language, one result per language in input order.
    pub fn ensure_all(
        &self,
        cache: &mut DocumentCache,
        path: &Path,
        languages: &[LanguageCode],
    ) -> Result<Vec<LanguageStatus>> {
        let base = ensure_extension(path, EXTENSION);
        let mut out = Vec::with_capacity(languages.len());
        for language in languages {
            let ok = self.ensure_one(cache, &base, language)?;
            out.push(LanguageStatus {
                language: language.clone(),
                path: for_language(&base, language),
                ok,
            });
        }
        Ok(out)
    }

    /// Append a `trans-unit` for `identifier` to every language file that
    /// lacks one. Every visited file gets a fresh `date` stamp.
    pub fn merge_all(
        &self,
        cache: &mut DocumentCache,
        path: &Path,
        identifier: &LabelIdentifier,
        languages: &[LanguageCode],
    ) -> Result<MergeOutcome> {
        let base = ensure_extension(path, EXTENSION);
        let stamp = (self.clock)();
        let mut writes = Vec::new();

        for language in languages {
            let path = for_language(&base, language);
            let doc = cache.load(&path)?;
            let file = doc.find_mut("file").ok_or_else(|| FlllError::MalformedDocument {
                path: path.clone(),
                missing: "file",
            })?;
            file.set_attr("date", &stamp);

            let present = doc
                .root
                .descendants_named("trans-unit")
                .iter()
                .any(|u| u.attr("id") == Some(identifier.as_str()));
            if present {
                tracing::debug!(event = "xliff_unit_present", path = %path.display(), identifier = %identifier);
                continue;
            }

            let body = doc.find_mut("body").ok_or_else(|| FlllError::MalformedDocument {
                path: path.clone(),
                missing: "body",
            })?;
            body.push_element(trans_unit(identifier));
            tracing::debug!(event = "xliff_unit_merged", path = %path.display(), identifier = %identifier);

            let source = doc.to_xml_string()?;
            writes.push(PendingWrite { path, source });
        }

        if writes.is_empty() {
            return Ok(MergeOutcome::AlreadyPresent);
        }
        Ok(MergeOutcome::Changed(writes))
    }
}

impl LabelFormat for Xliff {
    fn kind(&self) -> FormatKind {
        FormatKind::Xliff
    }

    fn language_paths(&self, path: &Path, languages: &[LanguageCode]) -> Vec<(LanguageCode, PathBuf)> {
        let base = ensure_extension(path, EXTENSION);
        languages
            .iter()
            .map(|l| (l.clone(), for_language(&base, l)))
            .collect()
    }

    fn ensure(
        &self,
        cache: &mut DocumentCache,
        path: &Path,
        languages: &[LanguageCode],
    ) -> Result<Vec<LanguageStatus>> {
        self.ensure_all(cache, path, languages)
    }

    fn merge(
        &self,
        cache: &mut DocumentCache,
        path: &Path,
        identifier: &LabelIdentifier,
        languages: &[LanguageCode],
    ) -> Result<MergeOutcome> {
        self.merge_all(cache, path, identifier, languages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAMP: &str = "2024-01-02T03:04:05+00:00";

    fn fixed_clock() -> String {
        STAMP.to_string()
    }

    fn langs(codes: &[&str]) -> Vec<LanguageCode> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn id(s: &str) -> LabelIdentifier {
        LabelIdentifier::parse(s).unwrap()
    }

    fn unit_ids(doc: &Document) -> Vec<String> {
        doc.root
            .descendants_named("trans-unit")
            .iter()
            .filter_map(|u| u.attr("id").map(str::to_string))
            .collect()
    }

    #[test]
    fn ensure_writes_template_and_stamps_product_name() {
        let site = tempfile::tempdir().unwrap();
        let path = site
            .path()
            .join("typo3conf/ext/my_ext/Resources/Private/Language/locallang.xlf");
        let xliff = Xliff::new(Some(site.path().to_path_buf()));
        let mut cache = DocumentCache::new();

        assert!(xliff.ensure_one(&mut cache, &path, "default").unwrap());

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("source-language=\"en\""));
        assert!(on_disk.contains("<body/>"));
        let file = cache.get(&path).unwrap().find("file").unwrap();
        assert_eq!(file.attr("product-name"), Some("my_ext"));
        assert_eq!(file.attr("datatype"), Some("plaintext"));
        assert_eq!(file.attr("original"), Some("messages"));
    }

    #[test]
    fn ensure_all_reports_each_language_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang.xlf");
        let mut cache = DocumentCache::new();

        let statuses = Xliff::default()
            .ensure_all(&mut cache, &path, &langs(&["default", "da"]))
            .unwrap();

        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|s| s.ok));
        assert_eq!(statuses[1].language, "da");
        assert_eq!(statuses[1].path, dir.path().join("da.lang.xlf"));
        assert!(dir.path().join("lang.xlf").is_file());
        assert!(dir.path().join("da.lang.xlf").is_file());
    }

    #[test]
    fn units_keep_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang.xlf");
        let xliff = Xliff::default().with_clock(fixed_clock);
        let languages = langs(&["default"]);
        let mut cache = DocumentCache::new();
        xliff.ensure_all(&mut cache, &path, &languages).unwrap();

        xliff.merge_all(&mut cache, &path, &id("b"), &languages).unwrap();
        xliff.merge_all(&mut cache, &path, &id("a"), &languages).unwrap();

        assert_eq!(unit_ids(cache.get(&path).unwrap()), vec!["b", "a"]);
    }

    #[test]
    fn merge_builds_trans_unit_and_stamps_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang.xlf");
        let xliff = Xliff::default().with_clock(fixed_clock);
        let languages = langs(&["default"]);
        let mut cache = DocumentCache::new();
        xliff.ensure_all(&mut cache, &path, &languages).unwrap();

        let outcome = xliff.merge_all(&mut cache, &path, &id("test"), &languages).unwrap();

        let source = outcome.source().unwrap();
        assert!(source.contains("<trans-unit id=\"test\" xml:space=\"preserve\">"));
        assert!(source.contains("<source>test</source>"));
        assert!(source.contains(&format!("date=\"{STAMP}\"")));
    }

    #[test]
    fn existing_unit_is_skipped_per_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang.xlf");
        std::fs::write(
            &path,
            r#"<xliff version="1.0"><file><header/><body><trans-unit id="test"><source>test</source></trans-unit></body></file></xliff>"#,
        )
        .unwrap();
        let xliff = Xliff::default().with_clock(fixed_clock);
        let languages = langs(&["default", "da"]);
        let mut cache = DocumentCache::new();
        xliff.ensure_all(&mut cache, &path, &languages).unwrap();

        let outcome = xliff.merge_all(&mut cache, &path, &id("test"), &languages).unwrap();

        let MergeOutcome::Changed(writes) = outcome else {
            panic!("expected the da file to change");
        };
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].path, dir.path().join("da.lang.xlf"));
        assert_eq!(unit_ids(cache.get(&path).unwrap()), vec!["test"]);
        // the date is stamped even where nothing was added
        let file = cache.get(&path).unwrap().find("file").unwrap();
        assert_eq!(file.attr("date"), Some(STAMP));
    }

    #[test]
    fn merge_reports_already_present_when_no_language_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang.xlf");
        let xliff = Xliff::default().with_clock(fixed_clock);
        let languages = langs(&["default", "da"]);
        let mut cache = DocumentCache::new();
        xliff.ensure_all(&mut cache, &path, &languages).unwrap();

        let first = xliff.merge_all(&mut cache, &path, &id("x"), &languages).unwrap();
        let second = xliff.merge_all(&mut cache, &path, &id("x"), &languages).unwrap();

        assert!(first.source().unwrap().contains("<trans-unit id=\"x\""));
        assert_eq!(second, MergeOutcome::AlreadyPresent);
    }

    #[test]
    fn merge_without_body_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang.xlf");
        std::fs::write(&path, "<xliff><file/></xliff>").unwrap();
        let mut cache = DocumentCache::new();

        let err = Xliff::default()
            .merge_all(&mut cache, &path, &id("x"), &langs(&["default"]))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FlllError>(),
            Some(FlllError::MalformedDocument { missing: "body", .. })
        ));
    }
}
