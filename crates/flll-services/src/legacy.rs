//! `T3locallang` XML: every language lives in one document as a
//! `languageKey` section under `data`, holding `label` nodes sorted by index.

use crate::format::{LabelFormat, LanguageStatus, MergeOutcome, PendingWrite};
use crate::{cache::DocumentCache, fsio::write_file, paths::ensure_extension, Result};
use flll_core::{FormatKind, LabelIdentifier, LanguageCode};
use flll_xml::{Document, Element, Node};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "xml";

/// Empty document: `meta` with type and description, and an empty `data`.
pub fn template() -> Document {
    Document::new(
        Element::new("T3locallang")
            .with_child(
                Element::new("meta")
                    .with_attr("type", "array")
                    .with_child(Element::new("type").with_text("module"))
                    .with_child(Element::new("description")),
            )
            .with_child(Element::new("data").with_attr("type", "array")),
    )
}

fn language_section(language: &str) -> Element {
    Element::new("languageKey")
        .with_attr("index", language)
        .with_attr("type", "array")
}

fn label_node(identifier: &LabelIdentifier) -> Element {
    Element::new("label")
        .with_attr("index", identifier.as_str())
        .with_text(identifier.as_str())
}

fn describe(doc: &mut Document, languages: &[LanguageCode]) {
    let text = format!("Labels for languages: {}", languages.join(", "));
    if let Some(description) = doc.find_mut("description") {
        description.set_text(&text);
    } else if let Some(meta) = doc.find_mut("meta") {
        meta.push_element(Element::new("description").with_text(&text));
    }
}

/// Make sure the document at `path` exists with a section per language.
///
/// Returns `Ok(false)` without writing when the document has no `data`
/// container. A document already in the cache counts as ensured.
pub fn ensure(cache: &mut DocumentCache, path: &Path, languages: &[LanguageCode]) -> Result<bool> {
    let path = ensure_extension(path, EXTENSION);
    if cache.contains(&path) {
        return Ok(true);
    }
    let mut doc = if path.exists() {
        Document::load(&path)?
    } else {
        template()
    };
    if doc.find("data").is_none() {
        tracing::warn!(event = "legacy_scaffold_malformed", path = %path.display(), missing = "data");
        return Ok(false);
    }

    describe(&mut doc, languages);

    let mut present: HashSet<String> = doc
        .root
        .descendants_named("languageKey")
        .iter()
        .filter_map(|s| s.attr("index").map(str::to_string))
        .collect();
    if let Some(data) = doc.find_mut("data") {
        for language in languages {
            if present.insert(language.clone()) {
                data.push_element(language_section(language));
                tracing::debug!(event = "legacy_section_added", path = %path.display(), language = %language);
            }
        }
    }

    let source = doc.to_xml_string()?;
    write_file(&path, &source)?;
    cache.insert(path.clone(), doc);
    Ok(path.exists())
}

fn has_label(section: &Element, identifier: &LabelIdentifier) -> bool {
    section
        .child_elements()
        .any(|l| l.name == "label" && l.attr("index") == Some(identifier.as_str()))
}

/// Add a label to `section` and put all its labels back in sorted order
/// after the section's other children.
fn insert_sorted(section: &mut Element, identifier: &LabelIdentifier) {
    let mut labels = Vec::new();
    let mut others = Vec::new();
    for node in section.children.drain(..) {
        match node {
            Node::Element(e) if e.name == "label" => labels.push(e),
            other => others.push(other),
        }
    }
    labels.push(label_node(identifier));
    labels.sort_by(|a, b| a.attr("index").unwrap_or("").cmp(b.attr("index").unwrap_or("")));
    section.children = others;
    section.children.extend(labels.into_iter().map(Node::Element));
}

/// Insert `identifier` into every language section of the document.
///
/// If any section already holds the identifier the whole document counts as
/// already present and no section is touched.
pub fn merge(cache: &mut DocumentCache, path: &Path, identifier: &LabelIdentifier) -> Result<MergeOutcome> {
    let path = ensure_extension(path, EXTENSION);
    let doc = cache.load(&path)?;

    let sections = doc.root.descendants_named("languageKey");
    if let Some(found) = sections.iter().find(|s| has_label(s, identifier)) {
        tracing::debug!(
            event = "legacy_label_present",
            path = %path.display(),
            identifier = %identifier,
            language = found.attr("index").unwrap_or("")
        );
        return Ok(MergeOutcome::AlreadyPresent);
    }

    let mut touched = 0usize;
    doc.root.for_each_named_mut("languageKey", &mut |section| {
        insert_sorted(section, identifier);
        touched += 1;
    });
    tracing::debug!(event = "legacy_label_merged", path = %path.display(), identifier = %identifier, sections = touched);

    let source = doc.to_xml_string()?;
    Ok(MergeOutcome::Changed(vec![PendingWrite { path, source }]))
}

/// [`LabelFormat`] for `.xml` label files.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyTree;

impl LabelFormat for LegacyTree {
    fn kind(&self) -> FormatKind {
        FormatKind::LegacyTree
    }

    fn language_paths(&self, path: &Path, languages: &[LanguageCode]) -> Vec<(LanguageCode, PathBuf)> {
        let path = ensure_extension(path, EXTENSION);
        languages.iter().map(|l| (l.clone(), path.clone())).collect()
    }

    fn ensure(
        &self,
        cache: &mut DocumentCache,
        path: &Path,
        languages: &[LanguageCode],
    ) -> Result<Vec<LanguageStatus>> {
        let ok = ensure(cache, path, languages)?;
        Ok(self
            .language_paths(path, languages)
            .into_iter()
            .map(|(language, path)| LanguageStatus { language, path, ok })
            .collect())
    }

    fn merge(
        &self,
        cache: &mut DocumentCache,
        path: &Path,
        identifier: &LabelIdentifier,
        _languages: &[LanguageCode],
    ) -> Result<MergeOutcome> {
        merge(cache, path, identifier)
    }
}
