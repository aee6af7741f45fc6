use crate::Result;
use flll_xml::Document;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Parsed documents keyed by file path, kept for the lifetime of one writer.
///
/// Documents are parsed once and mutated in place; later reads see the
/// in-memory state, not the file. Not synchronized.
#[derive(Debug, Default)]
pub struct DocumentCache {
    documents: HashMap<PathBuf, Document>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.documents.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<&Document> {
        self.documents.get(path)
    }

    pub fn insert(&mut self, path: PathBuf, doc: Document) -> &mut Document {
        match self.documents.entry(path) {
            Entry::Occupied(mut e) => {
                e.insert(doc);
                e.into_mut()
            }
            Entry::Vacant(e) => e.insert(doc),
        }
    }

    /// Cached document for `path`, parsed from disk on first access.
    pub fn load(&mut self, path: &Path) -> Result<&mut Document> {
        match self.documents.entry(path.to_path_buf()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let doc = Document::load(path)?;
                tracing::debug!(event = "document_loaded", path = %path.display());
                Ok(e.insert(doc))
            }
        }
    }

    /// Forget the document for `path`; the next load re-reads the file.
    pub fn remove(&mut self, path: &Path) -> Option<Document> {
        self.documents.remove(path)
    }

    /// Drop every cached document.
    pub fn reset(&mut self) {
        tracing::debug!(event = "cache_reset", documents = self.documents.len());
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_parses_once_and_then_serves_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.xml");
        std::fs::write(&path, "<test></test>").unwrap();

        let mut cache = DocumentCache::new();
        cache.load(&path).unwrap().root.set_attr("seen", "1");
        std::fs::write(&path, "<other/>").unwrap();

        let doc = cache.load(&path).unwrap();
        assert_eq!(doc.root.name, "test");
        assert_eq!(doc.root.attr("seen"), Some("1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn reset_forces_reload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.xml");
        std::fs::write(&path, "<test/>").unwrap();

        let mut cache = DocumentCache::new();
        cache.load(&path).unwrap();
        std::fs::write(&path, "<other/>").unwrap();
        cache.reset();
        assert!(cache.is_empty());
        assert_eq!(cache.load(&path).unwrap().root.name, "other");
    }

    #[test]
    fn remove_forgets_a_single_document() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.xml");
        let b = dir.path().join("b.xml");
        std::fs::write(&a, "<a/>").unwrap();
        std::fs::write(&b, "<b/>").unwrap();

        let mut cache = DocumentCache::new();
        cache.load(&a).unwrap().root.set_attr("dirty", "1");
        cache.load(&b).unwrap();

        assert!(cache.remove(&a).is_some());
        assert!(cache.remove(&a).is_none());
        assert!(cache.contains(&b));
        assert_eq!(cache.load(&a).unwrap().root.attr("dirty"), None);
    }

    #[test]
    fn load_of_missing_file_fails_without_caching() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DocumentCache::new();
        assert!(cache.load(&dir.path().join("missing.xlf")).is_err());
        assert!(cache.is_empty());
    }
}
