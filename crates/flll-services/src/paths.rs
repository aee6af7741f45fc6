use flll_core::DEFAULT_LANGUAGE;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// File holding `language` for the XLIFF file at `base`.
///
/// `default` maps to `base` itself; other languages prefix the file name,
/// so `/tmp/lang.xlf` becomes `/tmp/da.lang.xlf`.
pub fn for_language(base: &Path, language: &str) -> PathBuf {
    if language == DEFAULT_LANGUAGE {
        return base.to_path_buf();
    }
    let Some(name) = base.file_name() else {
        return base.to_path_buf();
    };
    let mut prefixed = OsString::from(language);
    prefixed.push(".");
    prefixed.push(name);
    base.with_file_name(prefixed)
}

/// Append `.ext` unless `path` already carries that extension.
pub fn ensure_extension(path: &Path, ext: &str) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some(ext) {
        return path.to_path_buf();
    }
    let mut s = path.as_os_str().to_os_string();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Name recorded in the XLIFF `product-name` attribute.
///
/// For `<site>/typo3conf/ext/<key>/...` this is the extension key; paths
/// outside the site root or too short to have one fall back to the file stem.
pub fn product_name(site_root: Option<&Path>, path: &Path) -> String {
    let stem = || {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let Some(rel) = site_root.and_then(|root| path.strip_prefix(root).ok()) else {
        return stem();
    };
    let segments: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect();
    if segments.len() > 3 {
        segments[2].to_string_lossy().into_owned()
    } else {
        stem()
    }
}
