use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

const LLL_PREFIX: &str = "LLL:";
const EXT_PREFIX: &str = "EXT:";

static LABEL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<file>.+\.(?:xml|xlf)):[A-Za-z0-9._]+$").unwrap());

/// File part of a label reference: `LLL:` and a trailing `:label.key` removed.
pub fn file_part(reference: &str) -> &str {
    let file = reference.trim();
    let file = file.strip_prefix(LLL_PREFIX).unwrap_or(file);
    LABEL_SUFFIX
        .captures(file)
        .and_then(|c| c.name("file"))
        .map(|m| m.as_str())
        .unwrap_or(file)
}

/// Absolute path for a label reference.
///
/// `EXT:<key>/<rest>` points into `<site_root>/typo3conf/ext/<key>`, absolute
/// paths are kept and everything else is relative to `site_root`.
pub fn resolve_reference(reference: &str, site_root: &Path) -> PathBuf {
    let file = file_part(reference);
    if let Some(rest) = file.strip_prefix(EXT_PREFIX) {
        return site_root.join("typo3conf").join("ext").join(rest);
    }
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        site_root.join(path)
    }
}

/// True when `path` lies below `site_root` without `..` steps.
pub fn is_within_site(path: &Path, site_root: &Path) -> bool {
    path.strip_prefix(site_root).is_ok_and(|rel| {
        rel.components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lll_prefix_is_stripped() {
        let root = Path::new("/var/www");
        assert_eq!(
            resolve_reference("LLL:foo.xlf", root),
            resolve_reference("foo.xlf", root)
        );
        assert_eq!(resolve_reference("LLL:foo.xlf", root), PathBuf::from("/var/www/foo.xlf"));
    }

    #[test]
    fn ext_references_point_into_the_extension() {
        let root = Path::new("/var/www");
        assert_eq!(
            resolve_reference("LLL:EXT:my_ext/Resources/Private/Language/locallang.xlf", root),
            PathBuf::from("/var/www/typo3conf/ext/my_ext/Resources/Private/Language/locallang.xlf")
        );
    }

    #[test]
    fn trailing_label_key_is_ignored() {
        assert_eq!(
            file_part("LLL:EXT:my_ext/locallang.xml:my.module.label"),
            "EXT:my_ext/locallang.xml"
        );
        assert_eq!(file_part("EXT:my_ext/locallang.xlf"), "EXT:my_ext/locallang.xlf");
    }

    #[test]
    fn absolute_paths_are_kept() {
        assert_eq!(
            resolve_reference("/dev/null", Path::new("/var/www")),
            PathBuf::from("/dev/null")
        );
        assert_eq!(
            resolve_reference("typo3temp/lang.xlf", Path::new("/var/www")),
            PathBuf::from("/var/www/typo3temp/lang.xlf")
        );
    }

    #[test]
    fn paths_escaping_the_site_are_rejected() {
        let root = Path::new("/var/www");
        assert!(is_within_site(&resolve_reference("LLL:EXT:my_ext/lang.xlf", root), root));
        assert!(is_within_site(&resolve_reference("typo3temp/./lang.xml", root), root));
        assert!(!is_within_site(&resolve_reference("LLL:../../etc/x.xml", root), root));
        assert!(!is_within_site(&resolve_reference("EXT:my_ext/../../../x.xlf", root), root));
        assert!(!is_within_site(&resolve_reference("/etc/x.xml", root), root));
        assert!(is_within_site(&resolve_reference("/var/www/lang.xlf", root), root));
    }
}
