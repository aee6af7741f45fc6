use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "flll.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlllConfig {
    /// Directory that relative and `EXT:` references are resolved against.
    pub site_root: Option<String>,
    /// Language codes besides `default`.
    pub languages: Option<Vec<String>>,
    /// Enables the rolling debug log in this directory.
    pub log_dir: Option<String>,
    pub schema: Option<SchemaCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaCfg {
    pub out_dir: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Candidate config files, highest priority first.
pub fn config_search_paths() -> Vec<PathBuf> {
    // Search order: CWD/flll.toml, $XDG_CONFIG_HOME/flll/flll.toml
    let mut paths = Vec::new();
    if let Ok(p) = std::env::current_dir() {
        paths.push(p.join(CONFIG_FILE_NAME));
    }
    if let Some(base) = dirs::config_dir() {
        paths.push(base.join("flll").join(CONFIG_FILE_NAME));
    }
    paths
}

pub fn load_config() -> Result<FlllConfig, ConfigError> {
    load_config_from(&config_search_paths())
}

/// Merge every readable file in `paths`; earlier files win field by field.
pub fn load_config_from(paths: &[PathBuf]) -> Result<FlllConfig, ConfigError> {
    let mut merged = FlllConfig::default();
    for path in paths {
        if let Some(cfg) = read_config_file(path)? {
            merged = merge(merged, cfg);
        }
    }
    Ok(merged)
}

fn read_config_file(path: &Path) -> Result<Option<FlllConfig>, ConfigError> {
    let Ok(s) = std::fs::read_to_string(path) else {
        return Ok(None);
    };
    toml::from_str::<FlllConfig>(&s)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn merge(mut a: FlllConfig, b: FlllConfig) -> FlllConfig {
    if a.site_root.is_none() {
        a.site_root = b.site_root;
    }
    if a.languages.is_none() {
        a.languages = b.languages;
    }
    if a.log_dir.is_none() {
        a.log_dir = b.log_dir;
    }
    a.schema = merge_opt(a.schema, b.schema, merge_schema);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_schema(mut a: SchemaCfg, b: SchemaCfg) -> SchemaCfg {
    if a.out_dir.is_none() {
        a.out_dir = b.out_dir;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_file_wins_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.toml");
        let global = dir.path().join("global.toml");
        std::fs::write(&local, "languages = [\"da\"]\n").unwrap();
        std::fs::write(
            &global,
            "site_root = \"/var/www\"\nlanguages = [\"de\", \"fr\"]\n[schema]\nout_dir = \"schemas\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&[local, global]).unwrap();
        assert_eq!(cfg.languages, Some(vec!["da".to_string()]));
        assert_eq!(cfg.site_root.as_deref(), Some("/var/www"));
        assert_eq!(
            cfg.schema.and_then(|s| s.out_dir).as_deref(),
            Some("schemas")
        );
    }

    #[test]
    fn missing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&[dir.path().join("nope.toml")]).unwrap();
        assert!(cfg.site_root.is_none());
        assert!(cfg.languages.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flll.toml");
        std::fs::write(&path, "languages = \"da\"").unwrap();
        let err = load_config_from(&[path]).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
