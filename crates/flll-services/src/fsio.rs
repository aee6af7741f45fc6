use crate::Result;
use std::fs;
use std::path::Path;

/// Write `content` to `path`, creating missing parent directories first.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            tracing::debug!(event = "directory_created", path = %parent.display());
        }
    }
    fs::write(path, content)?;
    tracing::debug!(event = "file_written", path = %path.display(), bytes = content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.xlf");
        fs::write(&path, "old").unwrap();
        write_file(&path, "test").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "test");
    }

    #[test]
    fn write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("123456").join("deeper");
        let path = nested.join("file.xlf");
        assert!(!nested.exists());
        write_file(&path, "test").unwrap();
        assert!(nested.is_dir());
        assert!(path.is_file());
    }
}
