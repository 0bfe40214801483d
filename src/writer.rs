//! # Disk Output
//!
//! Persists built artifacts, creating the output directory on demand.
//!
//! Writes go through a temporary sibling that is renamed into place, so an
//! interrupted or failed build never leaves a half-written artifact on top
//! of a previous good one.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Write `text` to `path`, creating parent directories as needed and
/// replacing any existing file atomically.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.display().to_string(),
            message: format!("failed to create output directory: {}", e),
        })?;
    }

    let file_name = path.file_name().ok_or_else(|| Error::Write {
        path: path.display().to_string(),
        message: "output path has no file name".to_string(),
    })?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, text).map_err(|e| Error::Write {
        path: tmp.display().to_string(),
        message: e.to_string(),
    })?;
    fs::rename(&tmp, path).map_err(|e| Error::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_text_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pkg/nested/out.js");

        write_text(&path, "content\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "content\n");
    }

    #[test]
    fn test_write_text_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.js");
        fs::write(&path, "old").unwrap();

        write_text(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_text_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.js");

        write_text(&path, "content").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("out.js")]);
    }

    #[test]
    fn test_write_text_rejects_bare_root() {
        let err = write_text(Path::new("/"), "content").unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}
