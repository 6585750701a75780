//! Atomic file writes for the catalog file.
//!
//! Content goes to a temp file in the same directory and is renamed over the
//! target, so readers never observe a half-written catalog.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Temp path next to `final_path`: `{dir}/.tmp.{random}.{filename}`.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let filename = final_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("catalog");
    let random: u64 = rand::random();
    final_path.with_file_name(format!(".tmp.{:016x}.{}", random, filename))
}

/// Write content to `final_path` atomically, replacing any existing file.
pub fn write_file(final_path: &Path, content: &[u8]) -> io::Result<()> {
    let temp = temp_path(final_path);
    fs::write(&temp, content)?;
    if let Err(e) = fs::rename(&temp, final_path) {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path() {
        let final_path = Path::new("/tmp/shelf/catalog.json");
        let temp = temp_path(final_path);

        assert_eq!(temp.parent(), final_path.parent());
        let filename = temp.file_name().unwrap().to_str().unwrap();
        assert!(filename.starts_with(".tmp."));
        assert!(filename.ends_with(".catalog.json"));
    }

    #[test]
    fn test_write_replaces_without_leftovers() {
        let tmp = TempDir::new().unwrap();
        let final_path = tmp.path().join("catalog.json");

        fs::write(&final_path, b"old").unwrap();
        write_file(&final_path, b"new").unwrap();
        assert_eq!(fs::read(&final_path).unwrap(), b"new");

        let temps: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_str().unwrap_or("").starts_with(".tmp."))
            .collect();
        assert!(temps.is_empty(), "No temp files should remain");
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let final_path = tmp.path().join("missing/catalog.json");
        assert!(write_file(&final_path, b"x").is_err());
    }
}
