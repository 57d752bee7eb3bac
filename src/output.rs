//! Replacing output files without exposing half-written data
//!
//! Conversions are written to a `<name>.partial` sibling and renamed over the
//! destination once complete. The sibling is removed whenever either step
//! fails.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling path used while a conversion is being written
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

/// Write `data` to `path` through its partial sibling
pub fn write_replacing(path: &Path, data: &[u8]) -> io::Result<()> {
    let partial = partial_path(path);
    let result = fs::write(&partial, data).and_then(|()| fs::rename(&partial, path));
    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/tmp/data.bin")),
            PathBuf::from("/tmp/data.bin.partial")
        );
    }

    #[test]
    fn test_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        fs::write(&path, b"old").unwrap();

        write_replacing(&path, b"new contents").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new contents");
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn test_failed_rename_removes_partial() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory cannot be replaced by a file
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inner"), b"x").unwrap();

        assert!(write_replacing(&path, b"data").is_err());
        assert!(!partial_path(&path).exists());
        assert!(path.join("inner").exists());
    }
}
