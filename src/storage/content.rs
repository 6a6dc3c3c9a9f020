//! File content operations
//!
//! Read, append to, and clear files inside the identity root.

use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::storage::filesystem::EntryKind;
use crate::storage::validation::confine;

/// Confines `path` and requires it to be an existing file (links are followed).
fn existing_file(root: &Path, path: &Path) -> Result<PathBuf, StorageError> {
    let path = confine(path, root)?;
    match EntryKind::of(&path).map_err(|e| StorageError::io(&path, e))? {
        EntryKind::Missing => Err(StorageError::NotFound(path)),
        _ if path.is_dir() => Err(StorageError::InvalidPath(path)),
        _ => Ok(path),
    }
}

/// Returns the full content of a file
pub fn read_file(root: &Path, path: &Path) -> Result<Vec<u8>, StorageError> {
    let path = existing_file(root, path)?;
    fs::read(&path).map_err(|e| StorageError::io(&path, e))
}

/// Appends `bytes` to the end of an existing file
pub fn append_to_file(root: &Path, path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let path = existing_file(root, path)?;
    let mut file = OpenOptions::new()
        .append(true)
        .open(&path)
        .map_err(|e| StorageError::io(&path, e))?;
    file.write_all(bytes).map_err(|e| StorageError::io(&path, e))?;

    info!("Appended {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Truncates an existing file to zero length
pub fn clear_file(root: &Path, path: &Path) -> Result<(), StorageError> {
    let path = existing_file(root, path)?;
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(&path)
        .map_err(|e| StorageError::io(&path, e))?;

    info!("Cleared {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::storage::operations::create;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("1");
        fs::create_dir_all(&root).unwrap();
        (dir, root)
    }

    #[test]
    fn test_created_file_reads_empty_then_appended_bytes() {
        let (_dir, root) = setup();
        let file = root.join("note.txt");
        create(&root, &file).unwrap();

        assert!(read_file(&root, &file).unwrap().is_empty());

        append_to_file(&root, &file, b"hello").unwrap();
        append_to_file(&root, &file, b" world").unwrap();
        assert_eq!(read_file(&root, &file).unwrap(), b"hello world");
    }

    #[test]
    fn test_clear_file() {
        let (_dir, root) = setup();
        let file = root.join("note.txt");
        fs::write(&file, b"old text").unwrap();

        clear_file(&root, &file).unwrap();
        assert!(read_file(&root, &file).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_dir, root) = setup();
        let err = append_to_file(&root, &root.join("nope.txt"), b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_reading_directory_is_refused() {
        let (_dir, root) = setup();
        fs::create_dir(root.join("docs")).unwrap();
        let err = read_file(&root, &root.join("docs")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
    }

    #[test]
    fn test_reading_outside_root_is_refused() {
        let (dir, root) = setup();
        fs::write(dir.path().join("outside.txt"), b"secret").unwrap();
        let err = read_file(&root, &root.join("../outside.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
    }
}
