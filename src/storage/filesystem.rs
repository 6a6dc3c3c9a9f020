//! File system helpers
//!
//! Entry classification and listing used by the tree operations.

use std::fs;
use std::io;
use std::path::Path;

use crate::storage::results::EntryInfo;

/// What a path currently is on disk. Links are not followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Missing,
    File,
    Directory,
    Link,
}

impl EntryKind {
    pub fn of(path: &Path) -> io::Result<Self> {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => Ok(EntryKind::Link),
            Ok(meta) if meta.is_dir() => Ok(EntryKind::Directory),
            Ok(_) => Ok(EntryKind::File),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(EntryKind::Missing),
            Err(e) => Err(e),
        }
    }

    pub fn exists(self) -> bool {
        self != EntryKind::Missing
    }
}

/// Naming convention deciding file-vs-directory semantics: a final component
/// containing `.` names a file, anything else a directory.
pub fn is_file_target(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().contains('.'))
}

/// Check if directory exists (following links)
pub fn directory_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Lists a directory sorted by name. Entries whose metadata cannot be read
/// are listed as zero-sized files.
pub fn list_directory(path: &Path) -> io::Result<Vec<EntryInfo>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let (is_dir, size) = match entry.metadata() {
            Ok(meta) if meta.is_dir() => (true, 0),
            Ok(meta) => (false, meta.len()),
            Err(_) => (false, 0),
        };
        entries.push(EntryInfo { name, is_dir, size });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_file_target() {
        assert!(is_file_target(Path::new("docs/note.txt")));
        assert!(is_file_target(Path::new(".hidden")));
        assert!(!is_file_target(Path::new("docs")));
        assert!(!is_file_target(Path::new("v1.0/docs")));
    }

    #[test]
    fn test_entry_kind() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, b"x").unwrap();

        assert_eq!(EntryKind::of(dir.path()).unwrap(), EntryKind::Directory);
        assert_eq!(EntryKind::of(&file).unwrap(), EntryKind::File);
        assert_eq!(EntryKind::of(&dir.path().join("b")).unwrap(), EntryKind::Missing);
    }

    #[test]
    fn test_list_directory_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::write(dir.path().join("alpha.txt"), b"abc").unwrap();

        let entries = list_directory(dir.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "alpha.txt");
        assert_eq!(entries[0].size, 3);
        assert!(!entries[0].is_dir);
        assert_eq!(entries[1].name, "zeta");
        assert!(entries[1].is_dir);
    }
}
