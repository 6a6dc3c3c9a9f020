//! Navigation operations implementation

use log::info;
use std::path::Path;

use crate::error::StorageError;
use crate::navigate::results::{CwdResult, EntryView};
use crate::storage::content::read_file;
use crate::storage::filesystem::{EntryKind, directory_exists, list_directory};
use crate::storage::validation::{confine, normalize, real_to_virtual_path};

/// Opens `target`: a directory becomes the new cursor, a file is read.
///
/// `target` is an already joined path; it is validated against `root` here.
pub fn change_directory(root: &Path, target: &Path) -> Result<CwdResult, StorageError> {
    let path = confine(target, root)?;

    if !EntryKind::of(&path)
        .map_err(|e| StorageError::io(&path, e))?
        .exists()
    {
        return Err(StorageError::NotFound(path));
    }

    let virtual_path =
        real_to_virtual_path(root, &path).ok_or_else(|| StorageError::InvalidPath(path.clone()))?;

    if directory_exists(&path) {
        let resolved = normalize(&path).ok_or_else(|| StorageError::InvalidPath(path.clone()))?;
        let entries = list_directory(&resolved).map_err(|e| StorageError::io(&resolved, e))?;

        info!("Changed directory to {} (real: {})", virtual_path, resolved.display());

        Ok(CwdResult {
            new_cursor: Some(resolved),
            view: EntryView::Directory {
                virtual_path,
                entries,
            },
        })
    } else {
        let contents = read_file(root, &path)?;
        Ok(CwdResult {
            new_cursor: None,
            view: EntryView::File {
                virtual_path,
                contents,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("2");
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/a.txt"), b"text").unwrap();
        let root = normalize(&root).unwrap();
        (dir, root)
    }

    #[test]
    fn test_change_into_directory() {
        let (_dir, root) = setup();
        let result = change_directory(&root, &root.join("docs")).unwrap();

        assert_eq!(result.new_cursor, Some(root.join("docs")));
        match result.view {
            EntryView::Directory {
                virtual_path,
                entries,
            } => {
                assert_eq!(virtual_path, "/docs");
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].name, "a.txt");
            }
            other => panic!("expected directory, got {other:?}"),
        }
    }

    #[test]
    fn test_open_file_keeps_cursor() {
        let (_dir, root) = setup();
        let result = change_directory(&root, &root.join("docs/a.txt")).unwrap();

        assert!(result.new_cursor.is_none());
        assert_eq!(
            result.view,
            EntryView::File {
                virtual_path: "/docs/a.txt".into(),
                contents: b"text".to_vec(),
            }
        );
    }

    #[test]
    fn test_parent_of_root_is_refused() {
        let (_dir, root) = setup();
        let err = change_directory(&root, &root.join("..")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let (_dir, root) = setup();
        let err = change_directory(&root, &root.join("nowhere")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
