//! Storage operations
//!
//! Create, delete, move and copy with recursive tree semantics. Every entry
//! point re-checks its paths against the identity root, and every entry a
//! walk visits is checked again before it is touched.
//!
//! Recursive operations are best-effort. A failure part way through stops the
//! walk and reports `StorageError::Interrupted` with the failing entry; the
//! tree is left as it was at that moment. Move works entry by entry (create
//! the target directory, relocate each child, remove the emptied source), so
//! an interrupted move leaves part of the tree at each end.
//!
//! Links are never followed by a walk. Delete removes a link as a link.
//! Copy recreates a link pointing at the same entry, and move relocates the
//! link itself. A copy or move that meets a link whose target is missing or
//! outside the root is refused.

use log::{debug, info};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::storage::filesystem::{EntryKind, is_file_target};
use crate::storage::results::{CreateResult, DeleteResult, TransferResult, TreeReport};
use crate::storage::validation::{confine, confine_parent, is_root, normalize};

/// The entry a walk failed on and why
struct WalkFailure {
    failed: PathBuf,
    cause: StorageError,
}

impl WalkFailure {
    fn io(path: &Path, source: io::Error) -> Self {
        Self {
            failed: path.to_path_buf(),
            cause: StorageError::io(path, source),
        }
    }

    fn into_error(self, report: &TreeReport) -> StorageError {
        StorageError::Interrupted {
            failed: self.failed,
            completed: report.completed(),
            source: Box::new(self.cause),
        }
    }
}

#[derive(Clone, Copy)]
enum Transfer {
    Move,
    Copy,
}

fn kind_of(path: &Path) -> Result<EntryKind, StorageError> {
    EntryKind::of(path).map_err(|e| StorageError::io(path, e))
}

/// Creates an empty file (final component contains `.`) or a directory chain.
pub fn create(root: &Path, path: &Path) -> Result<CreateResult, StorageError> {
    let path = confine(path, root)?;

    if kind_of(&path)?.exists() {
        return Err(StorageError::AlreadyExists(path));
    }

    let is_file = is_file_target(&path);
    if is_file {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(path.clone()),
                _ => StorageError::io(&path, e),
            })?;
        info!("Created file {}", path.display());
    } else {
        fs::create_dir_all(&path).map_err(|e| StorageError::io(&path, e))?;
        info!("Created directory {}", path.display());
    }

    Ok(CreateResult { path, is_file })
}

/// Deletes a file, or a directory depth-first with everything below it.
///
/// Links are removed as links, whether their target is missing, inside the
/// root or outside it. The identity root itself cannot be deleted.
pub fn delete(root: &Path, path: &Path) -> Result<DeleteResult, StorageError> {
    let path = confine_parent(path, root)?;
    if normalize(root).is_none_or(|resolved_root| resolved_root == path) {
        return Err(StorageError::InvalidPath(path));
    }

    let mut report = TreeReport::default();
    match kind_of(&path)? {
        EntryKind::Missing => return Err(StorageError::NotFound(path)),
        EntryKind::Directory => {
            delete_tree(root, &path, &mut report).map_err(|f| f.into_error(&report))?;
        }
        EntryKind::File | EntryKind::Link => {
            fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;
            report.files += 1;
        }
    }

    info!(
        "Deleted {} ({} files, {} directories)",
        path.display(),
        report.files,
        report.directories
    );
    Ok(DeleteResult { path, report })
}

fn delete_tree(root: &Path, dir: &Path, report: &mut TreeReport) -> Result<(), WalkFailure> {
    let entries = fs::read_dir(dir).map_err(|e| WalkFailure::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| WalkFailure::io(dir, e))?;
        let entry_path = confine_parent(&entry.path(), root).map_err(|cause| WalkFailure {
            failed: entry.path(),
            cause,
        })?;
        let file_type = entry.file_type().map_err(|e| WalkFailure::io(&entry_path, e))?;

        if file_type.is_dir() {
            delete_tree(root, &entry_path, report)?;
        } else {
            fs::remove_file(&entry_path).map_err(|e| WalkFailure::io(&entry_path, e))?;
            report.files += 1;
            debug!("Deleted file {}", entry_path.display());
        }
    }

    fs::remove_dir(dir).map_err(|e| WalkFailure::io(dir, e))?;
    report.directories += 1;
    debug!("Deleted directory {}", dir.display());
    Ok(())
}

/// Moves `source` into the directory-type target `destination`.
///
/// See [`copy`] for where the source ends up. Files are relocated directly;
/// directories are rebuilt at the target one entry at a time.
pub fn move_entry(
    root: &Path,
    source: &Path,
    destination: &Path,
) -> Result<TransferResult, StorageError> {
    transfer(root, source, destination, Transfer::Move)
}

/// Copies `source` into the directory-type target `destination`.
///
/// If `destination` exists it must be a directory and the copy is placed
/// inside it under the source's name. If it does not exist, a directory
/// source is copied to `destination` itself, and a file source is placed in
/// a newly created `destination` directory. Existing entries are never
/// overwritten.
pub fn copy(
    root: &Path,
    source: &Path,
    destination: &Path,
) -> Result<TransferResult, StorageError> {
    transfer(root, source, destination, Transfer::Copy)
}

fn transfer(
    root: &Path,
    source: &Path,
    destination: &Path,
    mode: Transfer,
) -> Result<TransferResult, StorageError> {
    let source = confine(source, root)?;
    let destination = confine(destination, root)?;

    if is_file_target(&destination) {
        return Err(StorageError::NotADirectory(destination));
    }
    if is_root(&source, root) {
        return Err(StorageError::InvalidPath(source));
    }

    let source_kind = kind_of(&source)?;
    if !source_kind.exists() {
        return Err(StorageError::NotFound(source));
    }

    let target = placement(&source, source_kind, &destination)?;
    if kind_of(&target)?.exists() {
        return Err(StorageError::AlreadyExists(target));
    }

    if source_kind == EntryKind::Directory && lies_within(&target, &source) {
        return Err(StorageError::InvalidPath(target));
    }

    ensure_parent(&target)?;

    let mut report = TreeReport::default();
    match (source_kind, mode) {
        (EntryKind::Directory, Transfer::Copy) => {
            copy_tree(root, &source, &target, &mut report).map_err(|f| f.into_error(&report))?;
        }
        (EntryKind::Directory, Transfer::Move) => {
            move_tree(root, &source, &target, &mut report).map_err(|f| f.into_error(&report))?;
        }
        (EntryKind::Link, Transfer::Copy) => {
            copy_link(&source, &target).map_err(|f| f.cause)?;
            report.files += 1;
        }
        (_, Transfer::Copy) => {
            copy_file(&source, &target).map_err(|f| f.cause)?;
            report.files += 1;
        }
        (_, Transfer::Move) => {
            relocate_file(&source, &target).map_err(|f| f.cause)?;
            report.files += 1;
        }
    }

    let verb = match mode {
        Transfer::Copy => "Copied",
        Transfer::Move => "Moved",
    };
    info!(
        "{} {} to {} ({} files, {} directories)",
        verb,
        source.display(),
        target.display(),
        report.files,
        report.directories
    );

    Ok(TransferResult {
        source,
        destination,
        target,
        report,
    })
}

/// Where `source` lands for a move or copy into `destination`.
fn placement(
    source: &Path,
    source_kind: EntryKind,
    destination: &Path,
) -> Result<PathBuf, StorageError> {
    let name = source
        .file_name()
        .ok_or_else(|| StorageError::InvalidPath(source.to_path_buf()))?;

    if destination.is_dir() {
        return Ok(destination.join(name));
    }
    if kind_of(destination)?.exists() {
        return Err(StorageError::NotADirectory(destination.to_path_buf()));
    }

    match source_kind {
        EntryKind::Directory => Ok(destination.to_path_buf()),
        _ => Ok(destination.join(name)),
    }
}

/// True when `path` is `dir` or below it, after resolving links.
fn lies_within(path: &Path, dir: &Path) -> bool {
    match (normalize(path), normalize(dir)) {
        (Some(path), Some(dir)) => path.starts_with(dir),
        _ => true,
    }
}

fn ensure_parent(target: &Path) -> Result<(), StorageError> {
    match target.parent() {
        Some(parent) => fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e)),
        None => Ok(()),
    }
}

fn confine_entry(root: &Path, path: &Path) -> Result<PathBuf, WalkFailure> {
    confine(path, root).map_err(|cause| WalkFailure {
        failed: path.to_path_buf(),
        cause,
    })
}

fn create_target_dir(target: &Path) -> Result<(), WalkFailure> {
    fs::create_dir(target).map_err(|e| create_error(target, e))
}

fn copy_tree(
    root: &Path,
    source: &Path,
    target: &Path,
    report: &mut TreeReport,
) -> Result<(), WalkFailure> {
    create_target_dir(target)?;
    report.directories += 1;

    let entries = fs::read_dir(source).map_err(|e| WalkFailure::io(source, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| WalkFailure::io(source, e))?;
        let from = confine_entry(root, &entry.path())?;
        let to = confine_entry(root, &target.join(entry.file_name()))?;
        let file_type = entry.file_type().map_err(|e| WalkFailure::io(&from, e))?;

        if file_type.is_dir() {
            copy_tree(root, &from, &to, report)?;
        } else if file_type.is_symlink() {
            copy_link(&from, &to)?;
            report.files += 1;
            debug!("Copied link {} to {}", from.display(), to.display());
        } else {
            copy_file(&from, &to)?;
            report.files += 1;
            debug!("Copied file {} to {}", from.display(), to.display());
        }
    }
    Ok(())
}

fn move_tree(
    root: &Path,
    source: &Path,
    target: &Path,
    report: &mut TreeReport,
) -> Result<(), WalkFailure> {
    create_target_dir(target)?;

    let entries = fs::read_dir(source).map_err(|e| WalkFailure::io(source, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| WalkFailure::io(source, e))?;
        let from = confine_entry(root, &entry.path())?;
        let to = confine_entry(root, &target.join(entry.file_name()))?;
        let file_type = entry.file_type().map_err(|e| WalkFailure::io(&from, e))?;

        if file_type.is_dir() {
            move_tree(root, &from, &to, report)?;
        } else {
            relocate_file(&from, &to)?;
            report.files += 1;
            debug!("Moved file {} to {}", from.display(), to.display());
        }
    }

    fs::remove_dir(source).map_err(|e| WalkFailure::io(source, e))?;
    report.directories += 1;
    Ok(())
}

/// Copies file content into a new file. Fails if `to` exists.
fn copy_file(from: &Path, to: &Path) -> Result<(), WalkFailure> {
    let mut reader = File::open(from).map_err(|e| WalkFailure::io(from, e))?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .map_err(|e| create_error(to, e))?;
    io::copy(&mut reader, &mut writer).map_err(|e| WalkFailure::io(to, e))?;
    Ok(())
}

fn create_error(to: &Path, e: io::Error) -> WalkFailure {
    WalkFailure {
        failed: to.to_path_buf(),
        cause: match e.kind() {
            io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(to.to_path_buf()),
            _ => StorageError::io(to, e),
        },
    }
}

/// Recreates the link `from` at `to`, pointing at the resolved target of
/// `from`. The target has already been confined to the root by the caller,
/// so the new link points at the same entry inside it.
fn copy_link(from: &Path, to: &Path) -> Result<(), WalkFailure> {
    let target = normalize(from).ok_or_else(|| WalkFailure {
        failed: from.to_path_buf(),
        cause: StorageError::InvalidPath(from.to_path_buf()),
    })?;
    make_link(&target, to).map_err(|e| create_error(to, e))
}

#[cfg(unix)]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_link(target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn make_link(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::from(io::ErrorKind::Unsupported))
}

/// Renames a file or link, falling back to copy-then-remove when a rename is
/// not possible (for instance across devices). A link is moved as the link.
fn relocate_file(from: &Path, to: &Path) -> Result<(), WalkFailure> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(WalkFailure {
            failed: to.to_path_buf(),
            cause: StorageError::AlreadyExists(to.to_path_buf()),
        });
    }

    if let Err(e) = fs::rename(from, to) {
        debug!(
            "Rename {} -> {} failed ({}), copying instead",
            from.display(),
            to.display(),
            e
        );
        let is_link = fs::symlink_metadata(from)
            .map(|meta| meta.file_type().is_symlink())
            .map_err(|e| WalkFailure::io(from, e))?;
        if is_link {
            copy_link(from, to)?;
        } else {
            copy_file(from, to)?;
        }
        fs::remove_file(from).map_err(|e| WalkFailure::io(from, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("0");
        fs::create_dir_all(&root).unwrap();
        (dir, root)
    }

    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("docs/inner/deep")).unwrap();
        fs::write(root.join("docs/a.txt"), b"alpha").unwrap();
        fs::write(root.join("docs/inner/b.txt"), b"bravo").unwrap();
        fs::write(root.join("docs/inner/deep/c.txt"), b"charlie").unwrap();
    }

    fn assert_tree(at: &Path) {
        assert_eq!(fs::read(at.join("a.txt")).unwrap(), b"alpha");
        assert_eq!(fs::read(at.join("inner/b.txt")).unwrap(), b"bravo");
        assert_eq!(fs::read(at.join("inner/deep/c.txt")).unwrap(), b"charlie");
    }

    #[test]
    fn test_create_directory_chain() {
        let (_dir, root) = setup();
        let result = create(&root, &root.join("a/b/c")).unwrap();
        assert!(!result.is_file);
        assert!(root.join("a/b/c").is_dir());
    }

    #[test]
    fn test_create_file_with_parents_is_empty() {
        let (_dir, root) = setup();
        let result = create(&root, &root.join("notes/today.txt")).unwrap();
        assert!(result.is_file);
        assert_eq!(fs::read(root.join("notes/today.txt")).unwrap(), b"");
    }

    #[test]
    fn test_create_existing_fails() {
        let (_dir, root) = setup();
        create(&root, &root.join("docs")).unwrap();
        let err = create(&root, &root.join("docs")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        create(&root, &root.join("x.txt")).unwrap();
        let err = create(&root, &root.join("x.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_create_outside_root_is_refused() {
        let (dir, root) = setup();
        let err = create(&root, &root.join("../escape")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        assert!(!dir.path().join("escape").exists());
    }

    #[test]
    fn test_delete_tree_depth_first() {
        let (_dir, root) = setup();
        build_tree(&root);

        let result = delete(&root, &root.join("docs")).unwrap();
        assert_eq!(result.report.files, 3);
        assert_eq!(result.report.directories, 3);
        assert!(!root.join("docs").exists());
        assert!(root.exists());
    }

    #[test]
    fn test_delete_twice_is_not_found() {
        let (_dir, root) = setup();
        fs::write(root.join("x.txt"), b"x").unwrap();

        delete(&root, &root.join("x.txt")).unwrap();
        let err = delete(&root, &root.join("x.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_root_is_refused() {
        let (_dir, root) = setup();
        let err = delete(&root, &root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        let err = delete(&root, &root.join("docs/..")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        assert!(root.exists());
    }

    #[test]
    fn test_copy_tree_into_new_destination() {
        let (_dir, root) = setup();
        build_tree(&root);

        let result = copy(&root, &root.join("docs"), &root.join("backup")).unwrap();
        assert_eq!(result.target, root.join("backup"));
        assert_eq!(result.report.files, 3);
        assert_tree(&root.join("backup"));
        assert_tree(&root.join("docs"));
    }

    #[test]
    fn test_copy_tree_into_existing_directory() {
        let (_dir, root) = setup();
        build_tree(&root);
        fs::create_dir(root.join("archive")).unwrap();

        copy(&root, &root.join("docs"), &root.join("archive")).unwrap();
        assert_tree(&root.join("archive/docs"));
    }

    #[test]
    fn test_copy_file_into_directory() {
        let (_dir, root) = setup();
        build_tree(&root);

        let result = copy(&root, &root.join("docs/a.txt"), &root.join("single")).unwrap();
        assert_eq!(result.target, root.join("single/a.txt"));
        assert_eq!(fs::read(root.join("single/a.txt")).unwrap(), b"alpha");
        assert!(root.join("docs/a.txt").exists());
    }

    #[test]
    fn test_copy_to_file_like_name_fails() {
        let (_dir, root) = setup();
        build_tree(&root);

        let err = copy(&root, &root.join("docs"), &root.join("backup.zip")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADirectory);
        let err = move_entry(&root, &root.join("docs"), &root.join("b.d")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADirectory);
    }

    #[test]
    fn test_copy_onto_existing_entry_fails() {
        let (_dir, root) = setup();
        build_tree(&root);
        fs::create_dir_all(root.join("archive/docs")).unwrap();

        let err = copy(&root, &root.join("docs"), &root.join("archive")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_copy_into_own_subtree_is_refused() {
        let (_dir, root) = setup();
        build_tree(&root);

        let err = copy(&root, &root.join("docs"), &root.join("docs/inner")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        assert!(!root.join("docs/inner/docs").exists());
    }

    #[test]
    fn test_copy_missing_source_is_not_found() {
        let (_dir, root) = setup();
        let err = copy(&root, &root.join("ghost"), &root.join("backup")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_copy_outside_root_is_refused() {
        let (dir, root) = setup();
        build_tree(&root);

        let err = copy(&root, &root.join("docs"), &root.join("../stolen")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        assert!(!dir.path().join("stolen").exists());
    }

    #[test]
    fn test_move_tree_removes_source() {
        let (_dir, root) = setup();
        build_tree(&root);

        let result = move_entry(&root, &root.join("docs"), &root.join("moved")).unwrap();
        assert_eq!(result.target, root.join("moved"));
        assert_tree(&root.join("moved"));
        assert!(!root.join("docs").exists());
    }

    #[test]
    fn test_move_file_into_existing_directory() {
        let (_dir, root) = setup();
        build_tree(&root);
        fs::create_dir(root.join("box")).unwrap();

        move_entry(&root, &root.join("docs/a.txt"), &root.join("box")).unwrap();
        assert_eq!(fs::read(root.join("box/a.txt")).unwrap(), b"alpha");
        assert!(!root.join("docs/a.txt").exists());
    }

    #[test]
    fn test_move_root_is_refused() {
        let (_dir, root) = setup();
        let err = move_entry(&root, &root, &root.join("elsewhere")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_stops_at_escaping_link() {
        let (dir, root) = setup();
        build_tree(&root);
        let outside = dir.path().join("outside");
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("secret.txt"), b"secret").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("docs/door")).unwrap();

        let err = copy(&root, &root.join("docs"), &root.join("backup")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        assert!(matches!(err, StorageError::Interrupted { .. }));
        assert!(!root.join("backup/door/secret.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_does_not_follow_links() {
        let (_dir, root) = setup();
        build_tree(&root);
        std::os::unix::fs::symlink(root.join("docs/inner"), root.join("link")).unwrap();

        delete(&root, &root.join("link")).unwrap();
        assert!(!root.join("link").exists());
        assert_tree(&root.join("docs"));
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_removes_dangling_and_escaping_links() {
        let (dir, root) = setup();
        build_tree(&root);
        let outside = dir.path().join("outside");
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("keep.txt"), b"keep").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), root.join("docs/stale")).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("docs/door")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), root.join("orphan")).unwrap();

        delete(&root, &root.join("orphan")).unwrap();
        assert!(fs::symlink_metadata(root.join("orphan")).is_err());

        let result = delete(&root, &root.join("docs")).unwrap();
        assert_eq!(result.report.files, 5);
        assert!(!root.join("docs").exists());
        assert_eq!(fs::read(outside.join("keep.txt")).unwrap(), b"keep");
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_through_escaping_link_is_refused() {
        let (dir, root) = setup();
        let outside = dir.path().join("outside");
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("keep.txt"), b"keep").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("door")).unwrap();

        let err = delete(&root, &root.join("door/keep.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
        assert!(outside.join("keep.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_tree_recreates_inner_link() {
        let (_dir, root) = setup();
        build_tree(&root);
        fs::create_dir_all(root.join("shared")).unwrap();
        fs::write(root.join("shared/s.txt"), b"shared").unwrap();
        std::os::unix::fs::symlink(root.join("shared"), root.join("docs/lnk")).unwrap();

        let result = copy(&root, &root.join("docs"), &root.join("backup")).unwrap();
        assert_eq!(result.report.files, 4);
        assert!(result.destination.ends_with("backup"));

        let copied = fs::symlink_metadata(root.join("backup/lnk")).unwrap();
        assert!(copied.file_type().is_symlink());
        assert_eq!(fs::read(root.join("backup/lnk/s.txt")).unwrap(), b"shared");
        assert_tree(&root.join("backup"));
        assert!(fs::symlink_metadata(root.join("docs/lnk")).unwrap().file_type().is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn test_move_tree_relocates_link_itself() {
        let (_dir, root) = setup();
        build_tree(&root);
        fs::create_dir_all(root.join("shared")).unwrap();
        fs::write(root.join("shared/s.txt"), b"shared").unwrap();
        std::os::unix::fs::symlink(root.join("shared"), root.join("docs/lnk")).unwrap();

        move_entry(&root, &root.join("docs"), &root.join("archive")).unwrap();
        let moved = fs::symlink_metadata(root.join("archive/lnk")).unwrap();
        assert!(moved.file_type().is_symlink());
        assert!(!root.join("docs").exists());
        assert_eq!(fs::read(root.join("shared/s.txt")).unwrap(), b"shared");
    }
}
