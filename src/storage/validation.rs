//! Path validation
//!
//! Confinement checks. A candidate path is made absolute and walked component
//! by component: `.` is dropped, `..` pops the path resolved so far, and any
//! existing component that is a symbolic link is replaced by its canonical
//! target before the next component is applied. The result is compared with
//! the equally resolved root component-wise, so `/data/10` never matches a
//! root of `/data/1`.
//!
//! Dangling or looping links cannot be resolved and are refused.

use log::warn;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Resolves `path` to an absolute path with traversal segments collapsed and
/// symbolic links followed. The path does not need to exist.
///
/// Returns `None` when the path cannot be made absolute or a link on the way
/// cannot be resolved.
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let mut resolved = PathBuf::new();
    // Once a component is missing nothing below it can be a link.
    let mut on_disk = true;

    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                if !on_disk {
                    continue;
                }
                match fs::symlink_metadata(&resolved) {
                    Ok(meta) if meta.file_type().is_symlink() => {
                        resolved = fs::canonicalize(&resolved).ok()?;
                    }
                    Ok(_) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => on_disk = false,
                    Err(_) => return None,
                }
            }
        }
    }

    Some(resolved)
}

/// Returns true iff `candidate` resolves to `root` or a descendant of it.
pub fn validate(candidate: &Path, root: &Path) -> bool {
    match (normalize(candidate), normalize(root)) {
        (Some(candidate), Some(root)) => candidate.starts_with(&root),
        _ => false,
    }
}

/// Validates `candidate` against `root` and returns the path operations should
/// act on: the resolved parent joined with the final name. A final component
/// that is itself a link is kept as the link, so deleting it removes the
/// link rather than its target.
pub fn confine(candidate: &Path, root: &Path) -> Result<PathBuf, StorageError> {
    if !validate(candidate, root) {
        warn!(
            "Refused path {} outside root {}",
            candidate.display(),
            root.display()
        );
        return Err(StorageError::InvalidPath(candidate.to_path_buf()));
    }

    let refused = || StorageError::InvalidPath(candidate.to_path_buf());
    let absolute = std::path::absolute(candidate).map_err(|_| refused())?;

    match (absolute.parent(), final_name(&absolute)) {
        (Some(parent), Some(name)) => {
            let parent = normalize(parent).ok_or_else(refused)?;
            Ok(parent.join(name))
        }
        _ => normalize(&absolute).ok_or_else(refused),
    }
}

/// Like [`confine`], but only the parent is resolved. A final component that
/// is a link is checked as the link itself, wherever (or whether) it points.
///
/// Used where the operation acts on the directory entry and never opens it,
/// such as removing a link.
pub fn confine_parent(candidate: &Path, root: &Path) -> Result<PathBuf, StorageError> {
    let refused = || StorageError::InvalidPath(candidate.to_path_buf());
    let resolved_root = normalize(root).ok_or_else(refused)?;
    let absolute = std::path::absolute(candidate).map_err(|_| refused())?;

    let path = match (absolute.parent(), final_name(&absolute)) {
        (Some(parent), Some(name)) => normalize(parent).ok_or_else(refused)?.join(name),
        _ => normalize(&absolute).ok_or_else(refused)?,
    };

    if !path.starts_with(&resolved_root) {
        warn!(
            "Refused entry {} outside root {}",
            candidate.display(),
            root.display()
        );
        return Err(refused());
    }
    Ok(path)
}

/// True when `path` and `root` resolve to the same directory.
pub fn is_root(path: &Path, root: &Path) -> bool {
    match (normalize(path), normalize(root)) {
        (Some(path), Some(root)) => path == root,
        _ => false,
    }
}

/// Joins user input onto the session position.
///
/// Input starting with `/` is taken relative to `root`; anything else is
/// relative to `cursor`. Empty input names the cursor itself.
pub fn join_user_path(root: &Path, cursor: &Path, input: &str) -> PathBuf {
    let trimmed = input.trim();
    match trimmed.strip_prefix('/') {
        Some(rest) => root.join(rest.trim_start_matches('/')),
        None => cursor.join(trimmed),
    }
}

/// Renders `path` as seen by the identity: `/` for the root, `/docs/a.txt`
/// below it. Paths outside the root have no virtual form.
pub fn real_to_virtual_path(root: &Path, path: &Path) -> Option<String> {
    let root = normalize(root)?;
    let path = normalize(path)?;
    let relative = path.strip_prefix(&root).ok()?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(format!("/{}", parts.join("/")))
}

/// Final component of `path` if it is a plain name (not `..`).
fn final_name(path: &Path) -> Option<&std::ffi::OsStr> {
    match path.components().next_back() {
        Some(Component::Normal(name)) => Some(name),
        _ => None,
    }
}
