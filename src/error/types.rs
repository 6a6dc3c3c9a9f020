//! Error types
//!
//! Defines domain-specific error types for each module of the storage core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::identity::IdentityId;

/// Coarse classification shared by every error the core can return.
///
/// The shell and the tests match on this instead of on the concrete enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidPath,
    NotFound,
    AlreadyExists,
    NotADirectory,
    NameTaken,
    AuthFailure,
    StoreCorrupt,
    IoFailure,
}

/// Storage module errors (sandbox checks and tree operations)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A recursive walk stopped part way. The tree is left as it was at the
    /// moment of failure.
    #[error(
        "Operation interrupted at {} after {completed} entries: {source}",
        failed.display()
    )]
    Interrupted {
        failed: PathBuf,
        completed: usize,
        #[source]
        source: Box<StorageError>,
    },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::InvalidPath(_) => ErrorKind::InvalidPath,
            StorageError::NotFound(_) => ErrorKind::NotFound,
            StorageError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            StorageError::NotADirectory(_) => ErrorKind::NotADirectory,
            StorageError::Io { .. } => ErrorKind::IoFailure,
            // A refused entry mid-walk is still a sandbox violation.
            StorageError::Interrupted { source, .. } => match source.kind() {
                ErrorKind::InvalidPath => ErrorKind::InvalidPath,
                _ => ErrorKind::IoFailure,
            },
        }
    }
}

/// Authentication and identity errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unknown user: {0}")]
    UnknownIdentity(String),

    #[error("Too many incorrect attempts for user: {0}")]
    AttemptsExhausted(String),

    #[error("Login aborted")]
    Aborted,

    #[error("Name unavailable: {0}")]
    NameTaken(String),

    #[error("Identity counter exhausted")]
    CounterExhausted,
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::NameTaken(_) => ErrorKind::NameTaken,
            AuthError::CounterExhausted => ErrorKind::StoreCorrupt,
            _ => ErrorKind::AuthFailure,
        }
    }
}

/// Inconsistencies found while rebuilding the registry from stored parts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RestoreError {
    #[error("duplicate identity id {0}")]
    DuplicateId(IdentityId),

    #[error("duplicate identity name {0:?}")]
    DuplicateName(String),

    #[error("identity id {id} is not below the next id {next_id}")]
    IdBeyondCounter { id: IdentityId, next_id: IdentityId },
}

/// Registry and counter persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Store IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Corrupt { .. } => ErrorKind::StoreCorrupt,
            StoreError::Io { .. } => ErrorKind::IoFailure,
        }
    }
}

/// General error that encompasses all error types
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Auth(e) => e.kind(),
            CoreError::Storage(e) => e.kind(),
            CoreError::Store(e) => e.kind(),
        }
    }
}
