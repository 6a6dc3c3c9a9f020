//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::path::PathBuf;

/// Counts of entries a tree operation has processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeReport {
    pub files: usize,
    pub directories: usize,
}

impl TreeReport {
    pub fn completed(&self) -> usize {
        self.files + self.directories
    }
}

/// Result of a create operation
#[derive(Debug, Clone)]
pub struct CreateResult {
    pub path: PathBuf,
    pub is_file: bool,
}

/// Result of a delete operation
#[derive(Debug, Clone)]
pub struct DeleteResult {
    pub path: PathBuf,
    pub report: TreeReport,
}

/// Result of a move or copy operation
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub source: PathBuf,
    /// The folder the source was moved or copied into
    pub destination: PathBuf,
    /// Where the source now lives (or was duplicated to)
    pub target: PathBuf,
    pub report: TreeReport,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}
