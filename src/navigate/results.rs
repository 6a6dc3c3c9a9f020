//! Result types for navigate operations

use std::path::PathBuf;

use crate::storage::results::EntryInfo;

/// What a navigation landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryView {
    /// The cursor moved into this directory
    Directory {
        virtual_path: String,
        entries: Vec<EntryInfo>,
    },
    /// A file was opened; the cursor did not move
    File {
        virtual_path: String,
        contents: Vec<u8>,
    },
}

/// Result of a change-directory operation
#[derive(Debug, Clone)]
pub struct CwdResult {
    /// New cursor, if the target was a directory
    pub new_cursor: Option<PathBuf>,
    pub view: EntryView,
}
