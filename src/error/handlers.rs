//! Error handlers
//!
//! Maps core errors to log records and to the messages shown to the user.

use crate::error::types::{CoreError, ErrorKind};
use log::{error, warn};

/// Log a core error at a level matching its kind
pub fn handle_error(err: &CoreError) {
    match err.kind() {
        ErrorKind::IoFailure | ErrorKind::StoreCorrupt => error!("Storage core error: {}", err),
        _ => warn!("Request refused: {}", err),
    }
}

/// Convert an error to the message printed by the shell.
///
/// Messages never echo secrets and never expose real filesystem paths.
pub fn error_to_message(err: &CoreError) -> &'static str {
    match err.kind() {
        ErrorKind::InvalidPath => "Invalid path",
        ErrorKind::NotFound => "Does not exist",
        ErrorKind::AlreadyExists => "Already exists",
        ErrorKind::NotADirectory => "Target is not a folder",
        ErrorKind::NameTaken => "Name unavailable",
        ErrorKind::AuthFailure => "Authentication failed",
        ErrorKind::StoreCorrupt => "User store is unreadable",
        ErrorKind::IoFailure => "Operation failed, the folder may be partially changed",
    }
}
