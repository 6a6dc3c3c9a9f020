//! Navigate module
//!
//! Handles moving the session cursor and opening entries for viewing.

mod operations;
pub mod results;

// Re-export public types and functions
pub use operations::change_directory;
pub use results::{CwdResult, EntryView};
