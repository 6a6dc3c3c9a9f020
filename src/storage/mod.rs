//! File system storage management
//!
//! Path confinement, recursive tree operations and file content access.

pub mod content;
pub mod filesystem;
pub mod operations;
pub mod results;
pub mod validation;

// Re-export commonly used validation functions
pub use validation::{confine, join_user_path, real_to_virtual_path, validate};
