//! Authentication system
//!
//! Handles identity name and secret validation.

pub mod validator;

pub use validator::{validate_name, validate_secret};
