//! Storage service
//!
//! Owns the identity registry and store, and turns logins into sessions.

pub mod core;

pub use self::core::{Attempt, SecretProvider, StorageService};
