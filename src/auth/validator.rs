//! Authentication validator
//!
//! Input checks for identity names and secrets, applied before anything
//! reaches the registry.

use crate::config::StorageConfig;
use crate::error::AuthError;
use crate::identity::Secret;

/// Performs basic input sanitation to check for malicious or malformed names.
fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.trim().is_empty() && input.len() <= max_length && !input.contains(char::is_control)
}

/// Validates the format of an identity name.
///
/// Names never become paths (folders are named by id), but separators are
/// still refused so a name can always be shown and typed back unambiguously.
pub fn validate_name(name: &str, config: &StorageConfig) -> Result<(), AuthError> {
    if name.contains(['/', '\\']) {
        return Err(AuthError::MalformedInput(
            "user name cannot contain path separators".into(),
        ));
    }

    if name != name.trim() {
        return Err(AuthError::MalformedInput(
            "user name cannot start or end with whitespace".into(),
        ));
    }

    if !is_valid_input(name, config.max_name_length) {
        return Err(AuthError::MalformedInput("Invalid user name format".into()));
    }

    Ok(())
}

/// Validates that a secret can be stored.
pub fn validate_secret(secret: &Secret) -> Result<(), AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MalformedInput("Password cannot be empty".into()));
    }
    Ok(())
}
