//! Module `session`
//!
//! Defines the login states and the `Session` struct holding an authenticated
//! identity, its root folder and the cursor inside it.

use std::path::{Path, PathBuf};

use crate::identity::{Identity, IdentityId};
use crate::storage::validation::{join_user_path, real_to_virtual_path, validate};

/// Where a login currently stands.
pub enum LoginState {
    LoggedOut,
    Authenticating(Challenge),
    LoggedIn(Session),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChallengeTarget {
    Existing(IdentityId),
    Registration,
}

/// An in-flight password challenge for one name.
#[derive(Debug)]
pub struct Challenge {
    name: String,
    target: ChallengeTarget,
    attempts_left: u32,
}

impl Challenge {
    pub(crate) fn new(name: impl Into<String>, target: ChallengeTarget, attempts: u32) -> Self {
        Self {
            name: name.into(),
            target,
            attempts_left: attempts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether answering this challenge registers a new identity.
    pub fn is_registration(&self) -> bool {
        self.target == ChallengeTarget::Registration
    }

    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    pub(crate) fn target(&self) -> ChallengeTarget {
        self.target
    }

    /// Records a failed attempt and returns how many remain.
    pub(crate) fn consume_attempt(&mut self) -> u32 {
        self.attempts_left = self.attempts_left.saturating_sub(1);
        self.attempts_left
    }
}

/// A logged-in identity with its root folder and current position.
///
/// `root` is stored fully resolved, and `cursor` always lies within it.
#[derive(Debug)]
pub struct Session {
    identity_id: IdentityId,
    name: String,
    root: PathBuf,
    cursor: PathBuf,
}

impl Session {
    /// Opens a session standing at `root`, which must already be resolved.
    pub(crate) fn open(identity: &Identity, root: PathBuf) -> Self {
        Self {
            identity_id: identity.id(),
            name: identity.name().to_string(),
            cursor: root.clone(),
            root,
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn identity_id(&self) -> IdentityId {
        self.identity_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the identity's root folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the folder the session is standing in.
    pub fn cursor(&self) -> &Path {
        &self.cursor
    }

    /// Returns the cursor as shown to the identity (`/` is the root).
    pub fn cursor_virtual_path(&self) -> String {
        self.virtual_path(&self.cursor)
    }

    /// Renders any path inside the root as a virtual path.
    pub fn virtual_path(&self, path: &Path) -> String {
        real_to_virtual_path(&self.root, path).unwrap_or_else(|| "?".to_string())
    }

    /// Joins user input onto the cursor (or onto the root for `/...`).
    /// The result is not yet validated.
    pub fn resolve(&self, input: &str) -> PathBuf {
        join_user_path(&self.root, &self.cursor, input)
    }

    // --------------------
    // Setter methods
    // --------------------

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Moves the cursor. Paths outside the root are ignored and the cursor
    /// falls back to the root.
    pub(crate) fn set_cursor(&mut self, path: PathBuf) {
        if validate(&path, &self.root) {
            self.cursor = path;
        } else {
            self.cursor = self.root.clone();
        }
    }
}
