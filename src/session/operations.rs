//! Session operations
//!
//! Every user-supplied path is joined onto the cursor here and handed to the
//! storage and navigate layers, which validate it against the root before
//! touching the filesystem. The cursor follows the place the last operation
//! worked on: into a navigated or newly created folder, into the folder a
//! move or copy went to, and to the parent of a deleted folder. Creating a
//! file or deleting one leaves it where it is.

use std::path::Path;

use crate::error::StorageError;
use crate::navigate::{EntryView, change_directory};
use crate::session::state::Session;
use crate::storage::content::{append_to_file, clear_file, read_file};
use crate::storage::filesystem::list_directory;
use crate::storage::operations;
use crate::storage::results::{CreateResult, DeleteResult, EntryInfo, TransferResult};
use crate::storage::validation::{confine, normalize};

impl Session {
    /// Opens `input`: directories become the cursor, files are read.
    pub fn navigate(&mut self, input: &str) -> Result<EntryView, StorageError> {
        let target = self.resolve(input);
        let result = change_directory(self.root(), &target)?;
        if let Some(cursor) = result.new_cursor {
            self.set_cursor(cursor);
        }
        Ok(result.view)
    }

    /// Moves to the parent folder; refused at the root.
    pub fn go_up(&mut self) -> Result<EntryView, StorageError> {
        self.navigate("..")
    }

    /// Returns to the root ("start folder").
    pub fn go_home(&mut self) {
        let root = self.root().to_path_buf();
        self.set_cursor(root);
    }

    /// Lists the folder the cursor stands in.
    pub fn list(&self) -> Result<Vec<EntryInfo>, StorageError> {
        let cursor = confine(self.cursor(), self.root())?;
        list_directory(&cursor).map_err(|e| StorageError::io(&cursor, e))
    }

    /// Creates `input`. A new folder becomes the cursor.
    pub fn create(&mut self, input: &str) -> Result<CreateResult, StorageError> {
        let target = self.resolve(input);
        let result = operations::create(self.root(), &target)?;

        if !result.is_file {
            self.enter(&result.path);
        }
        Ok(result)
    }

    /// Deletes `input`. Deleting a folder moves the cursor to its parent.
    pub fn delete(&mut self, input: &str) -> Result<DeleteResult, StorageError> {
        let target = self.resolve(input);
        let result = operations::delete(self.root(), &target)?;

        if result.report.directories > 0 {
            if let Some(parent) = result.path.parent() {
                self.enter(parent);
            }
        }
        Ok(result)
    }

    /// Moves `source` into `destination`, which becomes the cursor.
    pub fn move_to(
        &mut self,
        source: &str,
        destination: &str,
    ) -> Result<TransferResult, StorageError> {
        let source = self.resolve(source);
        let destination = self.resolve(destination);
        let result = operations::move_entry(self.root(), &source, &destination)?;

        self.enter(&result.destination);
        Ok(result)
    }

    /// Copies `source` into `destination`, which becomes the cursor.
    pub fn copy_to(
        &mut self,
        source: &str,
        destination: &str,
    ) -> Result<TransferResult, StorageError> {
        let source = self.resolve(source);
        let destination = self.resolve(destination);
        let result = operations::copy(self.root(), &source, &destination)?;

        self.enter(&result.destination);
        Ok(result)
    }

    pub fn read(&self, input: &str) -> Result<Vec<u8>, StorageError> {
        read_file(self.root(), &self.resolve(input))
    }

    pub fn append(&mut self, input: &str, bytes: &[u8]) -> Result<(), StorageError> {
        append_to_file(self.root(), &self.resolve(input), bytes)
    }

    pub fn clear(&mut self, input: &str) -> Result<(), StorageError> {
        clear_file(self.root(), &self.resolve(input))
    }

    /// Points the cursor at the directory `path`; falls back to the root if it
    /// cannot be resolved.
    fn enter(&mut self, path: &Path) {
        let cursor = normalize(path).unwrap_or_else(|| self.root().to_path_buf());
        self.set_cursor(cursor);
    }
}
