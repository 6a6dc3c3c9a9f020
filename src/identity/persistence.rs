//! Registry persistence
//!
//! The identity set is stored as JSON, the next-id counter as a decimal
//! integer in its own file. Both are written to a temporary sibling and
//! renamed over the target, so a crash never leaves a half-written store.
//!
//! There is no cross-process locking: two processes saving the same store
//! will overwrite each other.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use crate::config::StorageConfig;
use crate::error::StoreError;
use crate::identity::registry::IdentityRegistry;
use crate::identity::types::{Identity, IdentityId};

const STORE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StoredRegistry {
    version: u32,
    identities: Vec<Identity>,
}

/// Location of the durable registry and counter
#[derive(Debug, Clone)]
pub struct RegistryStore {
    registry_path: PathBuf,
    counter_path: PathBuf,
}

impl RegistryStore {
    pub fn new(registry_path: impl Into<PathBuf>, counter_path: impl Into<PathBuf>) -> Self {
        Self {
            registry_path: registry_path.into(),
            counter_path: counter_path.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.registry_path(), config.counter_path())
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    pub fn counter_path(&self) -> &Path {
        &self.counter_path
    }

    /// Loads the registry and reconciles the counter with the stored ids.
    ///
    /// A missing registry file means first run. A missing counter is rebuilt
    /// from the highest id. Anything unreadable is `StoreError::Corrupt`.
    pub fn load(&self) -> Result<IdentityRegistry, StoreError> {
        let identities = self.load_identities()?;
        let floor = IdentityRegistry::catch_up_counter(&identities);

        let next_id = match self.load_counter()? {
            None => {
                info!("Counter not saved, catching up to {}", floor);
                floor
            }
            Some(saved) if saved < floor => {
                warn!(
                    "Saved counter {} is behind stored ids, raising it to {}",
                    saved, floor
                );
                floor
            }
            Some(saved) => saved,
        };

        let registry = IdentityRegistry::restore(identities, next_id)
            .map_err(|reason| StoreError::corrupt(&self.registry_path, reason.to_string()))?;

        info!(
            "Loaded {} identities from {} (next id {})",
            registry.len(),
            self.registry_path.display(),
            registry.next_id()
        );
        Ok(registry)
    }

    /// Writes the identity set, then the counter.
    ///
    /// A crash between the two writes leaves a stale counter, which `load`
    /// repairs from the stored ids.
    pub fn save(&self, registry: &IdentityRegistry) -> Result<(), StoreError> {
        let stored = StoredRegistry {
            version: STORE_VERSION,
            identities: registry.identities().into_iter().cloned().collect(),
        };

        let json = serde_json::to_vec_pretty(&stored)
            .map_err(|e| StoreError::corrupt(&self.registry_path, e.to_string()))?;

        write_atomically(&self.registry_path, &json).map_err(|source| StoreError::Io {
            path: self.registry_path.clone(),
            source,
        })?;

        write_atomically(
            &self.counter_path,
            registry.next_id().to_string().as_bytes(),
        )
        .map_err(|source| StoreError::Io {
            path: self.counter_path.clone(),
            source,
        })?;

        info!(
            "Saved {} identities to {} (next id {})",
            registry.len(),
            self.registry_path.display(),
            registry.next_id()
        );
        Ok(())
    }

    fn load_identities(&self) -> Result<Vec<Identity>, StoreError> {
        let bytes = match fs::read(&self.registry_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(
                    "No identity store at {}, starting empty",
                    self.registry_path.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::corrupt(&self.registry_path, e.to_string()));
            }
        };

        let stored: StoredRegistry = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::corrupt(&self.registry_path, e.to_string()))?;

        if stored.version != STORE_VERSION {
            return Err(StoreError::corrupt(
                &self.registry_path,
                format!("unsupported store version {}", stored.version),
            ));
        }

        debug!(
            "Read {} stored identities from {}",
            stored.identities.len(),
            self.registry_path.display()
        );
        Ok(stored.identities)
    }

    fn load_counter(&self) -> Result<Option<IdentityId>, StoreError> {
        let raw = match fs::read_to_string(&self.counter_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::corrupt(&self.counter_path, e.to_string())),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        trimmed
            .parse::<u64>()
            .map(|value| Some(IdentityId::new(value)))
            .map_err(|e| {
                StoreError::corrupt(&self.counter_path, format!("invalid counter {trimmed:?}: {e}"))
            })
    }
}

/// Writes `bytes` to a temporary sibling of `path`, syncs it, and renames it
/// over `path`. The file is owner-only on unix since it may hold secrets.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "store path has no file name"))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        // Directory fsync is not supported everywhere; the rename already happened.
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}
