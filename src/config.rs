//! Configuration management for RAX user storage
//!
//! Values come from `config.toml` (optional) with `RAX_STORAGE_*` environment
//! overrides layered on top of built-in defaults. All of them are read once at
//! startup.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::identity::IdentityId;

const DEFAULT_STORAGE_ROOT: &str = "FileUsers";
const DEFAULT_REGISTRY_FILE: &str = "savedUsers.json";
const DEFAULT_COUNTER_FILE: &str = "counter.data";
const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 3;
const DEFAULT_MAX_NAME_LENGTH: usize = 64;
const DEFAULT_MAX_COMMAND_LENGTH: usize = 512;

/// Storage configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    // ═══ LAYOUT (Environment Override Supported) ═══
    /// Top-level directory holding one folder per identity id
    pub storage_root: String,

    /// Serialized identity set
    pub registry_file: String,

    /// Persisted next-id counter
    pub counter_file: String,

    // ═══ LIMITS ═══
    /// Password attempts allowed per login
    pub max_login_attempts: u32,

    pub max_name_length: usize,

    /// Longest shell line accepted
    pub max_command_length: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_root: DEFAULT_STORAGE_ROOT.to_string(),
            registry_file: DEFAULT_REGISTRY_FILE.to_string(),
            counter_file: DEFAULT_COUNTER_FILE.to_string(),
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_command_length: DEFAULT_MAX_COMMAND_LENGTH,
        }
    }
}

impl StorageConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the given file stem (`.toml` is implied).
    ///
    /// A missing file is not an error, the defaults are used instead.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("storage_root", DEFAULT_STORAGE_ROOT)?
            .set_default("registry_file", DEFAULT_REGISTRY_FILE)?
            .set_default("counter_file", DEFAULT_COUNTER_FILE)?
            .set_default("max_login_attempts", i64::from(DEFAULT_MAX_LOGIN_ATTEMPTS))?
            .set_default("max_name_length", DEFAULT_MAX_NAME_LENGTH as i64)?
            .set_default("max_command_length", DEFAULT_MAX_COMMAND_LENGTH as i64)?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("RAX_STORAGE"))
            .build()?;

        let config: StorageConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration with every file placed under `base`.
    pub fn under(base: &Path) -> Self {
        Self {
            storage_root: base.join(DEFAULT_STORAGE_ROOT).to_string_lossy().into_owned(),
            registry_file: base.join(DEFAULT_REGISTRY_FILE).to_string_lossy().into_owned(),
            counter_file: base.join(DEFAULT_COUNTER_FILE).to_string_lossy().into_owned(),
            ..Self::default()
        }
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_root.trim().is_empty() {
            return Err(ConfigError::Message("storage_root cannot be empty".into()));
        }

        if self.registry_file.trim().is_empty() || self.counter_file.trim().is_empty() {
            return Err(ConfigError::Message(
                "registry_file and counter_file cannot be empty".into(),
            ));
        }

        if self.registry_file == self.counter_file {
            return Err(ConfigError::Message(
                "registry_file and counter_file must differ".into(),
            ));
        }

        if self.max_login_attempts == 0 {
            return Err(ConfigError::Message(
                "max_login_attempts must be greater than 0".into(),
            ));
        }

        if self.max_name_length == 0 {
            return Err(ConfigError::Message(
                "max_name_length must be greater than 0".into(),
            ));
        }

        if self.max_command_length == 0 {
            return Err(ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get storage root as PathBuf
    pub fn storage_root_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_root)
    }

    pub fn registry_path(&self) -> PathBuf {
        PathBuf::from(&self.registry_file)
    }

    pub fn counter_path(&self) -> PathBuf {
        PathBuf::from(&self.counter_file)
    }

    /// Folder owned by the identity with the given id: `<storage_root>/<id>`
    pub fn identity_root(&self, id: IdentityId) -> PathBuf {
        self.storage_root_path().join(id.to_string())
    }
}
