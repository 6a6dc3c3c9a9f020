pub mod auth;
pub mod config;
pub mod error;
pub mod identity;
pub mod navigate;
pub mod service;
pub mod session;
pub mod shell;
pub mod storage;

pub use config::StorageConfig;
pub use error::{AuthError, CoreError, ErrorKind, StorageError, StoreError};
pub use identity::{Identity, IdentityId, IdentityRegistry, RegistryStore, Secret};
pub use service::{Attempt, SecretProvider, StorageService};
pub use session::{Challenge, LoginState, Session};
