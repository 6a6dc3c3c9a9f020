//! Identity store
//!
//! Registered identities, the id counter, and their durable storage.

pub mod persistence;
pub mod registry;
pub mod types;

pub use persistence::RegistryStore;
pub use registry::IdentityRegistry;
pub use types::{Identity, IdentityId, Secret};
