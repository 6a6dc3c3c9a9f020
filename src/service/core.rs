//! Storage service core
//!
//! Holds the identity registry for the life of the process and turns
//! answered challenges into sessions.

use log::{error, info, warn};
use std::fs;

use crate::auth::{validate_name, validate_secret};
use crate::config::StorageConfig;
use crate::error::{AuthError, CoreError, StorageError, StoreError};
use crate::identity::{Identity, IdentityRegistry, RegistryStore, Secret};
use crate::session::state::{Challenge, ChallengeTarget};
use crate::session::Session;
use crate::storage::validation::normalize;

/// Supplies already-materialized secrets to [`StorageService::login`].
pub trait SecretProvider {
    /// Secret for the given attempt (1-based), or `None` to abort the login.
    fn next_secret(&mut self, name: &str, attempt: u32) -> Option<Secret>;

    /// Asked when no identity holds `name`; `true` registers it.
    fn confirm_registration(&mut self, _name: &str) -> bool {
        false
    }
}

/// Outcome of answering a challenge that did not fail outright
#[derive(Debug)]
pub enum Attempt {
    Accepted(Session),
    /// Wrong secret; the challenge comes back with one attempt fewer.
    Rejected(Challenge),
}

/// Owns the identity registry for the lifetime of the process and opens
/// sessions against the storage root.
pub struct StorageService {
    config: StorageConfig,
    store: RegistryStore,
    registry: IdentityRegistry,
}

impl StorageService {
    /// Loads the registry. A corrupt store is returned as an error and must
    /// stop the process.
    pub fn open(config: StorageConfig) -> Result<Self, StoreError> {
        let store = RegistryStore::from_config(&config);
        let registry = store.load().inspect_err(|e| {
            error!("Failed to load identity store: {}", e);
        })?;

        if let Err(e) = fs::create_dir_all(config.storage_root_path()) {
            warn!("Failed to create storage root directory: {}", e);
        } else {
            info!("Storage root directory: {}", config.storage_root);
        }

        Ok(Self {
            config,
            store,
            registry,
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Starts a password challenge for an existing identity.
    pub fn begin_login(&self, name: &str) -> Result<Challenge, AuthError> {
        validate_name(name, &self.config)?;
        let identity = self
            .registry
            .find(name)
            .ok_or_else(|| AuthError::UnknownIdentity(name.to_string()))?;

        Ok(Challenge::new(
            name,
            ChallengeTarget::Existing(identity.id()),
            self.config.max_login_attempts,
        ))
    }

    /// Starts the registration of a new identity. The first secret submitted
    /// becomes its password.
    pub fn begin_registration(&self, name: &str) -> Result<Challenge, AuthError> {
        validate_name(name, &self.config)?;
        if self.registry.contains_name(name) {
            return Err(AuthError::NameTaken(name.to_string()));
        }
        Ok(Challenge::new(name, ChallengeTarget::Registration, 1))
    }

    /// Answers a challenge.
    ///
    /// Returns the session on success, the challenge back while attempts
    /// remain, and `AuthError::AttemptsExhausted` after the last failure.
    pub fn submit_secret(
        &mut self,
        mut challenge: Challenge,
        secret: Secret,
    ) -> Result<Attempt, CoreError> {
        match challenge.target() {
            ChallengeTarget::Registration => {
                validate_secret(&secret)?;
                let identity = self.registry.register(challenge.name(), secret)?.clone();
                let session = self.open_session(&identity)?;
                info!("Welcome, {}", identity.name());
                Ok(Attempt::Accepted(session))
            }
            ChallengeTarget::Existing(id) => {
                let identity = self
                    .registry
                    .get(id)
                    .filter(|identity| identity.secret().matches(secret.expose()))
                    .cloned();

                if let Some(identity) = identity {
                    let session = self.open_session(&identity)?;
                    info!("Welcome back, {}", identity.name());
                    return Ok(Attempt::Accepted(session));
                }

                let remaining = challenge.consume_attempt();
                warn!(
                    "Incorrect password for {} ({} attempts left)",
                    challenge.name(),
                    remaining
                );
                if remaining == 0 {
                    return Err(AuthError::AttemptsExhausted(challenge.name().to_string()).into());
                }
                Ok(Attempt::Rejected(challenge))
            }
        }
    }

    /// Logs `name` in, pulling secrets from `provider`.
    ///
    /// Unknown names are registered only if the provider confirms it.
    pub fn login(
        &mut self,
        name: &str,
        provider: &mut dyn SecretProvider,
    ) -> Result<Session, CoreError> {
        let mut challenge = match self.begin_login(name) {
            Ok(challenge) => challenge,
            Err(AuthError::UnknownIdentity(_)) if provider.confirm_registration(name) => {
                self.begin_registration(name)?
            }
            Err(e) => return Err(e.into()),
        };

        let mut attempt = 1;
        loop {
            let secret = provider
                .next_secret(name, attempt)
                .ok_or(AuthError::Aborted)?;
            match self.submit_secret(challenge, secret)? {
                Attempt::Accepted(session) => return Ok(session),
                Attempt::Rejected(next) => challenge = next,
            }
            attempt += 1;
        }
    }

    /// Renames the session's identity. The id and folder stay the same.
    pub fn rename(&mut self, session: &mut Session, new_name: &str) -> Result<(), AuthError> {
        validate_name(new_name, &self.config)?;
        self.registry.rename(session.identity_id(), new_name)?;
        session.set_name(new_name.to_string());
        Ok(())
    }

    /// Ends the session and persists the registry and counter.
    pub fn logout(&mut self, session: Session) -> Result<(), StoreError> {
        info!("Logging out {}", session.name());
        drop(session);
        self.save()
    }

    /// Persists the registry and counter.
    pub fn save(&self) -> Result<(), StoreError> {
        self.store.save(&self.registry)
    }

    /// Creates the identity's folder if needed and opens a session at it.
    fn open_session(&self, identity: &Identity) -> Result<Session, StorageError> {
        let root = self.config.identity_root(identity.id());
        fs::create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;
        let root = normalize(&root).ok_or(StorageError::InvalidPath(root))?;

        info!(
            "Opened session for identity {} at {}",
            identity.id(),
            root.display()
        );
        Ok(Session::open(identity, root))
    }
}
