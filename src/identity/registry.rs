//! Identity registry
//!
//! In-memory set of identities keyed by full name, plus the next-id counter.
//! The counter only advances through `&mut self`, so one registration always
//! consumes exactly one id.

use log::info;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{AuthError, RestoreError};
use crate::identity::types::{Identity, IdentityId, Secret};

#[derive(Debug, Default)]
pub struct IdentityRegistry {
    identities: BTreeMap<String, Identity>,
    next_id: IdentityId,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from persisted parts.
    ///
    /// Fails on duplicate names or ids, and when `next_id` would hand out an
    /// id that is already in use.
    pub fn restore(
        identities: Vec<Identity>,
        next_id: IdentityId,
    ) -> Result<Self, RestoreError> {
        let mut by_name = BTreeMap::new();
        let mut seen_ids = BTreeSet::new();

        for identity in identities {
            if !seen_ids.insert(identity.id()) {
                return Err(RestoreError::DuplicateId(identity.id()));
            }
            if identity.id() >= next_id {
                return Err(RestoreError::IdBeyondCounter {
                    id: identity.id(),
                    next_id,
                });
            }
            let name = identity.name().to_string();
            if by_name.insert(name.clone(), identity).is_some() {
                return Err(RestoreError::DuplicateName(name));
            }
        }

        Ok(Self {
            identities: by_name,
            next_id,
        })
    }

    /// The counter value a registry holding `identities` must start from:
    /// one past the highest id, or 0 when there are none.
    pub fn catch_up_counter<'a>(identities: impl IntoIterator<Item = &'a Identity>) -> IdentityId {
        identities
            .into_iter()
            .map(Identity::id)
            .max()
            .and_then(IdentityId::next)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Id the next registration will receive
    pub fn next_id(&self) -> IdentityId {
        self.next_id
    }

    pub fn find(&self, name: &str) -> Option<&Identity> {
        self.identities.get(name)
    }

    pub fn get(&self, id: IdentityId) -> Option<&Identity> {
        self.identities.values().find(|identity| identity.id() == id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.identities.contains_key(name)
    }

    /// Identities ordered by id
    pub fn identities(&self) -> Vec<&Identity> {
        let mut all: Vec<&Identity> = self.identities.values().collect();
        all.sort_by_key(|identity| identity.id());
        all
    }

    /// Checks `candidate` against the stored secret of `name`.
    pub fn verify(&self, name: &str, candidate: &[u8]) -> bool {
        self.find(name)
            .is_some_and(|identity| identity.secret().matches(candidate))
    }

    /// Registers a new identity under the next counter value.
    pub fn register(&mut self, name: &str, secret: Secret) -> Result<&Identity, AuthError> {
        if self.contains_name(name) {
            return Err(AuthError::NameTaken(name.to_string()));
        }

        let id = self.next_id;
        self.next_id = id.next().ok_or(AuthError::CounterExhausted)?;

        info!("Registered identity {} with id {}", name, id);

        let identity: &Identity = self
            .identities
            .entry(name.to_string())
            .or_insert_with(|| Identity::new(id, name, secret));
        Ok(identity)
    }

    /// Renames the identity holding `id`. The id is unchanged.
    ///
    /// Renaming to the current name is a no-op.
    pub fn rename(&mut self, id: IdentityId, new_name: &str) -> Result<(), AuthError> {
        let current = self
            .get(id)
            .map(|identity| identity.name().to_string())
            .ok_or_else(|| AuthError::UnknownIdentity(id.to_string()))?;

        if current == new_name {
            return Ok(());
        }
        if self.contains_name(new_name) {
            return Err(AuthError::NameTaken(new_name.to_string()));
        }

        if let Some(mut identity) = self.identities.remove(&current) {
            identity.set_name(new_name.to_string());
            self.identities.insert(new_name.to_string(), identity);
            info!("Identity {} renamed from {} to {}", id, current, new_name);
        }
        Ok(())
    }
}
