//! The registry: a read-mostly directory of realms and capsules.
//!
//! Registry state is loaded at startup (or built in code by the
//! administrative path) and handed to the ledger as an explicit value.
//! The hot dispatch path only reads it.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use rite_ledger_core::RealmId;

use crate::capsule::Capsule;
use crate::error::RegistryError;
use crate::realm::Realm;

/// Directory of realms and capsule definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    realms: HashMap<String, Realm>,
    capsules: HashMap<String, Capsule>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Administrative path: register or replace a realm.
    pub fn insert_realm(&mut self, realm: Realm) {
        self.realms.insert(realm.id.as_str().to_string(), realm);
    }

    /// Administrative path: register or replace a capsule definition.
    pub fn insert_capsule(&mut self, capsule: Capsule) {
        self.capsules.insert(capsule.id.clone(), capsule);
    }

    /// Look up a realm by id.
    pub fn realm(&self, realm_id: &RealmId) -> Option<&Realm> {
        self.realms.get(realm_id.as_str())
    }

    /// Look up a capsule definition by id.
    ///
    /// A capsule may appear in a realm's permitted set without a standalone
    /// definition; such capsules are custodian-only.
    pub fn capsule(&self, capsule_id: &str) -> Option<&Capsule> {
        self.capsules.get(capsule_id)
    }

    /// Number of registered realms.
    pub fn realm_count(&self) -> usize {
        self.realms.len()
    }

    /// Iterate over all realms.
    pub fn realms(&self) -> impl Iterator<Item = &Realm> {
        self.realms.values()
    }

    /// Load a registry document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| RegistryError::Io {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RegistryError::Malformed(e.to_string()))
    }

    /// Persist the registry document to disk (administrative path).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| RegistryError::Malformed(e.to_string()))?;
        std::fs::write(path.as_ref(), bytes).map_err(|e| RegistryError::Io {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }
}
