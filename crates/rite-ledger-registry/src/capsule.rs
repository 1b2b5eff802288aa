//! Capsules: named capabilities invocable within a realm.

use serde::{Deserialize, Serialize};

use rite_ledger_core::AuthorityLevel;

/// A named capability. Registered once by the administrative path and
/// referenced from realms by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capsule {
    /// Stable capsule identifier (also its display name in ceremony).
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Minimum authority level a realm must operate at to invoke this.
    pub min_authority: AuthorityLevel,

    /// Public capsules may be invoked by non-custodians.
    #[serde(default)]
    pub public_access: bool,
}

impl Capsule {
    /// Construct a custodian-only capsule.
    pub fn new(id: impl Into<String>, min_authority: AuthorityLevel) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            min_authority,
            public_access: false,
        }
    }

    /// Set a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Open the capsule to non-custodians.
    pub fn public(mut self) -> Self {
        self.public_access = true;
        self
    }
}
