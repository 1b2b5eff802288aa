//! Realms: administrative domains with their own custodians and governance.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use rite_ledger_core::{AuthorityLevel, RealmId, Seal};

/// Lifecycle status of a realm. Only `Active` realms accept dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RealmStatus {
    Active,
    Dormant,
    Retired,
}

/// Governance policy bounds for a realm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Governance {
    /// The authority level this realm operates at. Capsules demanding more
    /// than this are not invocable here.
    pub authority_level: AuthorityLevel,

    /// Whether dispatches require at least one witness.
    pub requires_witness: bool,

    /// Ceiling on dispatch seal ranks.
    pub max_seal_level: Seal,
}

/// Bookkeeping maintained by the administrative path.
///
/// The hot dispatch path never writes these fields; live figures are
/// derivable from the ledger itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmMetadata {
    /// UTC creation timestamp, second precision.
    pub created_at: i64,

    /// Last dispatch observed by the administrative path, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_dispatch_at: Option<i64>,

    /// Dispatch count as of the last administrative reconciliation.
    #[serde(default)]
    pub dispatch_count: u64,
}

/// An administrative domain: custodians, permitted capsules, governance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realm {
    pub id: RealmId,
    pub name: String,
    pub status: RealmStatus,

    /// Actors authorized to invoke capsules in this realm.
    pub custodians: BTreeSet<String>,

    /// Capsule ids this realm permits.
    pub capsules: BTreeSet<String>,

    pub governance: Governance,
    pub metadata: RealmMetadata,
}

impl Realm {
    /// Whether the realm currently accepts dispatches.
    pub fn is_active(&self) -> bool {
        self.status == RealmStatus::Active
    }

    /// Whether the actor is a custodian of this realm.
    pub fn has_custodian(&self, actor: &str) -> bool {
        self.custodians.contains(actor)
    }

    /// Whether the capsule id is permitted in this realm.
    pub fn permits_capsule(&self, capsule_id: &str) -> bool {
        self.capsules.contains(capsule_id)
    }
}

/// Builder for realm construction on the administrative path.
#[derive(Debug, Clone)]
pub struct RealmBuilder {
    id: RealmId,
    name: String,
    status: RealmStatus,
    custodians: BTreeSet<String>,
    capsules: BTreeSet<String>,
    governance: Governance,
    created_at: i64,
}

impl RealmBuilder {
    /// Start building a realm with default governance (keeper authority,
    /// no witness requirement, temporal ceiling).
    pub fn new(id: RealmId, name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            name: name.into(),
            status: RealmStatus::Active,
            custodians: BTreeSet::new(),
            capsules: BTreeSet::new(),
            governance: Governance {
                authority_level: AuthorityLevel::Keeper,
                requires_witness: false,
                max_seal_level: Seal::Temporal,
            },
            created_at,
        }
    }

    /// Set the lifecycle status.
    pub fn status(mut self, status: RealmStatus) -> Self {
        self.status = status;
        self
    }

    /// Add a custodian.
    pub fn custodian(mut self, actor: impl Into<String>) -> Self {
        self.custodians.insert(actor.into());
        self
    }

    /// Permit a capsule.
    pub fn capsule(mut self, capsule_id: impl Into<String>) -> Self {
        self.capsules.insert(capsule_id.into());
        self
    }

    /// Set the governance policy.
    pub fn governance(
        mut self,
        authority_level: AuthorityLevel,
        requires_witness: bool,
        max_seal_level: Seal,
    ) -> Self {
        self.governance = Governance {
            authority_level,
            requires_witness,
            max_seal_level,
        };
        self
    }

    /// Finish the realm.
    pub fn build(self) -> Realm {
        Realm {
            id: self.id,
            name: self.name,
            status: self.status,
            custodians: self.custodians,
            capsules: self.capsules,
            governance: self.governance,
            metadata: RealmMetadata {
                created_at: self.created_at,
                last_dispatch_at: None,
                dispatch_count: 0,
            },
        }
    }
}
