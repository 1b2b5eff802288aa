//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a pre-populated ceremonial
//! registry and request builders for the standard scenarios.

use std::sync::Arc;

use rite_ledger::{
    AuthorityLevel, DispatchId, DispatchRequest, HonorRequest, Ledger, LedgerConfig, RealmId, Seal,
};
use rite_ledger_registry::{Capsule, RealmBuilder, RealmStatus, Registry};
use rite_ledger_store::MemoryStore;

/// The realm id every standard fixture scenario plays out in.
pub const PLENARY_REALM: &str = "PL-001";

/// A ceremonial registry fixture: the sovereign `PL-001` realm (witnessed,
/// eternal ceiling), a dormant archive realm, and two capsules.
pub struct CeremonyFixture {
    pub registry: Arc<Registry>,
}

impl CeremonyFixture {
    /// Build the standard scenario registry.
    pub fn sovereign() -> Self {
        let mut registry = Registry::new();
        registry.insert_realm(
            RealmBuilder::new(Self::plenary_id(), "Plenary", 1_756_000_000)
                .custodian("Custodian")
                .custodian("Archivist")
                .capsule("Sovereign Crown")
                .capsule("Lesser Sigil")
                .governance(AuthorityLevel::Sovereign, true, Seal::Eternal)
                .build(),
        );
        registry.insert_realm(
            RealmBuilder::new(RealmId::parse("AR-002").unwrap(), "Archive", 1_756_000_000)
                .status(RealmStatus::Dormant)
                .custodian("Archivist")
                .capsule("Lesser Sigil")
                .build(),
        );
        registry.insert_capsule(Capsule::new("Sovereign Crown", AuthorityLevel::Sovereign));
        registry.insert_capsule(Capsule::new("Lesser Sigil", AuthorityLevel::Initiate));

        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn plenary_id() -> RealmId {
        RealmId::parse(PLENARY_REALM).unwrap()
    }

    /// An in-memory ledger over this fixture's registry.
    pub fn ledger(&self) -> Ledger<MemoryStore> {
        Ledger::new(
            Arc::clone(&self.registry),
            MemoryStore::new(),
            LedgerConfig::default(),
        )
    }

    /// The canonical well-formed dispatch: custodian invoking the crown
    /// capsule with a witness present.
    pub fn crown_request(&self) -> DispatchRequest {
        DispatchRequest {
            actor: "Custodian".into(),
            realm: Self::plenary_id(),
            capsule: "Sovereign Crown".into(),
            intent: "Crown.Invocation".into(),
            input: b"offering".to_vec().into(),
            seal: Seal::Eternal,
            witnesses: vec!["Herald".into()],
            supersedes: None,
        }
    }

    /// The same invocation attempted by an actor the realm does not know.
    pub fn intruder_request(&self) -> DispatchRequest {
        DispatchRequest {
            actor: "Intruder".into(),
            ..self.crown_request()
        }
    }

    /// A well-formed honor grant, optionally tied back to a dispatch.
    pub fn honor_request(&self, dispatch_ref: Option<DispatchId>) -> HonorRequest {
        HonorRequest {
            granted_by: "Custodian".into(),
            recipient: "Herald".into(),
            deed: "Kept the vigil".into(),
            insignia: "Silver Branch".into(),
            authority: AuthorityLevel::Warden,
            realm: Self::plenary_id(),
            seal: Seal::Sacred,
            witnesses: vec!["Archivist".into()],
            dispatch_ref,
        }
    }
}
