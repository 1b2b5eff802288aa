//! The authorization gate: a pure read over registry state.
//!
//! Checks run in a fixed order so callers always receive the single most
//! specific denial:
//!
//! 1. realm exists and is active
//! 2. capsule is permitted in the realm (and within its authority bound)
//! 3. actor is a custodian, or the capsule is public
//! 4. witness policy is satisfied
//!
//! The gate has no side effects and takes no locks; registry state is
//! read-only on this path.

use rite_ledger_core::RealmId;

use crate::error::Denial;
use crate::registry::Registry;

/// Validate an (actor, realm, capsule) triple against the registry.
///
/// Returns the single most specific [`Denial`] on failure. Witnesses are
/// whoever the caller presents; their identity is not verified here.
pub fn authorize(
    registry: &Registry,
    actor: &str,
    realm_id: &RealmId,
    capsule_id: &str,
    witnesses: &[String],
) -> Result<(), Denial> {
    // (a) realm exists and is active
    let realm = registry
        .realm(realm_id)
        .ok_or_else(|| Denial::UnknownRealm(realm_id.clone()))?;
    if !realm.is_active() {
        return Err(Denial::RealmInactive(realm_id.clone()));
    }

    // (b) capsule permitted, and its authority demand within the realm's level
    if !realm.permits_capsule(capsule_id) {
        return Err(Denial::CapsuleNotPermitted {
            capsule: capsule_id.to_string(),
            realm: realm_id.clone(),
        });
    }
    let capsule = registry.capsule(capsule_id);
    if let Some(capsule) = capsule {
        if capsule.min_authority > realm.governance.authority_level {
            return Err(Denial::CapsuleNotPermitted {
                capsule: capsule_id.to_string(),
                realm: realm_id.clone(),
            });
        }
    }

    // (c) actor is a custodian, or the capsule is public
    let public = capsule.map(|c| c.public_access).unwrap_or(false);
    if !realm.has_custodian(actor) && !public {
        return Err(Denial::ActorNotAuthorized {
            actor: actor.to_string(),
            realm: realm_id.clone(),
        });
    }

    // (d) witness policy
    if realm.governance.requires_witness && witnesses.is_empty() {
        return Err(Denial::WitnessRequired(realm_id.clone()));
    }

    Ok(())
}
