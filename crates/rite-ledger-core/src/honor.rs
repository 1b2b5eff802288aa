//! Honor entries: commendations recorded alongside dispatches.
//!
//! Honors follow the same immutability rules as dispatch records and carry
//! their own identifier prefix.

use serde::{Deserialize, Serialize};

use crate::seal::{AuthorityLevel, Seal};
use crate::types::{DispatchId, HonorId, RealmId};

/// One honor granted within a realm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HonorEntry {
    /// Unique identifier under the honor prefix.
    pub honor_id: HonorId,

    /// Who receives the honor.
    pub recipient: String,

    /// The deed being honored.
    pub deed: String,

    /// The insignia conferred.
    pub insignia: String,

    /// Authority level of the granting actor.
    pub authority: AuthorityLevel,

    /// Realm the honor was granted in.
    pub realm_id: RealmId,

    /// Governance classification of the grant.
    pub seal: Seal,

    /// Witnesses to the grant.
    pub witnesses: Vec<String>,

    /// UTC creation timestamp, second precision.
    pub created_at: i64,

    /// Back-reference to the dispatch that occasioned the honor, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch_ref: Option<DispatchId>,
}

/// An honor before it has an identifier or timestamp.
#[derive(Debug, Clone)]
pub struct HonorDraft {
    pub recipient: String,
    pub deed: String,
    pub insignia: String,
    pub authority: AuthorityLevel,
    pub realm_id: RealmId,
    pub seal: Seal,
    pub witnesses: Vec<String>,
    pub dispatch_ref: Option<DispatchId>,
}

impl HonorDraft {
    /// Start a draft with the required grant fields.
    pub fn new(
        recipient: impl Into<String>,
        deed: impl Into<String>,
        insignia: impl Into<String>,
        authority: AuthorityLevel,
        realm_id: RealmId,
        seal: Seal,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            deed: deed.into(),
            insignia: insignia.into(),
            authority,
            realm_id,
            seal,
            witnesses: Vec::new(),
            dispatch_ref: None,
        }
    }

    /// Add a witness.
    pub fn witness(mut self, witness: impl Into<String>) -> Self {
        self.witnesses.push(witness.into());
        self
    }

    /// Link the honor back to the dispatch that occasioned it.
    pub fn for_dispatch(mut self, dispatch_id: DispatchId) -> Self {
        self.dispatch_ref = Some(dispatch_id);
        self
    }

    /// Finalize the draft into an immutable entry.
    pub fn grant(self, honor_id: HonorId, created_at: i64) -> HonorEntry {
        HonorEntry {
            honor_id,
            recipient: self.recipient,
            deed: self.deed,
            insignia: self.insignia,
            authority: self.authority,
            realm_id: self.realm_id,
            seal: self.seal,
            witnesses: self.witnesses,
            created_at,
            dispatch_ref: self.dispatch_ref,
        }
    }
}
