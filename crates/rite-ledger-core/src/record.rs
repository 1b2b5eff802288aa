//! Dispatch records: the atomic unit of the ceremonial ledger.
//!
//! A dispatch record is an immutable, content-hashed event. Once created,
//! it cannot be edited. Re-sealing or amendment is expressed as a new
//! record that names its predecessor via `supersedes`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::{content_hash, DispatchContent};
use crate::seal::{DispatchStatus, Seal};
use crate::types::{ContentHash, DispatchId, RealmId};

/// One authorized invocation event, as persisted in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// Unique `{PREFIX}-{YYYY}-{MM}-{DD}-{8 hex}` identifier.
    pub dispatch_id: DispatchId,

    /// UTC timestamp, second precision. Part of the hashed content.
    pub timestamp: i64,

    /// The invoking actor identity (opaque string; authn is out of scope).
    pub actor: String,

    /// The realm the dispatch was authorized against.
    pub realm_id: RealmId,

    /// The invoked capsule id.
    pub capsule: String,

    /// Declared intent of the invocation.
    pub intent: String,

    /// Opaque input payload or reference.
    pub input: Bytes,

    /// Governance classification, bounded by the realm's ceiling at creation.
    pub seal: Seal,

    /// Witnesses present at dispatch time (may be empty where not required).
    pub witnesses: Vec<String>,

    /// Blake3 over the canonical serialization of the hashed fields.
    pub content_hash: ContentHash,

    /// Lifecycle status. Records are written as `Sealed`.
    pub status: DispatchStatus,

    /// Predecessor record when this dispatch supersedes an earlier one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<DispatchId>,
}

impl DispatchRecord {
    /// The hashed content view of this record.
    pub fn content(&self) -> DispatchContent<'_> {
        DispatchContent {
            actor: &self.actor,
            realm: self.realm_id.as_str(),
            capsule: &self.capsule,
            intent: &self.intent,
            input: &self.input,
            timestamp: self.timestamp,
        }
    }

    /// Recompute the content hash from the persisted fields.
    pub fn recompute_hash(&self) -> ContentHash {
        content_hash(&self.content())
    }

    /// Check the stored hash against a recomputation.
    pub fn hash_intact(&self) -> bool {
        self.recompute_hash() == self.content_hash
    }
}

/// A dispatch before it has an identifier, timestamp, or hash.
///
/// Drafts are what callers hand to the ledger; sealing is the ledger's job.
#[derive(Debug, Clone)]
pub struct DispatchDraft {
    pub actor: String,
    pub realm_id: RealmId,
    pub capsule: String,
    pub intent: String,
    pub input: Bytes,
    pub seal: Seal,
    pub witnesses: Vec<String>,
    pub supersedes: Option<DispatchId>,
}

impl DispatchDraft {
    /// Start a draft with the required invocation fields.
    pub fn new(
        actor: impl Into<String>,
        realm_id: RealmId,
        capsule: impl Into<String>,
        intent: impl Into<String>,
        seal: Seal,
    ) -> Self {
        Self {
            actor: actor.into(),
            realm_id,
            capsule: capsule.into(),
            intent: intent.into(),
            input: Bytes::new(),
            seal,
            witnesses: Vec::new(),
            supersedes: None,
        }
    }

    /// Set the opaque input payload.
    pub fn input(mut self, input: impl Into<Bytes>) -> Self {
        self.input = input.into();
        self
    }

    /// Add a witness.
    pub fn witness(mut self, witness: impl Into<String>) -> Self {
        self.witnesses.push(witness.into());
        self
    }

    /// Mark this dispatch as superseding an earlier record.
    pub fn supersedes(mut self, prior: DispatchId) -> Self {
        self.supersedes = Some(prior);
        self
    }

    /// Seal the draft into an immutable record.
    ///
    /// Computes the content hash over {actor, realm, capsule, intent,
    /// input, timestamp}. The id and timestamp come from the ledger's
    /// append path, which owns uniqueness and clock policy.
    pub fn seal_record(self, dispatch_id: DispatchId, timestamp: i64) -> DispatchRecord {
        let hash = content_hash(&DispatchContent {
            actor: &self.actor,
            realm: self.realm_id.as_str(),
            capsule: &self.capsule,
            intent: &self.intent,
            input: &self.input,
            timestamp,
        });

        DispatchRecord {
            dispatch_id,
            timestamp,
            actor: self.actor,
            realm_id: self.realm_id,
            capsule: self.capsule,
            intent: self.intent,
            input: self.input,
            seal: self.seal,
            witnesses: self.witnesses,
            content_hash: hash,
            status: DispatchStatus::Sealed,
            supersedes: self.supersedes,
        }
    }
}
