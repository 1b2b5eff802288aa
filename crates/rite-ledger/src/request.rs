//! External request and acknowledgement types.
//!
//! These are the contracts the out-of-scope request layer speaks: it
//! submits a request, and receives either a small acknowledgement or a
//! typed error it must not collapse into a generic failure.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use rite_ledger_core::{
    AuthorityLevel, DispatchId, DispatchRecord, DispatchStatus, HonorEntry, HonorId, RealmId, Seal,
};

/// A dispatch submission from the request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub actor: String,
    pub realm: RealmId,
    pub capsule: String,
    pub intent: String,

    /// Opaque payload or reference.
    #[serde(default)]
    pub input: Bytes,

    pub seal: Seal,

    #[serde(default)]
    pub witnesses: Vec<String>,

    /// Present when this dispatch supersedes an earlier record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<DispatchId>,
}

/// What the request layer receives back for an accepted dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchAck {
    pub dispatch_id: DispatchId,
    pub timestamp: i64,
    pub status: DispatchStatus,
}

impl From<&DispatchRecord> for DispatchAck {
    fn from(record: &DispatchRecord) -> Self {
        Self {
            dispatch_id: record.dispatch_id.clone(),
            timestamp: record.timestamp,
            status: record.status,
        }
    }
}

/// An honor-granting submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HonorRequest {
    /// The custodian performing the grant; gated like any other write.
    pub granted_by: String,

    pub recipient: String,
    pub deed: String,
    pub insignia: String,
    pub authority: AuthorityLevel,
    pub realm: RealmId,
    pub seal: Seal,

    #[serde(default)]
    pub witnesses: Vec<String>,

    /// Back-reference to the dispatch that occasioned the honor, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch_ref: Option<DispatchId>,
}

/// Acknowledgement for an accepted honor grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HonorAck {
    pub honor_id: HonorId,
    pub created_at: i64,
}

impl From<&HonorEntry> for HonorAck {
    fn from(entry: &HonorEntry) -> Self {
        Self {
            honor_id: entry.honor_id.clone(),
            created_at: entry.created_at,
        }
    }
}
