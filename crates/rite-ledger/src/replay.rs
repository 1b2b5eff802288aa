//! Replay builder: a descriptive projection over a stored dispatch.
//!
//! Replay never re-invokes the original business logic and produces no
//! new side effects. It derives a fixed, deterministic four-stage trace
//! from the persisted record, persists it once keyed by dispatch id, and
//! returns the same bytes on every subsequent call.

use serde::{Deserialize, Serialize};

use rite_ledger_core::{DispatchId, DispatchRecord, DispatchStatus};

/// The canonical replay stages, in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayStage {
    ValidateActor,
    VerifyCapsule,
    ExecuteIntent,
    SealGovernance,
}

impl ReplayStage {
    /// Stable stage name used in serialized traces.
    pub const fn as_str(self) -> &'static str {
        match self {
            ReplayStage::ValidateActor => "validate_actor",
            ReplayStage::VerifyCapsule => "verify_capsule",
            ReplayStage::ExecuteIntent => "execute_intent",
            ReplayStage::SealGovernance => "seal_governance",
        }
    }

    /// All stages, in trace order.
    pub const ALL: [ReplayStage; 4] = [
        ReplayStage::ValidateActor,
        ReplayStage::VerifyCapsule,
        ReplayStage::ExecuteIntent,
        ReplayStage::SealGovernance,
    ];
}

/// One step of a replay trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub stage: ReplayStage,

    /// Always true for a sealed record: completion is asserted from the
    /// record's existence, not re-execution.
    pub completed: bool,

    pub detail: String,
}

/// The deterministic step trace derived from a dispatch record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayTrace {
    pub dispatch_id: DispatchId,

    /// The projection's view of the dispatch lifecycle.
    pub status: DispatchStatus,

    pub steps: Vec<TraceStep>,

    /// When the trace was first built (unix seconds). Persisted with the
    /// trace, so repeated replays return identical bytes.
    pub generated_at: i64,
}

/// Build the four-stage trace for a sealed record.
///
/// Every detail string is a pure function of the record's fields, so the
/// trace is reproducible from the record alone.
pub fn build_trace(record: &DispatchRecord, generated_at: i64) -> ReplayTrace {
    let steps = ReplayStage::ALL
        .iter()
        .map(|&stage| TraceStep {
            stage,
            completed: true,
            detail: stage_detail(stage, record),
        })
        .collect();

    ReplayTrace {
        dispatch_id: record.dispatch_id.clone(),
        status: DispatchStatus::Replayed,
        steps,
        generated_at,
    }
}

fn stage_detail(stage: ReplayStage, record: &DispatchRecord) -> String {
    match stage {
        ReplayStage::ValidateActor => {
            format!("actor {:?} accepted in realm {}", record.actor, record.realm_id)
        }
        ReplayStage::VerifyCapsule => {
            format!("capsule {:?} permitted in realm {}", record.capsule, record.realm_id)
        }
        ReplayStage::ExecuteIntent => {
            format!("intent {:?} recorded with {} input bytes", record.intent, record.input.len())
        }
        ReplayStage::SealGovernance => {
            format!("sealed {} under hash {}", record.seal, record.content_hash)
        }
    }
}
