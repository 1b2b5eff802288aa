//! Audit verifier: post-hoc integrity and policy checks over a stored
//! dispatch.
//!
//! Each check is reported individually; the verdict summarizes them.
//! Governance drift (the realm's ceiling moved below the record's seal
//! after creation) is reported, not treated as tampering.

use serde::{Deserialize, Serialize};

use rite_ledger_core::{DispatchId, DispatchRecord};
use rite_ledger_registry::Registry;

/// The individual checks an audit performs, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// The record exists in the ledger.
    RecordPresent,
    /// Stored content hash matches a recomputation over persisted fields.
    ContentHash,
    /// The seal rank is within the realm's *current* ceiling.
    SealCeiling,
    /// The record's witnesses satisfy the realm's *current* witness
    /// requirement. Records do not capture the policy in force when they
    /// were sealed, so a requirement added later fails this check.
    WitnessPolicy,
}

impl CheckKind {
    /// Stable check name used in serialized reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            CheckKind::RecordPresent => "record_present",
            CheckKind::ContentHash => "content_hash",
            CheckKind::SealCeiling => "seal_ceiling",
            CheckKind::WitnessPolicy => "witness_policy",
        }
    }
}

/// One pass/fail entry in an audit report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditCheck {
    pub kind: CheckKind,
    pub passed: bool,
    pub detail: String,
}

/// Overall audit verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// All checks passed.
    Valid,
    /// The stored content hash no longer matches the persisted fields.
    Tampered,
    /// Governance moved under the record since creation; integrity holds.
    PolicyDrift,
    /// The record cannot be fully verified (realm gone, or dispatch-time
    /// policy evidence missing).
    Incomplete,
}

/// The result of auditing one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub dispatch_id: DispatchId,
    pub checks: Vec<AuditCheck>,
    pub verdict: Verdict,
}

impl AuditReport {
    /// Whether every check passed.
    pub fn is_valid(&self) -> bool {
        self.verdict == Verdict::Valid
    }
}

/// Run the audit checks for a record against current registry state.
///
/// Pure over its inputs; the ledger supplies the stored record.
pub fn audit_record(record: &DispatchRecord, registry: &Registry) -> AuditReport {
    let mut checks = Vec::with_capacity(4);

    checks.push(AuditCheck {
        kind: CheckKind::RecordPresent,
        passed: true,
        detail: format!("record {} present", record.dispatch_id),
    });

    let hash_ok = record.hash_intact();
    checks.push(AuditCheck {
        kind: CheckKind::ContentHash,
        passed: hash_ok,
        detail: if hash_ok {
            format!("hash {} verified", record.content_hash)
        } else {
            format!(
                "stored hash {} does not match recomputation {}",
                record.content_hash,
                record.recompute_hash()
            )
        },
    });

    let realm = registry.realm(&record.realm_id);

    let (ceiling_ok, ceiling_detail) = match realm {
        Some(realm) => {
            let ceiling = realm.governance.max_seal_level;
            if record.seal <= ceiling {
                (true, format!("seal {} within current ceiling {}", record.seal, ceiling))
            } else {
                (
                    false,
                    format!("seal {} now exceeds realm ceiling {}", record.seal, ceiling),
                )
            }
        }
        None => (
            false,
            format!("realm {} no longer registered", record.realm_id),
        ),
    };
    checks.push(AuditCheck {
        kind: CheckKind::SealCeiling,
        passed: ceiling_ok,
        detail: ceiling_detail,
    });

    let (witness_ok, witness_detail) = match realm {
        Some(realm) if realm.governance.requires_witness => {
            if record.witnesses.is_empty() {
                (false, "witness required but none recorded".to_string())
            } else {
                (true, format!("{} witness(es) recorded", record.witnesses.len()))
            }
        }
        Some(_) => (true, "no witness requirement".to_string()),
        None => (false, "witness policy unverifiable without realm".to_string()),
    };
    checks.push(AuditCheck {
        kind: CheckKind::WitnessPolicy,
        passed: witness_ok,
        detail: witness_detail,
    });

    // Verdict precedence: tampering trumps everything; an unverifiable
    // record is incomplete; drift is reported last because integrity holds.
    let verdict = if !hash_ok {
        Verdict::Tampered
    } else if realm.is_none() || !witness_ok {
        Verdict::Incomplete
    } else if !ceiling_ok {
        Verdict::PolicyDrift
    } else {
        Verdict::Valid
    };

    AuditReport {
        dispatch_id: record.dispatch_id.clone(),
        checks,
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rite_ledger_core::{AuthorityLevel, DispatchDraft, RealmId, Seal};
    use rite_ledger_registry::RealmBuilder;

    fn realm_id() -> RealmId {
        RealmId::parse("PL-001").unwrap()
    }

    fn registry(max_seal: Seal, requires_witness: bool) -> Registry {
        let mut registry = Registry::new();
        registry.insert_realm(
            RealmBuilder::new(realm_id(), "Plenary", 0)
                .custodian("Custodian")
                .capsule("Sovereign Crown")
                .governance(AuthorityLevel::Sovereign, requires_witness, max_seal)
                .build(),
        );
        registry
    }

    fn record(seal: Seal) -> DispatchRecord {
        DispatchDraft::new("Custodian", realm_id(), "Sovereign Crown", "Crown.Invocation", seal)
            .witness("Herald")
            .seal_record(
                DispatchId::parse("DSP-2026-08-26-0A1B2C3D").unwrap(),
                1_756_166_400,
            )
    }

    #[test]
    fn test_valid_verdict() {
        let report = audit_record(&record(Seal::Eternal), &registry(Seal::Eternal, false));
        assert_eq!(report.verdict, Verdict::Valid);
        assert!(report.checks.iter().all(|c| c.passed));
    }

    #[test]
    fn test_tampered_verdict() {
        let mut tampered = record(Seal::Eternal);
        tampered.intent = "Crown.Usurpation".to_string();

        let report = audit_record(&tampered, &registry(Seal::Eternal, false));
        assert_eq!(report.verdict, Verdict::Tampered);
        let hash_check = report
            .checks
            .iter()
            .find(|c| c.kind == CheckKind::ContentHash)
            .unwrap();
        assert!(!hash_check.passed);
    }

    #[test]
    fn test_policy_drift_verdict() {
        // Ceiling lowered after the record was sealed.
        let report = audit_record(&record(Seal::Eternal), &registry(Seal::Sacred, false));
        assert_eq!(report.verdict, Verdict::PolicyDrift);
        // Integrity still holds.
        assert!(report
            .checks
            .iter()
            .find(|c| c.kind == CheckKind::ContentHash)
            .unwrap()
            .passed);
    }

    #[test]
    fn test_incomplete_when_realm_gone() {
        let report = audit_record(&record(Seal::Eternal), &Registry::new());
        assert_eq!(report.verdict, Verdict::Incomplete);
    }

    #[test]
    fn test_witness_requirement_added_after_seal_is_incomplete() {
        // Sealed without witnesses while the realm required none; the
        // registry now requires one. The check runs against current
        // policy, so the record can no longer be fully verified.
        let mut unwitnessed = record(Seal::Eternal);
        unwitnessed.witnesses.clear();

        let report = audit_record(&unwitnessed, &registry(Seal::Eternal, true));
        assert_eq!(report.verdict, Verdict::Incomplete);
        let witness_check = report
            .checks
            .iter()
            .find(|c| c.kind == CheckKind::WitnessPolicy)
            .unwrap();
        assert!(!witness_check.passed);
    }

    #[test]
    fn test_tampering_trumps_drift() {
        let mut tampered = record(Seal::Eternal);
        tampered.actor = "Imposter".to_string();

        let report = audit_record(&tampered, &registry(Seal::Sacred, false));
        assert_eq!(report.verdict, Verdict::Tampered);
    }
}
