//! End-to-end ledger scenarios over both store backends.
//!
//! These exercise the full pipeline: gate, ceiling, append, listing,
//! replay idempotence, honors, and audit verdicts against on-disk
//! tampering.

use std::sync::Arc;

use rite_ledger::registry::{Capsule, RealmBuilder, RealmStatus, Registry};
use rite_ledger::store::{Cursor, FileStore, ListFilter, MemoryStore, Store};
use rite_ledger::{
    AuthorityLevel, DispatchRequest, HonorRequest, Ledger, LedgerConfig, LedgerError, RealmId,
    Seal, Verdict,
};
use rite_ledger_registry::Denial;

fn plenary_id() -> RealmId {
    RealmId::parse("PL-001").unwrap()
}

/// A registry with one active, witnessed, sovereign realm and one
/// dormant realm.
fn ceremonial_registry() -> Registry {
    let mut registry = Registry::new();
    registry.insert_realm(
        RealmBuilder::new(plenary_id(), "Plenary", 1_756_000_000)
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
    registry
}

fn memory_ledger() -> Ledger<MemoryStore> {
    Ledger::new(
        Arc::new(ceremonial_registry()),
        MemoryStore::new(),
        LedgerConfig::default(),
    )
}

fn crown_request() -> DispatchRequest {
    DispatchRequest {
        actor: "Custodian".into(),
        realm: plenary_id(),
        capsule: "Sovereign Crown".into(),
        intent: "Crown.Invocation".into(),
        input: b"offering".to_vec().into(),
        seal: Seal::Eternal,
        witnesses: vec!["Herald".into()],
        supersedes: None,
    }
}

#[tokio::test]
async fn test_crown_dispatch_end_to_end() {
    let ledger = memory_ledger();

    let record = ledger.append(crown_request()).await.unwrap();
    assert!(record.dispatch_id.as_str().starts_with("DSP-"));
    assert!(record.hash_intact());

    let fetched = ledger.get(&record.dispatch_id).await.unwrap();
    assert_eq!(fetched, record);

    let report = ledger.audit(&record.dispatch_id).await.unwrap();
    assert_eq!(report.verdict, Verdict::Valid);
    assert!(report.is_valid());
}

#[tokio::test]
async fn test_intruder_leaves_no_trace() {
    let ledger = memory_ledger();

    let err = ledger
        .append(DispatchRequest {
            actor: "Intruder".into(),
            ..crown_request()
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Denied(Denial::ActorNotAuthorized { .. })
    ));
    assert_eq!(ledger.store().dispatch_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_denials_are_specific_and_ordered() {
    let ledger = memory_ledger();

    // Unknown realm reported before any other failure in the request.
    let err = ledger
        .append(DispatchRequest {
            actor: "Intruder".into(),
            realm: RealmId::parse("ZZ-999").unwrap(),
            witnesses: vec![],
            ..crown_request()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Denied(Denial::UnknownRealm(_))));

    // Dormant realm.
    let err = ledger
        .append(DispatchRequest {
            actor: "Archivist".into(),
            realm: RealmId::parse("AR-002").unwrap(),
            capsule: "Lesser Sigil".into(),
            seal: Seal::Temporal,
            witnesses: vec![],
            ..crown_request()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Denied(Denial::RealmInactive(_))));

    // Capsule not permitted in the realm, even for a custodian.
    let err = ledger
        .append(DispatchRequest {
            capsule: "Forbidden Rite".into(),
            ..crown_request()
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Denied(Denial::CapsuleNotPermitted { .. })
    ));

    // Witness policy checked last.
    let err = ledger
        .append(DispatchRequest {
            witnesses: vec![],
            ..crown_request()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Denied(Denial::WitnessRequired(_))));
}

#[tokio::test]
async fn test_seal_ceiling_enforced_without_write() {
    let mut registry = Registry::new();
    registry.insert_realm(
        RealmBuilder::new(plenary_id(), "Plenary", 1_756_000_000)
            .custodian("Custodian")
            .capsule("Lesser Sigil")
            .governance(AuthorityLevel::Sovereign, false, Seal::Sacred)
            .build(),
    );
    let ledger = Ledger::new(Arc::new(registry), MemoryStore::new(), LedgerConfig::default());

    let err = ledger
        .append(DispatchRequest {
            capsule: "Lesser Sigil".into(),
            seal: Seal::Eternal,
            witnesses: vec![],
            ..crown_request()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::SealExceedsCeiling { .. }));
    assert_eq!(ledger.store().dispatch_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_concurrent_appends_all_distinct() {
    let ledger = Arc::new(memory_ledger());

    let mut handles = Vec::new();
    for i in 0..16 {
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            ledger
                .append(DispatchRequest {
                    intent: format!("Crown.Invocation.{i}"),
                    ..crown_request()
                })
                .await
                .unwrap()
        }));
    }

    let mut ids = std::collections::HashSet::new();
    for handle in handles {
        let record = handle.await.unwrap();
        assert!(ids.insert(record.dispatch_id.as_str().to_string()));
    }

    assert_eq!(ids.len(), 16);
    assert_eq!(ledger.store().dispatch_count().await.unwrap(), 16);
}

#[tokio::test]
async fn test_listing_pages_cover_everything_once() {
    let ledger = memory_ledger();
    for i in 0..10 {
        ledger
            .append(DispatchRequest {
                intent: format!("Crown.Invocation.{i}"),
                ..crown_request()
            })
            .await
            .unwrap();
    }

    let filter = ListFilter::default();
    let mut seen = Vec::new();
    let mut cursor: Option<Cursor> = None;
    loop {
        let page = ledger.list(&filter, cursor.as_ref(), 3).await.unwrap();
        seen.extend(page.records.iter().map(|r| r.dispatch_id.clone()));
        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    assert_eq!(seen.len(), 10);
    let unique: std::collections::HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), 10);
}

#[tokio::test]
async fn test_replay_is_byte_idempotent() {
    let ledger = memory_ledger();
    let record = ledger.append(crown_request()).await.unwrap();

    let first = ledger.replay_bytes(&record.dispatch_id).await.unwrap();
    let second = ledger.replay_bytes(&record.dispatch_id).await.unwrap();
    assert_eq!(first, second);

    let trace = ledger.replay(&record.dispatch_id).await.unwrap();
    assert_eq!(trace.dispatch_id, record.dispatch_id);
    assert_eq!(trace.steps.len(), 4);
    assert!(trace.steps.iter().all(|s| s.completed));

    // The stored record is untouched by replay.
    let fetched = ledger.get(&record.dispatch_id).await.unwrap();
    assert_eq!(fetched, record);
}

#[tokio::test]
async fn test_replay_unknown_dispatch() {
    let ledger = memory_ledger();
    let missing = rite_ledger::DispatchId::parse("DSP-2026-08-26-DEADBEEF").unwrap();

    let err = ledger.replay(&missing).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn test_honor_flow() {
    let ledger = memory_ledger();
    let record = ledger.append(crown_request()).await.unwrap();

    let entry = ledger
        .grant_honor(HonorRequest {
            granted_by: "Custodian".into(),
            recipient: "Herald".into(),
            deed: "Kept the vigil".into(),
            insignia: "Silver Branch".into(),
            authority: AuthorityLevel::Warden,
            realm: plenary_id(),
            seal: Seal::Sacred,
            witnesses: vec!["Archivist".into()],
            dispatch_ref: Some(record.dispatch_id.clone()),
        })
        .await
        .unwrap();

    assert!(entry.honor_id.as_str().starts_with("HON-"));
    let fetched = ledger.get_honor(&entry.honor_id).await.unwrap();
    assert_eq!(fetched.dispatch_ref, Some(record.dispatch_id));
}

#[tokio::test]
async fn test_honor_denied_for_non_custodian() {
    let ledger = memory_ledger();

    let err = ledger
        .grant_honor(HonorRequest {
            granted_by: "Pretender".into(),
            recipient: "Herald".into(),
            deed: "None".into(),
            insignia: "None".into(),
            authority: AuthorityLevel::Initiate,
            realm: plenary_id(),
            seal: Seal::Temporal,
            witnesses: vec!["Archivist".into()],
            dispatch_ref: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Denied(Denial::ActorNotAuthorized { .. })
    ));
}

#[tokio::test]
async fn test_on_disk_tampering_detected_by_audit() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(ceremonial_registry());
    let store = FileStore::open(dir.path()).unwrap();
    let ledger = Ledger::new(Arc::clone(&registry), store, LedgerConfig::default());

    let record = ledger.append(crown_request()).await.unwrap();
    assert_eq!(
        ledger.audit(&record.dispatch_id).await.unwrap().verdict,
        Verdict::Valid
    );

    // Rewrite the record file with a different intent but the stored hash.
    let path = ledger
        .store()
        .dispatch_dir()
        .join(format!("{}.json", record.dispatch_id.as_str()));
    let text = std::fs::read_to_string(&path).unwrap();
    let tampered = text.replace("Crown.Invocation", "Crown.Usurpation");
    assert_ne!(text, tampered);
    std::fs::write(&path, tampered).unwrap();

    let report = ledger.audit(&record.dispatch_id).await.unwrap();
    assert_eq!(report.verdict, Verdict::Tampered);
}

#[tokio::test]
async fn test_policy_drift_after_governance_change() {
    // Same store, registry reloaded with a lowered ceiling.
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let ledger = Ledger::new(
        Arc::new(ceremonial_registry()),
        store,
        LedgerConfig::default(),
    );
    let record = ledger.append(crown_request()).await.unwrap();

    let mut drifted = Registry::new();
    drifted.insert_realm(
        RealmBuilder::new(plenary_id(), "Plenary", 1_756_000_000)
            .custodian("Custodian")
            .capsule("Sovereign Crown")
            .governance(AuthorityLevel::Sovereign, true, Seal::Sacred)
            .build(),
    );
    let reopened = FileStore::open(dir.path()).unwrap();
    let ledger = Ledger::new(Arc::new(drifted), reopened, LedgerConfig::default());

    let report = ledger.audit(&record.dispatch_id).await.unwrap();
    assert_eq!(report.verdict, Verdict::PolicyDrift);
}

#[tokio::test]
async fn test_superseding_dispatch_links_predecessor() {
    let ledger = memory_ledger();
    let first = ledger.append(crown_request()).await.unwrap();

    let amended = ledger
        .append(DispatchRequest {
            intent: "Crown.Invocation.Amended".into(),
            supersedes: Some(first.dispatch_id.clone()),
            ..crown_request()
        })
        .await
        .unwrap();

    assert_eq!(amended.supersedes, Some(first.dispatch_id.clone()));
    // The original is still present and unmodified.
    assert_eq!(ledger.get(&first.dispatch_id).await.unwrap(), first);
}
