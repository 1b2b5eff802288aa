//! # Rite Ledger
//!
//! The unified API for the Rite system - an append-only, tamper-evident
//! ledger of authorized ceremonial dispatches.
//!
//! ## Overview
//!
//! The Rite Ledger provides a portable, offline-first library for:
//!
//! - **Dispatches**: Immutable, content-hashed invocation events
//! - **Realms**: Governance domains with custodians, capsules, and seals
//! - **Honors**: Commendations recorded alongside dispatches
//! - **Replay**: Deterministic, persisted step traces (descriptive only)
//! - **Audit**: Post-hoc integrity and policy verification
//!
//! ## Key Concepts
//!
//! - **Dispatch record**: Immutable. Never edited. Amendments are new
//!   records that name their predecessor via `supersedes`.
//! - **Authorization gate**: Every append passes a fixed-order check
//!   (realm, capsule, actor, witness) before anything is written.
//! - **Seal**: Governance rank bounded by the realm's ceiling at creation.
//! - **Content hash**: Blake3 over a canonical encoding of the invocation
//!   fields; audit recomputes it to detect tampering.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rite_ledger::{DispatchRequest, Ledger, LedgerConfig};
//! use rite_ledger::core::{RealmId, Seal};
//! use rite_ledger::registry::Registry;
//! use rite_ledger::store::MemoryStore;
//! use std::sync::Arc;
//!
//! async fn example(registry: Registry) {
//!     let ledger = Ledger::new(Arc::new(registry), MemoryStore::new(), LedgerConfig::default());
//!
//!     let record = ledger
//!         .append(DispatchRequest {
//!             actor: "Custodian".into(),
//!             realm: RealmId::parse("PL-001").unwrap(),
//!             capsule: "Sovereign Crown".into(),
//!             intent: "Crown.Invocation".into(),
//!             input: b"offering".to_vec().into(),
//!             seal: Seal::Eternal,
//!             witnesses: vec!["Herald".into()],
//!             supersedes: None,
//!         })
//!         .await
//!         .unwrap();
//!
//!     let report = ledger.audit(&record.dispatch_id).await.unwrap();
//!     assert!(report.is_valid());
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `rite_ledger::core` - Core primitives (DispatchRecord, Seal, etc.)
//! - `rite_ledger::registry` - Realms, capsules, and the authorization gate
//! - `rite_ledger::store` - Storage abstraction, memory and file backends

pub mod audit;
pub mod error;
pub mod ledger;
pub mod replay;
pub mod request;

// Re-export component crates
pub use rite_ledger_core as core;
pub use rite_ledger_registry as registry;
pub use rite_ledger_store as store;

// Re-export main types for convenience
pub use audit::{AuditCheck, AuditReport, CheckKind, Verdict};
pub use error::{LedgerError, Result};
pub use ledger::{Ledger, LedgerConfig};
pub use replay::{ReplayStage, ReplayTrace, TraceStep};
pub use request::{DispatchAck, DispatchRequest, HonorAck, HonorRequest};

// Re-export commonly used core types
pub use rite_ledger_core::{
    AuthorityLevel, ContentHash, DispatchDraft, DispatchId, DispatchRecord, DispatchStatus,
    HonorEntry, HonorId, RealmId, Seal,
};
