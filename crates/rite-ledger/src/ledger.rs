//! The Ledger: unified API for the Rite system.
//!
//! Brings the registry, the store, and the derived read operations
//! (replay, audit) together behind one interface. `append` and
//! `grant_honor` are the only mutation points; everything else is a read.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use rite_ledger_core::{
    idgen, DispatchDraft, DispatchId, DispatchRecord, HonorDraft, HonorEntry, HonorId,
};
use rite_ledger_registry::{authorize, Denial, Registry};
use rite_ledger_store::{Cursor, InsertOutcome, ListFilter, Page, Store};

use crate::audit::{audit_record, AuditReport};
use crate::error::{LedgerError, Result};
use crate::replay::{build_trace, ReplayTrace};
use crate::request::{DispatchAck, DispatchRequest, HonorAck, HonorRequest};

/// Configuration for the Ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Prefix for dispatch ids.
    pub dispatch_prefix: String,
    /// Prefix for honor ids.
    pub honor_prefix: String,
    /// Bound on fresh id candidates per append.
    pub max_id_attempts: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            dispatch_prefix: "DSP".to_string(),
            honor_prefix: "HON".to_string(),
            max_id_attempts: idgen::MAX_ID_ATTEMPTS,
        }
    }
}

/// The main Ledger struct.
///
/// Provides a unified API for:
/// - Appending authorized dispatches
/// - Granting honors
/// - Querying records (get, cursor-paged list)
/// - Replaying a dispatch's canonical step trace
/// - Auditing a dispatch's integrity and policy compliance
pub struct Ledger<S: Store> {
    /// Registry state, read-only on the dispatch path.
    registry: Arc<Registry>,
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: LedgerConfig,
}

impl<S: Store> Ledger<S> {
    /// Create a new ledger instance.
    pub fn new(registry: Arc<Registry>, store: S, config: LedgerConfig) -> Self {
        Self {
            registry,
            store: Arc::new(store),
            config,
        }
    }

    /// Get the registry handle.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a dispatch to the ledger.
    ///
    /// Runs the authorization gate and the seal-ceiling check before any
    /// write; on denial, nothing is persisted and the id index is
    /// untouched. On success the record is durable before it is returned.
    pub async fn append(&self, request: DispatchRequest) -> Result<DispatchRecord> {
        authorize(
            &self.registry,
            &request.actor,
            &request.realm,
            &request.capsule,
            &request.witnesses,
        )?;

        // The gate has already established the realm exists.
        let realm = self
            .registry
            .realm(&request.realm)
            .ok_or_else(|| Denial::UnknownRealm(request.realm.clone()))?;
        let ceiling = realm.governance.max_seal_level;
        if request.seal > ceiling {
            return Err(LedgerError::SealExceedsCeiling {
                seal: request.seal,
                ceiling,
                realm: request.realm.clone(),
            });
        }

        let mut draft = DispatchDraft::new(
            request.actor,
            request.realm,
            request.capsule,
            request.intent,
            request.seal,
        )
        .input(request.input);
        draft.witnesses = request.witnesses;
        draft.supersedes = request.supersedes;

        let now = Utc::now();
        let timestamp = now.timestamp();

        for attempt in 1..=self.config.max_id_attempts {
            let candidate = idgen::propose_dispatch_id(&self.config.dispatch_prefix, now)?;
            let record = draft.clone().seal_record(candidate, timestamp);

            match self.store.insert_dispatch(&record).await? {
                InsertOutcome::Inserted => {
                    info!(dispatch_id = %record.dispatch_id, realm = %record.realm_id, "dispatch appended");
                    return Ok(record);
                }
                InsertOutcome::IdExists => {
                    warn!(
                        dispatch_id = %record.dispatch_id,
                        attempt,
                        "dispatch id collision, proposing a fresh candidate"
                    );
                }
            }
        }

        Err(LedgerError::IdGenerationExhausted {
            prefix: self.config.dispatch_prefix.clone(),
            attempts: self.config.max_id_attempts,
        })
    }

    /// Append a dispatch and return the request-layer acknowledgement.
    pub async fn submit(&self, request: DispatchRequest) -> Result<DispatchAck> {
        let record = self.append(request).await?;
        Ok(DispatchAck::from(&record))
    }

    /// Get a dispatch record by id.
    pub async fn get(&self, id: &DispatchId) -> Result<DispatchRecord> {
        self.store
            .get_dispatch(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    /// List dispatch records in insertion order, resumable via cursor.
    pub async fn list(
        &self,
        filter: &ListFilter,
        cursor: Option<&Cursor>,
        limit: usize,
    ) -> Result<Page> {
        Ok(self.store.list_dispatches(filter, cursor, limit).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Honor Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Grant an honor within a realm.
    ///
    /// Honors carry no capsule, so the gate here is the realm subset of
    /// the dispatch checks: active realm, custodian grantor, witness
    /// policy, seal ceiling.
    pub async fn grant_honor(&self, request: HonorRequest) -> Result<HonorEntry> {
        let realm = self
            .registry
            .realm(&request.realm)
            .ok_or_else(|| Denial::UnknownRealm(request.realm.clone()))
            .map_err(LedgerError::Denied)?;
        if !realm.is_active() {
            return Err(Denial::RealmInactive(request.realm.clone()).into());
        }
        if !realm.has_custodian(&request.granted_by) {
            return Err(Denial::ActorNotAuthorized {
                actor: request.granted_by.clone(),
                realm: request.realm.clone(),
            }
            .into());
        }
        if realm.governance.requires_witness && request.witnesses.is_empty() {
            return Err(Denial::WitnessRequired(request.realm.clone()).into());
        }
        let ceiling = realm.governance.max_seal_level;
        if request.seal > ceiling {
            return Err(LedgerError::SealExceedsCeiling {
                seal: request.seal,
                ceiling,
                realm: request.realm.clone(),
            });
        }

        let mut draft = HonorDraft::new(
            request.recipient,
            request.deed,
            request.insignia,
            request.authority,
            request.realm,
            request.seal,
        );
        draft.witnesses = request.witnesses;
        draft.dispatch_ref = request.dispatch_ref;

        let now = Utc::now();
        let created_at = now.timestamp();

        for attempt in 1..=self.config.max_id_attempts {
            let candidate = idgen::propose_honor_id(&self.config.honor_prefix, now)?;
            let entry = draft.clone().grant(candidate, created_at);

            match self.store.insert_honor(&entry).await? {
                InsertOutcome::Inserted => {
                    info!(honor_id = %entry.honor_id, realm = %entry.realm_id, "honor granted");
                    return Ok(entry);
                }
                InsertOutcome::IdExists => {
                    warn!(honor_id = %entry.honor_id, attempt, "honor id collision");
                }
            }
        }

        Err(LedgerError::IdGenerationExhausted {
            prefix: self.config.honor_prefix.clone(),
            attempts: self.config.max_id_attempts,
        })
    }

    /// Grant an honor and return the request-layer acknowledgement.
    pub async fn submit_honor(&self, request: HonorRequest) -> Result<HonorAck> {
        let entry = self.grant_honor(request).await?;
        Ok(HonorAck::from(&entry))
    }

    /// Get an honor entry by id.
    pub async fn get_honor(&self, id: &HonorId) -> Result<HonorEntry> {
        self.store
            .get_honor(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived Read Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replay a dispatch: the persisted, byte-identical step trace.
    ///
    /// The first call builds and persists the trace; every later call
    /// returns the stored bytes unchanged. See [`crate::replay`].
    pub async fn replay(&self, id: &DispatchId) -> Result<ReplayTrace> {
        let bytes = self.replay_bytes(id).await?;
        serde_json::from_slice(&bytes).map_err(|_| LedgerError::MalformedTrace(id.to_string()))
    }

    /// Replay a dispatch, returning the exact persisted trace bytes.
    pub async fn replay_bytes(&self, id: &DispatchId) -> Result<Vec<u8>> {
        if let Some(existing) = self.store.get_trace(id).await? {
            debug!(dispatch_id = %id, "returning existing replay trace");
            return Ok(existing);
        }

        let record = self.get(id).await?;
        let trace = build_trace(&record, Utc::now().timestamp());
        let bytes = serde_json::to_vec(&trace)
            .map_err(|_| LedgerError::MalformedTrace(id.to_string()))?;

        // First write wins; a racing replay sees the same durable bytes.
        Ok(self.store.put_trace_if_absent(id, &bytes).await?)
    }

    /// Audit a dispatch against current registry state.
    pub async fn audit(&self, id: &DispatchId) -> Result<AuditReport> {
        let record = self.get(id).await?;
        Ok(audit_record(&record, &self.registry))
    }
}
