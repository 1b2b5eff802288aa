//! Store trait: the abstract interface for ledger persistence.
//!
//! The trait keeps the ledger storage-agnostic. Implementations include
//! the file-backed store (primary, one document per record) and an
//! in-memory store for tests.

use async_trait::async_trait;

use rite_ledger_core::{DispatchId, DispatchRecord, HonorEntry, HonorId, RealmId};

use crate::error::Result;

/// Result of inserting a record.
///
/// Insertion under an already-known id is reported as an outcome, not an
/// error: the append path reacts to it by proposing a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Record was inserted successfully.
    Inserted,
    /// A record with this id already exists; nothing was written.
    IdExists,
}

/// Filter for dispatch listing. All present fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub realm: Option<RealmId>,
    pub capsule: Option<String>,
    /// Inclusive lower bound on the record timestamp (unix seconds).
    pub since: Option<i64>,
}

/// Restartable position in a listing, keyed on `(timestamp, dispatch_id)`.
///
/// Pages resume strictly after the cursor, so concurrent appends (which
/// always sort at-or-after the live tail) are neither missed nor
/// duplicated across pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub timestamp: i64,
    pub dispatch_id: DispatchId,
}

/// One page of a dispatch listing, in insertion order.
#[derive(Debug, Clone)]
pub struct Page {
    pub records: Vec<DispatchRecord>,
    /// Cursor for the next page; `None` when the listing is exhausted.
    pub next: Option<Cursor>,
}

/// The Store trait: async interface for ledger persistence.
///
/// # Contract
///
/// - **Single mutation point**: `insert_dispatch`, `insert_honor`, and
///   `put_trace_if_absent` are internally serialized; a record becomes
///   visible atomically or not at all.
/// - **Id uniqueness**: inserts under a known id write nothing and report
///   `IdExists`.
/// - **Lock-free reads**: `get`/`has`/`list` never wait on the append
///   serialization and observe a consistent as-of-call snapshot.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a dispatch record. The only write path for dispatches.
    async fn insert_dispatch(&self, record: &DispatchRecord) -> Result<InsertOutcome>;

    /// Get a dispatch record by id.
    async fn get_dispatch(&self, id: &DispatchId) -> Result<Option<DispatchRecord>>;

    /// Check whether a dispatch id exists.
    async fn has_dispatch(&self, id: &DispatchId) -> Result<bool>;

    /// List dispatch records in `(timestamp, dispatch_id)` order.
    ///
    /// Returns at most `limit` records strictly after `cursor` that match
    /// `filter`, plus the cursor for the following page.
    async fn list_dispatches(
        &self,
        filter: &ListFilter,
        cursor: Option<&Cursor>,
        limit: usize,
    ) -> Result<Page>;

    /// Total number of dispatch records.
    async fn dispatch_count(&self) -> Result<usize>;

    // ─────────────────────────────────────────────────────────────────────────
    // Honor Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert an honor entry. The only write path for honors.
    async fn insert_honor(&self, entry: &HonorEntry) -> Result<InsertOutcome>;

    /// Get an honor entry by id.
    async fn get_honor(&self, id: &HonorId) -> Result<Option<HonorEntry>>;

    /// Check whether an honor id exists.
    async fn has_honor(&self, id: &HonorId) -> Result<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Replay Trace Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the persisted replay trace bytes for a dispatch, if any.
    async fn get_trace(&self, id: &DispatchId) -> Result<Option<Vec<u8>>>;

    /// Persist trace bytes unless a trace already exists.
    ///
    /// Returns the bytes that are now durable: the existing trace wins a
    /// race, which is what makes replay byte-idempotent.
    async fn put_trace_if_absent(&self, id: &DispatchId, bytes: &[u8]) -> Result<Vec<u8>>;
}
