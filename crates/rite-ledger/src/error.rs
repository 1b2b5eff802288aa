//! Error types for the ledger facade.
//!
//! The taxonomy keeps every failure typed and inspectable: a denial is
//! never collapsed into a generic error, and `NotFound` is distinct from
//! any authorization failure.

use thiserror::Error;

use rite_ledger_core::{CoreError, RealmId, Seal};
use rite_ledger_registry::Denial;
use rite_ledger_store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The authorization gate refused the dispatch. No write occurred.
    #[error("denied: {0}")]
    Denied(#[from] Denial),

    /// Every id candidate collided. Fatal for this request; the caller may
    /// retry the whole operation, but an id is never reused or truncated.
    #[error("id generation exhausted after {attempts} attempts for prefix {prefix:?}")]
    IdGenerationExhausted { prefix: String, attempts: u32 },

    /// The requested seal outranks the realm's governance ceiling.
    #[error("seal {seal} exceeds realm {realm} ceiling {ceiling}")]
    SealExceedsCeiling {
        seal: Seal,
        ceiling: Seal,
        realm: RealmId,
    },

    /// Unknown dispatch or honor id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Core primitive error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A persisted trace could not be decoded.
    #[error("malformed replay trace for {0}")]
    MalformedTrace(String),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
