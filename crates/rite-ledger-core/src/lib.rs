//! # Rite Ledger Core
//!
//! Pure primitives for the Rite Ledger: dispatch records, honors, seals,
//! identifier generation, and canonical content hashing.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over the ledger's data structures.
//!
//! ## Key Types
//!
//! - [`DispatchRecord`] - One authorized invocation event, immutable once sealed
//! - [`DispatchId`] / [`HonorId`] - Date-prefixed, collision-checked identifiers
//! - [`Seal`] / [`AuthorityLevel`] - Totally ordered governance classifications
//! - [`ContentHash`] - Blake3 over the canonical content bytes
//!
//! ## Canonicalization
//!
//! Content hashes are computed over deterministic CBOR. See [`canonical`].

pub mod canonical;
pub mod error;
pub mod honor;
pub mod idgen;
pub mod record;
pub mod seal;
pub mod types;

pub use canonical::{canonical_content_bytes, content_hash, DispatchContent};
pub use error::CoreError;
pub use honor::{HonorDraft, HonorEntry};
pub use idgen::{propose_dispatch_id, propose_honor_id, propose_id, MAX_ID_ATTEMPTS};
pub use record::{DispatchDraft, DispatchRecord};
pub use seal::{AuthorityLevel, DispatchStatus, Seal};
pub use types::{ContentHash, DispatchId, HonorId, RealmId};
