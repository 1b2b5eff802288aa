//! # Rite Ledger Store
//!
//! Storage abstraction for the Rite Ledger. Provides a trait-based
//! interface for record persistence with file-backed and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store module abstracts persistence behind the [`Store`] trait,
//! keeping the ledger storage-agnostic. The primary implementation is
//! [`FileStore`] (one JSON document per record, atomic tmp-write + rename),
//! with [`MemoryStore`] for tests.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`FileStore`] - Durable record-per-file storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`InsertOutcome`] - Result of inserting a record
//! - [`Cursor`] / [`Page`] - Restartable listing keyed on (timestamp, id)
//!
//! ## Design Notes
//!
//! - **Single mutation point**: inserts are serialized behind one lock;
//!   a record becomes visible atomically or not at all
//! - **Id collisions are outcomes, not errors**: `IdExists` tells the
//!   append path to propose a fresh id
//! - **Lock-free reads**: gets and listings never wait on appends

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{Cursor, InsertOutcome, ListFilter, Page, Store};
