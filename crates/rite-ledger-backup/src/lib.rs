//! # Rite Ledger Backup
//!
//! Independent integrity backup subsystem for the Rite Ledger: a
//! content-addressed mirror-and-verify pipeline over the ledger's
//! record-per-file storage directory.
//!
//! The pipeline hashes the source tree, mirrors it, re-hashes the
//! destination, and compares pair-by-pair through canonical-path
//! mapping. Verified destination files are sealed read-only; any missing
//! file or mismatch fails the run with a forensic manifest.
//!
//! Runs out-of-band as a batch job (see the `rite-backup` binary) and
//! holds no lock against live writers: a record appended mid-run simply
//! appears in a later run.

pub mod error;
pub mod manifest;
pub mod snapshot;

pub use error::{BackupError, Result};
pub use manifest::{
    generate_run_seal, BackupManifest, BackupStatus, HashListing, IntegrityFault,
};
pub use snapshot::snapshot;
