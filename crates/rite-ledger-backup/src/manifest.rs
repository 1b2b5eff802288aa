//! Backup manifests and hash listings: the durable evidence of a run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of a backup run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupStatus {
    Success,
    Failed,
}

/// One per-file verification fault, named by the source-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityFault {
    /// The mapped destination file is absent.
    MissingFile { relative: String },

    /// Pre- and post-image hashes differ for the mapped pair.
    HashMismatch {
        relative: String,
        expected: String,
        actual: String,
    },
}

impl IntegrityFault {
    /// The source-relative path this fault names.
    pub fn relative(&self) -> &str {
        match self {
            IntegrityFault::MissingFile { relative } => relative,
            IntegrityFault::HashMismatch { relative, .. } => relative,
        }
    }
}

/// Record of one backup/verification run, written to the log directory
/// whether the run succeeded or failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupManifest {
    /// UTC run timestamp, second precision.
    pub run_timestamp: i64,

    /// Random per-run identifier; names the manifest and listing files.
    pub run_seal: String,

    pub source_path: PathBuf,
    pub destination_path: PathBuf,

    /// Number of source files enumerated and verified.
    pub file_count: usize,

    pub status: BackupStatus,
    pub integrity_verified: bool,

    /// Empty on success.
    #[serde(default)]
    pub faults: Vec<IntegrityFault>,
}

impl BackupManifest {
    /// File name this manifest is persisted under, keyed by run timestamp.
    pub fn file_name(&self) -> String {
        format!("manifest-{}-{}.json", self.run_timestamp, self.run_seal)
    }

    /// Write the manifest into the log directory.
    pub fn write_to(&self, log_dir: &Path) -> Result<PathBuf> {
        let path = log_dir.join(self.file_name());
        write_json(&path, self)?;
        Ok(path)
    }
}

/// Generate a random run seal: eight uppercase hex characters.
pub fn generate_run_seal() -> String {
    let mut bytes = [0u8; 4];
    OsRng.fill_bytes(&mut bytes);
    hex::encode_upper(bytes)
}

/// One phase's hash listing: source-relative path to blake3 hex.
///
/// Persisted pre- and post-image so a failed run leaves both sides on
/// disk for manual inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashListing {
    /// `"pre"` or `"post"`.
    pub phase: String,

    /// The canonical root the relative paths resolve against.
    pub root: PathBuf,

    pub entries: BTreeMap<String, String>,
}

impl HashListing {
    pub fn new(phase: &str, root: PathBuf, entries: BTreeMap<String, String>) -> Self {
        Self {
            phase: phase.to_string(),
            root,
            entries,
        }
    }

    /// Write the listing into the log directory under the run seal.
    pub fn write_to(&self, log_dir: &Path, run_seal: &str) -> Result<PathBuf> {
        let path = log_dir.join(format!("hashes-{}-{}.json", run_seal, self.phase));
        write_json(&path, self)?;
        Ok(path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, json).map_err(|e| crate::error::BackupError::io(path, e))
}
