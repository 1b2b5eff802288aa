//! Error types for the backup subsystem.

use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::BackupManifest;

/// Errors from a backup run.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Verification failed. The manifest carries the per-file faults and
    /// has already been written to the log directory for forensic review.
    #[error("backup integrity failure: {} fault(s) in run {}", .0.faults.len(), .0.run_seal)]
    Integrity(Box<BackupManifest>),

    /// The source path does not exist or is not a directory.
    #[error("bad backup source: {0}")]
    BadSource(PathBuf),

    #[error("backup I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("backup serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BackupError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for backup operations.
pub type Result<T> = std::result::Result<T, BackupError>;
