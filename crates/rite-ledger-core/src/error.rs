//! Error types for the Rite Ledger core.

use thiserror::Error;

/// Errors from core primitive construction and encoding.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid realm id: {0}")]
    InvalidRealmId(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid id prefix (uppercase ASCII required): {0}")]
    InvalidIdPrefix(String),

    #[error("invalid content hash: {0}")]
    InvalidHash(String),

    #[error("invalid seal: {0}")]
    InvalidSeal(String),

    #[error("invalid authority level: {0}")]
    InvalidAuthority(String),
}
