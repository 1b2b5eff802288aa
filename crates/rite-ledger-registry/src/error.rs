//! Error types for the registry and authorization gate.

use std::path::PathBuf;

use thiserror::Error;

use rite_ledger_core::RealmId;

/// An authorization denial: the single most specific reason a dispatch
/// was refused. Never collapsed into a generic error by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("unknown realm: {0}")]
    UnknownRealm(RealmId),

    #[error("realm is not active: {0}")]
    RealmInactive(RealmId),

    #[error("capsule {capsule:?} is not permitted in realm {realm}")]
    CapsuleNotPermitted { capsule: String, realm: RealmId },

    #[error("actor {actor:?} is not authorized in realm {realm}")]
    ActorNotAuthorized { actor: String, realm: RealmId },

    #[error("realm {0} requires at least one witness")]
    WitnessRequired(RealmId),
}

/// Errors from registry document handling (administrative path).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed registry document: {0}")]
    Malformed(String),
}
