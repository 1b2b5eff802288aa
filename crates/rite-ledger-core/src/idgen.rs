//! Date-prefixed identifier generation.
//!
//! Identifiers have the shape `{PREFIX}-{YYYY}-{MM}-{DD}-{8 hex}`, where
//! the suffix is drawn from the OS random source. Generation only proposes
//! a candidate; uniqueness is enforced by the store's insert path, and the
//! ledger retries a bounded number of times on collision.

use chrono::{DateTime, Datelike, Utc};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CoreError;
use crate::types::{DispatchId, HonorId};

/// How many fresh candidates the append path tries before giving up.
///
/// With 32 random bits per candidate, exhausting this bound means either a
/// broken random source or an astronomically full day of dispatches; the
/// caller surfaces it as a fatal condition rather than reusing an id.
pub const MAX_ID_ATTEMPTS: u32 = 5;

/// Propose a candidate identifier string for the given prefix and instant.
pub fn propose_id(prefix: &str, at: DateTime<Utc>) -> Result<String, CoreError> {
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(CoreError::InvalidIdPrefix(prefix.to_string()));
    }

    let mut suffix = [0u8; 4];
    OsRng.fill_bytes(&mut suffix);

    Ok(format!(
        "{}-{:04}-{:02}-{:02}-{}",
        prefix,
        at.year(),
        at.month(),
        at.day(),
        hex::encode_upper(suffix),
    ))
}

/// Propose a candidate dispatch id.
pub fn propose_dispatch_id(prefix: &str, at: DateTime<Utc>) -> Result<DispatchId, CoreError> {
    propose_id(prefix, at).map(DispatchId::from_generated)
}

/// Propose a candidate honor id.
pub fn propose_honor_id(prefix: &str, at: DateTime<Utc>) -> Result<HonorId, CoreError> {
    propose_id(prefix, at).map(HonorId::from_generated)
}
