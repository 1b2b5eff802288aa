//! Strong type definitions for the Rite Ledger.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// A realm identifier, pattern `[A-Z]{2}-\d{3}` (e.g. `PL-001`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealmId(String);

impl RealmId {
    /// Parse and validate a realm identifier.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let bytes = s.as_bytes();
        let ok = bytes.len() == 6
            && bytes[0].is_ascii_uppercase()
            && bytes[1].is_ascii_uppercase()
            && bytes[2] == b'-'
            && bytes[3..].iter().all(u8::is_ascii_digit);
        if !ok {
            return Err(CoreError::InvalidRealmId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RealmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RealmId({})", self.0)
    }
}

impl fmt::Display for RealmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RealmId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A dispatch identifier: `{PREFIX}-{YYYY}-{MM}-{DD}-{8 uppercase hex}`.
///
/// Globally unique across the ledger's lifetime. The hex suffix comes from
/// a cryptographically random source; see [`crate::idgen`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DispatchId(String);

impl DispatchId {
    /// Parse and validate a dispatch identifier.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        validate_prefixed_id(s)?;
        Ok(Self(s.to_string()))
    }

    /// Construct without validation. Only for callers that just built the
    /// string through [`crate::idgen::propose_id`].
    pub(crate) fn from_generated(s: String) -> Self {
        Self(s)
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The prefix portion (everything before the date).
    pub fn prefix(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl fmt::Debug for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DispatchId({})", self.0)
    }
}

impl fmt::Display for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DispatchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An honor identifier, same wire shape as [`DispatchId`] under its own prefix.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HonorId(String);

impl HonorId {
    /// Parse and validate an honor identifier.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        validate_prefixed_id(s)?;
        Ok(Self(s.to_string()))
    }

    pub(crate) fn from_generated(s: String) -> Self {
        Self(s)
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HonorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HonorId({})", self.0)
    }
}

impl fmt::Display for HonorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate the `{PREFIX}-{YYYY}-{MM}-{DD}-{8 hex}` shape.
fn validate_prefixed_id(s: &str) -> Result<(), CoreError> {
    let parts: Vec<&str> = s.split('-').collect();
    let [prefix, year, month, day, suffix] = parts.as_slice() else {
        return Err(CoreError::InvalidId(s.to_string()));
    };
    let ok = !prefix.is_empty()
        && prefix.bytes().all(|b| b.is_ascii_uppercase())
        && year.len() == 4
        && year.bytes().all(|b| b.is_ascii_digit())
        && month.len() == 2
        && month.bytes().all(|b| b.is_ascii_digit())
        && day.len() == 2
        && day.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == 8
        && suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));
    if !ok {
        return Err(CoreError::InvalidId(s.to_string()));
    }
    Ok(())
}

/// A 32-byte Blake3 content hash over a record's canonical bytes.
///
/// Two records with identical canonical content produce the same hash;
/// any persisted mutation breaks the equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Hash arbitrary bytes.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|_| CoreError::InvalidHash(s.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidHash(s.to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for ContentHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
