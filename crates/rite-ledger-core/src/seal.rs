//! Seals and authority levels: small totally-ordered governance sets.
//!
//! Both are compared through an explicit numeric rank, never by string,
//! so misordering cannot slip in through serialization.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// A ranked governance classification for a dispatch.
///
/// Ordering: `Temporal < Sacred < Immutable < Eternal`. A dispatch's seal
/// rank must not exceed its realm's `max_seal_level` at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seal {
    Temporal,
    Sacred,
    Immutable,
    Eternal,
}

impl Seal {
    /// Numeric rank for comparison. Higher outranks lower.
    pub const fn rank(self) -> u8 {
        match self {
            Seal::Temporal => 1,
            Seal::Sacred => 2,
            Seal::Immutable => 3,
            Seal::Eternal => 4,
        }
    }

    /// Stable name used in serialized documents and log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Seal::Temporal => "temporal",
            Seal::Sacred => "sacred",
            Seal::Immutable => "immutable",
            Seal::Eternal => "eternal",
        }
    }

    /// Parse from the stable name.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "temporal" => Ok(Seal::Temporal),
            "sacred" => Ok(Seal::Sacred),
            "immutable" => Ok(Seal::Immutable),
            "eternal" => Ok(Seal::Eternal),
            _ => Err(CoreError::InvalidSeal(s.to_string())),
        }
    }
}

impl PartialOrd for Seal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Seal {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Seal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authority required to invoke a capsule, ranked like [`Seal`].
///
/// Ordering: `Initiate < Keeper < Warden < Sovereign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorityLevel {
    Initiate,
    Keeper,
    Warden,
    Sovereign,
}

impl AuthorityLevel {
    /// Numeric rank for comparison.
    pub const fn rank(self) -> u8 {
        match self {
            AuthorityLevel::Initiate => 1,
            AuthorityLevel::Keeper => 2,
            AuthorityLevel::Warden => 3,
            AuthorityLevel::Sovereign => 4,
        }
    }

    /// Stable name used in serialized documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            AuthorityLevel::Initiate => "initiate",
            AuthorityLevel::Keeper => "keeper",
            AuthorityLevel::Warden => "warden",
            AuthorityLevel::Sovereign => "sovereign",
        }
    }

    /// Parse from the stable name.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "initiate" => Ok(AuthorityLevel::Initiate),
            "keeper" => Ok(AuthorityLevel::Keeper),
            "warden" => Ok(AuthorityLevel::Warden),
            "sovereign" => Ok(AuthorityLevel::Sovereign),
            _ => Err(CoreError::InvalidAuthority(s.to_string())),
        }
    }
}

impl PartialOrd for AuthorityLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AuthorityLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for AuthorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a dispatch record.
///
/// Records are immutable once created; `Replayed` appears only in the
/// derived replay projection, never as a rewrite of the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    Pending,
    Sealed,
    Replayed,
}
