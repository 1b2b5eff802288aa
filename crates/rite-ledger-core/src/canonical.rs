//! Canonical CBOR encoding for deterministic content hashing.
//!
//! Implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are i64 seconds)
//!
//! The canonical encoding is critical: the same dispatch content must
//! produce identical bytes (and thus an identical hash) on every platform,
//! or tamper detection turns into false alarms.

use ciborium::value::Value;

use crate::types::ContentHash;

/// Content field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const ACTOR: u64 = 0;
    pub const REALM: u64 = 1;
    pub const CAPSULE: u64 = 2;
    pub const INTENT: u64 = 3;
    pub const INPUT: u64 = 4;
    pub const TIMESTAMP: u64 = 5;
}

/// The hashed fields of a dispatch, in canonical order.
///
/// Identifier and status are deliberately excluded: the id embeds random
/// bytes and the hash must be recomputable from the invocation content
/// alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchContent<'a> {
    pub actor: &'a str,
    pub realm: &'a str,
    pub capsule: &'a str,
    pub intent: &'a str,
    pub input: &'a [u8],
    /// Unix seconds, UTC. Second precision is part of the contract.
    pub timestamp: i64,
}

/// Encode dispatch content to canonical CBOR bytes.
pub fn canonical_content_bytes(content: &DispatchContent<'_>) -> Vec<u8> {
    let entries = vec![
        (
            Value::Integer(keys::ACTOR.into()),
            Value::Text(content.actor.to_string()),
        ),
        (
            Value::Integer(keys::REALM.into()),
            Value::Text(content.realm.to_string()),
        ),
        (
            Value::Integer(keys::CAPSULE.into()),
            Value::Text(content.capsule.to_string()),
        ),
        (
            Value::Integer(keys::INTENT.into()),
            Value::Text(content.intent.to_string()),
        ),
        (
            Value::Integer(keys::INPUT.into()),
            Value::Bytes(content.input.to_vec()),
        ),
        (
            Value::Integer(keys::TIMESTAMP.into()),
            Value::Integer(content.timestamp.into()),
        ),
    ];

    let mut buf = Vec::new();
    encode_value_to(&mut buf, &Value::Map(entries));
    buf
}

/// Hash dispatch content: Blake3 over the canonical bytes.
pub fn content_hash(content: &DispatchContent<'_>) -> ContentHash {
    ContentHash::hash(&canonical_content_bytes(content))
}

/// Recursively encode a CBOR value with deterministic rules.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => {
            encode_uint(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Value::Text(s) => {
            encode_uint(buf, 3, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Array(arr) => {
            encode_uint(buf, 4, arr.len() as u64);
            for item in arr {
                encode_value_to(buf, item);
            }
        }
        Value::Map(entries) => encode_map_canonical(buf, entries),
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Float(_) => panic!("floats not supported in canonical encoding"),
        _ => panic!("unsupported CBOR value type"),
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type, smallest form.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a map canonically (major type 5), keys sorted by encoded bytes.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}
