//! Canonical CBOR encoding of a block's digest input.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are whole seconds)
//!
//! The digest input covers every stored field of a block except the hash
//! itself, so the same block content always digests to the same hash.

use ciborium::value::Value;

use crate::block::Block;
use crate::error::CoreError;

/// Digest input field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const HEIGHT: u64 = 0;
    pub const TIMESTAMP: u64 = 1;
    pub const PREVIOUS_HASH: u64 = 2;
    pub const BODY: u64 = 3;
}

/// Encode the hashed fields of a block to canonical CBOR bytes.
///
/// The stored `hash` field is never part of the input.
pub fn digest_input(block: &Block) -> Result<Vec<u8>, CoreError> {
    let value = block_to_cbor_value(block);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value)?;
    Ok(buf)
}

/// Convert the hashed fields to a CBOR Value (map with integer keys).
fn block_to_cbor_value(block: &Block) -> Value {
    let previous = match &block.previous_hash {
        Some(hash) => Value::Bytes(hash.0.to_vec()),
        None => Value::Null,
    };

    Value::Map(vec![
        (
            Value::Integer(keys::HEIGHT.into()),
            Value::Integer(block.height.into()),
        ),
        (
            Value::Integer(keys::TIMESTAMP.into()),
            Value::Integer(block.timestamp.into()),
        ),
        (Value::Integer(keys::PREVIOUS_HASH.into()), previous),
        (
            Value::Integer(keys::BODY.into()),
            Value::Text(block.body.clone()),
        ),
    ])
}

/// Encode a CBOR value.
///
/// Only the shapes a digest input contains are accepted: unsigned
/// integers, byte and text strings, null, and maps of those. Anything else
/// is an encoding error.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => {
            let n = u64::try_from(*i).map_err(|_| {
                CoreError::Encoding("negative integers not supported in digest input".into())
            })?;
            encode_uint(buf, 0, n);
        }
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Null => buf.push(0xf6),
        Value::Float(_) => {
            return Err(CoreError::Encoding(
                "floats not supported in canonical encoding".into(),
            ))
        }
        _ => {
            return Err(CoreError::Encoding(
                "unsupported CBOR value type".into(),
            ))
        }
    }
    Ok(())
}

/// Encode an unsigned integer with the given major type.
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
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut pairs: Vec<(Vec<u8>, &Value)> = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        pairs.push((key_buf, v));
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockHash;

    fn sample_block() -> Block {
        Block {
            height: 3,
            timestamp: 1_700_000_000,
            previous_hash: Some(BlockHash::from_bytes([0x11; 32])),
            hash: None,
            body: "a16161".into(),
        }
    }

    #[test]
    fn test_digest_input_deterministic() {
        let block = sample_block();
        assert_eq!(digest_input(&block).unwrap(), digest_input(&block).unwrap());
    }

    #[test]
    fn test_digest_input_ignores_stored_hash() {
        let block = sample_block();
        let mut hashed = block.clone();
        hashed.hash = Some(BlockHash::from_bytes([0xff; 32]));
        assert_eq!(digest_input(&block).unwrap(), digest_input(&hashed).unwrap());
    }

    #[test]
    fn test_digest_input_covers_every_field() {
        let base = digest_input(&sample_block()).unwrap();

        let mut b = sample_block();
        b.height = 4;
        assert_ne!(base, digest_input(&b).unwrap());

        let mut b = sample_block();
        b.timestamp += 1;
        assert_ne!(base, digest_input(&b).unwrap());

        let mut b = sample_block();
        b.previous_hash = None;
        assert_ne!(base, digest_input(&b).unwrap());

        let mut b = sample_block();
        b.body.push('0');
        assert_ne!(base, digest_input(&b).unwrap());
    }

    #[test]
    fn test_genesis_layout() {
        let block = Block {
            height: 0,
            timestamp: 5,
            previous_hash: None,
            hash: None,
            body: "ab".into(),
        };
        let bytes = digest_input(&block).unwrap();
        assert_eq!(
            bytes,
            vec![0xa4, 0x00, 0x00, 0x01, 0x05, 0x02, 0xf6, 0x03, 0x62, b'a', b'b']
        );
    }

    #[test]
    fn test_integer_encoding() {
        let mut buf = Vec::new();

        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        buf.clear();
        encode_uint(&mut buf, 0, 65535);
        assert_eq!(buf, vec![0x19, 0xff, 0xff]);

        buf.clear();
        encode_uint(&mut buf, 0, 1_700_000_000);
        assert_eq!(buf, vec![0x1a, 0x65, 0x53, 0xf1, 0x00]);
    }

    #[test]
    fn test_map_key_ordering() {
        let mut buf = Vec::new();
        let entries = vec![
            (Value::Integer(3.into()), Value::Integer(30.into())),
            (Value::Integer(0.into()), Value::Integer(0.into())),
        ];
        encode_map_canonical(&mut buf, &entries).unwrap();
        assert_eq!(buf, vec![0xa2, 0x00, 0x00, 0x03, 0x18, 30]);
    }

    #[test]
    fn test_unsupported_values_rejected() {
        for value in [
            Value::Float(1.5),
            Value::Integer((-1).into()),
            Value::Bool(true),
            Value::Array(vec![Value::Null]),
        ] {
            let mut buf = Vec::new();
            let err = encode_value_to(&mut buf, &value).unwrap_err();
            assert!(matches!(err, CoreError::Encoding(_)), "{value:?}");
        }
    }
}
