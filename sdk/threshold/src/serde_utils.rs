//! Serialization helpers for arbitrary-precision integers.
//!
//! Integers travel as decimal strings so no precision is lost in JSON.

use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize a `BigInt` as a decimal string
pub fn serialize_decimal<S>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

/// Deserialize a `BigInt` from a decimal string
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<BigInt, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse()
        .map_err(|e| serde::de::Error::custom(format!("Invalid decimal integer '{}': {}", s, e)))
}

/// Serialize a slice of `(BigInt, count)` pairs as `[["value", count], ...]`
pub fn serialize_votes<S>(votes: &[(BigInt, u64)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(votes.len()))?;
    for (value, count) in votes {
        seq.serialize_element(&(value.to_string(), count))?;
    }
    seq.end()
}
