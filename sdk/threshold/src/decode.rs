//! Share document decoding
//!
//! ```json
//! {
//!   "keys": { "n": 4, "k": 3 },
//!   "1": { "base": "10", "value": "4" },
//!   "2": { "base": "2", "value": "111" }
//! }
//! ```
//!
//! Every top-level key other than `keys` is a share's x-coordinate in
//! decimal; its record gives the base and the base-encoded y-value. Points
//! keep document order.

use std::collections::HashSet;
use std::fmt;

use log::{debug, warn};
use num_bigint::BigInt;
use num_traits::Num;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{Map, Value};

use crate::error::{Result, ThresholdError};
use crate::shares::{Point, ShareSet};

/// Top-level key holding the threshold metadata
pub const KEYS_FIELD: &str = "keys";

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 36;

const DOCUMENT_KEY: &str = "<document>";

/// Top-level entries of a share document in document order, repeats included
struct Entries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a share document object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Entries, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parse a share document and decode every share into a [`ShareSet`].
///
/// A key that appears twice is reported as [`ThresholdError::MalformedShare`]
/// rather than letting the later record replace the earlier one.
pub fn decode_document(json: &str) -> Result<ShareSet> {
    let Entries(entries) = serde_json::from_str(json)
        .map_err(|e| ThresholdError::malformed(DOCUMENT_KEY, format!("invalid JSON: {}", e)))?;
    decode_entries(entries.iter().map(|(key, value)| (key.as_str(), value)).collect())
}

/// Decode an already-parsed share document
pub fn decode_value(doc: &Value) -> Result<ShareSet> {
    let fields = doc
        .as_object()
        .ok_or_else(|| ThresholdError::malformed(DOCUMENT_KEY, "document is not an object"))?;
    decode_entries(fields.iter().map(|(key, value)| (key.as_str(), value)).collect())
}

fn decode_entries(entries: Vec<(&str, &Value)>) -> Result<ShareSet> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (key, _) in &entries {
        if !seen.insert(*key) {
            return Err(ThresholdError::malformed(*key, "key appears more than once"));
        }
    }

    let keys = entries
        .iter()
        .find(|(key, _)| *key == KEYS_FIELD)
        .and_then(|(_, value)| value.as_object())
        .ok_or_else(|| ThresholdError::malformed(KEYS_FIELD, "missing \"keys\" object"))?;
    let threshold = read_count(keys, "k")?
        .ok_or_else(|| ThresholdError::malformed(KEYS_FIELD, "missing threshold \"k\""))?;
    let declared = read_count(keys, "n")?;

    let points = entries
        .iter()
        .filter(|(key, _)| *key != KEYS_FIELD)
        .map(|(key, record)| decode_share(key, record))
        .collect::<Result<Vec<_>>>()?;

    if let Some(n) = declared {
        if n != points.len() {
            warn!("document declares n={} but holds {} shares", n, points.len());
        }
    }
    debug!("decoded {} shares with threshold k={}", points.len(), threshold);

    ShareSet::new(threshold, points)
}

/// Decode one `"<x>": { "base": .., "value": .. }` record
pub fn decode_share(key: &str, record: &Value) -> Result<Point> {
    let x: BigInt = key
        .trim()
        .parse()
        .map_err(|_| ThresholdError::malformed(key, "x-coordinate is not a decimal integer"))?;

    let record = record
        .as_object()
        .ok_or_else(|| ThresholdError::malformed(key, "share record is not an object"))?;

    let base = match record.get("base") {
        Some(value) => parse_base(key, value)?,
        None => return Err(ThresholdError::malformed(key, "missing \"base\"")),
    };

    let digits = match record.get("value") {
        Some(Value::String(s)) => s.trim(),
        Some(_) => return Err(ThresholdError::malformed(key, "\"value\" is not a string")),
        None => return Err(ThresholdError::malformed(key, "missing \"value\"")),
    };
    let y = parse_digits(key, digits, base)?;

    Ok(Point { x, y })
}

/// Parse a base given as a decimal string or a JSON integer
pub fn parse_base(key: &str, value: &Value) -> Result<u32> {
    let base = match value {
        Value::String(s) => s.trim().parse::<u32>().ok(),
        Value::Number(n) => n.as_u64().and_then(|b| u32::try_from(b).ok()),
        _ => None,
    }
    .ok_or_else(|| ThresholdError::malformed(key, format!("base {} is not an integer", value)))?;

    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(ThresholdError::malformed(
            key,
            format!("base {} outside {}..={}", base, MIN_BASE, MAX_BASE),
        ));
    }
    Ok(base)
}

/// Parse `digits` in `base` as a signed arbitrary-precision integer
pub fn parse_digits(key: &str, digits: &str, base: u32) -> Result<BigInt> {
    let invalid = || {
        ThresholdError::malformed(key, format!("value '{}' is not valid in base {}", digits, base))
    };

    // Digit separators are not part of the share format.
    if digits.is_empty() || digits.contains('_') {
        return Err(invalid());
    }
    BigInt::from_str_radix(digits, base).map_err(|_| invalid())
}

fn read_count(keys: &Map<String, Value>, field: &str) -> Result<Option<usize>> {
    let Some(value) = keys.get(field) else {
        return Ok(None);
    };
    let count = match value {
        Value::Number(n) => n.as_u64().and_then(|v| usize::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    count.map(Some).ok_or_else(|| {
        ThresholdError::malformed(
            KEYS_FIELD,
            format!("\"{}\" is not a non-negative integer", field),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_decoding() {
        let hex = decode_share("1", &json!({ "base": "16", "value": "1a" })).unwrap();
        assert_eq!(hex, Point::new(1, 26));

        let bin = decode_share("2", &json!({ "base": "2", "value": "111" })).unwrap();
        assert_eq!(bin, Point::new(2, 7));

        let upper = decode_share("3", &json!({ "base": 36, "value": "Z" })).unwrap();
        assert_eq!(upper.y, BigInt::from(35));
    }

    #[test]
    fn test_signed_values() {
        let p = decode_share("-4", &json!({ "base": "10", "value": "-15" })).unwrap();
        assert_eq!(p, Point::new(-4, -15));
    }

    #[test]
    fn test_malformed_key() {
        let err = decode_share("abc", &json!({ "base": "10", "value": "1" })).unwrap_err();
        assert!(matches!(err, ThresholdError::MalformedShare { ref key, .. } if key == "abc"));
    }

    #[test]
    fn test_base_out_of_range() {
        for base in [json!("1"), json!("37"), json!("sixteen"), json!(-2), json!(null)] {
            let err = decode_share("5", &json!({ "base": base, "value": "1" })).unwrap_err();
            assert!(matches!(err, ThresholdError::MalformedShare { ref key, .. } if key == "5"));
        }
    }

    #[test]
    fn test_digits_outside_alphabet() {
        let err = decode_share("6", &json!({ "base": "2", "value": "102" })).unwrap_err();
        assert_eq!(
            err,
            ThresholdError::malformed("6", "value '102' is not valid in base 2")
        );
        assert!(decode_share("6", &json!({ "base": "10", "value": "" })).is_err());
        assert!(decode_share("6", &json!({ "base": "10", "value": "1_000" })).is_err());
    }

    #[test]
    fn test_missing_fields() {
        assert!(decode_share("1", &json!({ "value": "1" })).is_err());
        assert!(decode_share("1", &json!({ "base": "10" })).is_err());
        assert!(decode_share("1", &json!({ "base": "10", "value": 12 })).is_err());
        assert!(decode_share("1", &json!("12")).is_err());
    }

    #[test]
    fn test_document_preserves_order() {
        let doc = r#"{
            "keys": { "n": 3, "k": 2 },
            "10": { "base": "10", "value": "21" },
            "2": { "base": "10", "value": "5" },
            "1": { "base": "10", "value": "3" }
        }"#;
        let shares = decode_document(doc).unwrap();
        assert_eq!(shares.threshold(), 2);
        let xs: Vec<String> = shares.points().iter().map(|p| p.x.to_string()).collect();
        assert_eq!(xs, vec!["10", "2", "1"]);
    }

    #[test]
    fn test_document_errors() {
        assert!(matches!(
            decode_document("not json"),
            Err(ThresholdError::MalformedShare { .. })
        ));
        assert!(matches!(
            decode_document(r#"{ "1": { "base": "10", "value": "3" } }"#),
            Err(ThresholdError::MalformedShare { ref key, .. }) if key == KEYS_FIELD
        ));
        assert!(matches!(
            decode_document(r#"{ "keys": { "k": "two" } }"#),
            Err(ThresholdError::MalformedShare { ref key, .. }) if key == KEYS_FIELD
        ));
    }

    #[test]
    fn test_repeated_key_rejected() {
        let doc = r#"{
            "keys": { "k": 2 },
            "1": { "base": "10", "value": "3" },
            "1": { "base": "10", "value": "99" },
            "2": { "base": "10", "value": "5" }
        }"#;
        assert_eq!(
            decode_document(doc).unwrap_err(),
            ThresholdError::malformed("1", "key appears more than once")
        );

        let doc = r#"{
            "keys": { "k": 2 },
            "1": { "base": "10", "value": "3" },
            "keys": { "k": 3 },
            "2": { "base": "10", "value": "5" }
        }"#;
        assert!(matches!(
            decode_document(doc),
            Err(ThresholdError::MalformedShare { ref key, .. }) if key == KEYS_FIELD
        ));
    }

    #[test]
    fn test_equal_x_under_distinct_keys_kept() {
        let doc = r#"{
            "keys": { "k": 2 },
            "1": { "base": "10", "value": "3" },
            "01": { "base": "10", "value": "4" },
            "2": { "base": "10", "value": "5" }
        }"#;
        let shares = decode_document(doc).unwrap();
        assert_eq!(shares.points()[0].x, shares.points()[1].x);
        assert_eq!(shares.len(), 3);
    }

    #[test]
    fn test_declared_count_mismatch_is_not_fatal() {
        let doc = r#"{
            "keys": { "n": 5, "k": 2 },
            "1": { "base": "10", "value": "3" },
            "2": { "base": "10", "value": "5" }
        }"#;
        assert_eq!(decode_document(doc).unwrap().len(), 2);
    }

    #[test]
    fn test_non_object_document() {
        assert!(matches!(
            decode_document("[1, 2]"),
            Err(ThresholdError::MalformedShare { ref key, .. }) if key == DOCUMENT_KEY
        ));
        assert!(decode_value(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_decode_value_matches_document() {
        let value = json!({
            "keys": { "k": 2 },
            "1": { "base": "16", "value": "1a" },
            "2": { "base": "2", "value": "111" }
        });
        let shares = decode_value(&value).unwrap();
        assert_eq!(shares.points(), &[Point::new(1, 26), Point::new(2, 7)]);
    }

    #[test]
    fn test_threshold_as_string() {
        let doc = r#"{
            "keys": { "k": "2" },
            "1": { "base": "10", "value": "3" },
            "2": { "base": "10", "value": "5" }
        }"#;
        assert_eq!(decode_document(doc).unwrap().threshold(), 2);
    }

    #[test]
    fn test_threshold_checked_after_decoding() {
        let doc = r#"{
            "keys": { "k": 3 },
            "1": { "base": "10", "value": "3" },
            "2": { "base": "10", "value": "5" }
        }"#;
        assert_eq!(
            decode_document(doc).unwrap_err(),
            ThresholdError::InsufficientShares { got: 2, need: 3 }
        );
    }
}
