//! PHC string encoding for hash records
//!
//! Format: `$<id>$n=<cost>,r=<block_size>,p=<parallelism>$<salt>$<hash>` with
//! salt and hash in unpadded standard base64. The salt and hash segments may
//! be left out; an empty segment is a present, empty value.

use crate::error::FormatError;
use crate::record::HashRecord;
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use std::fmt::Write as _;

const MAX_ID_LEN: usize = 32;

/// Encode a record as a PHC string
#[must_use]
pub fn serialize(record: &HashRecord) -> String {
    let mut out = format!("${}$", record.id);

    let params = [
        ("n", record.cost),
        ("r", record.block_size),
        ("p", record.parallelism),
    ];
    let mut first = true;
    for (name, value) in params {
        if let Some(value) = value {
            if !first {
                out.push(',');
            }
            // Writing to a String cannot fail.
            let _ = write!(out, "{name}={value}");
            first = false;
        }
    }

    // A digest cannot be expressed without a salt segment before it.
    if record.salt.is_some() || record.hash.is_some() {
        out.push('$');
        if let Some(salt) = &record.salt {
            out.push_str(&STANDARD_NO_PAD.encode(salt));
        }
    }
    if let Some(hash) = &record.hash {
        out.push('$');
        out.push_str(&STANDARD_NO_PAD.encode(hash));
    }
    out
}

/// Decode a PHC string into a record
///
/// Parameter values that are not decimal integers decode as absent and are
/// reported later by the validator.
///
/// # Errors
///
/// Returns [`FormatError`] when the segment layout, identifier, parameter
/// syntax or base64 payloads are malformed.
pub fn deserialize(encoded: &str) -> Result<HashRecord, FormatError> {
    let rest = encoded
        .strip_prefix('$')
        .ok_or_else(|| FormatError::new("string must start with '$'"))?;

    let segments: Vec<&str> = rest.split('$').collect();
    if segments.len() < 2 || segments.len() > 4 {
        return Err(FormatError::new(format!(
            "expected 3 to 5 '$'-delimited segments, found {}",
            segments.len() + 1
        )));
    }

    let id = segments[0];
    if !is_valid_id(id) {
        return Err(FormatError::new(format!("invalid identifier '{id}'")));
    }

    let mut record = HashRecord {
        id: id.to_string(),
        cost: None,
        block_size: None,
        parallelism: None,
        salt: None,
        hash: None,
    };
    parse_params(segments[1], &mut record)?;

    if let Some(salt) = segments.get(2) {
        record.salt = Some(decode_b64("salt", salt)?);
    }
    if let Some(hash) = segments.get(3) {
        record.hash = Some(decode_b64("hash", hash)?);
    }
    Ok(record)
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn is_valid_value(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b'+' | b'.' | b'-'))
}

fn parse_params(segment: &str, record: &mut HashRecord) -> Result<(), FormatError> {
    if segment.is_empty() {
        return Ok(());
    }

    // n, r, p
    let mut seen = [false; 3];
    for pair in segment.split(',') {
        let (name, value) = pair.split_once('=').ok_or_else(|| {
            FormatError::new(format!("parameter '{pair}' is not of the form name=value"))
        })?;
        if name.is_empty() || value.is_empty() || !is_valid_value(value) {
            return Err(FormatError::new(format!("malformed parameter '{pair}'")));
        }

        let (index, slot) = match name {
            "n" => (0, &mut record.cost),
            "r" => (1, &mut record.block_size),
            "p" => (2, &mut record.parallelism),
            other => return Err(FormatError::new(format!("unknown parameter '{other}'"))),
        };
        if seen[index] {
            return Err(FormatError::new(format!("duplicate parameter '{name}'")));
        }
        seen[index] = true;
        *slot = value.parse::<i64>().ok();
    }
    Ok(())
}

fn decode_b64(what: &str, segment: &str) -> Result<Vec<u8>, FormatError> {
    STANDARD_NO_PAD
        .decode(segment)
        .map_err(|e| FormatError::new(format!("invalid base64 in {what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRECOMPUTED: &str =
        "$scrypt$n=16,r=8,p=1$aM15713r3Xsvxbi31lqr1Q$nFNh2CVHVjNldFVKDHDlm4CbdRSCdEBsjjJxD+iCs5E";

    #[test]
    fn decodes_precomputed_string() {
        let record = deserialize(PRECOMPUTED).expect("valid PHC string");
        assert_eq!(record.id, "scrypt");
        assert_eq!(record.cost, Some(16));
        assert_eq!(record.block_size, Some(8));
        assert_eq!(record.parallelism, Some(1));
        assert_eq!(record.salt.as_ref().map(Vec::len), Some(16));
        assert_eq!(record.hash.as_ref().map(Vec::len), Some(32));
        assert_eq!(serialize(&record), PRECOMPUTED);
    }

    #[test]
    fn missing_trailing_segments() {
        let record = deserialize("$scrypt$n=16,r=8,p=1").expect("salt and hash are optional");
        assert!(record.salt.is_none());
        assert!(record.hash.is_none());

        let record =
            deserialize("$scrypt$n=16,r=8,p=1$aM15713r3Xsvxbi31lqr1Q").expect("hash is optional");
        assert!(record.salt.is_some());
        assert!(record.hash.is_none());
    }

    #[test]
    fn empty_salt_segment_is_present() {
        let record = deserialize("$scrypt$n=4,r=1,p=1$$AAAA").expect("empty salt");
        assert_eq!(record.salt, Some(Vec::new()));
        assert_eq!(serialize(&record), "$scrypt$n=4,r=1,p=1$$AAAA");
    }

    #[test]
    fn missing_and_non_integer_params_decode_as_absent() {
        let record =
            deserialize("$scrypt$r=8,p=1$aM15713r3Xsvxbi31lqr1Q").expect("n may be absent");
        assert_eq!(record.cost, None);
        let record = deserialize("$scrypt$n=1.5,r=8,p=1").expect("non-integer value");
        assert_eq!(record.cost, None);
        let record = deserialize("$scrypt$$aM15713r3Xsvxbi31lqr1Q").expect("empty params");
        assert_eq!((record.cost, record.block_size, record.parallelism), (None, None, None));
    }

    #[test]
    fn keeps_negative_and_large_values() {
        let record = deserialize("$scrypt$n=16,r=-1,p=4294967296").expect("syntactically valid");
        assert_eq!(record.block_size, Some(-1));
        assert_eq!(record.parallelism, Some(4_294_967_296));
    }

    #[test]
    fn rejects_legacy_bare_params() {
        let err = deserialize(
            "$scrypt$16,8,1$aM15713r3Xsvxbi31lqr1Q$nFNh2CVHVjNldFVKDHDlm4CbdRSCdEBsjjJxD+iCs5E",
        )
        .unwrap_err();
        assert!(err.reason.contains("name=value"));
    }

    #[test]
    fn rejects_bad_layouts() {
        for bad in [
            "",
            "scrypt$n=1,r=8,p=1",
            "$scrypt",
            "$scrypt$n=1,r=8,p=1$a$b$c",
            "$$n=1,r=8,p=1",
            "$SCRYPT$n=1,r=8,p=1",
            "$scrypt$n=1,r=8,p=1,n=2",
            "$scrypt$n=x,n=2",
            "$scrypt$ln=4,r=1,p=1",
            "$scrypt$n=,r=8",
            "$scrypt$n=1,r=8,p=1$not*base64",
            "$scrypt$n=1,r=8,p=1$AAAA$====",
        ] {
            assert!(deserialize(bad).is_err(), "{bad:?} should not decode");
        }
    }

    proptest::proptest! {
        #[test]
        fn round_trips_valid_records(
            block_size in 1i64..=1_000_000,
            cost_seed in proptest::num::i64::ANY,
            parallelism_seed in proptest::num::i64::ANY,
            salt in proptest::collection::vec(proptest::num::u8::ANY, 8..=1024),
            hash in proptest::collection::vec(proptest::num::u8::ANY, 1..=64),
        ) {
            let cost = 1 + cost_seed.rem_euclid(crate::params::max_cost(block_size));
            let parallelism =
                1 + parallelism_seed.rem_euclid(crate::params::max_parallelism(block_size));
            let params =
                crate::params::validate(Some(block_size), Some(cost), Some(parallelism), None)
                    .expect("generated parameters are in range");
            let record = HashRecord::new(params, salt, hash);
            proptest::prop_assert_eq!(deserialize(&serialize(&record)), Ok(record));
        }
    }

    #[test]
    fn serialize_omits_absent_params() {
        let record = HashRecord {
            id: "scrypt".into(),
            cost: None,
            block_size: Some(8),
            parallelism: Some(1),
            salt: None,
            hash: None,
        };
        assert_eq!(serialize(&record), "$scrypt$r=8,p=1");
        assert_eq!(deserialize(&serialize(&record)), Ok(record));
    }
}
