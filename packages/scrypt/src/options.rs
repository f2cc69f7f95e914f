//! Hashing options
//!
//! Options are plain values. Each hashing call takes its own copy, starting
//! from [`HashOptions::default`].

use crate::error::{Field, ValidationError};
use crate::primitives::DEFAULT_MAX_MEMORY;
use crate::{Result, ScryptError};
use serde::{Deserialize, Serialize};

/// Default cost exponent (`N = 2^15`)
pub const DEFAULT_COST: i64 = 15;
/// Default block size
pub const DEFAULT_BLOCK_SIZE: i64 = 8;
/// Default parallelism
pub const DEFAULT_PARALLELISM: i64 = 1;
/// Default salt size in bytes
pub const DEFAULT_SALT_SIZE: i64 = 16;
/// Digest length produced when hashing
pub const HASH_LENGTH: usize = 32;

/// Tunable scrypt options for producing a new hash
///
/// Values are signed so that out-of-range input reaches the validator
/// instead of being silently truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HashOptions {
    /// Cost exponent `n`
    pub cost: i64,
    /// Block size `r`
    #[serde(alias = "blocksize")]
    pub block_size: i64,
    /// Parallelism `p`
    pub parallelism: i64,
    /// Salt size in bytes
    #[serde(alias = "salt_size")]
    pub salt_size: i64,
    /// Memory ceiling in bytes for the derivation
    #[serde(alias = "maxmem", alias = "max_memory")]
    pub max_memory: u64,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self {
            cost: DEFAULT_COST,
            block_size: DEFAULT_BLOCK_SIZE,
            parallelism: DEFAULT_PARALLELISM,
            salt_size: DEFAULT_SALT_SIZE,
            max_memory: DEFAULT_MAX_MEMORY,
        }
    }
}

impl HashOptions {
    /// Load options from a JSON object
    ///
    /// Missing keys keep their defaults and unknown keys are ignored. A value
    /// that is not an integer is reported as a validation error for its field.
    ///
    /// # Errors
    ///
    /// Returns [`ScryptError::InvalidOptions`] when the input is not a JSON
    /// object and [`ScryptError::Validation`] for non-integer values.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| ScryptError::InvalidOptions(format!("malformed JSON: {e}")))?;
        let map = value
            .as_object()
            .ok_or_else(|| ScryptError::InvalidOptions("expected a JSON object".to_string()))?;

        let mut options = Self::default();
        for (key, value) in map {
            if matches!(key.as_str(), "maxmem" | "maxMemory" | "max_memory") {
                options.max_memory = memory_value(value)?;
                continue;
            }
            let (field, slot) = match key.as_str() {
                "cost" => (Field::Cost, &mut options.cost),
                "blocksize" | "blockSize" | "block_size" => {
                    (Field::BlockSize, &mut options.block_size)
                }
                "parallelism" => (Field::Parallelism, &mut options.parallelism),
                "saltSize" | "salt_size" => (Field::SaltSize, &mut options.salt_size),
                other => {
                    tracing::warn!(option = other, "ignoring unknown scrypt option");
                    continue;
                }
            };
            *slot = integer_value(value).ok_or(ValidationError::NotInteger { field })?;
        }
        Ok(options)
    }
}

// Integral floats such as `1e3` or `4294967296.0` count as integers.
fn integer_value(value: &serde_json::Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        #[allow(clippy::cast_possible_truncation)]
        return Some(f as i64);
    }
    None
}

fn memory_value(value: &serde_json::Value) -> std::result::Result<u64, ValidationError> {
    let field = Field::MaxMemory;
    let bytes = integer_value(value).ok_or(ValidationError::NotInteger { field })?;
    u64::try_from(bytes).map_err(|_| ValidationError::OutOfRange {
        field,
        value: bytes,
        min: 0,
        max: i64::MAX,
    })
}
