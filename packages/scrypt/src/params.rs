//! Scrypt tuning parameter validation
//!
//! Bounds follow RFC 7914: `N < 2^(128 * r / 8)` and
//! `p <= ((2^32 - 1) * 32) / (128 * r)`. The cost is carried as the
//! exponent `n` of `N = 2^n`, so its upper bound is `128 * r / 8 - 1`.

use crate::error::{Field, ValidationError};

/// Smallest accepted block size
pub const MIN_BLOCK_SIZE: i64 = 1;
/// Largest accepted block size (`2^32 - 1`)
pub const MAX_BLOCK_SIZE: i64 = u32::MAX as i64;
/// Numerator factor of the parallelism bound (`2^32 - 1`)
pub const MAX_PARALLEL_FACTOR: i64 = u32::MAX as i64;
/// Smallest accepted cost exponent (`2^1 = 2`)
pub const MIN_COST: i64 = 1;
/// Smallest accepted parallelism
pub const MIN_PARALLELISM: i64 = 1;
/// Smallest generated salt in bytes
pub const MIN_SALT_SIZE: i64 = 8;
/// Largest generated salt in bytes
pub const MAX_SALT_SIZE: i64 = 1024;

/// Validated scrypt parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptParams {
    /// Cost exponent `n`
    pub cost: u64,
    /// Block size `r`
    pub block_size: u32,
    /// Parallelism `p`
    pub parallelism: u32,
}

impl ScryptParams {
    /// Linear cost `N = 2^n`, or `None` when it does not fit in 64 bits
    #[must_use]
    pub fn linear_cost(&self) -> Option<u64> {
        u32::try_from(self.cost)
            .ok()
            .and_then(|n| 1u64.checked_shl(n))
    }
}

/// Largest cost exponent allowed for a block size
#[must_use]
pub fn max_cost(block_size: i64) -> i64 {
    (128 * block_size) / 8 - 1
}

/// Largest parallelism allowed for a block size
#[must_use]
pub fn max_parallelism(block_size: i64) -> i64 {
    (MAX_PARALLEL_FACTOR * 32) / (128 * block_size)
}

fn check_range(
    field: Field,
    value: Option<i64>,
    min: i64,
    max: i64,
) -> Result<i64, ValidationError> {
    let value = value.ok_or(ValidationError::NotInteger { field })?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Validate scrypt parameters
///
/// `None` stands for a missing or non-integer value. Fields are checked in
/// the order block size, cost, parallelism, salt size and the first failure
/// is returned. The salt size is only checked when given.
///
/// # Errors
///
/// Returns [`ValidationError::NotInteger`] for absent values and
/// [`ValidationError::OutOfRange`] for values outside their bounds.
pub fn validate(
    block_size: Option<i64>,
    cost: Option<i64>,
    parallelism: Option<i64>,
    salt_size: Option<i64>,
) -> Result<ScryptParams, ValidationError> {
    let block_size = check_range(Field::BlockSize, block_size, MIN_BLOCK_SIZE, MAX_BLOCK_SIZE)?;
    let cost = check_range(Field::Cost, cost, MIN_COST, max_cost(block_size))?;
    let parallelism = check_range(
        Field::Parallelism,
        parallelism,
        MIN_PARALLELISM,
        max_parallelism(block_size),
    )?;
    if salt_size.is_some() {
        check_range(Field::SaltSize, salt_size, MIN_SALT_SIZE, MAX_SALT_SIZE)?;
    }

    // All three are range-checked against non-negative bounds that fit their targets.
    Ok(ScryptParams {
        cost: cost.unsigned_abs(),
        block_size: u32::try_from(block_size).unwrap_or(u32::MAX),
        parallelism: u32::try_from(parallelism).unwrap_or(u32::MAX),
    })
}
