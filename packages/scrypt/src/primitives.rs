//! Key-derivation and randomness collaborators
//!
//! Both are traits so the hashing and verification flows can run against
//! deterministic stand-ins. The defaults use the `scrypt` crate and the
//! operating system RNG.

use crate::{Result, ScryptError};
use zeroize::Zeroizing;

/// Output length handed to `scrypt::Params`; only the buffer length matters
/// for raw derivation.
const SCRYPT_PARAMS_LEN: usize = 32;

/// Memory-hard key derivation
pub trait KeyDeriver: Send + Sync {
    /// Derive `output_len` bytes from `password` and `salt`
    ///
    /// `cost` is the linear cost `N`.
    ///
    /// # Errors
    ///
    /// Returns [`ScryptError::Derivation`] when the primitive rejects the
    /// parameters or runs out of resources.
    fn derive(
        &self,
        password: &[u8],
        cost: u64,
        block_size: u32,
        parallelism: u32,
        salt: &[u8],
        output_len: usize,
    ) -> Result<Vec<u8>>;
}

/// Cryptographically secure random bytes
pub trait RandomSource: Send + Sync {
    /// Produce `len` random bytes
    ///
    /// # Errors
    ///
    /// Returns [`ScryptError::RandomSource`] when the entropy source fails.
    fn fill(&self, len: usize) -> Result<Zeroizing<Vec<u8>>>;
}

/// Default memory ceiling for a single derivation (256 MiB)
pub const DEFAULT_MAX_MEMORY: u64 = 256 * 1024 * 1024;

/// RFC 7914 scrypt backed by the `scrypt` crate
///
/// Derivations whose working memory would exceed `max_memory` bytes are
/// refused before anything is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptKdf {
    max_memory: u64,
}

impl Default for ScryptKdf {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MEMORY)
    }
}

impl ScryptKdf {
    /// Create a deriver with a memory ceiling in bytes
    #[must_use]
    pub const fn new(max_memory: u64) -> Self {
        Self { max_memory }
    }

    /// Memory ceiling in bytes
    #[must_use]
    pub const fn max_memory(&self) -> u64 {
        self.max_memory
    }
}

/// Bytes scrypt allocates: `128 * r * (N + p + 2)`, or `None` on overflow
#[must_use]
pub fn required_memory(cost: u64, block_size: u32, parallelism: u32) -> Option<u64> {
    cost.checked_add(u64::from(parallelism))?
        .checked_add(2)?
        .checked_mul(u64::from(block_size))?
        .checked_mul(128)
}

impl KeyDeriver for ScryptKdf {
    fn derive(
        &self,
        password: &[u8],
        cost: u64,
        block_size: u32,
        parallelism: u32,
        salt: &[u8],
        output_len: usize,
    ) -> Result<Vec<u8>> {
        if !cost.is_power_of_two() {
            return Err(ScryptError::derivation(format!(
                "cost {cost} is not a power of two"
            )));
        }
        match required_memory(cost, block_size, parallelism) {
            Some(required) if required <= self.max_memory => {}
            required => {
                return Err(ScryptError::derivation(format!(
                    "memory limit exceeded: {} bytes required, limit is {}",
                    required.map_or_else(|| "more than 2^64".to_string(), |r| r.to_string()),
                    self.max_memory
                )));
            }
        }
        let log_n = u8::try_from(cost.trailing_zeros())
            .map_err(|_| ScryptError::derivation("cost exponent out of range"))?;

        let params = scrypt::Params::new(log_n, block_size, parallelism, SCRYPT_PARAMS_LEN)
            .map_err(|e| ScryptError::derivation(format!("Invalid scrypt parameters: {e}")))?;

        let mut output = vec![0u8; output_len];
        scrypt::scrypt(password, salt, &params, &mut output)
            .map_err(|e| ScryptError::derivation(format!("scrypt derivation failed: {e}")))?;
        Ok(output)
    }
}

/// Operating system entropy via `getrandom`
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl RandomSource for OsEntropy {
    fn fill(&self, len: usize) -> Result<Zeroizing<Vec<u8>>> {
        let mut bytes = Zeroizing::new(vec![0u8; len]);
        getrandom::fill(&mut bytes)
            .map_err(|e| ScryptError::RandomSource(e.to_string()))?;
        Ok(bytes)
    }
}

/// Constant-time comparison of two byte strings
///
/// Runs in time independent of where the inputs differ. Inputs of unequal
/// length compare unequal.
#[must_use]
#[inline]
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn scrypt_rfc7914_vector_one() {
        let out = ScryptKdf::default()
            .derive(b"", 16, 1, 1, b"", 64)
            .expect("vector 1 parameters are valid");
        assert_eq!(
            out,
            hex!(
                "77d6576238657b203b19ca42c18a0497f16b4844e3074ae8dfdffa3fede21442"
                "fcd0069ded0948f8326a753a0fc81f17e8d3e0fb2e0d3628cf35e20c38d18906"
            )
        );
    }

    #[test]
    fn scrypt_rejects_non_power_of_two_cost() {
        let err = ScryptKdf::default().derive(b"pw", 15, 8, 1, b"salt", 32).unwrap_err();
        assert!(matches!(err, ScryptError::Derivation(_)));
    }

    #[test]
    fn scrypt_rejects_empty_output() {
        let err = ScryptKdf::default().derive(b"pw", 16, 1, 1, b"salt", 0).unwrap_err();
        assert!(matches!(err, ScryptError::Derivation(_)));
    }

    #[test]
    fn memory_requirement_formula() {
        assert_eq!(required_memory(1 << 15, 8, 1), Some(128 * 8 * ((1 << 15) + 3)));
        assert_eq!(required_memory(1 << 63, u32::MAX, 1), None);
    }

    #[test]
    fn scrypt_refuses_work_above_memory_limit() {
        let err = ScryptKdf::default()
            .derive(b"pw", 1 << 50, 8, 1, b"salt", 32)
            .unwrap_err();
        assert!(err.to_string().contains("memory limit exceeded"), "{err}");

        let err = ScryptKdf::default()
            .derive(b"pw", 2, 1, 1_073_741_823, b"salt", 32)
            .unwrap_err();
        assert!(matches!(err, ScryptError::Derivation(_)));

        let err = ScryptKdf::new(1024)
            .derive(b"pw", 16, 1, 1, b"salt", 32)
            .unwrap_err();
        assert!(matches!(err, ScryptError::Derivation(_)));
    }

    #[test]
    fn default_limit_admits_default_parameters() {
        let limit = ScryptKdf::default().max_memory();
        for (n, r, p) in [(15, 8, 1), (16, 8, 1), (14, 8, 1), (10, 8, 16), (4, 1, 1)] {
            let required = required_memory(1 << n, r, p).expect("fits in 64 bits");
            assert!(required <= limit, "n={n} r={r} p={p}");
        }
    }

    #[test]
    fn os_entropy_fills_requested_length() {
        let a = OsEntropy.fill(32).expect("system RNG available");
        let b = OsEntropy.fill(32).expect("system RNG available");
        assert_eq!(a.len(), 32);
        assert_ne!(*a, *b);
    }

    #[test]
    fn compare_is_exact() {
        assert!(constant_time_compare(b"abc", b"abc"));
        assert!(!constant_time_compare(b"abc", b"abd"));
        assert!(!constant_time_compare(b"abc", b"ab"));
        assert!(constant_time_compare(b"", b""));
    }
}
