//! Structured form of a PHC hash string

use crate::params::ScryptParams;
use crate::IDENTIFIER;

/// Decoded or freshly built hash record
///
/// Parameters, salt and hash are optional so that a decoded string can report
/// which parts it lacks. Records produced by hashing have every field set.
#[derive(Clone, PartialEq, Eq)]
pub struct HashRecord {
    /// Algorithm identifier
    pub id: String,
    /// Cost exponent `n`
    pub cost: Option<i64>,
    /// Block size `r`
    pub block_size: Option<i64>,
    /// Parallelism `p`
    pub parallelism: Option<i64>,
    /// Salt bytes
    pub salt: Option<Vec<u8>>,
    /// Derived digest bytes
    pub hash: Option<Vec<u8>>,
}

impl HashRecord {
    /// Build a complete scrypt record
    #[must_use]
    pub fn new(params: ScryptParams, salt: Vec<u8>, hash: Vec<u8>) -> Self {
        Self {
            id: IDENTIFIER.to_string(),
            cost: i64::try_from(params.cost).ok(),
            block_size: Some(i64::from(params.block_size)),
            parallelism: Some(i64::from(params.parallelism)),
            salt: Some(salt),
            hash: Some(hash),
        }
    }
}

// Salt and digest are left out of debug output.
impl std::fmt::Debug for HashRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRecord")
            .field("id", &self.id)
            .field("cost", &self.cost)
            .field("block_size", &self.block_size)
            .field("parallelism", &self.parallelism)
            .field("salt_len", &self.salt.as_ref().map(Vec::len))
            .field("hash_len", &self.hash.as_ref().map(Vec::len))
            .finish()
    }
}
