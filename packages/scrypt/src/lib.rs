//! # Cyrup Scrypt Password Hashing
//!
//! Password hashing and verification with scrypt, stored as PHC strings:
//!
//! ```text
//! $scrypt$n=<cost>,r=<block size>,p=<parallelism>$<salt>$<hash>
//! ```
//!
//! The cost is the exponent `n` of the scrypt work factor `N = 2^n`. Salt and
//! hash are unpadded standard base64.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cryypt_scrypt::Scrypt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let encoded = Scrypt::hash().with_cost(14).compute("hunter2").await?;
//! assert!(Scrypt::verify().verify(&encoded, "hunter2").await?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod async_result;
pub mod codec;
pub mod error;
pub mod options;
pub mod params;
pub mod primitives;
pub mod record;

use std::collections::BTreeSet;

// Re-export error types
pub use error::{Field, FormatError, RecordField, Result, ScryptError, ValidationError};

pub use api::{HashBuilder, HashBuilderWithHandler, VerifyBuilder, VerifyBuilderWithHandler};
pub use async_result::{AsyncScryptResult, AsyncScryptResultWithHandler};
pub use options::HashOptions;
pub use params::ScryptParams;
pub use primitives::{
    constant_time_compare, required_memory, KeyDeriver, OsEntropy, RandomSource, ScryptKdf,
    DEFAULT_MAX_MEMORY,
};
pub use record::HashRecord;

/// PHC identifier of the supported algorithm
pub const IDENTIFIER: &str = "scrypt";

/// Name of this hashing function
pub const NAME: &str = IDENTIFIER;

/// Identifiers accepted by [`Scrypt::verify`]
#[must_use]
pub fn identifiers() -> BTreeSet<&'static str> {
    BTreeSet::from([IDENTIFIER])
}

/// Main entry point for scrypt operations
pub struct Scrypt;

impl Scrypt {
    /// Builder for hashing a new password
    #[must_use]
    pub fn hash() -> HashBuilder {
        HashBuilder::new()
    }

    /// Builder for verifying a password against a stored PHC string
    #[must_use]
    pub fn verify() -> VerifyBuilder {
        VerifyBuilder::new()
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        identifiers, HashOptions, KeyDeriver, RandomSource, Result, Scrypt, ScryptError,
    };
}
