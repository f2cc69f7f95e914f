//! Comprehensive error handling for scrypt password hashing

use std::fmt;
use thiserror::Error;

/// Tunable value checked by the parameter validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Cost exponent `n` (linear cost is `2^n`)
    Cost,
    /// Block size `r`
    BlockSize,
    /// Parallelism `p`
    Parallelism,
    /// Size in bytes of a generated salt
    SaltSize,
    /// Memory ceiling in bytes for one derivation
    MaxMemory,
}

impl Field {
    /// Option name used in messages
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::BlockSize => "blocksize",
            Self::Parallelism => "parallelism",
            Self::SaltSize => "saltSize",
            Self::MaxMemory => "maxmem",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameter validation errors, raised before any expensive work
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value is missing or is not an integer
    #[error("The '{field}' param must be an integer")]
    NotInteger {
        /// Offending field
        field: Field,
    },

    /// Value lies outside its permitted range
    #[error("The '{field}' param must be in the range ({min} <= {field} <= {max}), got {value}")]
    OutOfRange {
        /// Offending field
        field: Field,
        /// Value that was supplied
        value: i64,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },
}

impl ValidationError {
    /// Field the error refers to
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            Self::NotInteger { field } | Self::OutOfRange { field, .. } => *field,
        }
    }
}

/// Malformed PHC string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid PHC string: {reason}")]
pub struct FormatError {
    /// What was wrong with the input
    pub reason: String,
}

impl FormatError {
    /// Create a format error with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Record component that may be absent after decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    /// The salt segment
    Salt,
    /// The digest segment
    Hash,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Salt => f.write_str("salt"),
            Self::Hash => f.write_str("hash"),
        }
    }
}

/// Scrypt-specific errors
#[derive(Debug, Error)]
pub enum ScryptError {
    /// A tuning parameter failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The encoded string could not be decoded
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The decoded identifier is not supported
    #[error("Incompatible identifier '{found}' found in the hash")]
    IncompatibleIdentifier {
        /// Identifier found in the string
        found: String,
    },

    /// Salt or digest absent from a decoded record
    #[error("No {0} found in the given string")]
    MissingField(RecordField),

    /// The key-derivation primitive failed
    #[error("Key derivation error: {0}")]
    Derivation(String),

    /// The random source failed
    #[error("Random number generation failed: {0}")]
    RandomSource(String),

    /// Options could not be loaded
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Internal error occurred
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScryptError {
    /// Create a derivation error
    #[must_use]
    pub fn derivation(msg: impl Into<String>) -> Self {
        Self::Derivation(msg.into())
    }

    /// Create an internal error
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Validation error carried by this error, if any
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for scrypt operations
pub type Result<T> = std::result::Result<T, ScryptError>;
