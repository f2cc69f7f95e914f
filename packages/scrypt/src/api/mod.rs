//! Fluent scrypt API
//!
//! Usage: `Scrypt::hash().compute(password).await` and
//! `Scrypt::verify().verify(&encoded, password).await`

pub mod hasher;
pub mod verifier;

pub use hasher::{HashBuilder, HashBuilderWithHandler};
pub use verifier::{VerifyBuilder, VerifyBuilderWithHandler};
