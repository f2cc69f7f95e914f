//! Verify builder - checks a password against a stored PHC string

use crate::async_result::{AsyncScryptResult, AsyncScryptResultWithHandler};
use crate::error::RecordField;
use crate::params::{self, ScryptParams};
use crate::primitives::{constant_time_compare, KeyDeriver, ScryptKdf, DEFAULT_MAX_MEMORY};
use crate::{codec, Result, ScryptError, IDENTIFIER};
use std::sync::Arc;
use zeroize::Zeroizing;

/// Builder for verifying a password
pub struct VerifyBuilder {
    deriver: Option<Arc<dyn KeyDeriver>>,
    max_memory: u64,
}

/// Verify builder with result handler
pub struct VerifyBuilderWithHandler<F> {
    inner: VerifyBuilder,
    handler: F,
}

impl Default for VerifyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything needed to re-derive a stored digest
struct Prepared {
    params: ScryptParams,
    linear_cost: u64,
    salt: Vec<u8>,
    expected: Vec<u8>,
}

impl VerifyBuilder {
    /// Create a builder backed by scrypt
    #[must_use]
    pub fn new() -> Self {
        Self {
            deriver: None,
            max_memory: DEFAULT_MAX_MEMORY,
        }
    }

    /// Set the memory ceiling in bytes for the built-in scrypt deriver
    ///
    /// Stored hashes whose parameters need more fail with
    /// [`ScryptError::Derivation`]. Has no effect once a custom deriver is
    /// installed with [`with_deriver`](Self::with_deriver).
    #[must_use]
    pub fn with_max_memory(mut self, bytes: u64) -> Self {
        self.max_memory = bytes;
        self
    }

    /// Use a different key-derivation primitive
    #[must_use]
    pub fn with_deriver<D: KeyDeriver + 'static>(mut self, deriver: D) -> Self {
        self.deriver = Some(Arc::new(deriver));
        self
    }

    /// Add `on_result` handler
    pub fn on_result<F, U>(self, handler: F) -> VerifyBuilderWithHandler<F>
    where
        F: FnOnce(Result<bool>) -> U + Unpin,
    {
        VerifyBuilderWithHandler {
            inner: self,
            handler,
        }
    }

    /// Check `password` against `encoded`
    ///
    /// Resolves to `Ok(false)` on a mismatch. Malformed strings, unsupported
    /// identifiers and invalid parameters resolve to errors without running
    /// the derivation. Must be called within a tokio runtime.
    pub fn verify<P: Into<Vec<u8>>>(self, encoded: &str, password: P) -> AsyncScryptResult<bool> {
        let prepared = match prepare(encoded) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::debug!(error = %e, "rejected stored scrypt hash");
                return AsyncScryptResult::error(e);
            }
        };

        let password = Zeroizing::new(password.into());
        let max_memory = self.max_memory;
        let deriver = self
            .deriver
            .unwrap_or_else(|| Arc::new(ScryptKdf::new(max_memory)));
        AsyncScryptResult::spawn_blocking(move || {
            let Prepared {
                params,
                linear_cost,
                salt,
                expected,
            } = prepared;
            let actual = Zeroizing::new(deriver.derive(
                &password,
                linear_cost,
                params.block_size,
                params.parallelism,
                &salt,
                expected.len(),
            )?);
            let matched = constant_time_compare(&actual, &expected);
            tracing::debug!(matched, "scrypt verification finished");
            Ok(matched)
        })
    }
}

fn prepare(encoded: &str) -> Result<Prepared> {
    let record = codec::deserialize(encoded)?;

    if record.id != IDENTIFIER {
        return Err(ScryptError::IncompatibleIdentifier { found: record.id });
    }

    let params = params::validate(record.block_size, record.cost, record.parallelism, None)?;

    let salt = record.salt.ok_or(ScryptError::MissingField(RecordField::Salt))?;
    let expected = record
        .hash
        .filter(|hash| !hash.is_empty())
        .ok_or(ScryptError::MissingField(RecordField::Hash))?;

    let linear_cost = params.linear_cost().ok_or_else(|| {
        ScryptError::derivation(format!("cost 2^{} exceeds 64 bits", params.cost))
    })?;

    Ok(Prepared {
        params,
        linear_cost,
        salt,
        expected,
    })
}

impl<F, U> VerifyBuilderWithHandler<F>
where
    F: FnOnce(Result<bool>) -> U + Unpin,
{
    /// Check `password` against `encoded` and pass the outcome to the handler
    pub fn verify<P: Into<Vec<u8>>>(
        self,
        encoded: &str,
        password: P,
    ) -> AsyncScryptResultWithHandler<bool, F> {
        self.inner.verify(encoded, password).on_result(self.handler)
    }
}
