//! Hash builder - produces new PHC strings
//!
//! Usage: `Scrypt::hash().with_cost(14).compute(password).await`

use crate::async_result::{AsyncScryptResult, AsyncScryptResultWithHandler};
use crate::options::{HashOptions, HASH_LENGTH};
use crate::params::{self, ScryptParams};
use crate::primitives::{KeyDeriver, OsEntropy, RandomSource, ScryptKdf};
use crate::record::HashRecord;
use crate::{codec, Result, ScryptError};
use std::sync::Arc;
use zeroize::Zeroizing;

/// Builder for hashing a password
pub struct HashBuilder {
    options: HashOptions,
    deriver: Option<Arc<dyn KeyDeriver>>,
    random: Arc<dyn RandomSource>,
}

/// Hash builder with result handler
pub struct HashBuilderWithHandler<F> {
    inner: HashBuilder,
    handler: F,
}

impl Default for HashBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HashBuilder {
    /// Create a builder with default options, scrypt and OS entropy
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: HashOptions::default(),
            deriver: None,
            random: Arc::new(OsEntropy),
        }
    }

    /// Replace all options at once
    #[must_use]
    pub fn with_options(mut self, options: HashOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the cost exponent `n`
    #[must_use]
    pub fn with_cost(mut self, cost: i64) -> Self {
        self.options.cost = cost;
        self
    }

    /// Set the block size `r`
    #[must_use]
    pub fn with_block_size(mut self, block_size: i64) -> Self {
        self.options.block_size = block_size;
        self
    }

    /// Set the parallelism `p`
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: i64) -> Self {
        self.options.parallelism = parallelism;
        self
    }

    /// Set the generated salt size in bytes
    #[must_use]
    pub fn with_salt_size(mut self, salt_size: i64) -> Self {
        self.options.salt_size = salt_size;
        self
    }

    /// Set the memory ceiling in bytes for the built-in scrypt deriver
    ///
    /// Derivations needing more fail with [`ScryptError::Derivation`]. Has no
    /// effect once a custom deriver is installed with
    /// [`with_deriver`](Self::with_deriver).
    #[must_use]
    pub fn with_max_memory(mut self, bytes: u64) -> Self {
        self.options.max_memory = bytes;
        self
    }

    /// Use a different key-derivation primitive
    #[must_use]
    pub fn with_deriver<D: KeyDeriver + 'static>(mut self, deriver: D) -> Self {
        self.deriver = Some(Arc::new(deriver));
        self
    }

    /// Use a different random source for salts
    #[must_use]
    pub fn with_random_source<R: RandomSource + 'static>(mut self, random: R) -> Self {
        self.random = Arc::new(random);
        self
    }

    /// Options currently configured
    #[must_use]
    pub fn options(&self) -> &HashOptions {
        &self.options
    }

    /// Add `on_result` handler
    pub fn on_result<F, U>(self, handler: F) -> HashBuilderWithHandler<F>
    where
        F: FnOnce(Result<String>) -> U + Unpin,
    {
        HashBuilderWithHandler {
            inner: self,
            handler,
        }
    }

    /// Hash `password`, resolving to the encoded PHC string
    ///
    /// Options are validated before any randomness is drawn or derivation is
    /// started. Must be called within a tokio runtime.
    pub fn compute<P: Into<Vec<u8>>>(self, password: P) -> AsyncScryptResult<String> {
        let password = Zeroizing::new(password.into());
        let options = self.options;

        let params = match params::validate(
            Some(options.block_size),
            Some(options.cost),
            Some(options.parallelism),
            Some(options.salt_size),
        ) {
            Ok(params) => params,
            Err(e) => {
                tracing::debug!(error = %e, "rejected scrypt hash options");
                return AsyncScryptResult::error(e.into());
            }
        };

        let Some(linear_cost) = params.linear_cost() else {
            return AsyncScryptResult::error(ScryptError::derivation(format!(
                "cost 2^{} exceeds 64 bits",
                params.cost
            )));
        };

        // Salt size is range-checked to [8, 1024] above.
        let salt_len = usize::try_from(options.salt_size).unwrap_or_default();
        let salt = match self.random.fill(salt_len) {
            Ok(salt) => salt,
            Err(e) => return AsyncScryptResult::error(e),
        };

        tracing::debug!(
            cost = params.cost,
            block_size = params.block_size,
            parallelism = params.parallelism,
            salt_len,
            "hashing password with scrypt"
        );

        let deriver = self
            .deriver
            .unwrap_or_else(|| Arc::new(ScryptKdf::new(options.max_memory)));
        AsyncScryptResult::spawn_blocking(move || {
            hash_with(deriver.as_ref(), &password, params, linear_cost, salt)
        })
    }
}

fn hash_with(
    deriver: &dyn KeyDeriver,
    password: &[u8],
    params: ScryptParams,
    linear_cost: u64,
    salt: Zeroizing<Vec<u8>>,
) -> Result<String> {
    let hash = Zeroizing::new(deriver.derive(
        password,
        linear_cost,
        params.block_size,
        params.parallelism,
        &salt,
        HASH_LENGTH,
    )?);
    tracing::trace!("scrypt derivation finished");

    let record = HashRecord::new(params, salt.to_vec(), hash.to_vec());
    Ok(codec::serialize(&record))
}

impl<F, U> HashBuilderWithHandler<F>
where
    F: FnOnce(Result<String>) -> U + Unpin,
{
    /// Hash `password` and pass the outcome to the handler
    pub fn compute<P: Into<Vec<u8>>>(
        self,
        password: P,
    ) -> AsyncScryptResultWithHandler<String, F> {
        self.inner.compute(password).on_result(self.handler)
    }
}
