/// Bounded blocking executor for credential operations
///
/// Argon2 hashing is CPU- and memory-bound, so it must not run on the async
/// runtime's worker threads. [`CredentialExecutor`] moves every hash and
/// verify onto `spawn_blocking` and caps how many run at once with a
/// semaphore. With the default 64 MiB cost and 4 permits, hashing never
/// holds more than 256 MiB.
///
/// Token issuance and fingerprinting are cheap and run inline.
///
/// # Timeouts
///
/// When a timeout is configured, the caller stops waiting and receives
/// [`ServiceError::TimedOut`]. The blocking computation keeps its permit
/// until it actually finishes, so abandoned work still counts against the
/// concurrency cap.
///
/// # Example
///
/// ```no_run
/// use credkit_service::config::Config;
/// use credkit_service::executor::CredentialExecutor;
///
/// # async fn example() -> anyhow::Result<()> {
/// let executor = CredentialExecutor::from_config(&Config::from_env()?)?;
///
/// let stored = executor.hash_password("hunter22".to_string()).await?;
/// assert!(executor.verify_password("hunter22".to_string(), stored).await?);
///
/// let issued = executor.issue_token()?;
/// let fingerprint = executor.fingerprint_token(&issued.secret)?;
/// assert_eq!(fingerprint, issued.fingerprint);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use std::time::Duration;

use credkit_core::auth::password::PasswordCodec;
use credkit_core::auth::token::{self, IssuedToken, TokenIssuer};
use tokio::sync::Semaphore;

use crate::config::{Config, ExecutorConfig};
use crate::error::{ServiceError, ServiceResult};

/// Runs password operations on a bounded blocking pool
#[derive(Debug, Clone)]
pub struct CredentialExecutor {
    codec: Arc<PasswordCodec>,
    issuer: TokenIssuer,
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    timeout: Option<Duration>,
}

impl CredentialExecutor {
    /// Creates an executor around an existing codec and issuer
    pub fn new(codec: PasswordCodec, issuer: TokenIssuer, config: &ExecutorConfig) -> Self {
        let max_concurrent = config.max_concurrent_hashes.max(1);
        CredentialExecutor {
            codec: Arc::new(codec),
            issuer,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            timeout: config.timeout(),
        }
    }

    /// Builds an executor from service configuration, using OS entropy
    pub fn from_config(config: &Config) -> ServiceResult<Self> {
        let codec = PasswordCodec::new(config.hashing)?;
        tracing::info!(
            memory_cost_kib = config.hashing.memory_cost_kib,
            iterations = config.hashing.iterations,
            parallelism = config.hashing.parallelism,
            max_concurrent_hashes = config.executor.max_concurrent_hashes,
            "credential executor configured"
        );
        Ok(Self::new(codec, TokenIssuer::new(), &config.executor))
    }

    /// Codec used for new hashes
    pub fn codec(&self) -> &PasswordCodec {
        &self.codec
    }

    /// Maximum number of concurrent hash computations
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Permits currently free
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Hashes a password off the async runtime
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Credential`] for validation or randomness failures
    /// - [`ServiceError::TimedOut`] if the configured timeout elapses
    pub async fn hash_password(&self, password: String) -> ServiceResult<String> {
        self.run_blocking("hash", move |codec| {
            codec.hash(&password).map(|encoded| encoded.to_string())
        })
        .await
    }

    /// Verifies a password off the async runtime
    ///
    /// A mismatch is `Ok(false)`; only malformed input is an error.
    pub async fn verify_password(&self, password: String, encoded: String) -> ServiceResult<bool> {
        self.run_blocking("verify", move |codec| codec.verify(&password, &encoded))
            .await
    }

    /// Reports whether a stored hash should be replaced with one using the
    /// current parameters
    ///
    /// Parsing only, so this runs inline.
    pub fn needs_rehash(&self, encoded: &str) -> ServiceResult<bool> {
        Ok(self.codec.needs_rehash(encoded)?)
    }

    /// Issues a new access token
    pub fn issue_token(&self) -> ServiceResult<IssuedToken> {
        Ok(self.issuer.generate()?)
    }

    /// Validates a presented token and returns its fingerprint for lookup
    pub fn fingerprint_token(&self, secret: &str) -> ServiceResult<String> {
        token::validate_token_format(secret)?;
        Ok(token::fingerprint_token(secret))
    }

    /// Stops accepting new password operations
    ///
    /// Calls already holding a permit finish normally.
    pub fn close(&self) {
        self.permits.close();
    }

    async fn run_blocking<T, F>(&self, operation: &'static str, work: F) -> ServiceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&PasswordCodec) -> credkit_core::Result<T> + Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| ServiceError::Closed)?;

        let codec = Arc::clone(&self.codec);
        let handle = tokio::task::spawn_blocking(move || {
            // Held until the computation finishes, even if the caller gave up
            let _permit = permit;
            work(&codec)
        });

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    tracing::warn!(
                        operation,
                        timeout_ms = limit.as_millis() as u64,
                        "credential operation timed out"
                    );
                    return Err(ServiceError::TimedOut(limit));
                }
            },
            None => handle.await,
        };

        let result = joined.map_err(|e| {
            tracing::error!(operation, error = %e, "credential worker failed");
            ServiceError::WorkerFailed(e.to_string())
        })?;

        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credkit_core::auth::params::HashParameters;
    use credkit_core::CredentialError;

    fn fast_executor(max: usize) -> CredentialExecutor {
        let params = HashParameters::new(256, 1, 1, 16, 32).unwrap();
        let config = ExecutorConfig {
            max_concurrent_hashes: max,
            ..ExecutorConfig::default()
        };
        CredentialExecutor::new(PasswordCodec::new(params).unwrap(), TokenIssuer::new(), &config)
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let executor = fast_executor(2);
        let hash = executor.hash_password("password".to_string()).await.unwrap();

        assert!(executor
            .verify_password("password".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!executor
            .verify_password("other".to_string(), hash)
            .await
            .unwrap());
        assert_eq!(executor.available_permits(), 2);
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let executor = fast_executor(1);

        let err = executor.hash_password(String::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Credential(CredentialError::Validation(_))));

        let err = executor
            .verify_password("pw".to_string(), "not-a-hash".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Credential(CredentialError::MalformedHash)));
    }

    #[tokio::test]
    async fn test_closed_executor() {
        let executor = fast_executor(1);
        executor.close();

        let err = executor.hash_password("pw".to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Closed));

        // Inline token operations are unaffected
        assert!(executor.issue_token().is_ok());
    }

    #[test]
    fn test_token_operations() {
        let executor = fast_executor(1);
        let issued = executor.issue_token().unwrap();

        assert_eq!(executor.fingerprint_token(&issued.secret).unwrap(), issued.fingerprint);
        assert!(executor.fingerprint_token("wrongprefix_x").is_err());
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        assert_eq!(fast_executor(0).max_concurrent(), 1);
    }
}
