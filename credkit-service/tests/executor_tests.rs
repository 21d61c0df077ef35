/// Integration tests for the bounded credential executor
///
/// Run with: cargo test -p credkit-service --test executor_tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use credkit_core::auth::entropy::{EntropySource, OsEntropy};
use credkit_core::auth::params::{HashParameters, DEFAULT_HASH_PARAMETERS};
use credkit_core::auth::password::{verify_password, PasswordCodec};
use credkit_core::auth::token::{verify_token, TokenIssuer, TOKEN_PREFIX};
use credkit_service::config::{Config, ExecutorConfig};
use credkit_service::executor::CredentialExecutor;
use credkit_service::ServiceError;

fn executor_with(params: HashParameters, config: ExecutorConfig) -> CredentialExecutor {
    CredentialExecutor::new(PasswordCodec::new(params).unwrap(), TokenIssuer::new(), &config)
}

fn fast_params() -> HashParameters {
    HashParameters::new(1024, 1, 1, 16, 32).unwrap()
}

/// Entropy source that records how many hashes are drawing salt at once
///
/// Salt is drawn inside the blocking closure while the permit is held, so the
/// peak seen here bounds from below the number of concurrent hashes.
#[derive(Debug, Default)]
struct InFlightCounter {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl EntropySource for InFlightCounter {
    fn fill(&self, dest: &mut [u8]) -> credkit_core::Result<()> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        // Hold the slot long enough for queued hashes to overlap
        std::thread::sleep(Duration::from_millis(50));
        let filled = OsEntropy.fill(dest);
        self.current.fetch_sub(1, Ordering::SeqCst);
        filled
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_hashes_respect_permit_cap() {
    let counter = Arc::new(InFlightCounter::default());
    let codec = PasswordCodec::with_entropy(fast_params(), counter.clone()).unwrap();
    let executor = Arc::new(CredentialExecutor::new(
        codec,
        TokenIssuer::new(),
        &ExecutorConfig {
            max_concurrent_hashes: 2,
            ..ExecutorConfig::default()
        },
    ));

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let executor = Arc::clone(&executor);
            tokio::spawn(async move {
                let password = format!("password-{}", i);
                let hash = executor.hash_password(password.clone()).await.unwrap();
                (password, hash)
            })
        })
        .collect();

    for task in tasks {
        let (password, hash) = task.await.unwrap();
        assert!(verify_password(&password, &hash).unwrap());
    }

    let peak = counter.peak.load(Ordering::SeqCst);
    assert!(peak <= 2, "{} hashes ran at once with a cap of 2", peak);
    assert_eq!(peak, 2, "queued hashes never overlapped");
    assert_eq!(counter.current.load(Ordering::SeqCst), 0);
    assert_eq!(executor.available_permits(), 2);
}

#[tokio::test]
async fn test_timeout_abandons_result_not_permit() {
    let executor = executor_with(
        DEFAULT_HASH_PARAMETERS,
        ExecutorConfig {
            max_concurrent_hashes: 1,
            timeout_ms: Some(1),
            ..ExecutorConfig::default()
        },
    );

    let err = executor
        .hash_password("slow password".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::TimedOut(d) if d == Duration::from_millis(1)));

    // The abandoned computation releases its permit once it completes
    let mut waited = Duration::ZERO;
    while executor.available_permits() == 0 && waited < Duration::from_secs(30) {
        tokio::time::sleep(Duration::from_millis(20)).await;
        waited += Duration::from_millis(20);
    }
    assert_eq!(executor.available_permits(), 1);
}

#[tokio::test]
async fn test_rehash_after_parameter_rotation() {
    let old = executor_with(
        HashParameters::new(512, 1, 1, 16, 32).unwrap(),
        ExecutorConfig::default(),
    );
    let stored = old.hash_password("rotate me".to_string()).await.unwrap();

    let current = executor_with(fast_params(), ExecutorConfig::default());
    assert!(current
        .verify_password("rotate me".to_string(), stored.clone())
        .await
        .unwrap());
    assert!(current.needs_rehash(&stored).unwrap());

    let replaced = current.hash_password("rotate me".to_string()).await.unwrap();
    assert!(!current.needs_rehash(&replaced).unwrap());
}

#[tokio::test]
async fn test_from_default_config() {
    let executor = CredentialExecutor::from_config(&Config::default()).unwrap();
    assert_eq!(executor.max_concurrent(), 4);
    assert_eq!(*executor.codec().params(), DEFAULT_HASH_PARAMETERS);

    let issued = executor.issue_token().unwrap();
    assert!(issued.secret.starts_with(TOKEN_PREFIX));
    let fingerprint = executor.fingerprint_token(&issued.secret).unwrap();
    assert_eq!(fingerprint.len(), 64);
    assert!(verify_token(&issued.secret, &fingerprint));
}

#[tokio::test]
async fn test_invalid_config_rejected() {
    let mut config = Config::default();
    config.hashing.salt_length = 0;

    let err = CredentialExecutor::from_config(&config).unwrap_err();
    assert!(matches!(err, ServiceError::Credential(e) if e.is_validation()));
}
