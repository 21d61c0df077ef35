//! # Credkit Calibrate
//!
//! Hashes and verifies a throwaway random password with the configured
//! Argon2 parameters and reports how long each step took, so operators can
//! tune cost for a host before rolling it out.
//!
//! ## Usage
//!
//! ```bash
//! CREDKIT_ARGON2_MEMORY_KIB=131072 cargo run -p credkit-service --bin credkit-calibrate
//! ```

use std::time::Instant;

use credkit_service::config::Config;
use credkit_service::executor::CredentialExecutor;
use credkit_service::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init_tracing(config.log_format)?;

    tracing::info!(
        "Credkit calibration v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let executor = CredentialExecutor::from_config(&config)?;

    // A fresh token secret doubles as a random throwaway password
    let password = executor.issue_token()?.secret;

    let start = Instant::now();
    let encoded = executor.hash_password(password.clone()).await?;
    let hash_elapsed = start.elapsed();

    let start = Instant::now();
    let matched = executor.verify_password(password, encoded).await?;
    let verify_elapsed = start.elapsed();

    if !matched {
        anyhow::bail!("calibration hash did not verify");
    }

    tracing::info!(
        memory_cost_kib = config.hashing.memory_cost_kib,
        iterations = config.hashing.iterations,
        parallelism = config.hashing.parallelism,
        hash_ms = hash_elapsed.as_millis() as u64,
        verify_ms = verify_elapsed.as_millis() as u64,
        peak_memory_mib = config.peak_hash_memory_kib() / 1024,
        "calibration complete"
    );

    Ok(())
}
