/// Configuration management for the credential service
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct. The hashing parameters read here are the
/// explicit defaults handed to the password codec.
///
/// # Environment Variables
///
/// - `CREDKIT_ARGON2_MEMORY_KIB`: Argon2 memory cost (default: 65536)
/// - `CREDKIT_ARGON2_ITERATIONS`: Argon2 passes (default: 3)
/// - `CREDKIT_ARGON2_PARALLELISM`: Argon2 lanes, 1-255 (default: 2)
/// - `CREDKIT_SALT_LENGTH`: salt bytes (default: 16)
/// - `CREDKIT_OUTPUT_LENGTH`: digest bytes (default: 32)
/// - `CREDKIT_MAX_CONCURRENT_HASHES`: concurrent Argon2 computations (default: 4)
/// - `CREDKIT_MEMORY_BUDGET_MIB`: optional cap on concurrent hash memory
/// - `CREDKIT_HASH_TIMEOUT_MS`: optional per-call timeout
/// - `CREDKIT_LOG_FORMAT`: `text` or `json` (default: text)
/// - `RUST_LOG`: Log filter (default: credkit_service=debug,credkit_core=info)
///
/// # Example
///
/// ```no_run
/// use credkit_service::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Hashing with m={} KiB", config.hashing.memory_cost_kib);
/// # Ok(())
/// # }
/// ```

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use credkit_core::auth::params::{HashParameters, DEFAULT_HASH_PARAMETERS};
use serde::{Deserialize, Serialize};

use crate::telemetry::LogFormat;

/// Default number of concurrent hash computations
pub const DEFAULT_MAX_CONCURRENT_HASHES: usize = 4;

/// Complete service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Parameters for newly created password hashes
    pub hashing: HashParameters,

    /// Blocking executor configuration
    pub executor: ExecutorConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// Blocking executor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Maximum Argon2 computations in flight at once
    pub max_concurrent_hashes: usize,

    /// Optional memory budget for concurrent hashing (MiB)
    pub memory_budget_mib: Option<u64>,

    /// Optional timeout after which a caller stops waiting for a result
    pub timeout_ms: Option<u64>,
}

impl ExecutorConfig {
    /// Timeout as a `Duration`
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        ExecutorConfig {
            max_concurrent_hashes: DEFAULT_MAX_CONCURRENT_HASHES,
            memory_budget_mib: None,
            timeout_ms: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hashing: DEFAULT_HASH_PARAMETERS,
            executor: ExecutorConfig::default(),
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// Reads a `.env` file first if one is present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Environment variables have invalid values
    /// - Hash parameters are rejected by the codec
    /// - Concurrent hashing would exceed the memory budget
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_process_env()
    }

    /// Loads configuration from the current process environment only
    pub fn from_process_env() -> anyhow::Result<Self> {
        let parallelism: u32 = env_or(
            "CREDKIT_ARGON2_PARALLELISM",
            u32::from(DEFAULT_HASH_PARAMETERS.parallelism),
        )?;
        let hashing = HashParameters::new(
            env_or("CREDKIT_ARGON2_MEMORY_KIB", DEFAULT_HASH_PARAMETERS.memory_cost_kib)?,
            env_or("CREDKIT_ARGON2_ITERATIONS", DEFAULT_HASH_PARAMETERS.iterations)?,
            parallelism,
            env_or("CREDKIT_SALT_LENGTH", DEFAULT_HASH_PARAMETERS.salt_length)?,
            env_or("CREDKIT_OUTPUT_LENGTH", DEFAULT_HASH_PARAMETERS.output_length)?,
        )
        .context("invalid Argon2 parameters")?;

        let executor = ExecutorConfig {
            max_concurrent_hashes: env_or(
                "CREDKIT_MAX_CONCURRENT_HASHES",
                DEFAULT_MAX_CONCURRENT_HASHES,
            )?,
            memory_budget_mib: env_opt("CREDKIT_MEMORY_BUDGET_MIB")?,
            timeout_ms: env_opt("CREDKIT_HASH_TIMEOUT_MS")?,
        };

        let log_format = env_or("CREDKIT_LOG_FORMAT", LogFormat::Text)?;

        let config = Config {
            hashing,
            executor,
            log_format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints
    pub fn validate(&self) -> anyhow::Result<()> {
        self.hashing.validate().context("invalid Argon2 parameters")?;

        if self.executor.max_concurrent_hashes == 0 {
            anyhow::bail!("CREDKIT_MAX_CONCURRENT_HASHES must be greater than zero");
        }

        if let Some(budget_mib) = self.executor.memory_budget_mib {
            let peak_mib = self.peak_hash_memory_kib().div_ceil(1024);
            if peak_mib > budget_mib {
                anyhow::bail!(
                    "{} concurrent hashes at {} KiB need {} MiB, over the {} MiB budget",
                    self.executor.max_concurrent_hashes,
                    self.hashing.memory_cost_kib,
                    peak_mib,
                    budget_mib
                );
            }
        }

        Ok(())
    }

    /// Worst-case memory held by in-flight hashes (KiB)
    pub fn peak_hash_memory_kib(&self) -> u64 {
        self.hashing.memory_footprint_kib() * self.executor.max_concurrent_hashes as u64
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(env_opt(key)?.unwrap_or(default))
}

fn env_opt<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{} has an invalid value", key)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("{} is not valid unicode", key)),
    }
}
