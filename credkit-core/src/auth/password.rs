/// Password hashing module using Argon2id
///
/// This module turns plaintext passwords into self-describing PHC strings
/// and verifies presented passwords against them.
///
/// # Security
///
/// - **Algorithm**: Argon2id, version 0x13
/// - **Parameters**: supplied by the caller as [`HashParameters`]; the
///   baseline is 64 MiB, 3 passes, 2 lanes, 16-byte salt, 32-byte output
/// - **Salt**: drawn from an [`EntropySource`] for every hash
/// - **Verification**: uses the parameters embedded in the stored hash and
///   compares digests in constant time
///
/// Hashing and verifying are CPU- and memory-bound. Async callers should run
/// them on a blocking pool and cap how many run at once.
///
/// # Example
///
/// ```
/// use credkit_core::auth::params::HashParameters;
/// use credkit_core::auth::password::{hash_password_with, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let params = HashParameters::new(1024, 1, 1, 16, 32)?;
///
/// // Hash a password
/// let hash = hash_password_with("super_secret_password_123", &params)?;
///
/// // Verify the password
/// assert!(verify_password("super_secret_password_123", &hash)?);
///
/// // Wrong password fails
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```

use std::fmt;
use std::sync::Arc;

use argon2::{Algorithm, Argon2, Version};

use crate::auth::compare::constant_time_eq;
use crate::auth::encoded::EncodedHash;
use crate::auth::entropy::{EntropySource, OsEntropy};
use crate::auth::params::{HashParameters, DEFAULT_HASH_PARAMETERS};
use crate::error::{CredentialError, Result};

/// Password hasher bound to a parameter set and an entropy source
///
/// The codec holds no mutable state and can be shared freely between
/// threads.
#[derive(Clone)]
pub struct PasswordCodec {
    params: HashParameters,
    entropy: Arc<dyn EntropySource>,
}

impl PasswordCodec {
    /// Creates a codec that salts from the operating system CSPRNG
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Validation`] if `params` is invalid
    pub fn new(params: HashParameters) -> Result<Self> {
        Self::with_entropy(params, Arc::new(OsEntropy))
    }

    /// Creates a codec with an explicit entropy source
    pub fn with_entropy(params: HashParameters, entropy: Arc<dyn EntropySource>) -> Result<Self> {
        params.validate()?;
        Ok(PasswordCodec { params, entropy })
    }

    /// Parameters used for new hashes
    pub fn params(&self) -> &HashParameters {
        &self.params
    }

    /// Hashes `password` with the codec's parameters
    ///
    /// # Errors
    ///
    /// - [`CredentialError::Validation`] if `password` is empty
    /// - [`CredentialError::Randomness`] if a salt cannot be drawn
    pub fn hash(&self, password: &str) -> Result<EncodedHash> {
        self.hash_with(password, &self.params)
    }

    /// Hashes `password` with explicit parameters, overriding the codec's
    pub fn hash_with(&self, password: &str, params: &HashParameters) -> Result<EncodedHash> {
        if password.is_empty() {
            return Err(CredentialError::Validation("password must not be empty"));
        }
        params.validate()?;

        let mut salt = vec![0u8; params.salt_length as usize];
        self.entropy.fill(&mut salt)?;

        let digest = derive(password.as_bytes(), &salt, params).map_err(|e| {
            tracing::error!(error = %e, "argon2 rejected validated parameters");
            CredentialError::Validation("hash parameters rejected by argon2")
        })?;

        tracing::debug!(
            memory_cost_kib = params.memory_cost_kib,
            iterations = params.iterations,
            parallelism = params.parallelism,
            "password hashed"
        );

        Ok(EncodedHash::from_parts(params, salt, digest))
    }

    /// Verifies `password` against a stored PHC string
    ///
    /// The digest is recomputed with the parameters and salt parsed from
    /// `encoded`, never with the codec's own parameters.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the password matches, `Ok(false)` if it doesn't
    ///
    /// # Errors
    ///
    /// - [`CredentialError::Validation`] if `password` is empty
    /// - [`CredentialError::MalformedHash`] if `encoded` cannot be parsed
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool> {
        verify_password(password, encoded)
    }

    /// Reports whether a stored hash was produced with different parameters
    ///
    /// Callers typically re-hash on the next successful login when this
    /// returns `true`.
    pub fn needs_rehash(&self, encoded: &str) -> Result<bool> {
        needs_rehash(encoded, &self.params)
    }
}

impl Default for PasswordCodec {
    fn default() -> Self {
        PasswordCodec {
            params: DEFAULT_HASH_PARAMETERS,
            entropy: Arc::new(OsEntropy),
        }
    }
}

impl fmt::Debug for PasswordCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCodec")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Hashes a password with [`DEFAULT_HASH_PARAMETERS`]
///
/// Example output:
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=2$c2FsdHNhbHRzYWx0$hash...
/// ```
///
/// # Errors
///
/// - [`CredentialError::Validation`] if `password` is empty
/// - [`CredentialError::Randomness`] if the OS random source fails
pub fn hash_password(password: &str) -> Result<String> {
    hash_password_with(password, &DEFAULT_HASH_PARAMETERS)
}

/// Hashes a password with explicit parameters, salting from the OS CSPRNG
pub fn hash_password_with(password: &str, params: &HashParameters) -> Result<String> {
    PasswordCodec::default()
        .hash_with(password, params)
        .map(|encoded| encoded.to_string())
}

/// Verifies a password against a stored PHC string
///
/// # Errors
///
/// - [`CredentialError::Validation`] if `password` is empty
/// - [`CredentialError::MalformedHash`] for any parse failure
pub fn verify_password(password: &str, encoded: &str) -> Result<bool> {
    if password.is_empty() {
        return Err(CredentialError::Validation("password must not be empty"));
    }

    let parsed = EncodedHash::parse(encoded).map_err(|e| {
        tracing::warn!("stored password hash failed to parse");
        e
    })?;
    let params = parsed.params();

    // Argon2 rejecting parsed parameters counts as malformed.
    let computed = derive(password.as_bytes(), parsed.salt(), &params)
        .map_err(|_| CredentialError::MalformedHash)?;

    let matched = constant_time_eq(&computed, parsed.digest());
    tracing::debug!(
        memory_cost_kib = params.memory_cost_kib,
        iterations = params.iterations,
        parallelism = params.parallelism,
        matched,
        "password verified"
    );
    Ok(matched)
}

/// Reports whether `encoded` differs from `current` in any parameter
///
/// # Errors
///
/// Returns [`CredentialError::MalformedHash`] if `encoded` cannot be parsed
pub fn needs_rehash(encoded: &str, current: &HashParameters) -> Result<bool> {
    Ok(EncodedHash::parse(encoded)?.params() != *current)
}

fn derive(
    password: &[u8],
    salt: &[u8],
    params: &HashParameters,
) -> std::result::Result<Vec<u8>, argon2::Error> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);
    let mut output = vec![0u8; params.output_length as usize];
    argon2.hash_password_into(password, salt, &mut output)?;
    Ok(output)
}
