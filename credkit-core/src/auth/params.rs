/// Argon2id cost parameters
///
/// [`HashParameters`] is the explicit configuration value handed to every
/// hashing call. The composition root decides which parameters to use;
/// [`DEFAULT_HASH_PARAMETERS`] is the recommended baseline.
///
/// Stored hashes carry their own parameters, so changing the configured
/// values never invalidates existing credentials.

use argon2::Params;
use serde::{Deserialize, Serialize};

use crate::error::{CredentialError, Result};

/// Largest parallelism value the encoded hash format accepts
pub const MAX_PARALLELISM: u32 = 255;

/// Shortest salt Argon2 accepts (bytes)
pub const MIN_SALT_LENGTH: u32 = 8;

/// Shortest digest Argon2 produces (bytes)
pub const MIN_OUTPUT_LENGTH: u32 = 4;

/// Largest memory cost accepted, 1 GiB (KiB)
pub const MAX_MEMORY_COST_KIB: u32 = 1024 * 1024;

/// Largest number of passes accepted
pub const MAX_ITERATIONS: u32 = 64;

/// Longest salt accepted (bytes)
pub const MAX_SALT_LENGTH: u32 = 128;

/// Longest digest accepted (bytes)
pub const MAX_OUTPUT_LENGTH: u32 = 128;

/// Baseline parameters: 64 MiB, 3 passes, 2 lanes, 16-byte salt, 32-byte digest
pub const DEFAULT_HASH_PARAMETERS: HashParameters = HashParameters {
    memory_cost_kib: 65536,
    iterations: 3,
    parallelism: 2,
    salt_length: 16,
    output_length: 32,
};

/// Tunable cost parameters for a single password hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashParameters {
    /// Memory cost in KiB
    pub memory_cost_kib: u32,

    /// Number of passes over memory
    pub iterations: u32,

    /// Number of lanes (1..=255)
    pub parallelism: u8,

    /// Salt length in bytes
    pub salt_length: u32,

    /// Digest length in bytes
    pub output_length: u32,
}

impl Default for HashParameters {
    fn default() -> Self {
        DEFAULT_HASH_PARAMETERS
    }
}

impl HashParameters {
    /// Builds a validated parameter set
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Validation`] if any value is out of range
    /// (see [`HashParameters::validate`]).
    ///
    /// # Example
    ///
    /// ```
    /// use credkit_core::auth::params::HashParameters;
    ///
    /// let params = HashParameters::new(19456, 2, 1, 16, 32).unwrap();
    /// assert_eq!(params.memory_cost_kib, 19456);
    ///
    /// assert!(HashParameters::new(19456, 2, 1, 0, 32).is_err());
    /// ```
    pub fn new(
        memory_cost_kib: u32,
        iterations: u32,
        parallelism: u32,
        salt_length: u32,
        output_length: u32,
    ) -> Result<Self> {
        if parallelism == 0 || parallelism > MAX_PARALLELISM {
            return Err(CredentialError::Validation(
                "parallelism must be between 1 and 255",
            ));
        }

        let params = HashParameters {
            memory_cost_kib,
            iterations,
            parallelism: parallelism as u8,
            salt_length,
            output_length,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks every constraint the hash function and the encoded format impose
    ///
    /// - salt and output lengths are non-zero
    /// - parallelism is at least 1
    /// - at least one iteration
    /// - salt is at least 8 bytes and output at least 4 bytes
    /// - memory is at least 8 KiB per lane
    /// - memory, iterations, salt and output stay within the `MAX_*` bounds
    pub fn validate(&self) -> Result<()> {
        if self.salt_length == 0 {
            return Err(CredentialError::Validation("salt length must be greater than zero"));
        }
        if self.output_length == 0 {
            return Err(CredentialError::Validation("output length must be greater than zero"));
        }
        if self.parallelism == 0 {
            return Err(CredentialError::Validation(
                "parallelism must be between 1 and 255",
            ));
        }
        if self.iterations == 0 {
            return Err(CredentialError::Validation("iterations must be greater than zero"));
        }
        if self.salt_length < MIN_SALT_LENGTH {
            return Err(CredentialError::Validation("salt length must be at least 8 bytes"));
        }
        if self.output_length < MIN_OUTPUT_LENGTH {
            return Err(CredentialError::Validation("output length must be at least 4 bytes"));
        }
        if u64::from(self.memory_cost_kib) < 8 * u64::from(self.parallelism) {
            return Err(CredentialError::Validation(
                "memory cost must be at least 8 KiB per lane",
            ));
        }
        if self.memory_cost_kib > MAX_MEMORY_COST_KIB {
            return Err(CredentialError::Validation("memory cost must not exceed 1 GiB"));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(CredentialError::Validation("iterations must not exceed 64"));
        }
        if self.salt_length > MAX_SALT_LENGTH {
            return Err(CredentialError::Validation("salt length must not exceed 128 bytes"));
        }
        if self.output_length > MAX_OUTPUT_LENGTH {
            return Err(CredentialError::Validation("output length must not exceed 128 bytes"));
        }
        Ok(())
    }

    /// Worst-case memory a single hash with these parameters allocates (KiB)
    pub fn memory_footprint_kib(&self) -> u64 {
        u64::from(self.memory_cost_kib)
    }

    pub(crate) fn to_argon2(self) -> std::result::Result<Params, argon2::Error> {
        Params::new(
            self.memory_cost_kib,
            self.iterations,
            u32::from(self.parallelism),
            Some(self.output_length as usize),
        )
    }
}
