/// Entropy sources for salts and token secrets
///
/// Every operation that needs randomness takes it through the
/// [`EntropySource`] trait instead of reaching for a global RNG. Production
/// code uses [`OsEntropy`], which reads from the operating system CSPRNG and
/// reports failure as [`CredentialError::Randomness`]. There is no fallback
/// to a weaker generator.
///
/// Tests can swap in [`SeededEntropy`] for reproducible output or
/// [`FailingEntropy`] to exercise the failure path.
///
/// # Example
///
/// ```
/// use credkit_core::auth::entropy::{EntropySource, OsEntropy};
///
/// let mut salt = [0u8; 16];
/// OsEntropy.fill(&mut salt).expect("OS randomness available");
/// ```

use std::sync::Mutex;

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::error::{CredentialError, Result};

/// A source of cryptographically secure random bytes
pub trait EntropySource: Send + Sync {
    /// Fills `dest` entirely with random bytes or fails
    fn fill(&self, dest: &mut [u8]) -> Result<()>;
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CredentialError::Randomness(e.to_string()))
    }
}

/// Deterministic source seeded from a `u64`
///
/// Only suitable for tests. Two instances built from the same seed produce
/// the same byte stream.
#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
}

impl SeededEntropy {
    /// Creates a deterministic source from `seed`
    pub fn new(seed: u64) -> Self {
        SeededEntropy {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| CredentialError::Randomness("seeded source poisoned".to_string()))?;
        rng.fill_bytes(dest);
        Ok(())
    }
}

/// Source that always fails, for exercising error paths
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEntropy;

impl EntropySource for FailingEntropy {
    fn fill(&self, _dest: &mut [u8]) -> Result<()> {
        Err(CredentialError::Randomness("entropy source unavailable".to_string()))
    }
}
