//! Error types for credential operations
//!
//! Every fallible operation in this crate returns [`CredentialError`]. The
//! taxonomy is intentionally small:
//!
//! - [`CredentialError::Validation`]: the caller supplied structurally invalid
//!   input (empty password, zero-length parameter, malformed token shape)
//! - [`CredentialError::MalformedHash`]: a stored encoded hash could not be
//!   parsed. It carries no detail, so every parse failure looks the same.
//! - [`CredentialError::Randomness`]: the secure entropy source failed
//!
//! Error messages never contain plaintext passwords or token secrets.

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CredentialError>;

/// Error type for credential operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// Caller supplied invalid input
    #[error("Validation failed: {0}")]
    Validation(&'static str),

    /// Stored hash is not a valid encoded hash
    #[error("Malformed password hash")]
    MalformedHash,

    /// Secure random source is unavailable
    #[error("Secure randomness unavailable: {0}")]
    Randomness(String),
}

impl CredentialError {
    /// Returns `true` for errors caused by caller input
    pub fn is_validation(&self) -> bool {
        matches!(self, CredentialError::Validation(_))
    }

    /// Returns `true` for encoded hash parse failures
    pub fn is_malformed_hash(&self) -> bool {
        matches!(self, CredentialError::MalformedHash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CredentialError::Validation("password must not be empty");
        assert_eq!(err.to_string(), "Validation failed: password must not be empty");

        let err = CredentialError::Randomness("device not ready".to_string());
        assert_eq!(err.to_string(), "Secure randomness unavailable: device not ready");
    }

    #[test]
    fn test_malformed_hash_display_is_uniform() {
        assert_eq!(CredentialError::MalformedHash.to_string(), "Malformed password hash");
    }

    #[test]
    fn test_error_predicates() {
        assert!(CredentialError::Validation("x").is_validation());
        assert!(!CredentialError::MalformedHash.is_validation());
        assert!(CredentialError::MalformedHash.is_malformed_hash());
        assert!(!CredentialError::Randomness(String::new()).is_malformed_hash());
    }
}
