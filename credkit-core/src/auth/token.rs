/// Personal access token utilities
///
/// This module mints opaque bearer tokens and computes the fingerprints that
/// are stored in their place.
///
/// # Security
///
/// - **Format**: `ckpat_{43_chars}` (prefix + 32 random bytes, base64url without padding)
/// - **Storage**: only the SHA-256 fingerprint (64 lowercase hex chars) is persisted
/// - **Lookup**: fingerprints are equality-indexed; no per-attempt KDF cost is
///   paid because the token already carries 256 bits of entropy
///
/// # Example
///
/// ```
/// use credkit_core::auth::token::{fingerprint_token, generate_token, validate_token_format};
///
/// let issued = generate_token().unwrap();
/// assert!(issued.secret.starts_with("ckpat_"));
///
/// // Validate format
/// assert!(validate_token_format(&issued.secret).is_ok());
///
/// // Fingerprint matches
/// assert_eq!(fingerprint_token(&issued.secret), issued.fingerprint);
/// ```

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::auth::compare::constant_time_eq;
use crate::auth::entropy::{EntropySource, OsEntropy};
use crate::error::{CredentialError, Result};

/// Prefix that marks a string as a credkit personal access token
pub const TOKEN_PREFIX: &str = "ckpat_";

/// Random bytes drawn per token
pub const TOKEN_RANDOM_BYTES: usize = 32;

/// Total length of a generated token (prefix + unpadded base64url of 32 bytes)
pub const TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + (TOKEN_RANDOM_BYTES * 4).div_ceil(3);

/// Length of a hex-encoded SHA-256 fingerprint
pub const FINGERPRINT_LENGTH: usize = 64;

/// A freshly issued token
///
/// `secret` is shown to the user once and must not be stored. `fingerprint`
/// is what the persistence layer keeps.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// One-time plaintext secret
    pub secret: String,

    /// Lowercase hex SHA-256 of `secret`
    pub fingerprint: String,
}

impl IssuedToken {
    /// Splits into `(secret, fingerprint)`
    pub fn into_parts(self) -> (String, String) {
        (self.secret, self.fingerprint)
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("secret", &"[REDACTED]")
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

/// Token generator bound to an entropy source
#[derive(Clone)]
pub struct TokenIssuer {
    entropy: Arc<dyn EntropySource>,
}

impl TokenIssuer {
    /// Creates an issuer backed by the operating system CSPRNG
    pub fn new() -> Self {
        Self::with_entropy(Arc::new(OsEntropy))
    }

    /// Creates an issuer with an explicit entropy source
    pub fn with_entropy(entropy: Arc<dyn EntropySource>) -> Self {
        TokenIssuer { entropy }
    }

    /// Generates a new token and its fingerprint
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Randomness`] if the entropy source fails
    pub fn generate(&self) -> Result<IssuedToken> {
        let mut random = [0u8; TOKEN_RANDOM_BYTES];
        self.entropy.fill(&mut random)?;

        let secret = format!("{}{}", TOKEN_PREFIX, URL_SAFE_NO_PAD.encode(random));
        let fingerprint = fingerprint_token(&secret);
        tracing::debug!(fingerprint = %fingerprint, "access token issued");

        Ok(IssuedToken { secret, fingerprint })
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

/// Generates a new token using the operating system CSPRNG
///
/// # Example
///
/// ```
/// use credkit_core::auth::token::generate_token;
///
/// let issued = generate_token().unwrap();
/// assert_eq!(issued.secret.len(), 49);
/// assert_eq!(issued.fingerprint.len(), 64); // SHA-256 hex is 64 chars
/// ```
pub fn generate_token() -> Result<IssuedToken> {
    TokenIssuer::new().generate()
}

/// Computes the SHA-256 fingerprint of a token
///
/// Deterministic: the same secret always yields the same 64-char lowercase
/// hex string.
///
/// # Example
///
/// ```
/// use credkit_core::auth::token::fingerprint_token;
///
/// let fingerprint = fingerprint_token("ckpat_test123");
/// assert_eq!(fingerprint.len(), 64);
/// assert_eq!(fingerprint, fingerprint_token("ckpat_test123"));
/// ```
pub fn fingerprint_token(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Cheap structural check before a fingerprint lookup
///
/// Not a security boundary: a well-formed token can still be unknown.
///
/// # Errors
///
/// Returns [`CredentialError::Validation`] naming the failed check: empty
/// input, missing prefix, or nothing after the prefix.
///
/// # Example
///
/// ```
/// use credkit_core::auth::token::validate_token_format;
///
/// assert!(validate_token_format("ckpat_abc").is_ok());
/// assert!(validate_token_format("").is_err());
/// assert!(validate_token_format("wrongprefix_x").is_err());
/// assert!(validate_token_format("ckpat_").is_err());
/// ```
pub fn validate_token_format(secret: &str) -> Result<()> {
    if secret.is_empty() {
        return Err(CredentialError::Validation("token is empty"));
    }

    if !secret.starts_with(TOKEN_PREFIX) {
        return Err(CredentialError::Validation("token does not have the expected prefix"));
    }

    if secret.len() <= TOKEN_PREFIX.len() {
        return Err(CredentialError::Validation("token is too short"));
    }

    Ok(())
}

/// Checks a presented token against a stored fingerprint
///
/// Recomputes the fingerprint and compares in constant time.
pub fn verify_token(secret: &str, stored_fingerprint: &str) -> bool {
    let computed = fingerprint_token(secret);
    constant_time_eq(computed.as_bytes(), stored_fingerprint.as_bytes())
}
