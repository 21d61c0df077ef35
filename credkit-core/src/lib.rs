//! # Credkit Core
//!
//! This crate contains the credential-security primitives used by the
//! registration, login and token-issuance flows.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, encoded hash parsing, bearer token issuance
//! - `error`: the credential error taxonomy
//!
//! Nothing in this crate persists state. Callers own the encoded hashes and
//! token fingerprints it produces.

pub mod auth;
pub mod error;

pub use error::{CredentialError, Result};

/// Current version of the credkit core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
