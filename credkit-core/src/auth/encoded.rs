/// PHC string encoding for Argon2id password hashes
///
/// An [`EncodedHash`] is the only artifact persisted for a password
/// credential. Its text form is
///
/// ```text
/// $argon2id$v=19$m=<memory>,t=<iterations>,p=<parallelism>$<salt>$<digest>
/// ```
///
/// where salt and digest use standard-alphabet base64 without padding.
///
/// Parsing is strict and collapses every failure into
/// [`CredentialError::MalformedHash`]: wrong field count, unknown algorithm,
/// unsupported version, non-numeric or out-of-range parameters, and
/// undecodable or empty salt/digest are indistinguishable to the caller.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;

use crate::auth::params::{HashParameters, MAX_PARALLELISM};
use crate::error::{CredentialError, Result};

/// Algorithm identifier written to every encoded hash
pub const ALGORITHM_ID: &str = "argon2id";

/// Argon2 version 1.3, the only version this crate reads or writes
pub const SUPPORTED_VERSION: u32 = 0x13;

const FIELD_DELIMITER: char = '$';

/// Parsed form of a stored password hash
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedHash {
    params: HashParameters,
    salt: Vec<u8>,
    digest: Vec<u8>,
}

impl EncodedHash {
    /// Assembles an encoded hash from freshly derived material
    ///
    /// `salt` and `digest` must be `params.salt_length` and
    /// `params.output_length` bytes long.
    pub(crate) fn from_parts(params: &HashParameters, salt: Vec<u8>, digest: Vec<u8>) -> Self {
        debug_assert_eq!(salt.len(), params.salt_length as usize);
        debug_assert_eq!(digest.len(), params.output_length as usize);
        EncodedHash {
            params: *params,
            salt,
            digest,
        }
    }

    /// Parses a PHC string
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::MalformedHash`] for any structural or
    /// semantic problem. The error does not say which check failed.
    ///
    /// # Example
    ///
    /// ```
    /// use credkit_core::auth::encoded::EncodedHash;
    ///
    /// let encoded = "$argon2id$v=19$m=65536,t=3,p=2$c29tZXNhbHRzb21lc2FsdA$\
    ///                YWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWE";
    /// let parsed = EncodedHash::parse(encoded).unwrap();
    /// assert_eq!(parsed.params().memory_cost_kib, 65536);
    /// assert_eq!(parsed.params().salt_length, 16);
    ///
    /// assert!(EncodedHash::parse("not-a-hash").is_err());
    /// ```
    pub fn parse(encoded: &str) -> Result<Self> {
        parse_fields(encoded).ok_or(CredentialError::MalformedHash)
    }

    /// Parameters this hash was produced with
    ///
    /// Salt and output lengths are taken from the decoded salt and digest.
    pub fn params(&self) -> HashParameters {
        self.params
    }

    /// Raw salt bytes
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Raw digest bytes
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }
}

fn parse_fields(encoded: &str) -> Option<EncodedHash> {
    let fields: Vec<&str> = encoded.split(FIELD_DELIMITER).collect();
    let [leading, algorithm, version, params, salt, digest] = fields.as_slice() else {
        return None;
    };

    if !leading.is_empty() || *algorithm != ALGORITHM_ID {
        return None;
    }

    // Newer versions fail closed.
    let version = parse_decimal(version.strip_prefix("v=")?)?;
    if version != SUPPORTED_VERSION {
        return None;
    }

    let mut pairs = params.split(',');
    let memory_cost_kib = parse_decimal(pairs.next()?.strip_prefix("m=")?)?;
    let iterations = parse_decimal(pairs.next()?.strip_prefix("t=")?)?;
    let parallelism = parse_decimal(pairs.next()?.strip_prefix("p=")?)?;
    if pairs.next().is_some() {
        return None;
    }
    if parallelism == 0 || parallelism > MAX_PARALLELISM {
        return None;
    }

    let salt = STANDARD_NO_PAD.decode(salt).ok()?;
    let digest = STANDARD_NO_PAD.decode(digest).ok()?;
    if salt.is_empty() || digest.is_empty() {
        return None;
    }

    let params = HashParameters {
        memory_cost_kib,
        iterations,
        parallelism: u8::try_from(parallelism).ok()?,
        salt_length: u32::try_from(salt.len()).ok()?,
        output_length: u32::try_from(digest.len()).ok()?,
    };
    // Also enforces the MAX_* bounds, so a stored hash cannot demand
    // unbounded memory or time from verification.
    params.validate().ok()?;

    Some(EncodedHash::from_parts(&params, salt, digest))
}

/// Parses an unsigned decimal with no sign, whitespace, or empty input
fn parse_decimal(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}$v={}$m={},t={},p={}${}${}",
            ALGORITHM_ID,
            SUPPORTED_VERSION,
            self.params.memory_cost_kib,
            self.params.iterations,
            self.params.parallelism,
            STANDARD_NO_PAD.encode(&self.salt),
            STANDARD_NO_PAD.encode(&self.digest),
        )
    }
}

// Salt and digest stay out of logs.
impl fmt::Debug for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedHash")
            .field("memory_cost_kib", &self.params.memory_cost_kib)
            .field("iterations", &self.params.iterations)
            .field("parallelism", &self.params.parallelism)
            .field("salt_length", &self.params.salt_length)
            .field("output_length", &self.params.output_length)
            .finish()
    }
}

impl FromStr for EncodedHash {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self> {
        EncodedHash::parse(s)
    }
}
