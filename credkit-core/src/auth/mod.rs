/// Credential primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`encoded`]: PHC string encoding and strict parsing
/// - [`params`]: tunable Argon2id cost parameters
/// - [`token`]: personal access token generation and fingerprinting
/// - [`entropy`]: injectable secure random sources
/// - [`compare`]: constant-time byte comparison
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id, parameters embedded in every hash
/// - **Access Tokens**: 256-bit random secrets, SHA-256 fingerprints
/// - **Constant-time Comparison**: digest and fingerprint checks never short-circuit
///
/// # Example
///
/// ```
/// use credkit_core::auth::params::HashParameters;
/// use credkit_core::auth::password::PasswordCodec;
/// use credkit_core::auth::token::{fingerprint_token, generate_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let codec = PasswordCodec::new(HashParameters::new(1024, 1, 1, 16, 32)?)?;
/// let hash = codec.hash("user_password")?.to_string();
/// assert!(codec.verify("user_password", &hash)?);
///
/// // Access token issuance
/// let issued = generate_token()?;
/// assert_eq!(fingerprint_token(&issued.secret), issued.fingerprint);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```

pub mod compare;
pub mod encoded;
pub mod entropy;
pub mod params;
pub mod password;
pub mod token;
