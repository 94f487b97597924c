//! Client-secret verification and opaque value generation.
//!
//! Client secrets are treated as bcrypt hashes on `Client::secret` (an
//! Open Question decision, recorded in DESIGN.md) and compared with
//! `bcrypt::verify`. Token/code values are unrelated high-entropy opaque
//! strings generated from the OS RNG and are not hashed before a host
//! persists them, unlike the PKCE challenge (§3).

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

use crate::error::CoreError;

/// Bcrypt cost factor used when a host asks the core to hash a freshly
/// generated client secret (not used for verification, which only needs
/// the stored hash).
pub const BCRYPT_COST: u32 = 12;

/// Number of random bytes backing a generated token/code value (256 bits).
pub const TOKEN_VALUE_BYTES: usize = 32;

/// Generate a cryptographically secure opaque value suitable for a token
/// `value`, `refresh_token`, or authorization code (§4.5: "256-bit
/// cryptographically random value... base64url encoded").
pub fn generate_opaque_value() -> String {
    let mut bytes = [0u8; TOKEN_VALUE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a plaintext client secret for storage.
pub fn hash_secret(secret: &str) -> Result<String, CoreError> {
    bcrypt::hash(secret, BCRYPT_COST).map_err(|_| CoreError::SecretHashing)
}

/// Verify a presented client secret against the stored hash (§4.2).
///
/// Returns `Ok(false)` rather than an error on a plain mismatch; only a
/// malformed stored hash is treated as an internal failure.
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, CoreError> {
    bcrypt::verify(secret, hash).map_err(|_| CoreError::SecretHashing)
}
