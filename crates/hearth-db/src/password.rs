//! Argon2id password hashing.
//!
//! Parameters follow OWASP guidance (memory: 19 MiB, iterations: 2,
//! parallelism: 1). Salt is randomly generated per hash. An optional
//! pepper (server-side secret) is prepended to the password.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};

use crate::error::DbError;

/// Hash a password with Argon2id.
///
/// Verification lives in `hearth-auth`, which must be configured with
/// the same pepper.
pub fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Hash(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}
