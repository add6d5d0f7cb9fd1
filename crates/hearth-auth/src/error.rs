//! Authentication error types.

use hearth_core::error::HearthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email and wrong password share this variant so callers
    /// cannot probe for accounts.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("current password is incorrect")]
    WrongCurrentPassword,

    #[error("missing bearer token")]
    MissingToken,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("account no longer exists")]
    AccountGone,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for HearthError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Crypto(msg) => HearthError::Internal(msg),
            other => HearthError::unauthenticated(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_are_unauthenticated() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::TokenExpired,
            AuthError::MissingToken,
            AuthError::AccountGone,
        ] {
            assert!(matches!(
                HearthError::from(err),
                HearthError::Unauthenticated { .. }
            ));
        }
    }

    #[test]
    fn crypto_failures_are_internal() {
        let err: HearthError = AuthError::Crypto("bad key".into()).into();
        assert!(matches!(err, HearthError::Internal(_)));
    }
}
