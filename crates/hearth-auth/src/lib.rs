//! Hearth Auth — password verification, JWT issuance/validation and
//! the account service (register, login, bearer resolution, profile
//! and password changes).

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, AuthSession, LoginInput, RegisterInput, UpdateDetailsInput};
pub use token::AccessTokenClaims;
