//! Account service: registration, login, bearer resolution and
//! self-service profile changes.

use hearth_core::access::Identity;
use hearth_core::deadline::within;
use hearth_core::error::{HearthError, HearthResult};
use hearth_core::models::user::{CreateUser, Role, UpdateUser, User};
use hearth_core::repository::UserRepository;
use hearth_core::rules::validation;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDetailsInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A user together with a freshly issued access token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over the user repository so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self { user_repo, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    fn session(&self, user: User) -> HearthResult<AuthSession> {
        let access_token = token::issue_access_token(user.id, user.role, &self.config)?;
        Ok(AuthSession {
            user,
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }

    /// Looks a user up by email, mapping "no such user" to `None`.
    async fn find_by_email(&self, email: &str) -> HearthResult<Option<User>> {
        match within(
            self.config.store_timeout,
            "user.get_by_email",
            self.user_repo.get_by_email(email),
        )
        .await
        {
            Ok(user) => Ok(Some(user)),
            Err(HearthError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn load(&self, identity: &Identity) -> HearthResult<User> {
        within(
            self.config.store_timeout,
            "user.get_by_id",
            self.user_repo.get_by_id(identity.user_id),
        )
        .await
    }

    /// Create an account with the `user` role and sign it in.
    pub async fn register(&self, input: RegisterInput) -> HearthResult<AuthSession> {
        let name = validation::required("name", &input.name)?;
        let email = validation::normalize_email(&input.email)?;
        validation::password(&input.password, self.config.min_password_length)?;

        if self.find_by_email(&email).await?.is_some() {
            debug!(%email, "registration rejected: email taken");
            return Err(HearthError::conflict("a user with this email already exists"));
        }

        let user = within(
            self.config.store_timeout,
            "user.create",
            self.user_repo.create(CreateUser {
                name,
                email,
                password: input.password,
                role: Role::User,
            }),
        )
        .await?;

        info!(user_id = %user.id, "user registered");
        self.session(user)
    }

    /// Authenticate with email + password and issue an access token.
    pub async fn login(&self, input: LoginInput) -> HearthResult<AuthSession> {
        let email = input.email.trim().to_lowercase();
        let Some(user) = self.find_by_email(&email).await? else {
            debug!("login rejected: unknown email");
            return Err(AuthError::InvalidCredentials.into());
        };

        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "user logged in");
        self.session(user)
    }

    /// Resolve a bearer token to the caller's identity.
    ///
    /// The token is verified first, then the user is reloaded so that
    /// deleted accounts are refused and role changes apply at once.
    pub async fn resolve(&self, bearer: &str) -> HearthResult<Identity> {
        let bearer = bearer.trim();
        if bearer.is_empty() {
            return Err(AuthError::MissingToken.into());
        }
        let claims = token::decode_access_token(bearer, &self.config)?;
        let user_id = claims.user_id()?;

        let user = match within(
            self.config.store_timeout,
            "user.get_by_id",
            self.user_repo.get_by_id(user_id),
        )
        .await
        {
            Ok(user) => user,
            Err(HearthError::NotFound { .. }) => return Err(AuthError::AccountGone.into()),
            Err(e) => return Err(e),
        };

        Ok(Identity::new(user.id, user.role))
    }

    pub async fn me(&self, identity: &Identity) -> HearthResult<User> {
        self.load(identity).await
    }

    /// Change name and/or email, returning a token reflecting the
    /// updated account.
    pub async fn update_details(
        &self,
        identity: &Identity,
        input: UpdateDetailsInput,
    ) -> HearthResult<AuthSession> {
        let name = input
            .name
            .as_deref()
            .map(|n| validation::required("name", n))
            .transpose()?;
        let email = input
            .email
            .as_deref()
            .map(validation::normalize_email)
            .transpose()?;

        if let Some(email) = &email {
            if let Some(other) = self.find_by_email(email).await? {
                if other.id != identity.user_id {
                    return Err(HearthError::conflict("a user with this email already exists"));
                }
            }
        }

        let user = within(
            self.config.store_timeout,
            "user.update",
            self.user_repo.update(
                identity.user_id,
                UpdateUser {
                    name,
                    email,
                    ..Default::default()
                },
            ),
        )
        .await?;

        info!(user_id = %user.id, "user details updated");
        self.session(user)
    }

    pub async fn update_password(
        &self,
        identity: &Identity,
        current_password: &str,
        new_password: &str,
    ) -> HearthResult<()> {
        let user = self.load(identity).await?;
        let valid = password::verify_password(
            current_password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::WrongCurrentPassword.into());
        }
        validation::password(new_password, self.config.min_password_length)?;

        within(
            self.config.store_timeout,
            "user.set_password",
            self.user_repo.set_password(user.id, new_password),
        )
        .await?;

        info!(user_id = %user.id, "password changed");
        Ok(())
    }

    /// Grant the admin role to an existing account. Returns `false`
    /// when no account uses `email`.
    pub async fn promote_admin(&self, email: &str) -> HearthResult<bool> {
        let email = validation::normalize_email(email)?;
        let Some(user) = self.find_by_email(&email).await? else {
            return Ok(false);
        };
        if user.role != Role::Admin {
            within(
                self.config.store_timeout,
                "user.update",
                self.user_repo.update(
                    user.id,
                    UpdateUser {
                        role: Some(Role::Admin),
                        ..Default::default()
                    },
                ),
            )
            .await?;
            info!(user_id = %user.id, "user promoted to admin");
        }
        Ok(true)
    }
}
