//! Server configuration from `HEARTH_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use hearth_auth::AuthConfig;
use hearth_db::DbConfig;
use hearth_market::MarketConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Where uploaded gallery images are written and how they are addressed.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub dir: PathBuf,
    /// Public URL prefix; the handle is appended.
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub market: MarketConfig,
    pub images: ImageConfig,
    pub expose_error_details: bool,
    /// Existing account promoted to admin at startup.
    pub admin_email: Option<String>,
}

impl ServerConfig {
    /// Read the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let store_timeout = Duration::from_millis(vars.parse("HEARTH_STORE_TIMEOUT_MS", 5_000)?);

        let db_defaults = DbConfig::default();
        let db = DbConfig {
            url: vars.string("HEARTH_DB_URL", db_defaults.url),
            namespace: vars.string("HEARTH_DB_NAMESPACE", db_defaults.namespace),
            database: vars.string("HEARTH_DB_DATABASE", db_defaults.database),
            username: vars.string("HEARTH_DB_USERNAME", db_defaults.username),
            password: vars.string("HEARTH_DB_PASSWORD", db_defaults.password),
        };

        let auth_defaults = AuthConfig::default();
        let auth = AuthConfig {
            jwt_private_key_pem: vars.required("HEARTH_JWT_PRIVATE_KEY_PEM")?,
            jwt_public_key_pem: vars.required("HEARTH_JWT_PUBLIC_KEY_PEM")?,
            access_token_lifetime_secs: vars.parse(
                "HEARTH_ACCESS_TOKEN_TTL_SECS",
                auth_defaults.access_token_lifetime_secs,
            )?,
            jwt_issuer: vars.string("HEARTH_JWT_ISSUER", auth_defaults.jwt_issuer),
            pepper: vars.optional("HEARTH_PASSWORD_PEPPER"),
            min_password_length: vars.parse(
                "HEARTH_MIN_PASSWORD_LENGTH",
                auth_defaults.min_password_length,
            )?,
            store_timeout,
        };

        let market = MarketConfig {
            store_timeout,
            max_image_bytes: vars.parse(
                "HEARTH_MAX_IMAGE_BYTES",
                MarketConfig::default().max_image_bytes,
            )?,
        };

        let images = ImageConfig {
            dir: PathBuf::from(vars.string("HEARTH_IMAGE_DIR", "./uploads".into())),
            base_url: vars
                .string("HEARTH_IMAGE_BASE_URL", "/images".into())
                .trim_end_matches('/')
                .to_string(),
        };

        Ok(Self {
            bind_addr: vars.parse("HEARTH_BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 5000)))?,
            db,
            auth,
            market,
            images,
            expose_error_details: vars.parse("HEARTH_EXPOSE_ERROR_DETAILS", false)?,
            admin_email: vars.optional("HEARTH_ADMIN_EMAIL"),
        })
    }
}

struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    /// Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn string(&self, key: &str, default: String) -> String {
        self.optional(key).unwrap_or(default)
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing(key))
    }

    fn parse<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.optional(key) {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value }),
        }
    }
}
