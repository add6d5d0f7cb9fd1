//! Hearth Server — the HTTP API over the marketplace services.
//!
//! Success bodies are `{"data": ...}`; failures are
//! `{"error": {"code", "message"}}` (see [`error::ApiError`]).

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod images;
pub mod response;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use images::LocalImageHost;
pub use routes::router;
pub use state::AppState;
