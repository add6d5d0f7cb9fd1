//! Hearth Server — application entry point.

use hearth_db::DbManager;
use hearth_server::{AppState, LocalImageHost, ServerConfig, error, router};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hearth=info".parse()?))
        .json()
        .init();

    tracing::info!(bind_addr = %config.bind_addr, "Starting Hearth server...");
    error::set_expose_error_details(config.expose_error_details);

    let db = DbManager::connect(&config.db).await?;
    hearth_db::run_migrations(db.client()).await?;

    let images = LocalImageHost::new(config.images.dir.clone(), config.images.base_url.clone());
    let state = AppState::new(
        db.client().clone(),
        config.auth.clone(),
        config.market.clone(),
        images,
    );

    if let Some(email) = &config.admin_email {
        if state.auth.promote_admin(email).await? {
            tracing::info!(email = %email, "admin account ensured");
        } else {
            tracing::warn!(email = %email, "no account to promote to admin");
        }
    }

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Hearth server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
