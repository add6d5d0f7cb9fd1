//! Registration, login and self-service account changes.

use axum::extract::State;
use axum::response::IntoResponse;
use hearth_auth::{LoginInput, RegisterInput, UpdateDetailsInput};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::{ApiJson, AuthUser};
use crate::response::{created, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailsRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .auth
        .register(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(created(session))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .auth
        .login(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(ok(session))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.auth.me(&identity).await?))
}

pub async fn update_details(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(body): ApiJson<DetailsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .auth
        .update_details(
            &identity,
            UpdateDetailsInput {
                name: body.name,
                email: body.email,
            },
        )
        .await?;
    Ok(ok(session))
}

pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(body): ApiJson<PasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .auth
        .update_password(&identity, &body.current_password, &body.new_password)
        .await?;
    Ok(ok(serde_json::json!({ "updated": true })))
}
