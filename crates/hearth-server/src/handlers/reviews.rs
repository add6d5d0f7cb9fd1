//! Review endpoints not nested under a property.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use hearth_core::models::review::UpdateReview;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, AuthUser};
use crate::response::ok;
use crate::state::AppState;

pub async fn mine(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.reviews.list_mine(&identity).await?))
}

pub async fn by_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.reviews.list_by_user(user_id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.reviews.get_review(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<UpdateReview>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.reviews.update_review(&identity, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.reviews.delete_review(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
