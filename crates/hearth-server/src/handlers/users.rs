//! Profile view, avatar uploads and admin user management.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use hearth_core::models::user::UpdateUser;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{AdminUser, ApiJson, ApiPath, ApiQuery, AuthUser, ImageBody};
use crate::response::{Page, PageQuery, ok};
use crate::state::AppState;

pub async fn profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.users.profile(&identity).await?))
}

pub async fn attach_avatar(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    image: ImageBody,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .attach_avatar(&identity, image.bytes, &image.content_type)
        .await?;
    Ok(ok(user))
}

pub async fn detach_avatar(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.users.detach_avatar(&identity).await?))
}

pub async fn list(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .users
        .list_users(&identity, query.pagination())
        .await?;
    Ok(ok(Page::from(result)))
}

pub async fn get(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.users.get_user(&identity, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<UpdateUser>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.users.update_user(&identity, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.users.delete_user(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
