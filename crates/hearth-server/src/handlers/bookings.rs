//! Booking ledger endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use hearth_core::models::booking::BookingStatus;
use hearth_market::NewBooking;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{AdminUser, ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::response::{Page, PageQuery, created, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: BookingStatus,
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(body): ApiJson<NewBooking>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(created(state.ledger.create_booking(&identity, body).await?))
}

pub async fn list_all(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.ledger.list_all(&identity, query.pagination()).await?;
    Ok(ok(Page::from(result)))
}

pub async fn mine(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.ledger.list_my_bookings(&identity).await?))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.ledger.get_booking(&identity, id).await?))
}

pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.ledger.update_status(&identity, id, body.status).await?))
}

pub async fn cancel(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.ledger.cancel_booking(&identity, id).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.ledger.delete_booking(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
