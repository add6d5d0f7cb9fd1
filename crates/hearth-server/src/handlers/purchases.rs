use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, AuthUser};
use crate::response::{created, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub property_id: Uuid,
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(body): ApiJson<PurchaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let purchase = state
        .catalog
        .create_purchase(&identity, body.property_id)
        .await?;
    Ok(created(purchase))
}

pub async fn mine(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.catalog.list_my_purchases(&identity).await?))
}

pub async fn cancel(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog.cancel_purchase(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
