//! Listings, gallery images and per-property sub-resources.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use hearth_core::models::property::{PropertyFilter, PropertyStatus, UpdateProperty};
use hearth_market::NewReview;
use hearth_market::NewProperty;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, AuthUser, ImageBody};
use crate::response::{Page, PageQuery, created, ok};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub status: Option<PropertyStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .pagination();
    let filter = PropertyFilter {
        location: query.location,
        property_type: query.property_type,
        min_price: query.min_price,
        max_price: query.max_price,
        status: query.status,
    };
    let result = state.catalog.list_properties(filter, pagination).await?;
    Ok(ok(Page::from(result)))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.catalog.get_property(id).await?))
}

pub async fn mine(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.catalog.list_my_listings(&identity).await?))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(body): ApiJson<NewProperty>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(created(state.catalog.create_property(&identity, body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<UpdateProperty>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.catalog.update_property(&identity, id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_property(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The raw request body is the image; `Content-Type` names its format.
pub async fn attach_image(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    image: ImageBody,
) -> Result<impl IntoResponse, ApiError> {
    let property = state
        .catalog
        .attach_image(&identity, id, image.bytes, &image.content_type)
        .await?;
    Ok(created(property))
}

pub async fn detach_image(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath((id, handle)): ApiPath<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.catalog.detach_image(&identity, id, &handle).await?))
}

pub async fn reviews(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.reviews.list_for_property(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub booking_id: Option<Uuid>,
}

pub async fn add_review(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .reviews
        .add_review(
            &identity,
            NewReview {
                property_id: id,
                rating: body.rating,
                comment: body.comment,
                booking_id: body.booking_id,
            },
        )
        .await?;
    Ok(created(review))
}

pub async fn bookings(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(ok(state.ledger.list_for_property(&identity, id).await?))
}
