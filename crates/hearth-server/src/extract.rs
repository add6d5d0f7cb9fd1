//! Request extractors.
//!
//! - [`AuthUser`]: a valid bearer token for an existing account
//! - [`AdminUser`]: the same, with the admin role
//! - [`ApiJson`], [`ApiPath`], [`ApiQuery`]: axum's extractors with
//!   rejections reported as validation errors in the API error shape
//! - [`ImageBody`]: a raw upload body with its `Content-Type`

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::body::Bytes;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::Json;
use hearth_core::access::Identity;
use hearth_core::error::HearthError;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| HearthError::unauthenticated("missing bearer token"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| HearthError::unauthenticated("expected a bearer token"))?;
        let identity = state.auth.resolve(token).await?;
        Ok(Self(identity))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;
        if !identity.is_admin() {
            return Err(HearthError::forbidden("admin role required").into());
        }
        Ok(Self(identity))
    }
}

pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(HearthError::validation(rejection.body_text()).into()),
        }
    }
}

pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, ApiError> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(HearthError::validation(rejection.body_text()).into()),
        }
    }
}

pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, ApiError> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(HearthError::validation(rejection.body_text()).into()),
        }
    }
}

/// Raw image bytes and their declared content type. A body over the
/// route's limit is a validation error, like any other bad upload.
pub struct ImageBody {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[async_trait]
impl FromRequest<AppState> for ImageBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, ApiError> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = Bytes::from_request(req, state).await.map_err(|_| {
            HearthError::validation(format!("image exceeds {} bytes", state.max_image_bytes))
        })?;
        Ok(Self {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
