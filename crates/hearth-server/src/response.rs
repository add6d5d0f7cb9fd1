//! The success envelope: `{"data": ...}`.

use axum::Json;
use axum::http::StatusCode;
use hearth_core::repository::{PaginatedResult, Pagination};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Data<T>> {
    Json(Data { data })
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Data<T>>) {
    (StatusCode::CREATED, ok(data))
}

/// One page of a paginated listing.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub pages: u64,
    pub total: u64,
}

impl<T> From<PaginatedResult<T>> for Page<T> {
    fn from(result: PaginatedResult<T>) -> Self {
        Self {
            page: result.page(),
            pages: result.pages(),
            total: result.total,
            items: result.items,
        }
    }
}

/// `?page=&per_page=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::page(self.page.unwrap_or(1), self.per_page.unwrap_or(20))
    }
}
