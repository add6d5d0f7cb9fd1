//! Review domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub property_id: Uuid,
    pub user_id: Uuid,
    pub booking_id: Option<Uuid>,
    /// Integer in `1..=5`.
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReview {
    pub property_id: Uuid,
    pub user_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateReview {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}
