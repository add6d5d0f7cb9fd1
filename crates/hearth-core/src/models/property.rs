//! Property domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PropertyStatus {
    Available,
    Unavailable,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "Available",
            PropertyStatus::Unavailable => "Unavailable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Available" => Some(PropertyStatus::Available),
            "Unavailable" => Some(PropertyStatus::Unavailable),
            _ => None,
        }
    }
}

/// An image held by the image host. Only the URL and the deletable
/// handle are kept; raw bytes never reach the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredImage {
    pub url: String,
    pub handle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub property_type: String,
    /// Free-text location.
    pub location: String,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: f64,
    /// Cover image URL.
    pub image: String,
    pub gallery: Vec<StoredImage>,
    pub amenities: Vec<String>,
    pub status: PropertyStatus,
    /// Mean review rating rounded to one decimal; `0.0` without reviews.
    pub rating: f64,
    pub num_reviews: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProperty {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub location: String,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: f64,
    pub image: String,
    pub amenities: Vec<String>,
    pub status: PropertyStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateProperty {
    pub title: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area: Option<f64>,
    pub image: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub status: Option<PropertyStatus>,
}

/// Catalog search filter. Every field narrows the result set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyFilter {
    /// Case-insensitive substring of the location.
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub status: Option<PropertyStatus>,
}
