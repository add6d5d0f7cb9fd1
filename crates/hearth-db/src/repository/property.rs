//! SurrealDB implementation of [`PropertyRepository`].

use chrono::{DateTime, Utc};
use hearth_core::error::HearthResult;
use hearth_core::models::property::{
    CreateProperty, Property, PropertyFilter, PropertyStatus, StoredImage, UpdateProperty,
};
use hearth_core::repository::{PaginatedResult, Pagination, PropertyRepository};
use hearth_core::rules::rating::RatingSummary;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, parse_uuid, total_from};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PropertyRow {
    owner_id: String,
    title: String,
    description: String,
    property_type: String,
    location: String,
    price: f64,
    bedrooms: u32,
    bathrooms: u32,
    area: f64,
    image: String,
    gallery: serde_json::Value,
    amenities: Vec<String>,
    status: String,
    rating: f64,
    num_reviews: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PropertyRowWithId {
    record_id: String,
    owner_id: String,
    title: String,
    description: String,
    property_type: String,
    location: String,
    price: f64,
    bedrooms: u32,
    bathrooms: u32,
    area: f64,
    image: String,
    gallery: serde_json::Value,
    amenities: Vec<String>,
    status: String,
    rating: f64,
    num_reviews: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<PropertyStatus, DbError> {
    PropertyStatus::parse(s).ok_or_else(|| DbError::Decode(format!("unknown property status: {s}")))
}

fn gallery_to_value(gallery: &[StoredImage]) -> Result<serde_json::Value, DbError> {
    serde_json::to_value(gallery).map_err(|e| DbError::Decode(format!("gallery: {e}")))
}

impl PropertyRow {
    fn into_property(self, id: Uuid) -> Result<Property, DbError> {
        let gallery: Vec<StoredImage> = if self.gallery.is_null() {
            Vec::new()
        } else {
            serde_json::from_value(self.gallery)
                .map_err(|e| DbError::Decode(format!("gallery: {e}")))?
        };
        Ok(Property {
            id,
            owner_id: parse_uuid("owner", &self.owner_id)?,
            title: self.title,
            description: self.description,
            property_type: self.property_type,
            location: self.location,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: self.area,
            image: self.image,
            gallery,
            amenities: self.amenities,
            status: parse_status(&self.status)?,
            rating: self.rating,
            num_reviews: self.num_reviews,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl PropertyRowWithId {
    fn try_into_property(self) -> Result<Property, DbError> {
        let id = parse_uuid("property", &self.record_id)?;
        PropertyRow {
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            property_type: self.property_type,
            location: self.location,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: self.area,
            image: self.image,
            gallery: self.gallery,
            amenities: self.amenities,
            status: self.status,
            rating: self.rating,
            num_reviews: self.num_reviews,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_property(id)
    }
}

/// WHERE clause for a catalog filter; callers bind the matching
/// parameters.
fn filter_clause(filter: &PropertyFilter) -> String {
    let mut conds = Vec::new();
    if filter.location.is_some() {
        conds.push("string::contains(string::lowercase(location), $location)");
    }
    if filter.property_type.is_some() {
        conds.push("property_type = $property_type");
    }
    if filter.min_price.is_some() {
        conds.push("price >= $min_price");
    }
    if filter.max_price.is_some() {
        conds.push("price <= $max_price");
    }
    if filter.status.is_some() {
        conds.push("status = $status");
    }
    if conds.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conds.join(" AND "))
    }
}

/// SurrealDB implementation of the Property repository.
#[derive(Clone)]
pub struct SurrealPropertyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPropertyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch_one(&self, query: &str, id: Uuid) -> Result<Property, DbError> {
        let id_str = id.to_string();
        let mut result = self.db.query(query).bind(("id", id_str.clone())).await?;
        let rows: Vec<PropertyRow> = result.take(0)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("property", &id_str))?;
        row.into_property(id)
    }
}

impl<C: Connection> PropertyRepository for SurrealPropertyRepository<C> {
    async fn create(&self, input: CreateProperty) -> HearthResult<Property> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('property', $id) SET \
                 owner_id = $owner_id, title = $title, \
                 description = $description, \
                 property_type = $property_type, \
                 location = $location, price = $price, \
                 bedrooms = $bedrooms, bathrooms = $bathrooms, \
                 area = $area, image = $image, gallery = [], \
                 amenities = $amenities, status = $status, \
                 rating = 0.0, num_reviews = 0",
            )
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("property_type", input.property_type))
            .bind(("location", input.location))
            .bind(("price", input.price))
            .bind(("bedrooms", input.bedrooms))
            .bind(("bathrooms", input.bathrooms))
            .bind(("area", input.area))
            .bind(("image", input.image))
            .bind(("amenities", input.amenities))
            .bind(("status", input.status.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("property", e))?;

        let rows: Vec<PropertyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("property", &id_str))?;

        Ok(row.into_property(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HearthResult<Property> {
        Ok(self
            .fetch_one("SELECT * FROM type::record('property', $id)", id)
            .await?)
    }

    async fn update(&self, id: Uuid, input: UpdateProperty) -> HearthResult<Property> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.property_type.is_some() {
            sets.push("property_type = $property_type");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        if input.price.is_some() {
            sets.push("price = $price");
        }
        if input.bedrooms.is_some() {
            sets.push("bedrooms = $bedrooms");
        }
        if input.bathrooms.is_some() {
            sets.push("bathrooms = $bathrooms");
        }
        if input.area.is_some() {
            sets.push("area = $area");
        }
        if input.image.is_some() {
            sets.push("image = $image");
        }
        if input.amenities.is_some() {
            sets.push("amenities = $amenities");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('property', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(property_type) = input.property_type {
            builder = builder.bind(("property_type", property_type));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }
        if let Some(price) = input.price {
            builder = builder.bind(("price", price));
        }
        if let Some(bedrooms) = input.bedrooms {
            builder = builder.bind(("bedrooms", bedrooms));
        }
        if let Some(bathrooms) = input.bathrooms {
            builder = builder.bind(("bathrooms", bathrooms));
        }
        if let Some(area) = input.area {
            builder = builder.bind(("area", area));
        }
        if let Some(image) = input.image {
            builder = builder.bind(("image", image));
        }
        if let Some(amenities) = input.amenities {
            builder = builder.bind(("amenities", amenities));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("property", e))?;

        let rows: Vec<PropertyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("property", &id_str))?;

        Ok(row.into_property(id)?)
    }

    async fn delete(&self, id: Uuid) -> HearthResult<()> {
        self.fetch_one("DELETE type::record('property', $id) RETURN BEFORE", id)
            .await?;
        Ok(())
    }

    async fn list(
        &self,
        filter: PropertyFilter,
        pagination: Pagination,
    ) -> HearthResult<PaginatedResult<Property>> {
        let clause = filter_clause(&filter);
        let count_query = format!("SELECT count() AS total FROM property{clause} GROUP ALL");
        let list_query = format!(
            "SELECT meta::id(id) AS record_id, * FROM property{clause} \
             ORDER BY created_at DESC \
             LIMIT $limit START $offset"
        );

        // Both statements share the same bindings.
        let mut builder = self
            .db
            .query(format!("{count_query}; {list_query}"))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(location) = filter.location {
            builder = builder.bind(("location", location.trim().to_lowercase()));
        }
        if let Some(property_type) = filter.property_type {
            builder = builder.bind(("property_type", property_type));
        }
        if let Some(min_price) = filter.min_price {
            builder = builder.bind(("min_price", min_price));
        }
        if let Some(max_price) = filter.max_price {
            builder = builder.bind(("max_price", max_price));
        }
        if let Some(status) = filter.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = total_from(count_rows);
        let rows: Vec<PropertyRowWithId> = result.take(1).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_property())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> HearthResult<Vec<Property>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM property \
                 WHERE owner_id = $owner_id ORDER BY created_at DESC",
            )
            .bind(("owner_id", owner_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_property())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn set_rating(&self, id: Uuid, summary: RatingSummary) -> HearthResult<Property> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('property', $id) SET \
                 rating = $rating, num_reviews = $num_reviews",
            )
            .bind(("id", id_str.clone()))
            .bind(("rating", summary.rating))
            .bind(("num_reviews", summary.num_reviews))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("property", &id_str))?;

        Ok(row.into_property(id)?)
    }

    async fn set_gallery(&self, id: Uuid, gallery: Vec<StoredImage>) -> HearthResult<Property> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('property', $id) SET \
                 gallery = $gallery, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("gallery", gallery_to_value(&gallery)?))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("property", &id_str))?;

        Ok(row.into_property(id)?)
    }
}
