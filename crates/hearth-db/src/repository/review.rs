//! SurrealDB implementation of [`ReviewRepository`].
//!
//! The `(property_id, user_id)` UNIQUE index backs the one-review rule
//! even when two writers race past the service-level check.

use chrono::{DateTime, Utc};
use hearth_core::error::HearthResult;
use hearth_core::models::review::{CreateReview, Review, UpdateReview};
use hearth_core::repository::ReviewRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ReviewRow {
    property_id: String,
    user_id: String,
    booking_id: Option<String>,
    rating: u32,
    comment: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ReviewRowWithId {
    record_id: String,
    property_id: String,
    user_id: String,
    booking_id: Option<String>,
    rating: u32,
    comment: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RatingRow {
    rating: u32,
}

fn parse_rating(raw: u32) -> Result<u8, DbError> {
    u8::try_from(raw).map_err(|_| DbError::Decode(format!("rating out of range: {raw}")))
}

impl ReviewRow {
    fn into_review(self, id: Uuid) -> Result<Review, DbError> {
        Ok(Review {
            id,
            property_id: parse_uuid("property", &self.property_id)?,
            user_id: parse_uuid("user", &self.user_id)?,
            booking_id: self
                .booking_id
                .as_deref()
                .map(|b| parse_uuid("booking", b))
                .transpose()?,
            rating: parse_rating(self.rating)?,
            comment: self.comment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ReviewRowWithId {
    fn try_into_review(self) -> Result<Review, DbError> {
        let id = parse_uuid("review", &self.record_id)?;
        ReviewRow {
            property_id: self.property_id,
            user_id: self.user_id,
            booking_id: self.booking_id,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_review(id)
    }
}

/// SurrealDB implementation of the Review repository.
#[derive(Clone)]
pub struct SurrealReviewRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealReviewRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        clause: &str,
        key: &'static str,
        value: Uuid,
    ) -> HearthResult<Vec<Review>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM review \
             WHERE {clause} ORDER BY created_at DESC"
        );
        let mut result = self
            .db
            .query(&query)
            .bind((key, value.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReviewRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_review())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}

impl<C: Connection> ReviewRepository for SurrealReviewRepository<C> {
    async fn create(&self, input: CreateReview) -> HearthResult<Review> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('review', $id) SET \
                 property_id = $property_id, user_id = $user_id, \
                 booking_id = $booking_id, rating = $rating, \
                 comment = $comment",
            )
            .bind(("id", id_str.clone()))
            .bind(("property_id", input.property_id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("booking_id", input.booking_id.map(|b| b.to_string())))
            .bind(("rating", u32::from(input.rating)))
            .bind(("comment", input.comment))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("review", e))?;

        let rows: Vec<ReviewRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("review", &id_str))?;

        Ok(row.into_review(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HearthResult<Review> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('review', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReviewRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("review", &id_str))?;

        Ok(row.into_review(id)?)
    }

    async fn find_by_property_and_user(
        &self,
        property_id: Uuid,
        user_id: Uuid,
    ) -> HearthResult<Option<Review>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM review \
                 WHERE property_id = $property_id AND user_id = $user_id",
            )
            .bind(("property_id", property_id.to_string()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReviewRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| row.try_into_review())
            .transpose()?)
    }

    async fn update(&self, id: Uuid, input: UpdateReview) -> HearthResult<Review> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.rating.is_some() {
            sets.push("rating = $rating");
        }
        if input.comment.is_some() {
            sets.push("comment = $comment");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('review', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(rating) = input.rating {
            builder = builder.bind(("rating", u32::from(rating)));
        }
        if let Some(comment) = input.comment {
            builder = builder.bind(("comment", comment));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("review", e))?;

        let rows: Vec<ReviewRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("review", &id_str))?;

        Ok(row.into_review(id)?)
    }

    async fn delete(&self, id: Uuid) -> HearthResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('review', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReviewRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("review", id_str).into());
        }
        Ok(())
    }

    async fn list_by_property(&self, property_id: Uuid) -> HearthResult<Vec<Review>> {
        self.list_where("property_id = $property_id", "property_id", property_id)
            .await
    }

    async fn list_by_user(&self, user_id: Uuid) -> HearthResult<Vec<Review>> {
        self.list_where("user_id = $user_id", "user_id", user_id)
            .await
    }

    async fn ratings_for_property(&self, property_id: Uuid) -> HearthResult<Vec<u8>> {
        let mut result = self
            .db
            .query("SELECT rating FROM review WHERE property_id = $property_id")
            .bind(("property_id", property_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RatingRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| parse_rating(row.rating))
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn delete_by_property(&self, property_id: Uuid) -> HearthResult<()> {
        self.db
            .query("DELETE review WHERE property_id = $property_id")
            .bind(("property_id", property_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_check("review", e))?;
        Ok(())
    }
}
