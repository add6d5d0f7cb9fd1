//! Review aggregate: one review per guest and property, with the
//! property's rating kept in step with its reviews.
//!
//! Every write ends with an explicit [`ReviewAggregate::recompute`]
//! over the full set of stored ratings, under the property's lock.
//! Recomputation is idempotent, so if it fails after the review write
//! has landed the next write on that property repairs the aggregate.

use std::sync::Arc;

use hearth_core::access::{Action, Identity, Subject, authorize};
use hearth_core::deadline::within;
use hearth_core::error::{HearthError, HearthResult};
use hearth_core::models::property::Property;
use hearth_core::models::review::{CreateReview, Review, UpdateReview};
use hearth_core::repository::{BookingRepository, PropertyRepository, ReviewRepository, Stores};
use hearth_core::rules::rating::summarize;
use hearth_core::rules::validation;
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::MarketConfig;
use crate::locks::PropertyLocks;

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub property_id: Uuid,
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub booking_id: Option<Uuid>,
}

pub struct ReviewAggregate<S: Stores> {
    stores: Arc<S>,
    locks: PropertyLocks,
    config: MarketConfig,
}

impl<S: Stores> Clone for ReviewAggregate<S> {
    fn clone(&self) -> Self {
        Self {
            stores: Arc::clone(&self.stores),
            locks: self.locks.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: Stores> ReviewAggregate<S> {
    pub fn new(stores: Arc<S>, locks: PropertyLocks, config: MarketConfig) -> Self {
        Self {
            stores,
            locks,
            config,
        }
    }

    async fn load(&self, id: Uuid) -> HearthResult<Review> {
        within(
            self.config.store_timeout,
            "review.get",
            self.stores.reviews().get_by_id(id),
        )
        .await
    }

    /// Recompute `rating` and `num_reviews` for a property from every
    /// stored review. Callers hold the property's lock.
    pub async fn recompute(&self, property_id: Uuid) -> HearthResult<Property> {
        let ratings = within(
            self.config.store_timeout,
            "review.ratings_for_property",
            self.stores.reviews().ratings_for_property(property_id),
        )
        .await?;
        let summary = summarize(ratings);
        let property = within(
            self.config.store_timeout,
            "property.set_rating",
            self.stores.properties().set_rating(property_id, summary),
        )
        .await?;
        info!(
            property_id = %property_id,
            rating = summary.rating,
            num_reviews = summary.num_reviews,
            "rating recomputed"
        );
        Ok(property)
    }

    async fn recompute_after_write(&self, property_id: Uuid) -> HearthResult<()> {
        if let Err(e) = self.recompute(property_id).await {
            warn!(
                property_id = %property_id,
                error = %e,
                "rating recompute failed after review write"
            );
            return Err(e);
        }
        Ok(())
    }

    /// A stated booking must be the reviewer's own stay at this property.
    async fn check_booking_reference(
        &self,
        identity: &Identity,
        property_id: Uuid,
        booking_id: Uuid,
    ) -> HearthResult<()> {
        let booking = match within(
            self.config.store_timeout,
            "booking.get",
            self.stores.bookings().get_by_id(booking_id),
        )
        .await
        {
            Ok(b) => b,
            Err(HearthError::NotFound { .. }) => {
                return Err(HearthError::validation("referenced booking does not exist"));
            }
            Err(e) => return Err(e),
        };
        if booking.user_id != identity.user_id || booking.property_id != property_id {
            return Err(HearthError::validation(
                "referenced booking is not your stay at this property",
            ));
        }
        Ok(())
    }

    pub async fn add_review(&self, identity: &Identity, input: NewReview) -> HearthResult<Review> {
        let property = within(
            self.config.store_timeout,
            "property.get",
            self.stores.properties().get_by_id(input.property_id),
        )
        .await?;
        authorize(identity, Action::CreateReview, &Subject::property(&property))?;

        validation::rating(input.rating)?;
        let comment = validation::comment(&input.comment)?;
        if let Some(booking_id) = input.booking_id {
            self.check_booking_reference(identity, property.id, booking_id)
                .await?;
        }

        let _guard = self
            .locks
            .acquire(property.id, self.config.store_timeout)
            .await?;

        let existing = within(
            self.config.store_timeout,
            "review.find",
            self.stores
                .reviews()
                .find_by_property_and_user(property.id, identity.user_id),
        )
        .await?;
        if existing.is_some() {
            debug!(
                property_id = %property.id,
                user_id = %identity.user_id,
                "review rejected: already reviewed"
            );
            return Err(HearthError::conflict("you have already reviewed this property"));
        }

        let review = within(
            self.config.store_timeout,
            "review.create",
            self.stores.reviews().create(CreateReview {
                property_id: property.id,
                user_id: identity.user_id,
                booking_id: input.booking_id,
                rating: input.rating,
                comment,
            }),
        )
        .await?;
        info!(
            review_id = %review.id,
            property_id = %property.id,
            rating = review.rating,
            "review added"
        );

        self.recompute_after_write(property.id).await?;
        Ok(review)
    }

    pub async fn update_review(
        &self,
        identity: &Identity,
        review_id: Uuid,
        mut patch: UpdateReview,
    ) -> HearthResult<Review> {
        let review = self.load(review_id).await?;
        authorize(identity, Action::ModifyReview, &Subject::review(&review))?;

        if let Some(rating) = patch.rating {
            validation::rating(rating)?;
        }
        if let Some(comment) = patch.comment.take() {
            patch.comment = Some(validation::comment(&comment)?);
        }
        let rating_changed = patch.rating.is_some_and(|r| r != review.rating);

        let _guard = self
            .locks
            .acquire(review.property_id, self.config.store_timeout)
            .await?;
        let updated = within(
            self.config.store_timeout,
            "review.update",
            self.stores.reviews().update(review.id, patch),
        )
        .await?;
        info!(review_id = %updated.id, by = %identity.user_id, "review updated");

        if rating_changed {
            self.recompute_after_write(updated.property_id).await?;
        }
        Ok(updated)
    }

    pub async fn delete_review(&self, identity: &Identity, review_id: Uuid) -> HearthResult<()> {
        let review = self.load(review_id).await?;
        authorize(identity, Action::ModifyReview, &Subject::review(&review))?;

        let _guard = self
            .locks
            .acquire(review.property_id, self.config.store_timeout)
            .await?;
        within(
            self.config.store_timeout,
            "review.delete",
            self.stores.reviews().delete(review.id),
        )
        .await?;
        info!(review_id = %review.id, by = %identity.user_id, "review deleted");

        self.recompute_after_write(review.property_id).await
    }

    /// Remove every review a user wrote and refresh the affected
    /// properties. Used when an account is deleted.
    pub async fn purge_user_reviews(&self, user_id: Uuid) -> HearthResult<usize> {
        let reviews = self.list_by_user(user_id).await?;
        for review in &reviews {
            let _guard = self
                .locks
                .acquire(review.property_id, self.config.store_timeout)
                .await?;
            within(
                self.config.store_timeout,
                "review.delete",
                self.stores.reviews().delete(review.id),
            )
            .await?;
            self.recompute_after_write(review.property_id).await?;
        }
        Ok(reviews.len())
    }

    pub async fn get_review(&self, review_id: Uuid) -> HearthResult<Review> {
        self.load(review_id).await
    }

    /// Newest first. An unknown property is `NotFound`.
    pub async fn list_for_property(&self, property_id: Uuid) -> HearthResult<Vec<Review>> {
        within(
            self.config.store_timeout,
            "property.get",
            self.stores.properties().get_by_id(property_id),
        )
        .await?;
        within(
            self.config.store_timeout,
            "review.list_by_property",
            self.stores.reviews().list_by_property(property_id),
        )
        .await
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> HearthResult<Vec<Review>> {
        within(
            self.config.store_timeout,
            "review.list_by_user",
            self.stores.reviews().list_by_user(user_id),
        )
        .await
    }

    pub async fn list_mine(&self, identity: &Identity) -> HearthResult<Vec<Review>> {
        self.list_by_user(identity.user_id).await
    }
}
