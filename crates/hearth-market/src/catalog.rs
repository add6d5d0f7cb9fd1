//! Catalog: listings, their gallery images, and purchases.

use std::sync::Arc;

use hearth_core::access::{Action, Identity, Subject, authorize};
use hearth_core::deadline::within;
use hearth_core::error::{HearthError, HearthResult};
use hearth_core::images::{ImageHost, extension_for};
use hearth_core::models::property::{
    CreateProperty, Property, PropertyFilter, PropertyStatus, StoredImage, UpdateProperty,
};
use hearth_core::models::purchase::{CreatePurchase, Purchase};
use hearth_core::repository::{
    BookingRepository, PaginatedResult, Pagination, PropertyRepository, PurchaseRepository,
    ReviewRepository, Stores,
};
use hearth_core::rules::validation;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::MarketConfig;
use crate::locks::PropertyLocks;

/// A listing as submitted by its future owner.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub location: String,
    pub price: f64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub area: f64,
    pub image: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub status: Option<PropertyStatus>,
}

/// Rejects empty, oversized or non-image uploads before they reach the
/// image host.
pub(crate) fn check_image(bytes: &[u8], content_type: &str, max_bytes: usize) -> HearthResult<()> {
    if bytes.is_empty() {
        return Err(HearthError::validation("image body is empty"));
    }
    if bytes.len() > max_bytes {
        return Err(HearthError::validation(format!(
            "image exceeds {max_bytes} bytes"
        )));
    }
    if extension_for(content_type).is_none() {
        return Err(HearthError::validation(format!(
            "unsupported image type: {content_type}"
        )));
    }
    Ok(())
}

pub struct CatalogService<S: Stores, I: ImageHost> {
    stores: Arc<S>,
    images: Arc<I>,
    locks: PropertyLocks,
    config: MarketConfig,
}

impl<S: Stores, I: ImageHost> Clone for CatalogService<S, I> {
    fn clone(&self) -> Self {
        Self {
            stores: Arc::clone(&self.stores),
            images: Arc::clone(&self.images),
            locks: self.locks.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: Stores, I: ImageHost> CatalogService<S, I> {
    pub fn new(stores: Arc<S>, images: Arc<I>, locks: PropertyLocks, config: MarketConfig) -> Self {
        Self {
            stores,
            images,
            locks,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    pub async fn list_properties(
        &self,
        filter: PropertyFilter,
        pagination: Pagination,
    ) -> HearthResult<PaginatedResult<Property>> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Err(HearthError::validation("min_price cannot exceed max_price"));
            }
        }
        within(
            self.config.store_timeout,
            "property.list",
            self.stores.properties().list(filter, pagination),
        )
        .await
    }

    pub async fn get_property(&self, id: Uuid) -> HearthResult<Property> {
        within(
            self.config.store_timeout,
            "property.get",
            self.stores.properties().get_by_id(id),
        )
        .await
    }

    pub async fn list_my_listings(&self, identity: &Identity) -> HearthResult<Vec<Property>> {
        within(
            self.config.store_timeout,
            "property.list_by_owner",
            self.stores.properties().list_by_owner(identity.user_id),
        )
        .await
    }

    /// The caller becomes the owner.
    pub async fn create_property(
        &self,
        identity: &Identity,
        input: NewProperty,
    ) -> HearthResult<Property> {
        let mut create = CreateProperty {
            owner_id: identity.user_id,
            title: input.title,
            description: input.description,
            property_type: input.property_type,
            location: input.location,
            price: input.price,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            area: input.area,
            image: input.image,
            amenities: input.amenities,
            status: input.status.unwrap_or(PropertyStatus::Available),
        };
        validation::create_property(&mut create)?;

        let property = within(
            self.config.store_timeout,
            "property.create",
            self.stores.properties().create(create),
        )
        .await?;
        info!(property_id = %property.id, owner_id = %identity.user_id, "property created");
        Ok(property)
    }

    pub async fn update_property(
        &self,
        identity: &Identity,
        id: Uuid,
        mut patch: UpdateProperty,
    ) -> HearthResult<Property> {
        let property = self.get_property(id).await?;
        authorize(identity, Action::UpdateProperty, &Subject::property(&property))?;
        validation::update_property(&mut patch)?;

        let updated = within(
            self.config.store_timeout,
            "property.update",
            self.stores.properties().update(id, patch),
        )
        .await?;
        info!(property_id = %id, by = %identity.user_id, "property updated");
        Ok(updated)
    }

    /// Delete a listing with its bookings, reviews and purchases.
    /// Gallery objects are removed from the image host afterwards;
    /// failures there are logged and do not fail the call.
    pub async fn delete_property(&self, identity: &Identity, id: Uuid) -> HearthResult<()> {
        let property = self.get_property(id).await?;
        authorize(identity, Action::DeleteProperty, &Subject::property(&property))?;

        let _guard = self.locks.acquire(id, self.config.store_timeout).await?;
        let limit = self.config.store_timeout;
        within(limit, "booking.delete_by_property", self.stores.bookings().delete_by_property(id))
            .await?;
        within(limit, "review.delete_by_property", self.stores.reviews().delete_by_property(id))
            .await?;
        within(
            limit,
            "purchase.delete_by_property",
            self.stores.purchases().delete_by_property(id),
        )
        .await?;
        within(limit, "property.delete", self.stores.properties().delete(id)).await?;
        info!(property_id = %id, by = %identity.user_id, "property deleted");

        for image in &property.gallery {
            self.discard_image(&image.handle).await;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Gallery images
    // -----------------------------------------------------------------------

    async fn discard_image(&self, handle: &str) {
        if let Err(e) = within(
            self.config.store_timeout,
            "image.delete",
            self.images.delete(handle),
        )
        .await
        {
            warn!(handle, error = %e, "failed to delete hosted image");
        }
    }

    /// Upload `bytes` to the image host and append it to the gallery.
    pub async fn attach_image(
        &self,
        identity: &Identity,
        id: Uuid,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> HearthResult<Property> {
        let property = self.get_property(id).await?;
        authorize(
            identity,
            Action::ManagePropertyImages,
            &Subject::property(&property),
        )?;

        check_image(&bytes, content_type, self.config.max_image_bytes)?;

        let stored = within(
            self.config.store_timeout,
            "image.upload",
            self.images.upload(bytes, content_type),
        )
        .await?;

        let result = self.append_to_gallery(id, stored.clone()).await;
        if result.is_err() {
            self.discard_image(&stored.handle).await;
        }
        let updated = result?;
        info!(property_id = %id, handle = %stored.handle, "image attached");
        Ok(updated)
    }

    async fn append_to_gallery(&self, id: Uuid, image: StoredImage) -> HearthResult<Property> {
        let _guard = self.locks.acquire(id, self.config.store_timeout).await?;
        let mut gallery = self.get_property(id).await?.gallery;
        if !gallery.iter().any(|g| g.handle == image.handle) {
            gallery.push(image);
        }
        within(
            self.config.store_timeout,
            "property.set_gallery",
            self.stores.properties().set_gallery(id, gallery),
        )
        .await
    }

    /// Drop an image from the gallery and delete the hosted object.
    pub async fn detach_image(
        &self,
        identity: &Identity,
        id: Uuid,
        handle: &str,
    ) -> HearthResult<Property> {
        let property = self.get_property(id).await?;
        authorize(
            identity,
            Action::ManagePropertyImages,
            &Subject::property(&property),
        )?;

        let updated = {
            let _guard = self.locks.acquire(id, self.config.store_timeout).await?;
            let mut gallery = self.get_property(id).await?.gallery;
            let before = gallery.len();
            gallery.retain(|g| g.handle != handle);
            if gallery.len() == before {
                return Err(HearthError::not_found("image", handle));
            }
            within(
                self.config.store_timeout,
                "property.set_gallery",
                self.stores.properties().set_gallery(id, gallery),
            )
            .await?
        };

        self.discard_image(handle).await;
        info!(property_id = %id, handle, "image detached");
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Purchases
    // -----------------------------------------------------------------------

    pub async fn create_purchase(
        &self,
        identity: &Identity,
        property_id: Uuid,
    ) -> HearthResult<Purchase> {
        let property = self.get_property(property_id).await?;
        authorize(identity, Action::CreatePurchase, &Subject::property(&property))?;

        let purchase = within(
            self.config.store_timeout,
            "purchase.create",
            self.stores.purchases().create(CreatePurchase {
                property_id,
                user_id: identity.user_id,
            }),
        )
        .await?;
        info!(purchase_id = %purchase.id, property_id = %property_id, "purchase created");
        Ok(purchase)
    }

    pub async fn list_my_purchases(&self, identity: &Identity) -> HearthResult<Vec<Purchase>> {
        within(
            self.config.store_timeout,
            "purchase.list_by_user",
            self.stores.purchases().list_by_user(identity.user_id),
        )
        .await
    }

    pub async fn cancel_purchase(&self, identity: &Identity, id: Uuid) -> HearthResult<()> {
        let purchase = within(
            self.config.store_timeout,
            "purchase.get",
            self.stores.purchases().get_by_id(id),
        )
        .await?;
        authorize(identity, Action::CancelPurchase, &Subject::purchase(&purchase))?;

        within(
            self.config.store_timeout,
            "purchase.delete",
            self.stores.purchases().delete(id),
        )
        .await?;
        info!(purchase_id = %id, by = %identity.user_id, "purchase cancelled");
        Ok(())
    }
}
