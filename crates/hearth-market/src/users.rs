//! Profiles, avatars and admin user management.

use std::sync::Arc;

use hearth_core::access::{Action, Identity, Subject, authorize};
use hearth_core::deadline::within;
use hearth_core::error::{HearthError, HearthResult};
use hearth_core::images::ImageHost;
use hearth_core::models::property::StoredImage;
use hearth_core::models::user::{UpdateUser, User, UserProfile};
use hearth_core::repository::{
    BookingRepository, PaginatedResult, Pagination, PropertyRepository, PurchaseRepository,
    ReviewRepository, Stores, UserRepository,
};
use hearth_core::rules::validation;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::check_image;
use crate::config::MarketConfig;
use crate::locks::PropertyLocks;
use crate::reviews::ReviewAggregate;

pub struct UserDirectory<S: Stores, I: ImageHost> {
    stores: Arc<S>,
    images: Arc<I>,
    reviews: ReviewAggregate<S>,
    config: MarketConfig,
}

impl<S: Stores, I: ImageHost> Clone for UserDirectory<S, I> {
    fn clone(&self) -> Self {
        Self {
            stores: Arc::clone(&self.stores),
            images: Arc::clone(&self.images),
            reviews: self.reviews.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: Stores, I: ImageHost> UserDirectory<S, I> {
    pub fn new(
        stores: Arc<S>,
        images: Arc<I>,
        locks: PropertyLocks,
        config: MarketConfig,
    ) -> Self {
        let reviews = ReviewAggregate::new(Arc::clone(&stores), locks, config.clone());
        Self {
            stores,
            images,
            reviews,
            config,
        }
    }

    async fn load(&self, id: Uuid) -> HearthResult<User> {
        within(
            self.config.store_timeout,
            "user.get",
            self.stores.users().get_by_id(id),
        )
        .await
    }

    async fn assemble(&self, user: User) -> HearthResult<UserProfile> {
        let limit = self.config.store_timeout;
        let listings = within(
            limit,
            "property.list_by_owner",
            self.stores.properties().list_by_owner(user.id),
        )
        .await?;
        let bookings = within(
            limit,
            "booking.list_by_user",
            self.stores.bookings().list_by_user(user.id),
        )
        .await?;
        let reviews = self.reviews.list_by_user(user.id).await?;
        let purchases = within(
            limit,
            "purchase.list_by_user",
            self.stores.purchases().list_by_user(user.id),
        )
        .await?;
        Ok(UserProfile {
            user,
            listings,
            bookings,
            reviews,
            purchases,
        })
    }

    /// The caller's account with everything they own or created.
    pub async fn profile(&self, identity: &Identity) -> HearthResult<UserProfile> {
        let user = self.load(identity.user_id).await?;
        self.assemble(user).await
    }

    async fn set_avatar(&self, id: Uuid, avatar: Option<StoredImage>) -> HearthResult<User> {
        within(
            self.config.store_timeout,
            "user.update",
            self.stores.users().update(
                id,
                UpdateUser {
                    avatar: Some(avatar),
                    ..Default::default()
                },
            ),
        )
        .await
    }

    async fn discard_avatar(&self, handle: Option<&str>) {
        let Some(handle) = handle else { return };
        if let Err(e) = within(
            self.config.store_timeout,
            "image.delete",
            self.images.delete(handle),
        )
        .await
        {
            warn!(handle, error = %e, "failed to delete hosted avatar");
        }
    }

    /// Upload a new avatar for the caller, replacing any previous one.
    pub async fn attach_avatar(
        &self,
        identity: &Identity,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> HearthResult<User> {
        let previous = self.load(identity.user_id).await?;
        check_image(&bytes, content_type, self.config.max_image_bytes)?;

        let stored = within(
            self.config.store_timeout,
            "image.upload",
            self.images.upload(bytes, content_type),
        )
        .await?;
        let handle = stored.handle.clone();
        let user = match self.set_avatar(identity.user_id, Some(stored)).await {
            Ok(user) => user,
            Err(e) => {
                self.discard_avatar(Some(handle.as_str())).await;
                return Err(e);
            }
        };

        self.discard_avatar(previous.avatar_handle.as_deref()).await;
        info!(user_id = %identity.user_id, handle = %handle, "avatar attached");
        Ok(user)
    }

    /// Clear the caller's avatar and delete the hosted object.
    pub async fn detach_avatar(&self, identity: &Identity) -> HearthResult<User> {
        let previous = self.load(identity.user_id).await?;
        if previous.avatar_url.is_none() {
            return Err(HearthError::not_found("avatar", identity.user_id));
        }
        let user = self.set_avatar(identity.user_id, None).await?;
        self.discard_avatar(previous.avatar_handle.as_deref()).await;
        info!(user_id = %identity.user_id, "avatar detached");
        Ok(user)
    }

    pub async fn list_users(
        &self,
        identity: &Identity,
        pagination: Pagination,
    ) -> HearthResult<PaginatedResult<User>> {
        authorize(identity, Action::ManageUsers, &Subject::none())?;
        within(
            self.config.store_timeout,
            "user.list",
            self.stores.users().list(pagination),
        )
        .await
    }

    pub async fn get_user(&self, identity: &Identity, id: Uuid) -> HearthResult<UserProfile> {
        authorize(identity, Action::ManageUsers, &Subject::none())?;
        let user = self.load(id).await?;
        self.assemble(user).await
    }

    /// Admin edit of name, email or role. An admin may clear an avatar
    /// but never set one; avatars only arrive through uploads.
    pub async fn update_user(
        &self,
        identity: &Identity,
        id: Uuid,
        mut patch: UpdateUser,
    ) -> HearthResult<User> {
        authorize(identity, Action::ManageUsers, &Subject::none())?;
        let previous = self.load(id).await?;
        if matches!(patch.avatar, Some(Some(_))) {
            return Err(HearthError::validation(
                "avatars are set by uploading an image",
            ));
        }
        let clears_avatar = patch.avatar.is_some();

        if let Some(name) = patch.name.take() {
            patch.name = Some(validation::required("name", &name)?);
        }
        if let Some(email) = patch.email.take() {
            let email = validation::normalize_email(&email)?;
            match within(
                self.config.store_timeout,
                "user.get_by_email",
                self.stores.users().get_by_email(&email),
            )
            .await
            {
                Ok(other) if other.id != id => {
                    return Err(HearthError::conflict("a user with this email already exists"));
                }
                Ok(_) | Err(HearthError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
            patch.email = Some(email);
        }

        let user = within(
            self.config.store_timeout,
            "user.update",
            self.stores.users().update(id, patch),
        )
        .await?;
        if clears_avatar {
            self.discard_avatar(previous.avatar_handle.as_deref()).await;
        }
        info!(user_id = %id, by = %identity.user_id, role = %user.role.as_str(), "user updated");
        Ok(user)
    }

    /// Remove an account. Users who still own listings are refused;
    /// their reviews and purchases go with them, bookings stay as
    /// history.
    pub async fn delete_user(&self, identity: &Identity, id: Uuid) -> HearthResult<()> {
        authorize(identity, Action::ManageUsers, &Subject::none())?;
        if id == identity.user_id {
            return Err(HearthError::conflict("you cannot delete your own account"));
        }
        let user = self.load(id).await?;

        let listings = within(
            self.config.store_timeout,
            "property.list_by_owner",
            self.stores.properties().list_by_owner(user.id),
        )
        .await?;
        if !listings.is_empty() {
            return Err(HearthError::conflict(format!(
                "user still owns {} listing(s); delete them first",
                listings.len()
            )));
        }

        let purged = self.reviews.purge_user_reviews(user.id).await?;
        within(
            self.config.store_timeout,
            "purchase.delete_by_user",
            self.stores.purchases().delete_by_user(user.id),
        )
        .await?;
        within(
            self.config.store_timeout,
            "user.delete",
            self.stores.users().delete(user.id),
        )
        .await?;
        self.discard_avatar(user.avatar_handle.as_deref()).await;
        info!(user_id = %id, by = %identity.user_id, reviews_removed = purged, "user deleted");
        Ok(())
    }
}
