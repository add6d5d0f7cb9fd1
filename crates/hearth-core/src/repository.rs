//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The store is authoritative:
//! relations between records are always answered by query, never by
//! reference lists kept on the parent.

use uuid::Uuid;

use crate::error::HearthResult;
use crate::models::{
    booking::{Booking, BookingStatus, CreateBooking},
    property::{CreateProperty, Property, PropertyFilter, StoredImage, UpdateProperty},
    purchase::{CreatePurchase, Purchase},
    review::{CreateReview, Review, UpdateReview},
    user::{CreateUser, UpdateUser, User},
};
use crate::rules::rating::RatingSummary;

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    pub const MAX_LIMIT: u64 = 100;

    /// Builds a window from a 1-based page number, clamping the page
    /// size to `1..=MAX_LIMIT`.
    pub fn page(page: u64, per_page: u64) -> Self {
        let limit = per_page.clamp(1, Self::MAX_LIMIT);
        Self {
            offset: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> PaginatedResult<T> {
    /// 1-based number of the page this window starts on.
    pub fn page(&self) -> u64 {
        self.offset / self.limit.max(1) + 1
    }

    pub fn pages(&self) -> u64 {
        self.total.div_ceil(self.limit.max(1))
    }
}

pub trait UserRepository: Send + Sync {
    /// Hashes `input.password` before storage. A taken email is a
    /// [`Conflict`](crate::HearthError::Conflict).
    fn create(&self, input: CreateUser) -> impl Future<Output = HearthResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HearthResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = HearthResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = HearthResult<User>> + Send;
    fn set_password(
        &self,
        id: Uuid,
        password: &str,
    ) -> impl Future<Output = HearthResult<()>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HearthResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = HearthResult<PaginatedResult<User>>> + Send;
}

pub trait PropertyRepository: Send + Sync {
    fn create(
        &self,
        input: CreateProperty,
    ) -> impl Future<Output = HearthResult<Property>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HearthResult<Property>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProperty,
    ) -> impl Future<Output = HearthResult<Property>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HearthResult<()>> + Send;
    fn list(
        &self,
        filter: PropertyFilter,
        pagination: Pagination,
    ) -> impl Future<Output = HearthResult<PaginatedResult<Property>>> + Send;
    fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> impl Future<Output = HearthResult<Vec<Property>>> + Send;
    fn set_rating(
        &self,
        id: Uuid,
        summary: RatingSummary,
    ) -> impl Future<Output = HearthResult<Property>> + Send;
    fn set_gallery(
        &self,
        id: Uuid,
        gallery: Vec<StoredImage>,
    ) -> impl Future<Output = HearthResult<Property>> + Send;
}

pub trait BookingRepository: Send + Sync {
    /// Stores a new booking in `Pending`.
    fn create(&self, input: CreateBooking) -> impl Future<Output = HearthResult<Booking>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HearthResult<Booking>> + Send;
    fn set_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> impl Future<Output = HearthResult<Booking>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HearthResult<()>> + Send;
    /// Bookings on a property that still hold their dates
    /// (every status except `Cancelled`).
    fn list_active_by_property(
        &self,
        property_id: Uuid,
    ) -> impl Future<Output = HearthResult<Vec<Booking>>> + Send;
    fn list_by_property(
        &self,
        property_id: Uuid,
    ) -> impl Future<Output = HearthResult<Vec<Booking>>> + Send;
    fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = HearthResult<Vec<Booking>>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = HearthResult<PaginatedResult<Booking>>> + Send;
    fn delete_by_property(
        &self,
        property_id: Uuid,
    ) -> impl Future<Output = HearthResult<()>> + Send;
}

pub trait ReviewRepository: Send + Sync {
    /// A second review by the same user on the same property is a
    /// [`Conflict`](crate::HearthError::Conflict).
    fn create(&self, input: CreateReview) -> impl Future<Output = HearthResult<Review>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HearthResult<Review>> + Send;
    fn find_by_property_and_user(
        &self,
        property_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = HearthResult<Option<Review>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateReview,
    ) -> impl Future<Output = HearthResult<Review>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HearthResult<()>> + Send;
    /// Newest first.
    fn list_by_property(
        &self,
        property_id: Uuid,
    ) -> impl Future<Output = HearthResult<Vec<Review>>> + Send;
    /// Newest first.
    fn list_by_user(&self, user_id: Uuid) -> impl Future<Output = HearthResult<Vec<Review>>> + Send;
    /// Every rating currently recorded for a property.
    fn ratings_for_property(
        &self,
        property_id: Uuid,
    ) -> impl Future<Output = HearthResult<Vec<u8>>> + Send;
    fn delete_by_property(
        &self,
        property_id: Uuid,
    ) -> impl Future<Output = HearthResult<()>> + Send;
}

pub trait PurchaseRepository: Send + Sync {
    fn create(
        &self,
        input: CreatePurchase,
    ) -> impl Future<Output = HearthResult<Purchase>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HearthResult<Purchase>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = HearthResult<()>> + Send;
    /// Newest first.
    fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = HearthResult<Vec<Purchase>>> + Send;
    fn delete_by_property(
        &self,
        property_id: Uuid,
    ) -> impl Future<Output = HearthResult<()>> + Send;
    fn delete_by_user(&self, user_id: Uuid) -> impl Future<Output = HearthResult<()>> + Send;
}

/// Every repository the marketplace services need, bundled so a
/// service takes one type parameter instead of five.
pub trait Stores: Send + Sync + 'static {
    type Users: UserRepository;
    type Properties: PropertyRepository;
    type Bookings: BookingRepository;
    type Reviews: ReviewRepository;
    type Purchases: PurchaseRepository;

    fn users(&self) -> &Self::Users;
    fn properties(&self) -> &Self::Properties;
    fn bookings(&self) -> &Self::Bookings;
    fn reviews(&self) -> &Self::Reviews;
    fn purchases(&self) -> &Self::Purchases;
}
