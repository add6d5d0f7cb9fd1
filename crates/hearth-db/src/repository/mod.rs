//! SurrealDB implementations of the `hearth-core` repository traits.

mod booking;
mod property;
mod purchase;
mod review;
mod user;

pub use booking::SurrealBookingRepository;
pub use property::SurrealPropertyRepository;
pub use purchase::SurrealPurchaseRepository;
pub use review::SurrealReviewRepository;
pub use user::SurrealUserRepository;

use hearth_core::repository::Stores;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub total: u64,
}

pub(crate) fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
}

pub(crate) fn total_from(rows: Vec<CountRow>) -> u64 {
    rows.first().map(|r| r.total).unwrap_or(0)
}

/// All SurrealDB repositories over one connection.
#[derive(Clone)]
pub struct SurrealStores<C: Connection> {
    users: SurrealUserRepository<C>,
    properties: SurrealPropertyRepository<C>,
    bookings: SurrealBookingRepository<C>,
    reviews: SurrealReviewRepository<C>,
    purchases: SurrealPurchaseRepository<C>,
}

impl<C: Connection> SurrealStores<C> {
    /// `pepper` must match the one the auth service verifies with.
    pub fn new(db: Surreal<C>, pepper: Option<String>) -> Self {
        let users = match pepper {
            Some(p) => SurrealUserRepository::with_pepper(db.clone(), p),
            None => SurrealUserRepository::new(db.clone()),
        };
        Self {
            users,
            properties: SurrealPropertyRepository::new(db.clone()),
            bookings: SurrealBookingRepository::new(db.clone()),
            reviews: SurrealReviewRepository::new(db.clone()),
            purchases: SurrealPurchaseRepository::new(db),
        }
    }
}

impl<C: Connection> Stores for SurrealStores<C> {
    type Users = SurrealUserRepository<C>;
    type Properties = SurrealPropertyRepository<C>;
    type Bookings = SurrealBookingRepository<C>;
    type Reviews = SurrealReviewRepository<C>;
    type Purchases = SurrealPurchaseRepository<C>;

    fn users(&self) -> &Self::Users {
        &self.users
    }

    fn properties(&self) -> &Self::Properties {
        &self.properties
    }

    fn bookings(&self) -> &Self::Bookings {
        &self.bookings
    }

    fn reviews(&self) -> &Self::Reviews {
        &self.reviews
    }

    fn purchases(&self) -> &Self::Purchases {
        &self.purchases
    }
}
