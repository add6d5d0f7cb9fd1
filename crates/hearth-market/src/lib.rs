//! Hearth Market — the services behind the marketplace API.
//!
//! - [`BookingLedger`]: no two stays on a property overlap, and status
//!   changes follow the lifecycle table
//! - [`ReviewAggregate`]: one review per guest and property, with the
//!   property rating recomputed on every write
//! - [`CatalogService`]: listings, gallery images and purchases
//! - [`UserDirectory`]: profile views, avatars and admin user management
//!
//! Writers that check and then write on one property serialize through
//! [`PropertyLocks`]. Every store call runs under
//! [`MarketConfig::store_timeout`].

pub mod bookings;
pub mod catalog;
pub mod config;
pub mod locks;
pub mod reviews;
pub mod users;

pub use bookings::{BookingLedger, NewBooking};
pub use catalog::{CatalogService, NewProperty};
pub use config::MarketConfig;
pub use locks::PropertyLocks;
pub use reviews::{NewReview, ReviewAggregate};
pub use users::UserDirectory;
