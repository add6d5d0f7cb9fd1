//! Route handlers, one module per resource.

pub mod auth;
pub mod bookings;
pub mod health;
pub mod properties;
pub mod purchases;
pub mod reviews;
pub mod users;
