//! Domain models for Hearth.
//!
//! Stored back-reference lists (a user's listings, bookings, reviews)
//! are intentionally absent: those views are built by query.

pub mod booking;
pub mod property;
pub mod purchase;
pub mod review;
pub mod user;
