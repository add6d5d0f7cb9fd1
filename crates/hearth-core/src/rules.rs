//! Pure marketplace rules.

pub mod booking;
pub mod rating;
pub mod validation;
