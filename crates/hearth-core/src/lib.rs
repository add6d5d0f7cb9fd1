//! Hearth Core — domain types and rules shared across all crates.
//!
//! This crate provides:
//! - Domain models ([`models`]) for users, properties, bookings,
//!   reviews and purchases
//! - The error taxonomy ([`error::HearthError`])
//! - Repository and collaborator traits ([`repository`], [`images`])
//! - Access decisions ([`access`]) and the pure marketplace rules
//!   ([`rules`]): date-range overlap, the booking lifecycle, rating
//!   aggregation and field validation
//!
//! - A deadline helper ([`deadline::within`]) for collaborator calls
//!
//! Nothing in here performs I/O.

pub mod access;
pub mod deadline;
pub mod error;
pub mod images;
pub mod models;
pub mod repository;
pub mod rules;

pub use access::{Action, Decision, Identity, Subject};
pub use error::{HearthError, HearthResult};
