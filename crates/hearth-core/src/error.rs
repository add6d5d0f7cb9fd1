//! Error types for the Hearth marketplace.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HearthError {
    /// Malformed or missing input; the caller can fix it and retry.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Missing, invalid or expired credential.
    #[error("Authentication required: {reason}")]
    Unauthenticated { reason: String },

    /// Authenticated, but the access rules deny the action.
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// Double-booking, duplicate review, duplicate email.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// A persistence call or lock acquisition exceeded its deadline.
    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },

    /// A collaborator (store, image host) could not be reached.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HearthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::Unauthenticated {
            reason: reason.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

pub type HearthResult<T> = Result<T, HearthError>;
