//! Database-specific error types and conversions.

use hearth_core::error::HearthError;
use surrealdb_types::QueryError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// A statement was rejected by the store, e.g. a UNIQUE index.
    #[error("Query rejected: {0}")]
    Rejected(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate {entity}: {detail}")]
    Duplicate { entity: String, detail: String },

    /// A stored value could not be mapped back into a domain type.
    #[error("Corrupt record: {0}")]
    Decode(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

impl DbError {
    /// Classify an error raised by `Response::check`. Unique index
    /// violations become [`DbError::Duplicate`].
    pub(crate) fn from_check(entity: &str, err: impl std::fmt::Display) -> Self {
        let msg = err.to_string();
        if msg.contains("already contains") {
            DbError::Duplicate {
                entity: entity.to_string(),
                detail: msg,
            }
        } else {
            DbError::Rejected(msg)
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

/// Lost connections and transient query failures mean the store is
/// unreachable or busy; anything else is a bug in what we sent.
fn is_transient(err: &surrealdb::Error) -> bool {
    err.is_connection()
        || matches!(
            err.query_details(),
            Some(
                QueryError::TimedOut { .. }
                    | QueryError::Cancelled
                    | QueryError::TransactionConflict
            )
        )
}

impl From<DbError> for HearthError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => HearthError::NotFound { entity, id },
            DbError::Duplicate { entity, .. } => {
                HearthError::conflict(format!("{entity} already exists"))
            }
            DbError::Surreal(e) if is_transient(&e) => {
                HearthError::Unavailable(format!("database: {e}"))
            }
            other => HearthError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_entity_and_id() {
        let err: HearthError = DbError::not_found("property", "abc").into();
        match err {
            HearthError::NotFound { entity, id } => {
                assert_eq!(entity, "property");
                assert_eq!(id, "abc");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_is_a_conflict() {
        let err: HearthError = DbError::Duplicate {
            entity: "review".into(),
            detail: "index already contains".into(),
        }
        .into();
        assert!(matches!(err, HearthError::Conflict { .. }));
    }

    #[test]
    fn lost_connection_is_unavailable() {
        let err: HearthError = DbError::Surreal(surrealdb::Error::connection(
            "websocket closed".into(),
            surrealdb_types::ConnectionError::ConnectionFailed,
        ))
        .into();
        assert!(matches!(err, HearthError::Unavailable(_)), "{err:?}");

        let err: HearthError = DbError::Surreal(surrealdb::Error::query(
            "write conflict".into(),
            QueryError::TransactionConflict,
        ))
        .into();
        assert!(matches!(err, HearthError::Unavailable(_)), "{err:?}");
    }

    #[test]
    fn other_store_errors_are_internal() {
        let err: HearthError =
            DbError::Surreal(surrealdb::Error::internal("parse error near SELEC".into())).into();
        assert!(matches!(err, HearthError::Internal(_)), "{err:?}");
    }

    #[test]
    fn decode_failures_are_internal() {
        let err: HearthError = DbError::Decode("bad uuid".into()).into();
        assert!(matches!(err, HearthError::Internal(_)));
    }
}
