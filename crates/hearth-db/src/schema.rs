//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs and calendar dates
//! (`YYYY-MM-DD`) are stored as strings. Enums are stored as strings
//! with ASSERT constraints.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "user_avatar_handle",
        sql: SCHEMA_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['user', 'admin'];
DEFINE FIELD avatar_url ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Properties
-- =======================================================================
DEFINE TABLE property SCHEMAFULL;
DEFINE FIELD owner_id ON TABLE property TYPE string;
DEFINE FIELD title ON TABLE property TYPE string;
DEFINE FIELD description ON TABLE property TYPE string;
DEFINE FIELD property_type ON TABLE property TYPE string;
DEFINE FIELD location ON TABLE property TYPE string;
DEFINE FIELD price ON TABLE property TYPE float ASSERT $value > 0;
DEFINE FIELD bedrooms ON TABLE property TYPE int ASSERT $value >= 0;
DEFINE FIELD bathrooms ON TABLE property TYPE int ASSERT $value >= 0;
DEFINE FIELD area ON TABLE property TYPE float ASSERT $value >= 0;
DEFINE FIELD image ON TABLE property TYPE string;
DEFINE FIELD gallery ON TABLE property TYPE array<object> DEFAULT [];
DEFINE FIELD gallery.*.url ON TABLE property TYPE string;
DEFINE FIELD gallery.*.handle ON TABLE property TYPE string;
DEFINE FIELD amenities ON TABLE property TYPE array<string> DEFAULT [];
DEFINE FIELD status ON TABLE property TYPE string \
    ASSERT $value IN ['Available', 'Unavailable'];
DEFINE FIELD rating ON TABLE property TYPE float DEFAULT 0.0 \
    ASSERT $value >= 0 AND $value <= 5;
DEFINE FIELD num_reviews ON TABLE property TYPE int DEFAULT 0;
DEFINE FIELD created_at ON TABLE property TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE property TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_property_owner ON TABLE property COLUMNS owner_id;
DEFINE INDEX idx_property_status ON TABLE property COLUMNS status;

-- =======================================================================
-- Bookings (half-open stay [start_date, end_date))
-- =======================================================================
DEFINE TABLE booking SCHEMAFULL;
DEFINE FIELD property_id ON TABLE booking TYPE string;
DEFINE FIELD user_id ON TABLE booking TYPE string;
DEFINE FIELD owner_id ON TABLE booking TYPE string;
DEFINE FIELD start_date ON TABLE booking TYPE string;
DEFINE FIELD end_date ON TABLE booking TYPE string;
DEFINE FIELD guests ON TABLE booking TYPE int ASSERT $value >= 1;
DEFINE FIELD total_price ON TABLE booking TYPE float \
    ASSERT $value >= 0;
DEFINE FIELD status ON TABLE booking TYPE string \
    ASSERT $value IN ['Pending', 'Confirmed', 'Cancelled', \
                      'Completed', 'Rejected'];
DEFINE FIELD created_at ON TABLE booking TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE booking TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_booking_property ON TABLE booking \
    COLUMNS property_id, status;
DEFINE INDEX idx_booking_user ON TABLE booking COLUMNS user_id;

-- =======================================================================
-- Reviews (one per property and user)
-- =======================================================================
DEFINE TABLE review SCHEMAFULL;
DEFINE FIELD property_id ON TABLE review TYPE string;
DEFINE FIELD user_id ON TABLE review TYPE string;
DEFINE FIELD booking_id ON TABLE review TYPE option<string>;
DEFINE FIELD rating ON TABLE review TYPE int \
    ASSERT $value >= 1 AND $value <= 5;
DEFINE FIELD comment ON TABLE review TYPE string \
    ASSERT string::len($value) > 0 AND string::len($value) <= 1000;
DEFINE FIELD created_at ON TABLE review TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE review TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_review_property_user ON TABLE review \
    COLUMNS property_id, user_id UNIQUE;
DEFINE INDEX idx_review_user ON TABLE review COLUMNS user_id;

-- =======================================================================
-- Purchases
-- =======================================================================
DEFINE TABLE purchase SCHEMAFULL;
DEFINE FIELD property_id ON TABLE purchase TYPE string;
DEFINE FIELD user_id ON TABLE purchase TYPE string;
DEFINE FIELD created_at ON TABLE purchase TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_purchase_user ON TABLE purchase COLUMNS user_id;
DEFINE INDEX idx_purchase_property ON TABLE purchase COLUMNS property_id;
";

// -----------------------------------------------------------------------
// Schema v2: hosted avatars keep their deletable handle
// -----------------------------------------------------------------------

const SCHEMA_V2: &str = "\
DEFINE FIELD avatar_handle ON TABLE user TYPE option<string>;
";

/// Run all pending migrations.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(version = migration.version, "Migration applied");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn one_review_per_property_and_user_is_indexed() {
        assert!(SCHEMA_V1.contains("COLUMNS property_id, user_id UNIQUE"));
        assert!(SCHEMA_V1.contains("idx_user_email ON TABLE user COLUMNS email UNIQUE"));
    }

    #[test]
    fn latest_migration_adds_avatar_handle() {
        let last = MIGRATIONS.last().unwrap();
        assert_eq!(last.version, 2);
        assert!(last.sql.contains("avatar_handle ON TABLE user"));
    }
}
