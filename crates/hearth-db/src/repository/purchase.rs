//! SurrealDB implementation of [`PurchaseRepository`].

use chrono::{DateTime, Utc};
use hearth_core::error::HearthResult;
use hearth_core::models::purchase::{CreatePurchase, Purchase};
use hearth_core::repository::PurchaseRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::parse_uuid;
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PurchaseRow {
    property_id: String,
    user_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PurchaseRowWithId {
    record_id: String,
    property_id: String,
    user_id: String,
    created_at: DateTime<Utc>,
}

impl PurchaseRow {
    fn into_purchase(self, id: Uuid) -> Result<Purchase, DbError> {
        Ok(Purchase {
            id,
            property_id: parse_uuid("property", &self.property_id)?,
            user_id: parse_uuid("user", &self.user_id)?,
            created_at: self.created_at,
        })
    }
}

impl PurchaseRowWithId {
    fn try_into_purchase(self) -> Result<Purchase, DbError> {
        let id = parse_uuid("purchase", &self.record_id)?;
        PurchaseRow {
            property_id: self.property_id,
            user_id: self.user_id,
            created_at: self.created_at,
        }
        .into_purchase(id)
    }
}

/// SurrealDB implementation of the Purchase repository.
#[derive(Clone)]
pub struct SurrealPurchaseRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPurchaseRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PurchaseRepository for SurrealPurchaseRepository<C> {
    async fn create(&self, input: CreatePurchase) -> HearthResult<Purchase> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('purchase', $id) SET \
                 property_id = $property_id, user_id = $user_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("property_id", input.property_id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("purchase", e))?;

        let rows: Vec<PurchaseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("purchase", &id_str))?;

        Ok(row.into_purchase(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HearthResult<Purchase> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('purchase', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PurchaseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("purchase", &id_str))?;

        Ok(row.into_purchase(id)?)
    }

    async fn delete(&self, id: Uuid) -> HearthResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('purchase', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PurchaseRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("purchase", id_str).into());
        }
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> HearthResult<Vec<Purchase>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM purchase \
                 WHERE user_id = $user_id ORDER BY created_at DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PurchaseRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|row| row.try_into_purchase())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn delete_by_property(&self, property_id: Uuid) -> HearthResult<()> {
        self.db
            .query("DELETE purchase WHERE property_id = $property_id")
            .bind(("property_id", property_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_check("purchase", e))?;
        Ok(())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> HearthResult<()> {
        self.db
            .query("DELETE purchase WHERE user_id = $user_id")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_check("purchase", e))?;
        Ok(())
    }
}
