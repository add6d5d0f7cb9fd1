//! SurrealDB implementation of [`BookingRepository`].
//!
//! Stay dates are stored as `YYYY-MM-DD` strings so they sort and
//! compare chronologically.

use chrono::{DateTime, NaiveDate, Utc};
use hearth_core::error::HearthResult;
use hearth_core::models::booking::{Booking, BookingStatus, CreateBooking};
use hearth_core::repository::{BookingRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, parse_uuid, total_from};
use crate::error::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, SurrealValue)]
struct BookingRow {
    property_id: String,
    user_id: String,
    owner_id: String,
    start_date: String,
    end_date: String,
    guests: u32,
    total_price: f64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct BookingRowWithId {
    record_id: String,
    property_id: String,
    user_id: String,
    owner_id: String,
    start_date: String,
    end_date: String,
    guests: u32,
    total_price: f64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<BookingStatus, DbError> {
    BookingStatus::parse(s).ok_or_else(|| DbError::Decode(format!("unknown booking status: {s}")))
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| DbError::Decode(format!("invalid {field}: {e}")))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl BookingRow {
    fn into_booking(self, id: Uuid) -> Result<Booking, DbError> {
        Ok(Booking {
            id,
            property_id: parse_uuid("property", &self.property_id)?,
            user_id: parse_uuid("user", &self.user_id)?,
            owner_id: parse_uuid("owner", &self.owner_id)?,
            start_date: parse_date("start_date", &self.start_date)?,
            end_date: parse_date("end_date", &self.end_date)?,
            guests: self.guests,
            total_price: self.total_price,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl BookingRowWithId {
    fn try_into_booking(self) -> Result<Booking, DbError> {
        let id = parse_uuid("booking", &self.record_id)?;
        BookingRow {
            property_id: self.property_id,
            user_id: self.user_id,
            owner_id: self.owner_id,
            start_date: self.start_date,
            end_date: self.end_date,
            guests: self.guests,
            total_price: self.total_price,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_booking(id)
    }
}

fn collect(rows: Vec<BookingRowWithId>) -> Result<Vec<Booking>, DbError> {
    rows.into_iter().map(|row| row.try_into_booking()).collect()
}

/// SurrealDB implementation of the Booking repository.
#[derive(Clone)]
pub struct SurrealBookingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBookingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        clause: &str,
        key: &'static str,
        value: Uuid,
    ) -> HearthResult<Vec<Booking>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM booking \
             WHERE {clause} ORDER BY start_date ASC, created_at ASC"
        );
        let mut result = self
            .db
            .query(&query)
            .bind((key, value.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(collect(rows)?)
    }
}

impl<C: Connection> BookingRepository for SurrealBookingRepository<C> {
    async fn create(&self, input: CreateBooking) -> HearthResult<Booking> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('booking', $id) SET \
                 property_id = $property_id, user_id = $user_id, \
                 owner_id = $owner_id, \
                 start_date = $start_date, end_date = $end_date, \
                 guests = $guests, total_price = $total_price, \
                 status = $status",
            )
            .bind(("id", id_str.clone()))
            .bind(("property_id", input.property_id.to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("owner_id", input.owner_id.to_string()))
            .bind(("start_date", format_date(input.stay.start())))
            .bind(("end_date", format_date(input.stay.end())))
            .bind(("guests", input.guests))
            .bind(("total_price", input.total_price))
            .bind(("status", BookingStatus::Pending.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("booking", e))?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("booking", &id_str))?;

        Ok(row.into_booking(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> HearthResult<Booking> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('booking', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("booking", &id_str))?;

        Ok(row.into_booking(id)?)
    }

    async fn set_status(&self, id: Uuid, status: BookingStatus) -> HearthResult<Booking> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('booking', $id) SET \
                 status = $status, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", status.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("booking", e))?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("booking", &id_str))?;

        Ok(row.into_booking(id)?)
    }

    async fn delete(&self, id: Uuid) -> HearthResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('booking', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("booking", id_str).into());
        }
        Ok(())
    }

    async fn list_active_by_property(&self, property_id: Uuid) -> HearthResult<Vec<Booking>> {
        self.list_where(
            "property_id = $property_id AND status != 'Cancelled'",
            "property_id",
            property_id,
        )
        .await
    }

    async fn list_by_property(&self, property_id: Uuid) -> HearthResult<Vec<Booking>> {
        self.list_where("property_id = $property_id", "property_id", property_id)
            .await
    }

    async fn list_by_user(&self, user_id: Uuid) -> HearthResult<Vec<Booking>> {
        self.list_where("user_id = $user_id", "user_id", user_id)
            .await
    }

    async fn list(&self, pagination: Pagination) -> HearthResult<PaginatedResult<Booking>> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM booking GROUP ALL; \
                 SELECT meta::id(id) AS record_id, * FROM booking \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let count_rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = total_from(count_rows);
        let rows: Vec<BookingRowWithId> = result.take(1).map_err(DbError::from)?;

        Ok(PaginatedResult {
            items: collect(rows)?,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn delete_by_property(&self, property_id: Uuid) -> HearthResult<()> {
        self.db
            .query("DELETE booking WHERE property_id = $property_id")
            .bind(("property_id", property_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::from_check("booking", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_round_trip_through_storage_format() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(format_date(date), "2024-07-01");
        assert_eq!(parse_date("start_date", "2024-07-01").unwrap(), date);
        assert!(parse_date("start_date", "07/01/2024").is_err());
    }
}
