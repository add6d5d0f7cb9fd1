//! Booking ledger: conflict-free stays and the status lifecycle.

use std::sync::Arc;

use chrono::NaiveDate;
use hearth_core::access::{Action, Identity, Subject, authorize};
use hearth_core::deadline::within;
use hearth_core::error::{HearthError, HearthResult};
use hearth_core::models::booking::{Booking, BookingStatus, CreateBooking, DateRange};
use hearth_core::models::property::PropertyStatus;
use hearth_core::repository::{
    BookingRepository, PaginatedResult, Pagination, PropertyRepository, Stores,
};
use hearth_core::rules::booking::{find_conflict, transition_action};
use hearth_core::rules::validation;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::MarketConfig;
use crate::locks::PropertyLocks;

/// A guest's booking request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub property_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
}

pub struct BookingLedger<S: Stores> {
    stores: Arc<S>,
    locks: PropertyLocks,
    config: MarketConfig,
}

impl<S: Stores> Clone for BookingLedger<S> {
    fn clone(&self) -> Self {
        Self {
            stores: Arc::clone(&self.stores),
            locks: self.locks.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: Stores> BookingLedger<S> {
    pub fn new(stores: Arc<S>, locks: PropertyLocks, config: MarketConfig) -> Self {
        Self {
            stores,
            locks,
            config,
        }
    }

    async fn load(&self, id: Uuid) -> HearthResult<Booking> {
        within(
            self.config.store_timeout,
            "booking.get",
            self.stores.bookings().get_by_id(id),
        )
        .await
    }

    /// Reserve `[start_date, end_date)` on a property for the caller.
    ///
    /// The owner is refused before any input is looked at. The overlap
    /// check and the insert run under the property's lock, against the
    /// stored bookings rather than any cached list.
    pub async fn create_booking(
        &self,
        identity: &Identity,
        input: NewBooking,
    ) -> HearthResult<Booking> {
        let property = within(
            self.config.store_timeout,
            "property.get",
            self.stores.properties().get_by_id(input.property_id),
        )
        .await?;
        authorize(identity, Action::CreateBooking, &Subject::property(&property))?;

        let stay = DateRange::new(input.start_date, input.end_date)?;
        validation::guests(input.guests)?;
        validation::total_price(input.total_price)?;
        if property.status == PropertyStatus::Unavailable {
            return Err(HearthError::validation("property is not accepting bookings"));
        }

        let _guard = self
            .locks
            .acquire(property.id, self.config.store_timeout)
            .await?;

        let existing = within(
            self.config.store_timeout,
            "booking.list_active",
            self.stores.bookings().list_active_by_property(property.id),
        )
        .await?;
        if let Some(clash) = find_conflict(&existing, &stay) {
            debug!(
                property_id = %property.id,
                requested = %stay,
                existing = %clash.id,
                "booking rejected: dates overlap"
            );
            return Err(HearthError::conflict(
                "property is already booked for the selected dates",
            ));
        }

        let booking = within(
            self.config.store_timeout,
            "booking.create",
            self.stores.bookings().create(CreateBooking {
                property_id: property.id,
                user_id: identity.user_id,
                owner_id: property.owner_id,
                stay,
                guests: input.guests,
                total_price: input.total_price,
            }),
        )
        .await?;

        info!(
            booking_id = %booking.id,
            property_id = %property.id,
            user_id = %identity.user_id,
            stay = %stay,
            "booking created"
        );
        Ok(booking)
    }

    /// Move a booking along the lifecycle.
    ///
    /// Illegal edges (including anything out of a terminal state) fail
    /// with `InvalidTransition` before the caller's rights are checked.
    pub async fn update_status(
        &self,
        identity: &Identity,
        booking_id: Uuid,
        next: BookingStatus,
    ) -> HearthResult<Booking> {
        let booking = self.load(booking_id).await?;
        let _guard = self
            .locks
            .acquire(booking.property_id, self.config.store_timeout)
            .await?;

        // Re-read under the lock; another writer may have moved it.
        let booking = self.load(booking_id).await?;
        let action = transition_action(booking.status, next)?;
        if let Err(e) = authorize(identity, action, &Subject::booking(&booking)) {
            debug!(
                booking_id = %booking.id,
                from = %booking.status,
                to = %next,
                "status change denied"
            );
            return Err(e);
        }

        let updated = within(
            self.config.store_timeout,
            "booking.set_status",
            self.stores.bookings().set_status(booking.id, next),
        )
        .await?;

        info!(
            booking_id = %updated.id,
            from = %booking.status,
            to = %updated.status,
            by = %identity.user_id,
            "booking status changed"
        );
        Ok(updated)
    }

    pub async fn cancel_booking(
        &self,
        identity: &Identity,
        booking_id: Uuid,
    ) -> HearthResult<Booking> {
        self.update_status(identity, booking_id, BookingStatus::Cancelled)
            .await
    }

    pub async fn get_booking(
        &self,
        identity: &Identity,
        booking_id: Uuid,
    ) -> HearthResult<Booking> {
        let booking = self.load(booking_id).await?;
        authorize(identity, Action::ViewBooking, &Subject::booking(&booking))?;
        Ok(booking)
    }

    pub async fn list_my_bookings(&self, identity: &Identity) -> HearthResult<Vec<Booking>> {
        within(
            self.config.store_timeout,
            "booking.list_by_user",
            self.stores.bookings().list_by_user(identity.user_id),
        )
        .await
    }

    pub async fn list_for_property(
        &self,
        identity: &Identity,
        property_id: Uuid,
    ) -> HearthResult<Vec<Booking>> {
        let property = within(
            self.config.store_timeout,
            "property.get",
            self.stores.properties().get_by_id(property_id),
        )
        .await?;
        authorize(
            identity,
            Action::ViewPropertyBookings,
            &Subject::property(&property),
        )?;
        within(
            self.config.store_timeout,
            "booking.list_by_property",
            self.stores.bookings().list_by_property(property_id),
        )
        .await
    }

    pub async fn list_all(
        &self,
        identity: &Identity,
        pagination: Pagination,
    ) -> HearthResult<PaginatedResult<Booking>> {
        authorize(identity, Action::ListAllBookings, &Subject::none())?;
        within(
            self.config.store_timeout,
            "booking.list",
            self.stores.bookings().list(pagination),
        )
        .await
    }

    /// Admin cleanup: remove the record outright.
    pub async fn delete_booking(&self, identity: &Identity, booking_id: Uuid) -> HearthResult<()> {
        let booking = self.load(booking_id).await?;
        authorize(identity, Action::DeleteBooking, &Subject::booking(&booking))?;
        let _guard = self
            .locks
            .acquire(booking.property_id, self.config.store_timeout)
            .await?;
        within(
            self.config.store_timeout,
            "booking.delete",
            self.stores.bookings().delete(booking.id),
        )
        .await?;
        info!(booking_id = %booking.id, by = %identity.user_id, "booking deleted");
        Ok(())
    }
}
