//! Booking lifecycle: the conflict check and the transition table.

use crate::access::Action;
use crate::error::{HearthError, HearthResult};
use crate::models::booking::{Booking, BookingStatus, DateRange};

/// First booking in `existing` that still holds dates overlapping
/// `stay`. Bookings on other properties must already be filtered out.
pub fn find_conflict<'a>(existing: &'a [Booking], stay: &DateRange) -> Option<&'a Booking> {
    existing
        .iter()
        .find(|b| b.status.holds_dates() && b.stay().overlaps(stay))
}

/// Looks up the edge `from -> to` in the lifecycle table and returns
/// the action the caller must be authorized for.
///
/// | from               | to        | action          |
/// |--------------------|-----------|-----------------|
/// | Pending            | Confirmed | `ManageBooking` |
/// | Pending            | Rejected  | `ManageBooking` |
/// | Confirmed          | Completed | `ManageBooking` |
/// | Pending, Confirmed | Cancelled | `CancelBooking` |
///
/// Everything else, including any edge out of a terminal state, is an
/// [`HearthError::InvalidTransition`].
pub fn transition_action(from: BookingStatus, to: BookingStatus) -> HearthResult<Action> {
    use BookingStatus::*;

    match (from, to) {
        (Pending, Confirmed) | (Pending, Rejected) | (Confirmed, Completed) => {
            Ok(Action::ManageBooking)
        }
        (Pending, Cancelled) | (Confirmed, Cancelled) => Ok(Action::CancelBooking),
        _ => Err(HearthError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}
