//! Booking domain model.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{HearthError, HearthResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
            BookingStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(BookingStatus::Pending),
            "Confirmed" => Some(BookingStatus::Confirmed),
            "Cancelled" => Some(BookingStatus::Cancelled),
            "Completed" => Some(BookingStatus::Completed),
            "Rejected" => Some(BookingStatus::Rejected),
            _ => None,
        }
    }

    /// Terminal states accept no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled | BookingStatus::Completed | BookingStatus::Rejected
        )
    }

    /// Whether a booking in this state still holds its dates.
    pub fn holds_dates(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open stay interval `[start, end)` in calendar days.
///
/// Construction guarantees `end > start`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> HearthResult<Self> {
        if end <= start {
            return Err(HearthError::validation("end date must be after start date"));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// `[s1, e1)` and `[s2, e2)` overlap iff `s1 < e2 && s2 < e1`.
    /// Back-to-back stays (`e1 == s2`) do not overlap.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub property_id: Uuid,
    /// The guest who made the booking.
    pub user_id: Uuid,
    /// Owner of the property at booking time, kept for access checks.
    pub owner_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn stay(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    pub property_id: Uuid,
    pub user_id: Uuid,
    pub owner_id: Uuid,
    pub stay: DateRange,
    pub guests: u32,
    pub total_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn range(s: u32, e: u32) -> DateRange {
        DateRange::new(day(s), day(e)).unwrap()
    }

    #[test]
    fn end_must_follow_start() {
        assert!(DateRange::new(day(5), day(5)).is_err());
        assert!(DateRange::new(day(5), day(1)).is_err());
        assert_eq!(range(1, 5).nights(), 4);
    }

    #[test]
    fn overlapping_ranges_conflict() {
        assert!(range(1, 5).overlaps(&range(4, 8)));
        assert!(range(4, 8).overlaps(&range(1, 5)));
        // Containment in both directions.
        assert!(range(1, 10).overlaps(&range(3, 4)));
        assert!(range(3, 4).overlaps(&range(1, 10)));
        assert!(range(1, 5).overlaps(&range(1, 5)));
    }

    #[test]
    fn back_to_back_ranges_do_not_conflict() {
        assert!(!range(1, 5).overlaps(&range(5, 8)));
        assert!(!range(5, 8).overlaps(&range(1, 5)));
        assert!(!range(1, 2).overlaps(&range(10, 12)));
    }

    #[test]
    fn only_cancelled_releases_dates() {
        assert!(!BookingStatus::Cancelled.holds_dates());
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Rejected,
        ] {
            assert!(status.holds_dates(), "{status} should hold dates");
        }
    }

    #[test]
    fn status_strings_roundtrip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
            BookingStatus::Rejected,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("Archived"), None);
    }
}
