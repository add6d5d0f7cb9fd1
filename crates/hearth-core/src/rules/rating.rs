//! Rolling rating aggregate for a property.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatingSummary {
    /// Arithmetic mean rounded to one decimal place; `0.0` when empty.
    pub rating: f64,
    pub num_reviews: u32,
}

impl RatingSummary {
    pub const EMPTY: RatingSummary = RatingSummary {
        rating: 0.0,
        num_reviews: 0,
    };
}

/// Recompute the aggregate from the complete set of ratings.
pub fn summarize<I>(ratings: I) -> RatingSummary
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0u64, 0u32), |(sum, count), r| (sum + u64::from(r), count + 1));

    if count == 0 {
        return RatingSummary::EMPTY;
    }

    let mean = sum as f64 / f64::from(count);
    RatingSummary {
        rating: (mean * 10.0).round() / 10.0,
        num_reviews: count,
    }
}
