//! Marketplace service configuration.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Deadline for each store call and each property-lock acquisition.
    pub store_timeout: Duration,
    /// Largest accepted gallery upload in bytes.
    pub max_image_bytes: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}
