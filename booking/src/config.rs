//! Configuration management for the booking core.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Booking configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Upper bound on tickets in a single request (`None` = unbounded)
    pub max_tickets_per_booking: Option<u32>,
    /// Reject categories that would push an event past its venue's capacity
    pub enforce_venue_capacity: bool,
    /// Default tracing filter (used when `RUST_LOG` is unset)
    pub log_filter: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_tickets_per_booking: None,
            enforce_venue_capacity: false,
            log_filter: "ticket_booking=info".to_string(),
        }
    }
}

impl BookingConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to the defaults. `RUST_LOG` is
    /// not read here: [`init_tracing`](crate::telemetry::init_tracing) consults it
    /// and falls back to `log_filter`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_tickets_per_booking: env::var("BOOKING_MAX_TICKETS_PER_BOOKING")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|max: &u32| *max > 0)
                .or(defaults.max_tickets_per_booking),
            enforce_venue_capacity: env::var("BOOKING_ENFORCE_VENUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.enforce_venue_capacity),
            log_filter: defaults.log_filter,
        }
    }

    /// Builder-style override for the per-request ticket limit
    #[must_use]
    pub fn with_max_tickets_per_booking(mut self, max: u32) -> Self {
        self.max_tickets_per_booking = Some(max);
        self
    }

    /// Builder-style override for venue capacity enforcement
    #[must_use]
    pub fn with_venue_capacity_enforced(mut self, enforce: bool) -> Self {
        self.enforce_venue_capacity = enforce;
        self
    }
}
