//! Injected dependencies for the booking domain.

use crate::config::BookingConfig;
use std::sync::Arc;
use ticket_booking_core::environment::{Clock, IdGenerator, RandomIdGenerator, SystemClock};

/// Environment dependencies for every booking operation
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock for timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of every identifier
    pub ids: Arc<dyn IdGenerator>,
    /// Runtime configuration
    pub config: BookingConfig,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>, config: BookingConfig) -> Self {
        Self { clock, ids, config }
    }

    /// System clock, random UUIDs and configuration read from the environment
    #[must_use]
    pub fn production() -> Self {
        Self::new(
            Arc::new(SystemClock),
            Arc::new(RandomIdGenerator),
            BookingConfig::from_env(),
        )
    }
}

impl std::fmt::Debug for BookingEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingEnvironment")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
