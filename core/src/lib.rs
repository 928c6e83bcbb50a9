//! # Ticket Booking Core
//!
//! Dependency-injection seams shared by the booking domain and its test doubles.
//!
//! Everything non-deterministic the domain needs (the current time and fresh
//! identifiers) is abstracted behind a trait here and injected through an
//! environment value, so tests can substitute fixed clocks and sequential ids.
//!
//! ## Example
//!
//! ```
//! use ticket_booking_core::environment::{Clock, IdGenerator, RandomIdGenerator, SystemClock};
//!
//! let clock = SystemClock;
//! let ids = RandomIdGenerator;
//!
//! let _now = clock.now();
//! assert_ne!(ids.next_id(), ids.next_id());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;

/// Environment module - Dependency injection traits
///
/// All external sources of non-determinism are abstracted behind traits and
/// injected into the domain via an environment struct.
pub mod environment {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Id generator trait - abstracts identifier creation for testability
    ///
    /// Every identifier in the booking domain (venues, events, categories,
    /// tickets, bookings, payments, users) is minted through this trait.
    /// Implementations must never hand out the same id twice.
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier
        fn next_id(&self) -> Uuid;
    }

    /// Production id generator producing random v4 UUIDs.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIdGenerator;

    impl IdGenerator for RandomIdGenerator {
        fn next_id(&self) -> Uuid {
            Uuid::new_v4()
        }
    }
}
