//! Ticket Booking - an in-memory event ticket inventory and booking core
//!
//! Venues host events, events sell tickets through categories (VIP, Regular,
//! ...), and users book tickets from one category at a time. The crate is the
//! domain core only: rendering, persistence and payment execution belong to
//! collaborators.
//!
//! # Architecture
//!
//! ```text
//! BookingSystem (registry)
//!   ├── venues: Venue (read-only, shared)
//!   ├── events: Event ──► TicketCategory ──► Mutex<Pool of Ticket>
//!   └── users:  User  ──► Booking ──► Payment
//! ```
//!
//! # Key Features
//!
//! ## 1. No Double-Booking
//!
//! Each [`TicketCategory`] guards its tickets with its own mutex. A ticket
//! leaves `Available` under that lock, so two bookings can never hold the same
//! ticket and a category never hands out more tickets than it has.
//!
//! ## 2. Partial Claims
//!
//! A booking claims tickets one at a time and keeps whatever it got when the
//! category runs dry. Only a booking that claimed nothing is rejected with
//! [`BookingError::OutOfStock`].
//!
//! ## 3. One-Way Cancellation
//!
//! Cancelling moves every claimed ticket to `Canceled`. Canceled tickets are
//! never offered again.
//!
//! # Usage
//!
//! ```rust,ignore
//! let system = BookingSystem::new(BookingEnvironment::production());
//! let venue = system.add_venue("Arena", "1 Main St", 500)?;
//! let event = system.create_event(&venue, "Finals", date, "", "Sports")?;
//! let vip = event.add_category(system.env(), "VIP", Money::from_dollars(300), 2)?;
//! let user = system.register_user("Alice", "alice@example.com", "555-0100")?;
//! let booking = system.book(user.id(), event.id(), vip.id(), 2, PaymentMethod::CreditCard)?;
//! ```

#![forbid(unsafe_code)]

pub mod aggregates;
pub mod config;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod telemetry;
pub mod types;

pub use aggregates::{
    Booking, BookingSummary, CategoryAvailability, ClaimedTicket, Event, Payment, Ticket,
    TicketCategory, User,
};
pub use config::BookingConfig;
pub use environment::BookingEnvironment;
pub use error::{BookingError, Result};
pub use registry::BookingSystem;
pub use types::{
    BookingId, BookingStatus, CategoryId, EventId, Money, PaymentId, PaymentMethod,
    PaymentStatus, TicketId, TicketStatus, UserId, Venue, VenueId,
};
