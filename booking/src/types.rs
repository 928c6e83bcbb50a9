//! Domain types for the ticket booking core.
//!
//! Identifiers, the `Money` value object, venues and the closed status enums
//! that drive the ticket and booking state machines.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use ticket_booking_core::environment::IdGenerator;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Mints a new `", stringify!($name), "` from the injected generator")]
            #[must_use]
            pub fn generate(ids: &dyn IdGenerator) -> Self {
                Self(ids.next_id())
            }

            #[doc = concat!("Create a `", stringify!($name), "` from a `Uuid`")]
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a venue
    VenueId
);
define_id!(
    /// Unique identifier for an event
    EventId
);
define_id!(
    /// Unique identifier for a ticket category (one inventory pool)
    CategoryId
);
define_id!(
    /// Unique identifier for a ticket
    TicketId
);
define_id!(
    /// Unique identifier for a booking
    BookingId
);
define_id!(
    /// Unique identifier for a payment
    PaymentId
);
define_id!(
    /// Unique identifier for a user
    UserId
);

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from dollars, saturating at `u64::MAX` cents
    #[must_use]
    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars.saturating_mul(100))
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount in dollars (rounded down)
    #[must_use]
    pub const fn dollars(&self) -> u64 {
        self.0 / 100
    }

    /// Adds two money amounts, saturating on overflow
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.dollars(), self.0 % 100)
    }
}

// ============================================================================
// Venue
// ============================================================================

/// Venue information. Immutable once constructed and shared between events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    /// Unique venue identifier
    pub id: VenueId,
    /// Venue name (e.g., "Madison Square Garden")
    pub name: String,
    /// Street address
    pub address: String,
    /// Total seating capacity
    pub capacity: u32,
}

impl Venue {
    /// Creates a new `Venue`
    #[must_use]
    pub const fn new(id: VenueId, name: String, address: String, capacity: u32) -> Self {
        Self {
            id,
            name,
            address,
            capacity,
        }
    }
}

// ============================================================================
// Status enums
// ============================================================================

/// Lifecycle of a single ticket. Moves forward only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    /// In the pool, can be claimed
    Available,
    /// Claimed by a booking
    Booked,
    /// Released by a cancelled booking; never returns to the pool
    Canceled,
}

impl TicketStatus {
    /// Whether moving from `self` to `next` is a legal transition
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::Booked) | (Self::Booked, Self::Canceled)
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Available => "Available",
            Self::Booked => "Booked",
            Self::Canceled => "Canceled",
        };
        f.write_str(label)
    }
}

/// Booking state machine
///
/// ```text
/// Requested ──► Booked ──► Canceled
///     │
///     └───────► Rejected
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Tickets are being claimed
    Requested,
    /// At least one ticket claimed and paid for
    Booked,
    /// Nothing could be claimed; never handed to callers
    Rejected,
    /// Cancelled by its owner (terminal)
    Canceled,
}

impl BookingStatus {
    /// Whether moving from `self` to `next` is a legal transition
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Requested, Self::Booked | Self::Rejected) | (Self::Booked, Self::Canceled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Requested => "Requested",
            Self::Booked => "Booked",
            Self::Rejected => "Rejected",
            Self::Canceled => "Canceled",
        };
        f.write_str(label)
    }
}

/// Payment method
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Credit card payment
    CreditCard,
    /// Debit card payment
    DebitCard,
    /// Online bank transfer
    NetBanking,
    /// Digital wallet
    Wallet,
}

/// Payment status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Payment recorded but not yet finalised
    Pending,
    /// Payment finalised
    Completed,
}
