//! Error type shared by every booking operation.

use crate::types::{BookingId, CategoryId, TicketId, TicketStatus};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Errors that can occur while managing inventory and bookings.
///
/// All variants are local, recoverable conditions reported to the caller.
/// A short-filled booking is not an error: it is reported through the
/// booking's claimed ticket count.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The request itself is malformed (zero tickets, category not on the event, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The category has no Available ticket left.
    #[error("Category {category} is out of stock")]
    OutOfStock {
        /// Category that ran dry
        category: CategoryId,
    },

    /// A ticket is not in the status the operation requires.
    #[error("Ticket {ticket} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Ticket whose transition was refused
        ticket: TicketId,
        /// Status the ticket is currently in
        from: TicketStatus,
        /// Status the operation tried to move it to
        to: TicketStatus,
    },

    /// A ticket id was presented to a category that does not own it.
    #[error("Ticket {ticket} does not belong to category {category}")]
    ForeignTicket {
        /// Ticket that was presented
        ticket: TicketId,
        /// Category it was presented to
        category: CategoryId,
    },

    /// The ticket is Booked, but by a different booking.
    #[error("Ticket {ticket} is not held by booking {booking}")]
    TicketNotHeld {
        /// Ticket that was presented
        ticket: TicketId,
        /// Booking that tried to release it
        booking: BookingId,
    },

    /// The booking was already cancelled.
    #[error("Booking {0} is already canceled")]
    AlreadyCanceled(BookingId),

    /// Unknown booking, user, event or category id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A lock was poisoned by a panicking thread.
    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

impl BookingError {
    /// Stable machine-readable code for the error kind
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::OutOfStock { .. } => "OUT_OF_STOCK",
            Self::InvalidTransition { .. }
            | Self::ForeignTicket { .. }
            | Self::TicketNotHeld { .. } => "INVALID_TRANSITION",
            Self::AlreadyCanceled(_) => "ALREADY_CANCELED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::LockPoisoned(_) => "INTERNAL_ERROR",
        }
    }
}
