//! Aggregates of the ticket booking core.
//!
//! This module contains:
//! - Inventory: fixed-size ticket pools with per-category locking
//! - Event: ticket categories grouped under one happening
//! - Booking: claim, pay, cancel
//! - Payment: immutable payment records
//! - User: booking ownership and history

pub mod booking;
pub mod event;
pub mod inventory;
pub mod payment;
pub mod user;

pub use booking::{Booking, BookingSummary, ClaimedTicket};
pub use event::Event;
pub use inventory::{CategoryAvailability, Ticket, TicketCategory};
pub use payment::Payment;
pub use user::User;
