//! Booking lifecycle: claiming tickets, recording payment, cancelling.
//!
//! ```text
//! create():  Requested ──claim 1..N tickets──► Booked ──cancel()──► Canceled
//!                │
//!                └──── nothing claimed ──────► Rejected (never returned)
//! ```
//!
//! **Partial claims**: tickets are claimed one at a time. When the category
//! runs dry part-way through, the booking keeps what it got (a short-fill)
//! instead of rolling back. Callers compare [`Booking::ticket_count`] with
//! [`Booking::requested_count`] (or use [`Booking::is_short_fill`]) to detect it.
//!
//! Each individual claim is atomic, but the loop as a whole is not: a
//! concurrent booking on the same category can take tickets between two of
//! our claims.

use super::event::Event;
use super::inventory::{Ticket, TicketCategory};
use super::payment::Payment;
use super::user::User;
use crate::environment::BookingEnvironment;
use crate::error::{BookingError, Result};
use crate::metrics;
use crate::types::{
    BookingId, BookingStatus, CategoryId, EventId, Money, PaymentId, PaymentMethod, TicketId,
    UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

// ============================================================================
// Data Structures
// ============================================================================

/// A ticket as seen by the booking that claimed it.
///
/// The price is the claim-time price; later repricing of the category does
/// not touch it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedTicket {
    /// Ticket identifier within the category
    pub id: TicketId,
    /// Price at claim time
    pub price: Money,
}

/// Serializable view of a booking for rendering collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    /// Booking identifier
    pub id: BookingId,
    /// Owner
    pub user_id: UserId,
    /// Event booked
    pub event_id: EventId,
    /// Category the tickets came from
    pub category_id: CategoryId,
    /// Category name
    pub category_name: String,
    /// Current status
    pub status: BookingStatus,
    /// Tickets asked for
    pub requested: u32,
    /// Tickets actually claimed
    pub tickets: Vec<ClaimedTicket>,
    /// Attached payment
    pub payment: Payment,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Booking
// ============================================================================

/// A claim of one or more tickets from one category, owned by one user.
#[derive(Debug)]
pub struct Booking {
    id: BookingId,
    user_id: UserId,
    event_id: EventId,
    category: Arc<TicketCategory>,
    tickets: Vec<ClaimedTicket>,
    requested: u32,
    created_at: DateTime<Utc>,
    payment: Payment,
    /// Held across a cancellation so concurrent cancels serialize
    status: Mutex<BookingStatus>,
}

impl Booking {
    /// Booking identifier
    #[must_use]
    pub const fn id(&self) -> BookingId {
        self.id
    }

    /// Owner of the booking
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Event the tickets are for
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Category the tickets were claimed from
    #[must_use]
    pub const fn category(&self) -> &Arc<TicketCategory> {
        &self.category
    }

    /// When the booking was created
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attached payment
    #[must_use]
    pub const fn payment(&self) -> &Payment {
        &self.payment
    }

    /// Amount paid (sum of claim-time ticket prices)
    #[must_use]
    pub const fn total(&self) -> Money {
        self.payment.amount
    }

    /// Number of tickets asked for
    #[must_use]
    pub const fn requested_count(&self) -> u32 {
        self.requested
    }

    /// Number of tickets actually claimed (≥ 1)
    #[must_use]
    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    /// Whether fewer tickets were claimed than requested
    #[must_use]
    pub fn is_short_fill(&self) -> bool {
        self.tickets.len() < self.requested as usize
    }

    /// Claimed tickets in claim order
    #[must_use]
    pub fn claimed(&self) -> &[ClaimedTicket] {
        &self.tickets
    }

    /// Ids of the claimed tickets in claim order
    #[must_use]
    pub fn ticket_ids(&self) -> Vec<TicketId> {
        self.tickets.iter().map(|ticket| ticket.id).collect()
    }

    /// Live snapshots of the claimed tickets, read from the owning category
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the category lock is poisoned.
    pub fn tickets(&self) -> Result<Vec<Ticket>> {
        self.tickets
            .iter()
            .map(|ticket| self.category.ticket(ticket.id))
            .collect()
    }

    fn lock_status(&self) -> Result<MutexGuard<'_, BookingStatus>> {
        self.status
            .lock()
            .map_err(|_| BookingError::LockPoisoned("booking status"))
    }

    /// Current status
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the status lock is poisoned.
    pub fn status(&self) -> Result<BookingStatus> {
        Ok(*self.lock_status()?)
    }

    /// Serializable view of the booking
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the status lock is poisoned.
    pub fn summary(&self) -> Result<BookingSummary> {
        Ok(BookingSummary {
            id: self.id,
            user_id: self.user_id,
            event_id: self.event_id,
            category_id: self.category.id(),
            category_name: self.category.name().to_string(),
            status: self.status()?,
            requested: self.requested,
            tickets: self.tickets.clone(),
            payment: self.payment.clone(),
            created_at: self.created_at,
        })
    }

    /// Cancel the booking, releasing every claimed ticket (Booked → Canceled).
    ///
    /// Released seats do not return to the Available pool.
    ///
    /// # Errors
    ///
    /// - [`BookingError::AlreadyCanceled`] on a second cancel; nothing changes
    /// - [`BookingError::LockPoisoned`] if a lock is poisoned
    /// - any release error from the category, in which case no ticket changed
    pub fn cancel(&self) -> Result<()> {
        let mut status = self.lock_status()?;

        if *status == BookingStatus::Canceled {
            tracing::debug!(booking = %self.id, "Booking already canceled");
            return Err(BookingError::AlreadyCanceled(self.id));
        }
        if !status.can_transition_to(BookingStatus::Canceled) {
            return Err(BookingError::InvalidRequest(format!(
                "booking {} cannot be canceled while {}",
                self.id, *status
            )));
        }

        let released = self.category.release_all(self.id, &self.ticket_ids())?;
        *status = BookingStatus::Canceled;
        drop(status);

        tracing::info!(
            booking = %self.id,
            user = %self.user_id,
            category = %self.category.id(),
            released,
            "Booking canceled"
        );
        metrics::record_booking_canceled(released);
        Ok(())
    }
}

// ============================================================================
// Creation
// ============================================================================

/// Validates a booking request before any ticket is touched
fn validate_request(
    env: &BookingEnvironment,
    event: &Event,
    category: &TicketCategory,
    requested: u32,
) -> Result<()> {
    if requested == 0 {
        return Err(BookingError::InvalidRequest(
            "requested ticket count must be greater than zero".to_string(),
        ));
    }

    if let Some(max) = env.config.max_tickets_per_booking {
        if requested > max {
            return Err(BookingError::InvalidRequest(format!(
                "cannot book more than {max} tickets at once (requested: {requested})"
            )));
        }
    }

    if !event.contains_category(category)? {
        return Err(BookingError::InvalidRequest(format!(
            "category {} does not belong to event {}",
            category.id(),
            event.id()
        )));
    }

    Ok(())
}

/// Gives claimed tickets up when a booking cannot be completed.
///
/// Released tickets become Canceled under a booking id that is never recorded,
/// so their seats are lost to the pool for good.
fn abandon(category: &TicketCategory, booking: BookingId, claimed: &[ClaimedTicket]) {
    if claimed.is_empty() {
        return;
    }
    let ids: Vec<TicketId> = claimed.iter().map(|ticket| ticket.id).collect();
    match category.release_all(booking, &ids) {
        Ok(seats_lost) => tracing::error!(
            %booking,
            category = %category.id(),
            seats_lost,
            "Abandoned booking; its tickets are canceled and will not be resold"
        ),
        Err(error) => tracing::error!(
            %booking,
            category = %category.id(),
            seats_stranded = ids.len(),
            %error,
            "Failed to release tickets of abandoned booking; they stay Booked"
        ),
    }
}

/// Create a booking: claim up to `requested` tickets from `category`, record
/// the payment and append the booking to `user`'s history.
///
/// # Errors
///
/// - [`BookingError::InvalidRequest`] if `requested` is zero, exceeds the
///   configured per-booking limit, or `category` is not on `event`
/// - [`BookingError::OutOfStock`] if not a single ticket could be claimed
/// - [`BookingError::LockPoisoned`] if a lock is poisoned
pub fn create(
    env: &BookingEnvironment,
    user: &User,
    event: &Event,
    category: &Arc<TicketCategory>,
    requested: u32,
    method: PaymentMethod,
) -> Result<Arc<Booking>> {
    validate_request(env, event, category, requested)?;

    let id = BookingId::generate(env.ids.as_ref());
    let now = env.clock.now();
    let mut status = BookingStatus::Requested;

    let mut claimed = Vec::with_capacity(requested.min(category.total_seats()) as usize);
    for _ in 0..requested {
        match category.claim_one(id) {
            Ok(ticket) => claimed.push(ClaimedTicket {
                id: ticket.id,
                price: ticket.price,
            }),
            Err(BookingError::OutOfStock { .. }) => break,
            Err(error) => {
                abandon(category, id, &claimed);
                return Err(error);
            }
        }
    }

    if claimed.is_empty() {
        status = BookingStatus::Rejected;
        tracing::warn!(
            booking = %id,
            user = %user.id(),
            category = %category.id(),
            requested,
            %status,
            "Booking rejected: category sold out"
        );
        metrics::record_booking_rejected();
        return Err(BookingError::OutOfStock {
            category: category.id(),
        });
    }

    let total: Money = claimed.iter().map(|ticket| ticket.price).sum();
    let payment = Payment::new(PaymentId::generate(env.ids.as_ref()), total, method, now).complete(now);

    #[allow(clippy::cast_possible_truncation)]
    let claimed_count = claimed.len() as u32;
    if claimed_count < requested {
        tracing::warn!(
            booking = %id,
            category = %category.id(),
            requested,
            claimed = claimed_count,
            "Booking short-filled"
        );
    }

    debug_assert!(status.can_transition_to(BookingStatus::Booked));
    status = BookingStatus::Booked;

    let booking = Arc::new(Booking {
        id,
        user_id: user.id(),
        event_id: event.id(),
        category: Arc::clone(category),
        tickets: claimed,
        requested,
        created_at: now,
        payment,
        status: Mutex::new(status),
    });

    if let Err(error) = user.record_booking(Arc::clone(&booking)) {
        abandon(category, id, &booking.tickets);
        return Err(error);
    }

    tracing::info!(
        booking = %id,
        user = %user.id(),
        event = %event.id(),
        category = %category.id(),
        tickets = claimed_count,
        total = %total,
        "Booking created"
    );
    metrics::record_booking_created(requested, claimed_count, total.cents());

    Ok(booking)
}
