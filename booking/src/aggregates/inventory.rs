//! Inventory pools for the ticket booking core.
//!
//! A [`TicketCategory`] owns a fixed-size pool of [`Ticket`]s at one price
//! point. This module is CRITICAL for preventing double-booking: every claim
//! and release on a pool happens under that pool's mutex, so no ticket can be
//! handed to two bookings.
//!
//! **Concurrency Strategy**: one lock per category. Claims on different
//! categories never contend, and a claim that finds nothing Available fails
//! fast with [`BookingError::OutOfStock`] instead of waiting.

use crate::error::{BookingError, Result};
use crate::metrics;
use crate::types::{BookingId, CategoryId, EventId, Money, TicketId, TicketStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use ticket_booking_core::environment::IdGenerator;

// ============================================================================
// Data Structures
// ============================================================================

/// A single seat instance. Returned to callers as a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique ticket identifier
    pub id: TicketId,
    /// Name of the category this ticket was issued under
    pub category: String,
    /// Price of this ticket (frozen once claimed)
    pub price: Money,
    /// Current ticket status
    pub status: TicketStatus,
    /// Booking holding this ticket; set iff `status != Available`
    pub booking: Option<BookingId>,
}

/// Category availability data for query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAvailability {
    /// Category identifier
    pub category: CategoryId,
    /// Category name
    pub name: String,
    /// Current price for Available tickets
    pub price: Money,
    /// Total seats in the pool
    pub total: u32,
    /// Tickets still Available
    pub available: u32,
    /// Tickets held by live bookings
    pub booked: u32,
    /// Tickets released by cancelled bookings
    pub canceled: u32,
}

/// Mutable part of a category, guarded by its mutex.
#[derive(Debug)]
struct Pool {
    price: Money,
    tickets: Vec<Ticket>,
    available: u32,
}

// ============================================================================
// TicketCategory
// ============================================================================

/// A priced, fixed-size pool of tickets for one event.
///
/// The pool is generated once at construction and never grows or shrinks.
#[derive(Debug)]
pub struct TicketCategory {
    id: CategoryId,
    event_id: EventId,
    name: String,
    total_seats: u32,
    /// Ticket id → position in `Pool::tickets`; fixed at construction
    index: HashMap<TicketId, usize>,
    pool: Mutex<Pool>,
}

impl TicketCategory {
    /// Creates a category with `total_seats` Available tickets at `price`
    #[must_use]
    pub fn new(
        ids: &dyn IdGenerator,
        event_id: EventId,
        name: impl Into<String>,
        price: Money,
        total_seats: u32,
    ) -> Self {
        let id = CategoryId::generate(ids);
        let name = name.into();

        let tickets: Vec<Ticket> = (0..total_seats)
            .map(|_| Ticket {
                id: TicketId::generate(ids),
                category: name.clone(),
                price,
                status: TicketStatus::Available,
                booking: None,
            })
            .collect();
        let index = tickets
            .iter()
            .enumerate()
            .map(|(position, ticket)| (ticket.id, position))
            .collect();

        tracing::debug!(category = %id, %event_id, name = %name, total_seats, %price, "Ticket category created");

        Self {
            id,
            event_id,
            name,
            total_seats,
            index,
            pool: Mutex::new(Pool {
                price,
                tickets,
                available: total_seats,
            }),
        }
    }

    /// Category identifier
    #[must_use]
    pub const fn id(&self) -> CategoryId {
        self.id
    }

    /// Event this category belongs to
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Category name (not necessarily unique within an event)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixed number of seats in the pool
    #[must_use]
    pub const fn total_seats(&self) -> u32 {
        self.total_seats
    }

    fn pool(&self) -> Result<MutexGuard<'_, Pool>> {
        self.pool
            .lock()
            .map_err(|_| BookingError::LockPoisoned("ticket category"))
    }

    /// Current price for tickets that have not been claimed yet
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the pool lock is poisoned.
    pub fn price(&self) -> Result<Money> {
        Ok(self.pool()?.price)
    }

    /// Number of tickets still Available
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the pool lock is poisoned.
    pub fn available_count(&self) -> Result<u32> {
        Ok(self.pool()?.available)
    }

    /// Claim the first Available ticket (in creation order) for `booking`.
    ///
    /// # Errors
    ///
    /// - [`BookingError::OutOfStock`] if no ticket is Available
    /// - [`BookingError::LockPoisoned`] if the pool lock is poisoned
    pub fn claim_one(&self, booking: BookingId) -> Result<Ticket> {
        let mut pool = self.pool()?;

        let Some(ticket) = pool
            .tickets
            .iter_mut()
            .find(|ticket| ticket.status.can_transition_to(TicketStatus::Booked))
        else {
            tracing::debug!(category = %self.id, %booking, "No Available ticket left");
            metrics::record_out_of_stock();
            return Err(BookingError::OutOfStock { category: self.id });
        };

        ticket.status = TicketStatus::Booked;
        ticket.booking = Some(booking);
        let claimed = ticket.clone();

        pool.available -= 1;
        let available = pool.available;
        drop(pool);

        tracing::debug!(category = %self.id, ticket = %claimed.id, %booking, available, "Ticket claimed");
        metrics::update_tickets_available(self.id, &self.name, available);

        Ok(claimed)
    }

    /// Release one ticket held by `booking`: Booked → Canceled.
    ///
    /// Canceled tickets never return to the Available pool.
    ///
    /// # Errors
    ///
    /// - [`BookingError::ForeignTicket`] if the ticket was not issued by this category
    /// - [`BookingError::InvalidTransition`] if the ticket is not Booked
    /// - [`BookingError::TicketNotHeld`] if another booking holds the ticket
    /// - [`BookingError::LockPoisoned`] if the pool lock is poisoned
    pub fn release(&self, ticket: TicketId, booking: BookingId) -> Result<Ticket> {
        let position = self.position(ticket)?;
        let mut pool = self.pool()?;

        Self::check_releasable(&pool.tickets[position], booking)?;
        let released = Self::mark_canceled(&mut pool.tickets[position]);
        drop(pool);

        tracing::debug!(category = %self.id, ticket = %ticket, %booking, "Ticket released");
        Ok(released)
    }

    /// Release every ticket in `tickets` for `booking` under one lock acquisition.
    ///
    /// All tickets are validated before any is touched, so on error nothing changes.
    ///
    /// # Errors
    ///
    /// Same as [`release`](Self::release), for the first offending ticket.
    pub fn release_all(&self, booking: BookingId, tickets: &[TicketId]) -> Result<usize> {
        let positions = tickets
            .iter()
            .map(|ticket| self.position(*ticket))
            .collect::<Result<Vec<_>>>()?;

        let mut pool = self.pool()?;
        for &position in &positions {
            Self::check_releasable(&pool.tickets[position], booking)?;
        }
        for &position in &positions {
            Self::mark_canceled(&mut pool.tickets[position]);
        }
        drop(pool);

        tracing::debug!(category = %self.id, %booking, released = positions.len(), "Tickets released");
        Ok(positions.len())
    }

    /// Change the price of tickets that are still Available.
    ///
    /// Claimed tickets keep the price they were claimed at.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the pool lock is poisoned.
    pub fn reprice(&self, price: Money) -> Result<()> {
        let mut pool = self.pool()?;
        pool.price = price;
        pool.tickets
            .iter_mut()
            .filter(|ticket| ticket.status == TicketStatus::Available)
            .for_each(|ticket| ticket.price = price);
        drop(pool);

        tracing::info!(category = %self.id, %price, "Category repriced");
        Ok(())
    }

    /// Consistent snapshot of the pool's counters
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the pool lock is poisoned.
    pub fn availability(&self) -> Result<CategoryAvailability> {
        let pool = self.pool()?;
        let mut booked = 0;
        let mut canceled = 0;
        for ticket in &pool.tickets {
            match ticket.status {
                TicketStatus::Booked => booked += 1,
                TicketStatus::Canceled => canceled += 1,
                TicketStatus::Available => {}
            }
        }

        Ok(CategoryAvailability {
            category: self.id,
            name: self.name.clone(),
            price: pool.price,
            total: self.total_seats,
            available: pool.available,
            booked,
            canceled,
        })
    }

    /// Snapshot of every ticket, in creation order
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the pool lock is poisoned.
    pub fn tickets(&self) -> Result<Vec<Ticket>> {
        Ok(self.pool()?.tickets.clone())
    }

    /// Snapshot of one ticket
    ///
    /// # Errors
    ///
    /// - [`BookingError::ForeignTicket`] if the ticket was not issued by this category
    /// - [`BookingError::LockPoisoned`] if the pool lock is poisoned
    pub fn ticket(&self, ticket: TicketId) -> Result<Ticket> {
        let position = self.position(ticket)?;
        Ok(self.pool()?.tickets[position].clone())
    }

    fn position(&self, ticket: TicketId) -> Result<usize> {
        self.index
            .get(&ticket)
            .copied()
            .ok_or(BookingError::ForeignTicket {
                ticket,
                category: self.id,
            })
    }

    fn check_releasable(ticket: &Ticket, booking: BookingId) -> Result<()> {
        if !ticket.status.can_transition_to(TicketStatus::Canceled) {
            return Err(BookingError::InvalidTransition {
                ticket: ticket.id,
                from: ticket.status,
                to: TicketStatus::Canceled,
            });
        }
        if ticket.booking != Some(booking) {
            return Err(BookingError::TicketNotHeld {
                ticket: ticket.id,
                booking,
            });
        }
        Ok(())
    }

    fn mark_canceled(ticket: &mut Ticket) -> Ticket {
        ticket.status = TicketStatus::Canceled;
        ticket.clone()
    }
}
