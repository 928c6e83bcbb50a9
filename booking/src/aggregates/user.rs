//! Users and their booking history.

use super::booking::{self, Booking};
use super::event::Event;
use super::inventory::TicketCategory;
use crate::environment::BookingEnvironment;
use crate::error::{BookingError, Result};
use crate::types::{BookingId, PaymentMethod, UserId};
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// An identity owning an append-only history of bookings.
#[derive(Debug)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    phone: String,
    /// Insertion order; entries are never removed
    bookings: RwLock<Vec<Arc<Booking>>>,
}

impl User {
    /// Creates a user with an empty history
    #[must_use]
    pub fn new(
        env: &BookingEnvironment,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::generate(env.ids.as_ref()),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            bookings: RwLock::new(Vec::new()),
        }
    }

    /// User identifier
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address (not guaranteed unique)
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Phone number
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    fn read_bookings(&self) -> Result<RwLockReadGuard<'_, Vec<Arc<Booking>>>> {
        self.bookings
            .read()
            .map_err(|_| BookingError::LockPoisoned("user bookings"))
    }

    pub(crate) fn record_booking(&self, booking: Arc<Booking>) -> Result<()> {
        self.bookings
            .write()
            .map_err(|_| BookingError::LockPoisoned("user bookings"))?
            .push(booking);
        Ok(())
    }

    /// Book `count` tickets from `category` of `event`.
    ///
    /// The returned booking may hold fewer tickets than requested; see
    /// [`Booking::is_short_fill`].
    ///
    /// # Errors
    ///
    /// See [`booking::create`].
    pub fn book_tickets(
        &self,
        env: &BookingEnvironment,
        event: &Event,
        category: &Arc<TicketCategory>,
        count: u32,
        method: PaymentMethod,
    ) -> Result<Arc<Booking>> {
        booking::create(env, self, event, category, count, method)
    }

    /// Find one of this user's bookings
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] if the booking is not in this user's history
    /// - [`BookingError::LockPoisoned`] if the history lock is poisoned
    pub fn booking(&self, id: BookingId) -> Result<Arc<Booking>> {
        self.read_bookings()?
            .iter()
            .find(|booking| booking.id() == id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound(format!("booking {id} for user {}", self.id)))
    }

    /// Cancel one of this user's own bookings.
    ///
    /// Bookings owned by other users are invisible here and report `NotFound`.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] if the booking is not in this user's history
    /// - [`BookingError::AlreadyCanceled`] if it was already cancelled
    /// - [`BookingError::LockPoisoned`] if a lock is poisoned
    pub fn cancel_booking(&self, id: BookingId) -> Result<Arc<Booking>> {
        let booking = self.booking(id)?;
        booking.cancel()?;
        Ok(booking)
    }

    /// Bookings, most recent first. Equal timestamps keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the history lock is poisoned.
    pub fn booking_history(&self) -> Result<Vec<Arc<Booking>>> {
        let mut history = self.read_bookings()?.clone();
        // stable sort
        history.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(history)
    }
}
