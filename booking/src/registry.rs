//! The booking system registry: venues, events and users, plus lookup.
//!
//! The registry holds no business rules of its own. Lists are append-only and
//! each sits behind its own `RwLock`; all inventory contention happens on the
//! per-category locks inside [`TicketCategory`](crate::aggregates::TicketCategory).

use crate::aggregates::{Booking, CategoryAvailability, Event, User};
use crate::environment::BookingEnvironment;
use crate::error::{BookingError, Result};
use crate::types::{BookingId, CategoryId, EventId, PaymentMethod, UserId, Venue, VenueId};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// Aggregate root holding every venue, event and user.
#[derive(Debug)]
pub struct BookingSystem {
    env: BookingEnvironment,
    venues: RwLock<Vec<Arc<Venue>>>,
    events: RwLock<Vec<Arc<Event>>>,
    users: RwLock<Vec<Arc<User>>>,
}

fn read<'a, T>(
    lock: &'a RwLock<Vec<Arc<T>>>,
    what: &'static str,
) -> Result<RwLockReadGuard<'a, Vec<Arc<T>>>> {
    lock.read().map_err(|_| BookingError::LockPoisoned(what))
}

fn append<T>(lock: &RwLock<Vec<Arc<T>>>, what: &'static str, item: &Arc<T>) -> Result<()> {
    lock.write()
        .map_err(|_| BookingError::LockPoisoned(what))?
        .push(Arc::clone(item));
    Ok(())
}

impl BookingSystem {
    /// Creates an empty registry
    #[must_use]
    pub fn new(env: BookingEnvironment) -> Self {
        Self {
            env,
            venues: RwLock::new(Vec::new()),
            events: RwLock::new(Vec::new()),
            users: RwLock::new(Vec::new()),
        }
    }

    /// Injected dependencies used for every operation
    #[must_use]
    pub const fn env(&self) -> &BookingEnvironment {
        &self.env
    }

    // ========== Registration ==========

    /// Register a venue
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the venue list lock is poisoned.
    pub fn add_venue(
        &self,
        name: impl Into<String>,
        address: impl Into<String>,
        capacity: u32,
    ) -> Result<Arc<Venue>> {
        let venue = Arc::new(Venue::new(
            VenueId::generate(self.env.ids.as_ref()),
            name.into(),
            address.into(),
            capacity,
        ));
        append(&self.venues, "venues", &venue)?;
        tracing::info!(venue = %venue.id, name = %venue.name, capacity, "Venue added");
        Ok(venue)
    }

    /// Create an event at `venue`. Add ticket categories with
    /// [`Event::add_category`].
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the event list lock is poisoned.
    pub fn create_event(
        &self,
        venue: &Arc<Venue>,
        name: impl Into<String>,
        date: DateTime<Utc>,
        description: impl Into<String>,
        category_label: impl Into<String>,
    ) -> Result<Arc<Event>> {
        let event = Arc::new(Event::new(
            &self.env,
            name,
            Arc::clone(venue),
            date,
            description,
            category_label,
        ));
        append(&self.events, "events", &event)?;
        tracing::info!(event = %event.id(), name = %event.name(), venue = %venue.id, %date, "Event created");
        Ok(event)
    }

    /// Register a user. Email uniqueness is not enforced.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the user list lock is poisoned.
    pub fn register_user(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Arc<User>> {
        let user = Arc::new(User::new(&self.env, name, email, phone));
        append(&self.users, "users", &user)?;
        tracing::info!(user = %user.id(), email = %user.email(), "User registered");
        Ok(user)
    }

    // ========== Listing ==========

    /// All venues in registration order
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the venue list lock is poisoned.
    pub fn venues(&self) -> Result<Vec<Arc<Venue>>> {
        Ok(read(&self.venues, "venues")?.clone())
    }

    /// All events in creation order
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the event list lock is poisoned.
    pub fn events(&self) -> Result<Vec<Arc<Event>>> {
        Ok(read(&self.events, "events")?.clone())
    }

    /// All users in registration order
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the user list lock is poisoned.
    pub fn users(&self) -> Result<Vec<Arc<User>>> {
        Ok(read(&self.users, "users")?.clone())
    }

    // ========== Lookup ==========

    /// Events taking place on `date` (UTC calendar day)
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the event list lock is poisoned.
    pub fn find_events_by_date(&self, date: NaiveDate) -> Result<Vec<Arc<Event>>> {
        Ok(read(&self.events, "events")?
            .iter()
            .filter(|event| event.date().date_naive() == date)
            .cloned()
            .collect())
    }

    /// Events whose catalog label equals `label`, ignoring case
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the event list lock is poisoned.
    pub fn find_events_by_category_label(&self, label: &str) -> Result<Vec<Arc<Event>>> {
        let label = label.to_lowercase();
        Ok(read(&self.events, "events")?
            .iter()
            .filter(|event| event.category_label().to_lowercase() == label)
            .cloned()
            .collect())
    }

    /// First registered user whose email equals `email`, ignoring case
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the user list lock is poisoned.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<Arc<User>>> {
        let email = email.to_lowercase();
        Ok(read(&self.users, "users")?
            .iter()
            .find(|user| user.email().to_lowercase() == email)
            .cloned())
    }

    /// Look up a user by id
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown id
    /// - [`BookingError::LockPoisoned`] if the user list lock is poisoned
    pub fn find_user_by_id(&self, id: UserId) -> Result<Arc<User>> {
        read(&self.users, "users")?
            .iter()
            .find(|user| user.id() == id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound(format!("user {id}")))
    }

    /// Look up an event by id
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown id
    /// - [`BookingError::LockPoisoned`] if the event list lock is poisoned
    pub fn find_event_by_id(&self, id: EventId) -> Result<Arc<Event>> {
        read(&self.events, "events")?
            .iter()
            .find(|event| event.id() == id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound(format!("event {id}")))
    }

    // ========== Booking façade ==========

    /// Resolve ids and book `count` tickets for a user.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown user, event or category
    /// - everything [`User::book_tickets`] can return
    pub fn book(
        &self,
        user_id: UserId,
        event_id: EventId,
        category_id: CategoryId,
        count: u32,
        method: PaymentMethod,
    ) -> Result<Arc<Booking>> {
        let user = self.find_user_by_id(user_id)?;
        let event = self.find_event_by_id(event_id)?;
        let category = event.category(category_id)?;
        user.book_tickets(&self.env, &event, &category, count, method)
    }

    /// Resolve ids and cancel one of the user's bookings.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown user or a booking the user does not own
    /// - everything [`User::cancel_booking`] can return
    pub fn cancel_booking(&self, user_id: UserId, booking_id: BookingId) -> Result<Arc<Booking>> {
        self.find_user_by_id(user_id)?.cancel_booking(booking_id)
    }

    /// Availability of every category of an event
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] for an unknown event
    /// - [`BookingError::LockPoisoned`] if a lock is poisoned
    pub fn availability(&self, event_id: EventId) -> Result<Vec<CategoryAvailability>> {
        self.find_event_by_id(event_id)?.availability()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BookingConfig;
    use crate::types::Money;
    use chrono::TimeZone;
    use ticket_booking_testing::{SequentialIdGenerator, test_clock};

    fn system() -> BookingSystem {
        BookingSystem::new(BookingEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new()),
            BookingConfig::default(),
        ))
    }

    #[test]
    fn test_find_events_by_date_and_label() {
        let system = system();
        let venue = system.add_venue("Arena", "1 Main St", 1000).unwrap();
        let may_day = Utc.with_ymd_and_hms(2025, 5, 1, 20, 0, 0).unwrap();
        let concert = system
            .create_event(&venue, "Rock Night", may_day, "Loud", "Concert")
            .unwrap();
        let match_day = system
            .create_event(&venue, "Derby", may_day + chrono::Duration::days(1), "", "Sports")
            .unwrap();

        let on_may_day = system
            .find_events_by_date(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
            .unwrap();
        assert_eq!(on_may_day.len(), 1);
        assert_eq!(on_may_day[0].id(), concert.id());

        let sports = system.find_events_by_category_label("sPoRtS").unwrap();
        assert_eq!(sports.len(), 1);
        assert_eq!(sports[0].id(), match_day.id());
        assert!(system.find_events_by_category_label("Sport").unwrap().is_empty());
    }

    #[test]
    fn test_find_user_by_email_returns_first_match() {
        let system = system();
        let first = system.register_user("Ann", "Ann@Example.com", "1").unwrap();
        system.register_user("Ann Again", "ann@example.com", "2").unwrap();

        let found = system.find_user_by_email("ANN@example.COM").unwrap().unwrap();
        assert_eq!(found.id(), first.id());
        assert!(system.find_user_by_email("nobody@example.com").unwrap().is_none());
        assert_eq!(system.users().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let system = system();
        let venue = system.add_venue("Arena", "1 Main St", 1000).unwrap();
        let event = system
            .create_event(&venue, "Rock Night", Utc::now(), "", "Concert")
            .unwrap();
        let user = system.register_user("Ann", "ann@example.com", "1").unwrap();

        assert!(matches!(
            system.find_event_by_id(EventId::from_uuid(uuid::Uuid::nil())),
            Err(BookingError::NotFound(_))
        ));
        assert!(matches!(
            system.book(
                user.id(),
                event.id(),
                CategoryId::from_uuid(uuid::Uuid::nil()),
                1,
                PaymentMethod::Wallet
            ),
            Err(BookingError::NotFound(_))
        ));
        assert!(matches!(
            system.cancel_booking(user.id(), BookingId::from_uuid(uuid::Uuid::nil())),
            Err(BookingError::NotFound(_))
        ));
    }

    #[test]
    fn test_book_and_cancel_through_registry() {
        let system = system();
        let venue = system.add_venue("Arena", "1 Main St", 1000).unwrap();
        let event = system
            .create_event(&venue, "Rock Night", Utc::now(), "", "Concert")
            .unwrap();
        let vip = event
            .add_category(system.env(), "VIP", Money::from_dollars(300), 2)
            .unwrap();
        let user = system.register_user("Ann", "ann@example.com", "1").unwrap();

        let booking = system
            .book(user.id(), event.id(), vip.id(), 2, PaymentMethod::CreditCard)
            .unwrap();
        assert_eq!(booking.total(), Money::from_dollars(600));

        system.cancel_booking(user.id(), booking.id()).unwrap();
        let availability = system.availability(event.id()).unwrap();
        assert_eq!(availability[0].canceled, 2);
        assert_eq!(availability[0].available, 0);
    }
}
