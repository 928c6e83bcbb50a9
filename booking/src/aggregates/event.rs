//! Event aggregate: a named happening at a venue with its ticket categories.

use super::inventory::{CategoryAvailability, TicketCategory};
use crate::environment::BookingEnvironment;
use crate::error::{BookingError, Result};
use crate::types::{CategoryId, EventId, Money, Venue};
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// Event entity representing a concert, sports game, or conference
#[derive(Debug)]
pub struct Event {
    id: EventId,
    name: String,
    venue: Arc<Venue>,
    date: DateTime<Utc>,
    description: String,
    category_label: String,
    /// Ticket categories in insertion order
    categories: RwLock<Vec<Arc<TicketCategory>>>,
}

impl Event {
    /// Creates an event with no ticket categories yet
    #[must_use]
    pub fn new(
        env: &BookingEnvironment,
        name: impl Into<String>,
        venue: Arc<Venue>,
        date: DateTime<Utc>,
        description: impl Into<String>,
        category_label: impl Into<String>,
    ) -> Self {
        Self {
            id: EventId::generate(env.ids.as_ref()),
            name: name.into(),
            venue,
            date,
            description: description.into(),
            category_label: category_label.into(),
            categories: RwLock::new(Vec::new()),
        }
    }

    /// Event identifier
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Event name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Venue hosting the event (shared, read-only)
    #[must_use]
    pub const fn venue(&self) -> &Arc<Venue> {
        &self.venue
    }

    /// Date and time of the event
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Free-text description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Catalog label such as "Concert" or "Sports"
    #[must_use]
    pub fn category_label(&self) -> &str {
        &self.category_label
    }

    fn read_categories(&self) -> Result<RwLockReadGuard<'_, Vec<Arc<TicketCategory>>>> {
        self.categories
            .read()
            .map_err(|_| BookingError::LockPoisoned("event categories"))
    }

    /// Add a ticket category with `total_seats` tickets at `price`.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidRequest`] if venue capacity is enforced and the
    ///   event's seats would exceed it
    /// - [`BookingError::LockPoisoned`] if the category list lock is poisoned
    pub fn add_category(
        &self,
        env: &BookingEnvironment,
        name: impl Into<String>,
        price: Money,
        total_seats: u32,
    ) -> Result<Arc<TicketCategory>> {
        let name = name.into();
        let mut categories = self
            .categories
            .write()
            .map_err(|_| BookingError::LockPoisoned("event categories"))?;

        if env.config.enforce_venue_capacity {
            let allocated: u64 = categories
                .iter()
                .map(|category| u64::from(category.total_seats()))
                .sum();
            let requested = allocated + u64::from(total_seats);
            if requested > u64::from(self.venue.capacity) {
                return Err(BookingError::InvalidRequest(format!(
                    "category '{name}' would bring event {} to {requested} seats, venue '{}' holds {}",
                    self.id, self.venue.name, self.venue.capacity
                )));
            }
        }

        let category = Arc::new(TicketCategory::new(
            env.ids.as_ref(),
            self.id,
            name,
            price,
            total_seats,
        ));
        categories.push(Arc::clone(&category));
        drop(categories);

        tracing::info!(
            event = %self.id,
            category = %category.id(),
            name = %category.name(),
            total_seats,
            %price,
            "Ticket category added"
        );
        Ok(category)
    }

    /// All categories in insertion order
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the category list lock is poisoned.
    pub fn categories(&self) -> Result<Vec<Arc<TicketCategory>>> {
        Ok(self.read_categories()?.clone())
    }

    /// Look up one of this event's categories
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotFound`] if the category is not on this event
    /// - [`BookingError::LockPoisoned`] if the category list lock is poisoned
    pub fn category(&self, id: CategoryId) -> Result<Arc<TicketCategory>> {
        self.read_categories()?
            .iter()
            .find(|category| category.id() == id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound(format!("category {id} on event {}", self.id)))
    }

    /// Whether `category` is one of this event's pools
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the category list lock is poisoned.
    pub fn contains_category(&self, category: &TicketCategory) -> Result<bool> {
        Ok(category.event_id() == self.id
            && self
                .read_categories()?
                .iter()
                .any(|candidate| std::ptr::eq(candidate.as_ref(), category)))
    }

    /// Sum of seats across all categories
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the category list lock is poisoned.
    pub fn total_seats(&self) -> Result<u64> {
        Ok(self
            .read_categories()?
            .iter()
            .map(|category| u64::from(category.total_seats()))
            .sum())
    }

    /// Categories that still have Available tickets, with their live count.
    ///
    /// The sequence is lazy: each category's count is read when the iterator
    /// reaches it, so it reflects claims made after this call returned.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if the category list lock is poisoned.
    pub fn available_inventory(
        &self,
    ) -> Result<impl Iterator<Item = (Arc<TicketCategory>, u32)> + use<>> {
        let categories = self.categories()?;
        Ok(categories.into_iter().filter_map(|category| {
            match category.available_count() {
                Ok(0) => None,
                Ok(available) => Some((category, available)),
                Err(error) => {
                    tracing::warn!(category = %category.id(), %error, "Skipping unreadable category");
                    None
                }
            }
        }))
    }

    /// Availability snapshot of every category, sold-out ones included
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::LockPoisoned`] if any lock is poisoned.
    pub fn availability(&self) -> Result<Vec<CategoryAvailability>> {
        self.categories()?
            .iter()
            .map(|category| category.availability())
            .collect()
    }
}
