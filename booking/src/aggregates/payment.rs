//! Payment records.
//!
//! Payment execution is an external collaborator; this module only records
//! the amount, method and outcome attached to a booking.

use crate::types::{Money, PaymentId, PaymentMethod, PaymentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment entity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique payment identifier
    pub id: PaymentId,
    /// Amount charged, fixed at creation
    pub amount: Money,
    /// Payment method used
    pub method: PaymentMethod,
    /// When the payment was created
    pub created_at: DateTime<Utc>,
    /// Current payment status
    pub status: PaymentStatus,
    /// When the payment was finalised
    pub processed_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Creates a new pending `Payment`
    #[must_use]
    pub const fn new(
        id: PaymentId,
        amount: Money,
        method: PaymentMethod,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            amount,
            method,
            created_at,
            status: PaymentStatus::Pending,
            processed_at: None,
        }
    }

    /// Record the payment as completed at `at`
    #[must_use]
    pub fn complete(mut self, at: DateTime<Utc>) -> Self {
        self.status = PaymentStatus::Completed;
        self.processed_at = Some(at);
        self
    }

    /// Whether the payment went through
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}
