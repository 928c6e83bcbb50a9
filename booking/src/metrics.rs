//! Business metrics for the booking core.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the host
//! process installs a recorder; until then every call is a no-op.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `booking_bookings_total{status}` - Bookings by outcome (booked, rejected, canceled)
//! - `booking_tickets_claimed_total` - Tickets moved Available → Booked
//! - `booking_tickets_released_total` - Tickets moved Booked → Canceled
//! - `booking_short_fills_total` - Bookings that claimed fewer tickets than requested
//! - `booking_out_of_stock_total` - Claim attempts that found no Available ticket
//!   (rejections and the claim that ends a short-fill)
//! - `booking_payment_amount_cents_total` - Sum of recorded payments in cents
//!
//! ## Gauges
//! - `booking_tickets_available{category, name}` - Live Available tickets per category id

use crate::types::CategoryId;
use metrics::{describe_counter, describe_gauge};

/// Register all metric descriptions.
///
/// Call once at start-up, before anything is recorded.
pub fn register_booking_metrics() {
    describe_counter!(
        "booking_bookings_total",
        "Total number of bookings by status (booked, rejected, canceled)"
    );
    describe_counter!(
        "booking_tickets_claimed_total",
        "Total number of tickets claimed by bookings"
    );
    describe_counter!(
        "booking_tickets_released_total",
        "Total number of tickets released by cancellations"
    );
    describe_counter!(
        "booking_short_fills_total",
        "Bookings that received fewer tickets than requested"
    );
    describe_counter!(
        "booking_out_of_stock_total",
        "Claim attempts that found no Available ticket"
    );
    describe_counter!(
        "booking_payment_amount_cents_total",
        "Total amount of recorded payments in cents"
    );
    describe_gauge!(
        "booking_tickets_available",
        "Current number of Available tickets per category"
    );

    tracing::info!("Booking metrics registered");
}

/// Record a booking that claimed `claimed` of `requested` tickets.
pub fn record_booking_created(requested: u32, claimed: u32, amount_cents: u64) {
    metrics::counter!("booking_bookings_total", "status" => "booked").increment(1);
    metrics::counter!("booking_tickets_claimed_total").increment(u64::from(claimed));
    metrics::counter!("booking_payment_amount_cents_total").increment(amount_cents);
    if claimed < requested {
        metrics::counter!("booking_short_fills_total").increment(1);
    }
}

/// Record a booking that could not claim a single ticket.
pub fn record_booking_rejected() {
    metrics::counter!("booking_bookings_total", "status" => "rejected").increment(1);
}

/// Record a claim attempt that found no Available ticket.
pub fn record_out_of_stock() {
    metrics::counter!("booking_out_of_stock_total").increment(1);
}

/// Record a cancellation that released `released` tickets.
pub fn record_booking_canceled(released: usize) {
    metrics::counter!("booking_bookings_total", "status" => "canceled").increment(1);
    metrics::counter!("booking_tickets_released_total").increment(released as u64);
}

/// Update the available-tickets gauge for a category.
///
/// Keyed by id; names are not unique across or within events.
pub fn update_tickets_available(category: CategoryId, name: &str, available: u32) {
    metrics::gauge!(
        "booking_tickets_available",
        "category" => category.to_string(),
        "name" => name.to_owned()
    )
    .set(f64::from(available));
}
