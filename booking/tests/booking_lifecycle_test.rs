//! Booking lifecycle tests.
//!
//! Complete flows through the registry: book → cancel, sold-out rejection,
//! payment totals and repricing.
//!
//! Run with: `cargo test --test booking_lifecycle_test`

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use ticket_booking::{
    BookingConfig, BookingEnvironment, BookingError, BookingStatus, BookingSystem, Event, Money,
    PaymentMethod, PaymentStatus, TicketCategory, TicketStatus, User,
};
use ticket_booking_testing::{SequentialIdGenerator, init_test_tracing, test_clock, test_epoch};

struct Setup {
    system: BookingSystem,
    event: Arc<Event>,
    vip: Arc<TicketCategory>,
    regular: Arc<TicketCategory>,
    alice: Arc<User>,
    bob: Arc<User>,
}

fn setup(config: BookingConfig) -> Setup {
    init_test_tracing();
    let system = BookingSystem::new(BookingEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(SequentialIdGenerator::new()),
        config,
    ));
    let venue = system.add_venue("Arena", "1 Main St", 500).unwrap();
    let event = system
        .create_event(&venue, "Finals", test_epoch(), "Season finals", "Sports")
        .unwrap();
    let vip = event
        .add_category(system.env(), "VIP", Money::from_dollars(300), 2)
        .unwrap();
    let regular = event
        .add_category(system.env(), "Regular", Money::from_dollars(100), 10)
        .unwrap();
    let alice = system.register_user("Alice", "alice@example.com", "555-0100").unwrap();
    let bob = system.register_user("Bob", "bob@example.com", "555-0101").unwrap();

    Setup {
        system,
        event,
        vip,
        regular,
        alice,
        bob,
    }
}

/// VIP sells out, the next request is rejected, and cancelling does not
/// return seats to the pool.
#[test]
fn test_vip_sell_out_then_cancel() {
    let s = setup(BookingConfig::default());

    let booking = s
        .system
        .book(s.alice.id(), s.event.id(), s.vip.id(), 2, PaymentMethod::CreditCard)
        .unwrap();
    assert_eq!(booking.ticket_count(), 2);
    assert_eq!(booking.total(), Money::from_dollars(600));
    assert_eq!(booking.status().unwrap(), BookingStatus::Booked);

    let rejected = s
        .system
        .book(s.bob.id(), s.event.id(), s.vip.id(), 1, PaymentMethod::Wallet);
    assert_eq!(rejected.unwrap_err(), BookingError::OutOfStock { category: s.vip.id() });
    assert!(s.bob.booking_history().unwrap().is_empty());

    s.system.cancel_booking(s.alice.id(), booking.id()).unwrap();

    assert_eq!(booking.status().unwrap(), BookingStatus::Canceled);
    assert!(
        booking
            .tickets()
            .unwrap()
            .iter()
            .all(|ticket| ticket.status == TicketStatus::Canceled)
    );
    assert_eq!(s.vip.available_count().unwrap(), 0);

    // Still sold out after the cancel
    assert!(matches!(
        s.system
            .book(s.bob.id(), s.event.id(), s.vip.id(), 1, PaymentMethod::Wallet),
        Err(BookingError::OutOfStock { .. })
    ));
}

#[test]
fn test_second_cancel_changes_nothing() {
    let s = setup(BookingConfig::default());
    let booking = s
        .system
        .book(s.alice.id(), s.event.id(), s.regular.id(), 3, PaymentMethod::DebitCard)
        .unwrap();

    s.system.cancel_booking(s.alice.id(), booking.id()).unwrap();
    let before = s.regular.availability().unwrap();

    assert_eq!(
        s.system.cancel_booking(s.alice.id(), booking.id()).unwrap_err(),
        BookingError::AlreadyCanceled(booking.id())
    );
    assert_eq!(s.regular.availability().unwrap(), before);
    assert_eq!(before.canceled, 3);
    assert_eq!(before.available, 7);
}

#[test]
fn test_short_fill_keeps_partial_claim() {
    let s = setup(BookingConfig::default());
    s.system
        .book(s.alice.id(), s.event.id(), s.regular.id(), 8, PaymentMethod::NetBanking)
        .unwrap();

    let short = s
        .system
        .book(s.bob.id(), s.event.id(), s.regular.id(), 5, PaymentMethod::Wallet)
        .unwrap();

    assert!(short.is_short_fill());
    assert_eq!(short.requested_count(), 5);
    assert_eq!(short.ticket_count(), 2);
    assert_eq!(short.total(), Money::from_dollars(200));
    assert_eq!(s.regular.available_count().unwrap(), 0);
}

#[test]
fn test_huge_request_short_fills_to_pool_size() {
    let s = setup(BookingConfig::default());

    let booking = s
        .system
        .book(s.alice.id(), s.event.id(), s.vip.id(), u32::MAX, PaymentMethod::Wallet)
        .unwrap();

    assert!(booking.is_short_fill());
    assert_eq!(booking.requested_count(), u32::MAX);
    assert_eq!(booking.ticket_count(), 2);
    assert_eq!(booking.total(), Money::from_dollars(600));
    assert_eq!(s.vip.available_count().unwrap(), 0);
}

#[test]
fn test_payment_matches_claimed_prices() {
    let s = setup(BookingConfig::default());
    let first = s
        .system
        .book(s.alice.id(), s.event.id(), s.regular.id(), 2, PaymentMethod::CreditCard)
        .unwrap();

    s.regular.reprice(Money::from_cents(12_550)).unwrap();
    let second = s
        .system
        .book(s.bob.id(), s.event.id(), s.regular.id(), 2, PaymentMethod::Wallet)
        .unwrap();

    // Earlier booking keeps its claim-time prices
    assert_eq!(first.total(), Money::from_dollars(200));
    assert!(first.claimed().iter().all(|t| t.price == Money::from_dollars(100)));
    assert_eq!(second.total(), Money::from_cents(25_100));

    let payment = second.payment();
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert_eq!(payment.method, PaymentMethod::Wallet);
    assert_eq!(payment.created_at, second.created_at());
    assert_eq!(
        payment.amount,
        second.claimed().iter().map(|t| t.price).sum::<Money>()
    );
}

#[test]
fn test_invalid_requests_touch_nothing() {
    let s = setup(BookingConfig::default().with_max_tickets_per_booking(4));

    assert!(matches!(
        s.system
            .book(s.alice.id(), s.event.id(), s.regular.id(), 0, PaymentMethod::Wallet),
        Err(BookingError::InvalidRequest(_))
    ));
    assert!(matches!(
        s.system
            .book(s.alice.id(), s.event.id(), s.regular.id(), 5, PaymentMethod::Wallet),
        Err(BookingError::InvalidRequest(_))
    ));

    // Category from another event
    let venue = Arc::clone(s.event.venue());
    let other = s
        .system
        .create_event(&venue, "Exhibition", test_epoch(), "", "Sports")
        .unwrap();
    let foreign = other
        .add_category(s.system.env(), "GA", Money::from_dollars(20), 5)
        .unwrap();
    assert!(matches!(
        s.alice
            .book_tickets(s.system.env(), &s.event, &foreign, 1, PaymentMethod::Wallet),
        Err(BookingError::InvalidRequest(_))
    ));

    assert_eq!(s.regular.available_count().unwrap(), 10);
    assert_eq!(foreign.available_count().unwrap(), 5);
    assert!(s.alice.booking_history().unwrap().is_empty());
}

#[test]
fn test_summary_serializes_for_renderers() {
    let s = setup(BookingConfig::default());
    let booking = s
        .system
        .book(s.alice.id(), s.event.id(), s.vip.id(), 1, PaymentMethod::CreditCard)
        .unwrap();

    let json = serde_json::to_value(booking.summary().unwrap()).unwrap();

    assert_eq!(json["category_name"], "VIP");
    assert_eq!(json["requested"], 1);
    assert_eq!(json["tickets"].as_array().unwrap().len(), 1);
    assert_eq!(json["payment"]["amount"], 30_000);
}
