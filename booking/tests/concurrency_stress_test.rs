//! Concurrency stress tests for contended categories.
//!
//! These tests verify that under concurrent load no ticket is handed to two
//! bookings, a category never oversells, and a booking is cancelled once.
//!
//! Run with: `cargo test --test concurrency_stress_test -- --nocapture`

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/expect

use std::collections::HashSet;
use std::sync::Arc;
use ticket_booking::{
    Booking, BookingConfig, BookingEnvironment, BookingError, BookingSystem, Event, Money,
    PaymentMethod, TicketCategory, TicketStatus, User,
};
use ticket_booking_core::environment::{RandomIdGenerator, SystemClock};

fn system() -> BookingSystem {
    BookingSystem::new(BookingEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(RandomIdGenerator),
        BookingConfig::default(),
    ))
}

fn event_with_category(
    system: &BookingSystem,
    name: &str,
    seats: u32,
) -> (Arc<Event>, Arc<TicketCategory>) {
    let venue = system.add_venue("Stadium", "9 Park Ln", 50_000).unwrap();
    let event = system
        .create_event(&venue, "Cup Final", chrono::Utc::now(), "", "Sports")
        .unwrap();
    let category = event
        .add_category(system.env(), name, Money::from_dollars(100), seats)
        .unwrap();
    (event, category)
}

/// Books on a blocking thread so requests really run in parallel.
async fn book_concurrently(
    system: &Arc<BookingSystem>,
    event: &Arc<Event>,
    category: &Arc<TicketCategory>,
    users: &[Arc<User>],
    count: u32,
) -> Vec<Result<Arc<Booking>, BookingError>> {
    let mut handles = Vec::new();
    for user in users {
        let system = Arc::clone(system);
        let event = Arc::clone(event);
        let category = Arc::clone(category);
        let user = Arc::clone(user);
        handles.push(tokio::task::spawn_blocking(move || {
            user.book_tickets(system.env(), &event, &category, count, PaymentMethod::Wallet)
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

/// Test: three concurrent requests for 4 tickets against 10 Regular seats.
///
/// Verifies that:
/// - Exactly 10 tickets are claimed in total
/// - No request gets more than it asked for
/// - At least one request comes back short
/// - The category ends sold out
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_three_requests_of_four_for_ten_seats() {
    for round in 0..25 {
        let system = Arc::new(system());
        let (event, regular) = event_with_category(&system, "Regular", 10);
        let users: Vec<_> = (0..3)
            .map(|i| {
                system
                    .register_user(format!("fan-{i}"), format!("fan-{i}@example.com"), "")
                    .unwrap()
            })
            .collect();

        let results = book_concurrently(&system, &event, &regular, &users, 4).await;

        let claimed: Vec<usize> = results
            .iter()
            .map(|result| match result {
                Ok(booking) => booking.ticket_count(),
                Err(BookingError::OutOfStock { .. }) => 0,
                Err(error) => panic!("round {round}: unexpected error {error}"),
            })
            .collect();

        assert_eq!(claimed.iter().sum::<usize>(), 10, "round {round}: {claimed:?}");
        assert!(claimed.iter().all(|&n| n <= 4), "round {round}: {claimed:?}");
        assert!(claimed.iter().any(|&n| n < 4), "round {round}: {claimed:?}");
        assert_eq!(regular.available_count().unwrap(), 0);
    }
}

/// Test: 100 concurrent single-ticket requests for 20 seats.
///
/// Verifies that exactly 20 succeed, each with a distinct ticket.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_no_ticket_claimed_twice() {
    println!("🧪 Concurrency Stress Test: 100 concurrent requests for 20 seats");

    let system = Arc::new(system());
    let (event, category) = event_with_category(&system, "GA", 20);
    let users: Vec<_> = (0..100)
        .map(|i| {
            system
                .register_user(format!("user-{i}"), format!("user-{i}@example.com"), "")
                .unwrap()
        })
        .collect();

    let results = book_concurrently(&system, &event, &category, &users, 1).await;

    let bookings: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let sold_out = results
        .iter()
        .filter(|r| matches!(r, Err(BookingError::OutOfStock { .. })))
        .count();
    println!("  ✅ {} succeeded, {sold_out} sold out", bookings.len());

    assert_eq!(bookings.len(), 20);
    assert_eq!(sold_out, 80);

    let ticket_ids: HashSet<_> = bookings.iter().flat_map(|b| b.ticket_ids()).collect();
    assert_eq!(ticket_ids.len(), 20, "a ticket was handed out twice");

    let availability = category.availability().unwrap();
    assert_eq!(availability.available, 0);
    assert_eq!(availability.booked, 20);
    for ticket in category.tickets().unwrap() {
        assert_eq!(ticket.status, TicketStatus::Booked);
        let owner = ticket.booking.unwrap();
        assert!(bookings.iter().any(|b| b.id() == owner));
    }
}

/// Test: the same booking cancelled from 16 threads at once.
///
/// Exactly one cancel succeeds; the rest report `AlreadyCanceled`.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cancel_succeeds_once() {
    let system = Arc::new(system());
    let (event, category) = event_with_category(&system, "VIP", 4);
    let user = system.register_user("Alice", "alice@example.com", "").unwrap();
    let booking = system
        .book(user.id(), event.id(), category.id(), 4, PaymentMethod::CreditCard)
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let system = Arc::clone(&system);
        let (user_id, booking_id) = (user.id(), booking.id());
        handles.push(tokio::task::spawn_blocking(move || {
            system.cancel_booking(user_id, booking_id)
        }));
    }

    let mut succeeded = 0;
    let mut already = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(BookingError::AlreadyCanceled(_)) => already += 1,
            Err(error) => panic!("unexpected error {error}"),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(already, 15);
    let availability = category.availability().unwrap();
    assert_eq!(availability.canceled, 4);
    assert_eq!(availability.available, 0);
}

/// Test: bookings on different categories of one event do not interfere.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_categories_are_independent_under_load() {
    let system = Arc::new(system());
    let (event, vip) = event_with_category(&system, "VIP", 10);
    let regular = event
        .add_category(system.env(), "Regular", Money::from_dollars(50), 30)
        .unwrap();
    let users: Vec<_> = (0..40)
        .map(|i| {
            system
                .register_user(format!("user-{i}"), format!("user-{i}@example.com"), "")
                .unwrap()
        })
        .collect();

    let (vip_results, regular_results) = tokio::join!(
        book_concurrently(&system, &event, &vip, &users[..20], 1),
        book_concurrently(&system, &event, &regular, &users[20..], 2),
    );

    let vip_claimed: usize = vip_results.iter().flatten().map(|b| b.ticket_count()).sum();
    let regular_claimed: usize = regular_results.iter().flatten().map(|b| b.ticket_count()).sum();
    assert_eq!(vip_claimed, 10);
    assert_eq!(regular_claimed, 30);
    assert_eq!(vip.available_count().unwrap(), 0);
    assert_eq!(regular.available_count().unwrap(), 0);
}
