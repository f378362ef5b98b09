//! Scheduling Tests
//!
//! Tests for:
//! - Timer ordering, cancellation and remaining time
//! - Frame requests (single outstanding request, cancel by handle)
//! - VirtualClock handles sharing one time source

use std::time::Duration;

use signverse::schedule::{Clock, Scheduler, VirtualClock};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

// ============================================================================
// Timers
// ============================================================================

#[test]
fn timers_fire_only_once_due() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule(ms(100), ms(800), "pause");

    assert!(scheduler.pop_due(ms(899)).is_none());
    let (_, event) = scheduler.pop_due(ms(900)).expect("due at deadline");
    assert_eq!(event, "pause");
    assert!(scheduler.pop_due(ms(2000)).is_none());
    assert_eq!(scheduler.pending_timers(), 0);
}

#[test]
fn overdue_timers_pop_earliest_first() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule(ms(0), ms(300), 3);
    scheduler.schedule(ms(0), ms(100), 1);
    scheduler.schedule(ms(0), ms(200), 2);
    assert_eq!(scheduler.next_deadline(), Some(ms(100)));

    let mut fired = Vec::new();
    while let Some((_, event)) = scheduler.pop_due(ms(1000)) {
        fired.push(event);
    }
    assert_eq!(fired, vec![1, 2, 3]);
    assert!(scheduler.next_deadline().is_none());
}

#[test]
fn cancelled_timers_never_fire() {
    let mut scheduler = Scheduler::new();
    let clip = scheduler.schedule(ms(0), ms(50), "clip");
    let pause = scheduler.schedule(ms(0), ms(60), "pause");

    assert_eq!(scheduler.cancel(clip), Some("clip"));
    assert_eq!(scheduler.cancel(clip), None);
    assert!(!scheduler.is_pending(clip));
    assert!(scheduler.is_pending(pause));

    let (handle, event) = scheduler.pop_due(ms(100)).expect("pause fires");
    assert_eq!(handle, pause);
    assert_eq!(event, "pause");
}

#[test]
fn a_handler_can_cancel_a_later_timer() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule(ms(0), ms(10), "first");
    let second = scheduler.schedule(ms(0), ms(20), "second");

    let now = ms(30);
    let (_, first) = scheduler.pop_due(now).expect("first");
    assert_eq!(first, "first");
    scheduler.cancel(second);
    assert!(scheduler.pop_due(now).is_none());
}

#[test]
fn remaining_time_saturates_at_zero() {
    let mut scheduler = Scheduler::new();
    let handle = scheduler.schedule(ms(1000), ms(500), ());

    assert_eq!(scheduler.remaining(handle, ms(1200)), Some(ms(300)));
    assert_eq!(scheduler.remaining(handle, ms(1600)), Some(Duration::ZERO));

    scheduler.cancel_all();
    assert_eq!(scheduler.remaining(handle, ms(1200)), None);
}

// ============================================================================
// Frame requests
// ============================================================================

#[test]
fn frame_request_is_consumed_once() {
    let mut scheduler: Scheduler<()> = Scheduler::new();
    assert!(!scheduler.frame_requested());

    let first = scheduler.request_frame();
    assert!(scheduler.frame_requested());
    assert_eq!(scheduler.take_frame(), Some(first));
    assert!(!scheduler.frame_requested());

    let second = scheduler.request_frame();
    assert_ne!(first, second);
}

#[test]
fn stale_frame_handles_cannot_cancel_new_requests() {
    let mut scheduler: Scheduler<()> = Scheduler::new();
    let stale = scheduler.request_frame();
    scheduler.take_frame();

    let current = scheduler.request_frame();
    scheduler.cancel_frame(stale);
    assert!(scheduler.frame_requested());

    scheduler.cancel_frame(current);
    assert!(scheduler.take_frame().is_none());
}

// ============================================================================
// Clocks
// ============================================================================

#[test]
fn virtual_clock_clones_share_time() {
    let clock = VirtualClock::new();
    let handle = clock.clone();
    assert_eq!(handle.now(), Duration::ZERO);

    clock.advance_ms(16);
    clock.advance(ms(4));
    assert_eq!(handle.now(), ms(20));

    handle.set(ms(5000));
    assert_eq!(clock.now(), ms(5000));
}
