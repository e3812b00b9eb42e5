//! Tests for timer queue and per-actor timer slots.

use bevy::prelude::*;
use super::timers::*;

fn actor() -> Entity {
    Entity::from_raw(7)
}

#[test]
fn test_timer_fires_after_delay() {
    let mut queue: TimerQueue<u32> = TimerQueue::default();
    let handle = queue.schedule(1.0, 5);

    assert!(queue.advance(0.5).is_empty());
    assert!(queue.is_pending(handle));

    let fired = queue.advance(0.5);
    assert_eq!(fired, vec![(handle, 5)]);
    assert!(queue.is_empty());
}

#[test]
fn test_cancelled_timer_never_fires() {
    let mut queue: TimerQueue<u32> = TimerQueue::default();
    let handle = queue.schedule(0.25, 1);

    assert!(queue.cancel(handle));
    assert!(!queue.cancel(handle)); // повторный cancel — no-op

    assert!(queue.advance(10.0).is_empty());
}

#[test]
fn test_fire_order_by_due_then_schedule_order() {
    let mut queue: TimerQueue<&'static str> = TimerQueue::default();
    queue.schedule(0.3, "late");
    queue.schedule(0.1, "first");
    queue.schedule(0.1, "second");

    let fired: Vec<_> = queue.advance(1.0).into_iter().map(|(_, p)| p).collect();
    assert_eq!(fired, vec!["first", "second", "late"]);
}

#[test]
fn test_remaining_time() {
    let mut queue: TimerQueue<()> = TimerQueue::default();
    let handle = queue.schedule(2.0, ());
    queue.advance(0.5);

    let remaining = queue.remaining(handle).unwrap();
    assert!((remaining - 1.5).abs() < 1e-5);
}

#[test]
fn test_rearm_attack_fires_exactly_once() {
    let mut scheduler = Scheduler::default();
    let mut timers = ActorTimers::default();

    let first = timers.arm(actor(), TimerKind::Attack, 0.5, &mut scheduler);
    let second = timers.arm(actor(), TimerKind::Attack, 0.8, &mut scheduler);

    assert_ne!(first, second);
    assert!(!scheduler.is_pending(first));
    assert_eq!(scheduler.len(), 1);

    let fired = scheduler.advance(5.0);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].0, second);
    assert!(timers.take_fired(TimerKind::Attack, second));
    assert_eq!(timers.attack, None);
}

#[test]
fn test_attack_and_death_slots_are_independent() {
    let mut scheduler = Scheduler::default();
    let mut timers = ActorTimers::default();

    timers.arm(actor(), TimerKind::Attack, 1.0, &mut scheduler);
    timers.arm(actor(), TimerKind::Death, 3.0, &mut scheduler);
    assert_eq!(scheduler.len(), 2);

    assert!(timers.cancel(TimerKind::Attack, &mut scheduler));
    assert!(timers.death.is_some());
    assert_eq!(scheduler.len(), 1);

    timers.cancel_all(&mut scheduler);
    assert!(scheduler.is_empty());
    assert_eq!(timers, ActorTimers::default());
}

#[test]
fn test_stale_handle_is_rejected() {
    let mut scheduler = Scheduler::default();
    let mut timers = ActorTimers::default();

    let stale = scheduler.schedule(0.1, TimerAction { actor: actor(), kind: TimerKind::Attack });
    let live = timers.arm(actor(), TimerKind::Attack, 0.1, &mut scheduler);

    assert!(!timers.take_fired(TimerKind::Attack, stale));
    assert_eq!(timers.attack, Some(live));
}
