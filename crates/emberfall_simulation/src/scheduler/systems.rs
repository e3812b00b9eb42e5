//! Scheduler systems (запускаются первыми в FixedUpdate chain)

use bevy::prelude::*;
use super::{FixedTickCounter, Scheduler, TimerFired};

/// System: Increment tick counter (FixedUpdate, запускается ПЕРВЫМ)
///
/// Wraparound safe: u64::MAX тиков при 60 Hz — миллиарды лет.
pub fn increment_tick_counter(mut counter: ResMut<FixedTickCounter>) {
    counter.tick = counter.tick.wrapping_add(1);
}

/// System: сдвинуть simulation clock и разослать сработавшие таймеры
///
/// Таймеры, взведённые обработчиками TimerFired в этом же тике,
/// сработают не раньше следующего тика.
pub fn tick_scheduler(
    mut scheduler: ResMut<Scheduler>,
    mut fired_events: EventWriter<TimerFired>,
    time: Res<Time<Fixed>>,
) {
    for (handle, action) in scheduler.advance(time.delta_secs()) {
        fired_events.write(TimerFired { handle, action });
    }
}
