//! Scheduler: fixed tick pipeline + one-shot таймеры
//!
//! Single-threaded, frame-driven:
//! - FixedUpdate chain = per-actor update callbacks, один раз за тик
//! - TimerQueue = отложенные one-shot callbacks с cancel
//!
//! Таймеры логически асинхронны, но диспатчатся в том же FixedUpdate
//! проходе, поэтому таймер никогда не гоняется с тиком.

use bevy::prelude::*;

pub mod systems;
pub mod timers;

#[cfg(test)]
mod timers_tests;

pub use systems::*;
pub use timers::*;

/// Глобальный счётчик fixed тиков
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FixedTickCounter {
    pub tick: u64,
}
