//! Enemy AI: Idle → MoveToTarget ⇄ Attacking → Dead
//!
//! Event-driven FSM, без polling:
//! - ZoneContact (aggro/combat volumes) → преследование, attack timer
//! - TimerFired (attack/death таймеры) → атака, despawn
//! - AnimationSignal (attack end, death end, hitbox окно)
//! - EntityDied → Dead (terminal)
//!
//! Системы регистрируются в общем FixedUpdate chain (см. SimulationPlugin).

pub mod components;
pub mod systems;

pub use components::*;
pub use systems::*;
