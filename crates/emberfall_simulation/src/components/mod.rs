//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - stats: health/stamina (CombatStats)
//! - enemy: enemy marker (AI-controlled actor)
//! - player: player marker, input, combat флаги, монеты
//! - movement: MovementCommand (intent для навигации хоста), MovementSpeed
//!
//! Доменные state-компоненты живут рядом со своими системами:
//! ai (EnemyMovementStatus), movement (MovementState), combat (CombatTarget).

pub mod enemy;
pub mod movement;
pub mod player;
pub mod stats;

// Re-exports для удобного импорта
pub use enemy::*;
pub use movement::*;
pub use player::*;
pub use stats::*;
