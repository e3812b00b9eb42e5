//! Player компоненты: marker, input, combat флаги, монеты

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// Акторы БЕЗ этого компонента управляются AI systems.
/// В single-player обычно только один entity имеет этот компонент,
/// но все системы работают с произвольным количеством игроков.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(
    Transform,
    PlayerInput,
    PlayerCombat,
    Coins,
    crate::components::MovementSpeed,
    crate::movement::MovementState,
    crate::combat::EngagedEnemies,
    crate::combat::CombatTarget,
    crate::combat::TargetDisplay,
    crate::items::ActiveOverlappingItem
)]
pub struct Player;

/// Input игрока за текущий frame (пишет хост)
///
/// Device mapping — забота хоста, сюда приходят уже логические флаги.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    pub sprint_held: bool,
    pub moving_forward: bool,
    pub moving_right: bool,
    pub light_attack_held: bool,
    pub heavy_attack_held: bool,
    /// Игрок в воздухе (атаковать нельзя)
    pub airborne: bool,
    /// One-shot: нажата interact клавиша (сбрасывается после обработки)
    pub interact: bool,
}

impl PlayerInput {
    pub fn wants_to_move(&self) -> bool {
        self.moving_forward || self.moving_right
    }

    pub fn attack_held(&self) -> bool {
        self.light_attack_held || self.heavy_attack_held
    }
}

/// Combat флаги игрока
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerCombat {
    /// Идёт attack animation (movement input игнорируется)
    pub attacking: bool,
    /// Поворачиваться к combat target (только во время атаки)
    pub interp_to_enemy: bool,
}

/// Монеты игрока (pickups, save/load)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coins(pub i32);
