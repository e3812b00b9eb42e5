//! Enemy FSM components (movement status, combat флаги).

use bevy::prelude::*;

/// Статус врага
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum EnemyMovementStatus {
    /// Начальное состояние, игрок вне aggro зоны
    #[default]
    Idle,
    /// Преследует игрока (MovementCommand::FollowEntity)
    MoveToTarget,
    /// Стоит и атакует (attack montage)
    Attacking,
    /// Terminal: timers отменены, volumes выключены
    Dead,
}

impl EnemyMovementStatus {
    pub fn is_dead(&self) -> bool {
        *self == EnemyMovementStatus::Dead
    }
}

/// Combat состояние врага
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyCombat {
    /// Игрок, которого преследуем (внутри aggro зоны)
    pub chase_target: Option<Entity>,
    /// Игрок внутри combat зоны (цель атак)
    pub target: Option<Entity>,
    pub overlapping_combat: bool,
    /// false → attack timer срабатывает вхолостую
    pub has_valid_target: bool,
    /// Идёт attack montage
    pub attacking: bool,
}

impl EnemyCombat {
    /// Сбросить всё (смерть)
    pub fn disengage(&mut self) {
        *self = Self::default();
    }

    /// Этот враг держит player как цель (chase или combat)
    pub fn targets(&self, player: Entity) -> bool {
        self.chase_target == Some(player) || self.target == Some(player)
    }
}
