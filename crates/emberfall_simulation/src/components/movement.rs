//! Movement компоненты: команды перемещения и speed cap

use bevy::prelude::*;

/// Команда движения для актора (выполняется навигацией хоста)
///
/// Архитектура:
/// - ECS система пишет MovementCommand (high-level intent)
/// - Хост читает и конвертирует в pathfinding target
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementCommand {
    /// Стоять на месте (не обновлять target)
    #[default]
    Idle,
    /// Следовать за entity (хост обновляет target каждый frame)
    FollowEntity { target: Entity },
    /// Остановиться немедленно (сбросить путь и velocity)
    Stop,
}

/// Текущий speed cap актора (units/sec)
///
/// Хост использует как max walk speed при интеграции движения.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 350.0 }
    }
}
