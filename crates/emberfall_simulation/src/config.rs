//! Конфигурация акторов и симуляции
//!
//! Все значения по умолчанию совпадают с балансом оригинальной игры.
//! `Deserialize` + `#[serde(default)]` — хост может загрузить частичный
//! конфиг из data-файла, остальное берётся из Default.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Параметры игрока (stamina, скорости, бой)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    pub max_stamina: f32,
    /// Drain и regen stamina (units/sec), одна скорость в обе стороны
    pub stamina_drain_rate: f32,
    /// Порог Low stamina (units)
    pub low_stamina: f32,
    /// Speed cap в Normal (units/sec)
    pub running_speed: f32,
    /// Speed cap в Sprinting
    pub sprinting_speed: f32,
    /// Скорость поворота к combat target во время атаки
    pub interp_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_stamina: 200.0,
            stamina_drain_rate: 50.0,
            low_stamina: 50.0,
            running_speed: 350.0,
            sprinting_speed: 800.0,
            interp_speed: 7.0,
        }
    }
}

/// Параметры врага (AI, cadence атак, death sequencing)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct EnemyConfig {
    pub max_health: f32,
    /// Урон hitbox'а врага по игроку
    pub damage: f32,
    /// Минимальная задержка перед атакой (секунды)
    pub attack_min_time: f32,
    /// Максимальная задержка перед атакой (секунды)
    pub attack_max_time: f32,
    /// Задержка между концом death анимации и despawn
    pub death_delay: f32,
    pub aggro_radius: f32,
    pub combat_radius: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            damage: 10.0,
            attack_min_time: 0.5,
            attack_max_time: 2.0,
            death_delay: 3.0,
            aggro_radius: 600.0,
            combat_radius: 100.0,
        }
    }
}

impl EnemyConfig {
    /// Диапазон задержки атаки: конечный, неотрицательный, min ≤ max
    ///
    /// NaN/inf min → 0, NaN/inf max → min.
    pub fn attack_delay_range(&self) -> (f32, f32) {
        let min = if self.attack_min_time.is_finite() {
            self.attack_min_time.max(0.0)
        } else {
            0.0
        };
        let max = if self.attack_max_time.is_finite() {
            self.attack_max_time.max(min)
        } else {
            min
        };
        (min, max)
    }
}

/// Глобальные параметры симуляции
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Частота FixedUpdate
    pub tick_hz: f64,
    /// Seed для DeterministicRng
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_config_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.max_stamina, 200.0);
        assert_eq!(config.stamina_drain_rate, 50.0);
        assert_eq!(config.low_stamina, 50.0);
        assert_eq!(config.sprinting_speed, 800.0);
    }

    #[test]
    fn test_attack_delay_range_clamps_inverted_bounds() {
        let config = EnemyConfig {
            attack_min_time: 3.0,
            attack_max_time: 1.0,
            ..Default::default()
        };
        assert_eq!(config.attack_delay_range(), (3.0, 3.0));

        let config = EnemyConfig::default();
        assert_eq!(config.attack_delay_range(), (0.5, 2.0));
    }

    #[test]
    fn test_attack_delay_range_rejects_non_finite_bounds() {
        let config = EnemyConfig {
            attack_max_time: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(config.attack_delay_range(), (0.5, 0.5));

        let config = EnemyConfig {
            attack_min_time: f32::NAN,
            attack_max_time: f32::NEG_INFINITY,
            ..Default::default()
        };
        assert_eq!(config.attack_delay_range(), (0.0, 0.0));

        let config = EnemyConfig {
            attack_min_time: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(config.attack_delay_range(), (0.0, 2.0));
    }

    #[test]
    fn test_partial_config_from_json() {
        let config: EnemyConfig =
            serde_json::from_str(r#"{ "damage": 25.0, "death_delay": 1.5 }"#).unwrap();
        assert_eq!(config.damage, 25.0);
        assert_eq!(config.death_delay, 1.5);
        assert_eq!(config.attack_max_time, 2.0);
    }
}
