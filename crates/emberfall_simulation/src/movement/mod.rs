//! Player movement state machine (stamina-gated sprint)
//!
//! Каждый тик: sprint input + "двигается ли игрок" + dt → stamina,
//! StaminaStatus, MovementStatus, speed cap.
//!
//! Transition table (r = drain rate, L = low threshold, M = max):
//!
//! | StaminaStatus | sprint + moving          | sprint, стоит   | sprint отпущен          |
//! |---------------|--------------------------|-----------------|-------------------------|
//! | Normal        | drain r·dt; ≤ L → Low    | Normal, без drain | regen r·dt (clamp M)  |
//! | Low           | drain; ≤ 0 → Exhausted   | Normal          | regen; ≥ L → Normal     |
//! | Exhausted     | stamina = 0              | stamina = 0     | → Recovering, regen     |
//! | Recovering    | regen; ≥ L → Normal      | (то же)         | (то же)                 |
//!
//! Dead — sticky: никаких переходов до явного reset (load).

use bevy::prelude::*;

use crate::components::{CombatStats, MovementSpeed, Player, PlayerCombat, PlayerInput};
use crate::config::PlayerConfig;


/// Статус движения игрока
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum MovementStatus {
    #[default]
    Normal,
    Sprinting,
    Dead,
}

/// Статус stamina bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum StaminaStatus {
    #[default]
    Normal,
    Low,
    Exhausted,
    /// Восстановление от 0 до Low порога (спринт заблокирован)
    Recovering,
}

impl StaminaStatus {
    /// Статус для произвольного уровня stamina (load path)
    pub fn for_level(stamina: f32, low_stamina: f32) -> Self {
        if stamina >= low_stamina {
            StaminaStatus::Normal
        } else if stamina > 0.0 {
            StaminaStatus::Low
        } else {
            StaminaStatus::Recovering
        }
    }
}

/// Input одного тика
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementTick {
    pub sprint_held: bool,
    pub moving: bool,
    pub delta: f32,
}

/// Derived состояние движения игрока
///
/// Пересчитывается каждый тик в `step`. Снаружи можно только
/// `force_dead` и `reset_after_load`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct MovementState {
    movement: MovementStatus,
    stamina: StaminaStatus,
}

impl MovementState {
    pub fn movement(&self) -> MovementStatus {
        self.movement
    }

    pub fn stamina_status(&self) -> StaminaStatus {
        self.stamina
    }

    pub fn is_dead(&self) -> bool {
        self.movement == MovementStatus::Dead
    }

    pub fn step(&mut self, stats: &mut CombatStats, tick: MovementTick, config: &PlayerConfig) {
        if self.is_dead() {
            return;
        }

        let delta_stamina = config.stamina_drain_rate * tick.delta;
        let low = config.low_stamina;

        match self.stamina {
            StaminaStatus::Normal => {
                if tick.sprint_held {
                    if tick.moving {
                        self.movement = MovementStatus::Sprinting;
                        stats.drain_stamina(delta_stamina);
                    } else {
                        self.movement = MovementStatus::Normal;
                    }

                    // Большой dt может пробить оба порога за один тик
                    if stats.stamina() <= 0.0 {
                        self.movement = MovementStatus::Normal;
                        self.stamina = StaminaStatus::Exhausted;
                    } else if stats.stamina() <= low {
                        self.stamina = StaminaStatus::Low;
                    }
                } else {
                    self.movement = MovementStatus::Normal;
                    stats.regen_stamina(delta_stamina);
                }
            }

            StaminaStatus::Low => {
                if tick.sprint_held {
                    if tick.moving {
                        self.movement = MovementStatus::Sprinting;
                        stats.drain_stamina(delta_stamina);
                    } else {
                        self.movement = MovementStatus::Normal;
                    }

                    if stats.stamina() <= 0.0 {
                        self.movement = MovementStatus::Normal;
                        self.stamina = StaminaStatus::Exhausted;
                    }
                } else {
                    self.movement = MovementStatus::Normal;
                    stats.regen_stamina(delta_stamina);
                    if stats.stamina() >= low {
                        self.stamina = StaminaStatus::Normal;
                    }
                }
            }

            StaminaStatus::Exhausted => {
                self.movement = MovementStatus::Normal;
                if tick.sprint_held {
                    stats.set_stamina(0.0);
                } else {
                    self.stamina = StaminaStatus::Recovering;
                    stats.regen_stamina(delta_stamina);
                }
            }

            StaminaStatus::Recovering => {
                self.movement = MovementStatus::Normal;
                stats.regen_stamina(delta_stamina);
                if stats.stamina() >= low {
                    self.stamina = StaminaStatus::Normal;
                }
            }
        }
    }

    /// Перевести в Dead. false — уже был мёртв
    pub fn force_dead(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.movement = MovementStatus::Dead;
        true
    }

    /// Reset после load: MovementStatus всегда Normal (даже из Dead)
    pub fn reset_after_load(&mut self, stamina: f32, config: &PlayerConfig) {
        self.movement = MovementStatus::Normal;
        self.stamina = StaminaStatus::for_level(stamina, config.low_stamina);
    }

    /// Speed cap для текущего MovementStatus
    pub fn speed_cap(&self, config: &PlayerConfig) -> f32 {
        match self.movement {
            MovementStatus::Sprinting => config.sprinting_speed,
            MovementStatus::Normal | MovementStatus::Dead => config.running_speed,
        }
    }
}

/// Система: stamina/movement пересчёт игрока
///
/// Запускается ДО AI систем (AI читает позицию/состояние игрока).
/// Во время атаки movement input игнорируется (игрок "стоит").
pub fn update_player_movement(
    mut players: Query<
        (
            &mut MovementState,
            &mut CombatStats,
            &mut MovementSpeed,
            &PlayerInput,
            &PlayerCombat,
            &PlayerConfig,
        ),
        With<Player>,
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut state, mut stats, mut speed, input, combat, config) in players.iter_mut() {
        let before = state.movement();

        state.step(
            &mut stats,
            MovementTick {
                sprint_held: input.sprint_held,
                moving: input.wants_to_move() && !combat.attacking,
                delta,
            },
            config,
        );

        let cap = state.speed_cap(config);
        if speed.speed != cap {
            speed.speed = cap;
        }

        if before != state.movement() {
            crate::logger::log(&format!(
                "Movement: {:?} → {:?} (stamina {:.1}, {:?})",
                before,
                state.movement(),
                stats.stamina(),
                state.stamina_status()
            ));
        }
    }
}
