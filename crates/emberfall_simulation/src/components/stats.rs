//! Combat stats: здоровье и выносливость актора

use bevy::prelude::*;

/// Здоровье + выносливость актора
///
/// Инварианты:
/// - 0 ≤ health ≤ max_health
/// - 0 ≤ stamina ≤ max_stamina
/// - health == 0 терминально (heal больше не работает, Killed репортится один раз)
///
/// Поля закрыты: мутация только через методы, каждый метод клампит результат.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CombatStats {
    health: f32,
    max_health: f32,
    stamina: f32,
    max_stamina: f32,
}

/// Результат применения урона
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Урон прошёл, актор жив
    Wounded,
    /// Этот удар убил актора
    Killed,
    /// Актор уже был мёртв, health не изменился
    AlreadyDead,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self::new(100.0, 0.0)
    }
}

impl CombatStats {
    pub fn new(max_health: f32, max_stamina: f32) -> Self {
        let max_health = max_health.max(0.0);
        let max_stamina = max_stamina.max(0.0);
        Self {
            health: max_health,
            max_health,
            stamina: max_stamina,
            max_stamina,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn max_stamina(&self) -> f32 {
        self.max_stamina
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::AlreadyDead;
        }

        self.health = (self.health - amount.max(0.0)).max(0.0);

        if self.is_alive() {
            DamageOutcome::Wounded
        } else {
            DamageOutcome::Killed
        }
    }

    pub fn heal(&mut self, amount: f32) {
        if !self.is_alive() {
            return;
        }
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }

    pub fn drain_stamina(&mut self, amount: f32) {
        self.set_stamina(self.stamina - amount.max(0.0));
    }

    pub fn regen_stamina(&mut self, amount: f32) {
        self.set_stamina(self.stamina + amount.max(0.0));
    }

    pub fn set_stamina(&mut self, value: f32) {
        self.stamina = value.clamp(0.0, self.max_stamina);
    }

    /// Load path: перезаписывает все значения (в т.ч. "оживляет" health)
    pub fn restore(&mut self, health: f32, max_health: f32, stamina: f32, max_stamina: f32) {
        self.max_health = max_health.max(0.0);
        self.max_stamina = max_stamina.max(0.0);
        self.health = health.clamp(0.0, self.max_health);
        self.stamina = stamina.clamp(0.0, self.max_stamina);
    }

    pub fn health_percent(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }
}
