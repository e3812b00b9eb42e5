//! Save/load персонажа игрока
//!
//! capture_snapshot: World → CharacterSnapshot (serde)
//! restore_snapshot: CharacterSnapshot → World (stats, монеты, оружие,
//! опционально transform). Restore возвращает игрока в играбельное
//! состояние даже после смерти.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::animation::AnimationFrozen;
use crate::components::{CombatStats, Coins, Player, PlayerCombat};
use crate::config::PlayerConfig;
use crate::items::{equip_weapon, spawn_weapon, EquippedWeapon, WeaponCatalog};
use crate::movement::MovementState;

pub mod slot;

pub use slot::{JsonFileSlot, MemorySlot, SaveSlot};

/// Сохраняемое состояние персонажа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub coins: i32,
    pub position: [f32; 3],
    /// Quaternion (x, y, z, w)
    pub rotation: [f32; 4],
    pub equipped_weapon_id: Option<String>,
    pub weapon_particles: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOptions {
    /// false — load без телепорта (смена уровня уже поставила игрока)
    pub restore_transform: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self { restore_transform: true }
    }
}

/// Снять snapshot игрока. None — entity не игрок или без stats
pub fn capture_snapshot(world: &World, player: Entity) -> Option<CharacterSnapshot> {
    world.get::<Player>(player)?;
    let stats = world.get::<CombatStats>(player)?;
    let transform = world.get::<Transform>(player).copied().unwrap_or_default();
    let coins = world.get::<Coins>(player).map(|coins| coins.0).unwrap_or_default();
    let weapon = world.get::<EquippedWeapon>(player);

    Some(CharacterSnapshot {
        health: stats.health(),
        max_health: stats.max_health(),
        stamina: stats.stamina(),
        max_stamina: stats.max_stamina(),
        coins,
        position: transform.translation.to_array(),
        rotation: transform.rotation.to_array(),
        equipped_weapon_id: weapon.map(|equipped| equipped.spec.id.clone()),
        weapon_particles: weapon.is_some_and(|equipped| equipped.spec.particles),
    })
}

/// Применить snapshot к игроку
///
/// - stats/монеты перезаписываются (health > 0 "оживляет")
/// - MovementStatus → Normal, StaminaStatus по уровню stamina
/// - AnimationFrozen снимается, combat флаги сброшены
/// - оружие пересоздаётся из WeaponCatalog (неизвестный id → остаётся текущее)
///
/// false — entity не игрок, или snapshot снят с мёртвого игрока
/// (health ≤ 0). Такой snapshot мир не трогает: health == 0 терминально,
/// а Normal статус при нулевом health дал бы бессмертного игрока.
pub fn restore_snapshot(
    world: &mut World,
    player: Entity,
    snapshot: &CharacterSnapshot,
    options: RestoreOptions,
) -> bool {
    if world.get::<Player>(player).is_none() {
        return false;
    }

    if snapshot.health.is_nan() || snapshot.health <= 0.0 {
        crate::logger::log_warning(&format!(
            "Load: snapshot for {:?} has health {:.1}, skipped",
            player, snapshot.health
        ));
        return false;
    }

    let config = world.get::<PlayerConfig>(player).cloned().unwrap_or_default();

    let Ok(mut entity) = world.get_entity_mut(player) else {
        return false;
    };

    if let Some(mut stats) = entity.get_mut::<CombatStats>() {
        stats.restore(snapshot.health, snapshot.max_health, snapshot.stamina, snapshot.max_stamina);
    } else {
        let mut stats = CombatStats::new(snapshot.max_health, snapshot.max_stamina);
        stats.restore(snapshot.health, snapshot.max_health, snapshot.stamina, snapshot.max_stamina);
        entity.insert(stats);
    }

    let stamina = entity.get::<CombatStats>().map(|stats| stats.stamina()).unwrap_or_default();

    entity.insert(Coins(snapshot.coins));
    entity.insert(PlayerCombat::default());
    entity.remove::<AnimationFrozen>();

    if let Some(mut state) = entity.get_mut::<MovementState>() {
        state.reset_after_load(stamina, &config);
    }

    if options.restore_transform {
        if let Some(mut transform) = entity.get_mut::<Transform>() {
            transform.translation = Vec3::from_array(snapshot.position);
            transform.rotation = Quat::from_array(snapshot.rotation).normalize();
        }
    }

    if let Some(id) = &snapshot.equipped_weapon_id {
        let spec = world
            .get_resource::<WeaponCatalog>()
            .and_then(|catalog| catalog.get(id))
            .cloned();

        match spec {
            Some(mut spec) => {
                spec.particles = snapshot.weapon_particles;
                let weapon = spawn_weapon(world, spec, Vec3::from_array(snapshot.position));
                equip_weapon(world, player, weapon);
            }
            None => {
                crate::logger::log_warning(&format!("Load: unknown weapon '{}' skipped", id));
            }
        }
    }

    crate::logger::log_info(&format!(
        "Load: {:?} restored (health {:.1}, coins {})",
        player, snapshot.health, snapshot.coins
    ));
    true
}
