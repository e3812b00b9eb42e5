//! Items: pickups (монеты, здоровье), оружие на земле, экипировка
//!
//! Item = entity с `Interactable` + child volumes:
//! - Pickup volume: вход игрока → эффект (pickup) или "можно экипировать" (weapon)
//! - Hitbox volume (только оружие): включается attack notify'ями владельца

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::combat::DamageSource;
use crate::components::{CombatStats, Coins, Player, PlayerInput};
use crate::cosmetics::{CosmeticCue, SoundCue};
use crate::proximity::{ZoneContact, ZoneKind, ZonePhase, ZoneVolume};

/// Радиус зоны подбора
pub const PICKUP_RADIUS: f32 = 64.0;
/// Радиус hitbox'а оружия
pub const WEAPON_HITBOX_RADIUS: f32 = 40.0;

/// Эффект pickup'а
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum PickupEffect {
    Coins(i32),
    Health(f32),
}

/// Описание оружия (id — ключ для save/load)
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub id: String,
    pub damage: f32,
    /// Частицы на клинке (косметика, сохраняется в save)
    pub particles: bool,
}

impl WeaponSpec {
    pub fn new(id: impl Into<String>, damage: f32) -> Self {
        Self {
            id: id.into(),
            damage,
            particles: false,
        }
    }
}

/// Что происходит при overlap с предметом
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum Interactable {
    /// Подбирается сразу при входе
    Pickup(PickupEffect),
    /// Лежит на земле, экипируется по interact
    Weapon(WeaponSpec),
}

/// Предмет, в чьей pickup зоне стоит игрок (кандидат на interact)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ActiveOverlappingItem(pub Option<Entity>);

/// Экипированное оружие игрока
#[derive(Component, Debug, Clone, PartialEq)]
pub struct EquippedWeapon {
    pub weapon: Entity,
    pub spec: WeaponSpec,
}

/// Каталог оружия по id (load пересоздаёт оружие отсюда)
#[derive(Resource, Debug, Clone, Default)]
pub struct WeaponCatalog {
    weapons: HashMap<String, WeaponSpec>,
}

impl WeaponCatalog {
    pub fn insert(&mut self, spec: WeaponSpec) {
        self.weapons.insert(spec.id.clone(), spec);
    }

    pub fn get(&self, id: &str) -> Option<&WeaponSpec> {
        self.weapons.get(id)
    }
}

/// Spawn pickup'а с его зоной
pub fn spawn_pickup(world: &mut World, effect: PickupEffect, position: Vec3) -> Entity {
    let pickup = world
        .spawn((Interactable::Pickup(effect), Transform::from_translation(position)))
        .id();
    world.spawn((ZoneVolume::new(ZoneKind::Pickup, pickup, PICKUP_RADIUS), ChildOf(pickup)));
    pickup
}

/// Spawn оружия на земле (pickup зона + выключенный hitbox)
pub fn spawn_weapon(world: &mut World, spec: WeaponSpec, position: Vec3) -> Entity {
    let weapon = world
        .spawn((Interactable::Weapon(spec), Transform::from_translation(position)))
        .id();
    world.spawn((ZoneVolume::new(ZoneKind::Pickup, weapon, PICKUP_RADIUS), ChildOf(weapon)));
    world.spawn((
        ZoneVolume::new(ZoneKind::Hitbox, weapon, WEAPON_HITBOX_RADIUS).disabled(),
        ChildOf(weapon),
    ));
    weapon
}

/// Spawn одноразовой ловушки (hitbox volume, урон любому актору)
pub fn spawn_hazard(world: &mut World, damage: f32, radius: f32, position: Vec3) -> Entity {
    let hazard = world
        .spawn((DamageSource::Hazard { damage }, Transform::from_translation(position)))
        .id();
    world.spawn((ZoneVolume::new(ZoneKind::Hitbox, hazard, radius), ChildOf(hazard)));
    hazard
}

/// Экипировать оружие игроку
///
/// Предыдущее оружие despawn'ится, новое становится child'ом игрока,
/// его pickup зона выключается, hitbox ждёт attack notify.
/// false — игрок или оружие не найдены.
pub fn equip_weapon(world: &mut World, player: Entity, weapon: Entity) -> bool {
    if world.get::<Player>(player).is_none() {
        return false;
    }
    let spec = match world.get::<Interactable>(weapon) {
        Some(Interactable::Weapon(spec)) => spec.clone(),
        _ => return false,
    };

    if let Some(previous) = world.get::<EquippedWeapon>(player).map(|equipped| equipped.weapon) {
        if previous != weapon {
            world.despawn(previous);
        }
    }

    let Ok(mut weapon_entity) = world.get_entity_mut(weapon) else {
        return false;
    };
    weapon_entity.remove::<Interactable>();
    weapon_entity.insert((
        DamageSource::Weapon {
            damage: spec.damage,
            wielder: Some(player),
        },
        ChildOf(player),
        Transform::IDENTITY,
    ));

    let mut volumes = world.query::<&mut ZoneVolume>();
    for mut volume in volumes.iter_mut(world) {
        if volume.owner == weapon {
            volume.enabled = false;
        }
    }

    crate::logger::log(&format!("Player {:?} equipped '{}'", player, spec.id));

    let Ok(mut player_entity) = world.get_entity_mut(player) else {
        return false;
    };
    player_entity.insert((EquippedWeapon { weapon, spec }, ActiveOverlappingItem(None)));

    world.send_event(CosmeticCue::Sound { source: player, cue: SoundCue::Equip });
    true
}

/// Система: pickup зоны
///
/// - Pickup: эффект применяется сразу, pickup despawn (один раз)
/// - Weapon: Enter/Exit обновляют ActiveOverlappingItem игрока
pub fn resolve_item_contacts(
    mut commands: Commands,
    mut contacts: EventReader<ZoneContact>,
    mut cosmetic_cues: EventWriter<CosmeticCue>,
    items: Query<&Interactable>,
    mut players: Query<(&mut CombatStats, &mut Coins, &mut ActiveOverlappingItem), With<Player>>,
    mut consumed: Local<Vec<Entity>>,
) {
    consumed.clear();

    for contact in contacts.read() {
        if contact.kind != ZoneKind::Pickup {
            continue;
        }

        let Ok(item) = items.get(contact.owner) else {
            continue;
        };
        let Ok((mut stats, mut coins, mut overlapping)) = players.get_mut(contact.other) else {
            continue;
        };

        match (item, contact.phase) {
            (Interactable::Pickup(effect), ZonePhase::Enter) => {
                if consumed.contains(&contact.owner) || !stats.is_alive() {
                    continue;
                }
                consumed.push(contact.owner);

                match *effect {
                    PickupEffect::Coins(amount) => coins.0 += amount,
                    PickupEffect::Health(amount) => stats.heal(amount),
                }

                cosmetic_cues.write(CosmeticCue::Sound { source: contact.other, cue: SoundCue::Pickup });
                if let Ok(mut pickup) = commands.get_entity(contact.owner) {
                    pickup.despawn();
                }

                crate::logger::log(&format!("Player {:?} picked up {:?}", contact.other, effect));
            }
            (Interactable::Pickup(_), ZonePhase::Exit) => {}
            (Interactable::Weapon(_), ZonePhase::Enter) => {
                overlapping.0 = Some(contact.owner);
            }
            (Interactable::Weapon(_), ZonePhase::Exit) => {
                if overlapping.0 == Some(contact.owner) {
                    overlapping.0 = None;
                }
            }
        }
    }
}

/// Система: interact → экипировать оружие, на котором стоит игрок
///
/// `interact` одноразовый: сбрасывается здесь всегда.
pub fn equip_on_interact(
    mut commands: Commands,
    mut players: Query<(Entity, &mut PlayerInput, &ActiveOverlappingItem, &CombatStats), With<Player>>,
) {
    for (player, mut input, overlapping, stats) in players.iter_mut() {
        if !input.interact {
            continue;
        }
        input.interact = false;

        let Some(weapon) = overlapping.0 else {
            continue;
        };
        if !stats.is_alive() {
            continue;
        }

        commands.queue(move |world: &mut World| {
            equip_weapon(world, player, weapon);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn setup() -> World {
        let mut world = World::new();
        world.init_resource::<Events<ZoneContact>>();
        world.init_resource::<Events<CosmeticCue>>();
        world
    }

    fn enter(world: &World, owner: Entity, other: Entity) -> ZoneContact {
        let volume = world
            .iter_entities()
            .find(|e| e.get::<ZoneVolume>().is_some_and(|v| v.owner == owner))
            .map(|e| e.id())
            .unwrap_or(owner);
        ZoneContact { volume, kind: ZoneKind::Pickup, owner, other, phase: ZonePhase::Enter }
    }

    #[test]
    fn test_coin_and_health_pickups() {
        let mut world = setup();
        let player = world.spawn((Player, CombatStats::new(100.0, 200.0))).id();
        world.get_mut::<CombatStats>(player).unwrap().take_damage(50.0);

        let coin = spawn_pickup(&mut world, PickupEffect::Coins(3), Vec3::ZERO);
        let potion = spawn_pickup(&mut world, PickupEffect::Health(30.0), Vec3::ZERO);

        let coin_contact = enter(&world, coin, player);
        let potion_contact = enter(&world, potion, player);
        world.send_event(coin_contact);
        world.send_event(coin_contact);
        world.send_event(potion_contact);
        world.run_system_once(resolve_item_contacts).unwrap();

        assert_eq!(world.get::<Coins>(player).unwrap().0, 3);
        assert_eq!(world.get::<CombatStats>(player).unwrap().health(), 80.0);
        assert!(world.get_entity(coin).is_err());
        assert!(world.get_entity(potion).is_err());
    }

    #[test]
    fn test_equip_weapon_on_interact() {
        let mut world = setup();
        let player = world.spawn((Player, CombatStats::new(100.0, 200.0))).id();
        let old_sword = spawn_weapon(&mut world, WeaponSpec::new("rusty", 20.0), Vec3::ZERO);
        assert!(equip_weapon(&mut world, player, old_sword));

        let sword = spawn_weapon(&mut world, WeaponSpec::new("sword", 50.0), Vec3::X);
        let contact = enter(&world, sword, player);
        world.send_event(contact);
        world.run_system_once(resolve_item_contacts).unwrap();
        assert_eq!(world.get::<ActiveOverlappingItem>(player).unwrap().0, Some(sword));

        world.get_mut::<PlayerInput>(player).unwrap().interact = true;
        world.run_system_once(equip_on_interact).unwrap();

        let equipped = world.get::<EquippedWeapon>(player).unwrap();
        assert_eq!(equipped.weapon, sword);
        assert_eq!(equipped.spec.id, "sword");
        assert!(world.get_entity(old_sword).is_err());
        assert!(!world.get::<PlayerInput>(player).unwrap().interact);
        assert_eq!(world.get::<ActiveOverlappingItem>(player).unwrap().0, None);
        assert_eq!(
            *world.get::<DamageSource>(sword).unwrap(),
            DamageSource::Weapon { damage: 50.0, wielder: Some(player) }
        );
        assert!(world.get::<Interactable>(sword).is_none());

        // Все volumes оружия выключены до HitboxOn
        let mut volumes = world.query::<&ZoneVolume>();
        assert!(volumes.iter(&world).filter(|v| v.owner == sword).all(|v| !v.enabled));
    }
}
