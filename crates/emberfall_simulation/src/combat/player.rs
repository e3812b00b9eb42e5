//! Player combat: attack input, animation notifies, смерть игрока.

use bevy::prelude::*;

use crate::ai::EnemyCombat;
use crate::animation::{AnimationCommand, AnimationFrozen, AnimationSignal, AnimationSignalKind, MontageSection};
use crate::combat::EntityDied;
use crate::components::{Enemy, Player, PlayerCombat, PlayerInput};
use crate::cosmetics::{CosmeticCue, SoundCue};
use crate::items::EquippedWeapon;
use crate::movement::MovementState;
use crate::proximity::{set_owner_volumes_enabled, ZoneKind, ZoneVolume};

/// Light attack montage rate
pub const LIGHT_ATTACK_RATE: f32 = 0.9;
/// Heavy attack montage rate
pub const HEAVY_ATTACK_RATE: f32 = 1.0;

/// Система: attack input → attack montage
///
/// Атака стартует, если клавиша зажата, игрок не атакует, жив, не в
/// воздухе и держит оружие. Light приоритетнее heavy.
/// Зажатая клавиша запускает следующую атаку на тике после AttackEnd.
pub fn player_attack_input(
    mut players: Query<(Entity, &PlayerInput, &mut PlayerCombat, &MovementState, Option<&EquippedWeapon>), With<Player>>,
    mut animation_commands: EventWriter<AnimationCommand>,
) {
    for (player, input, mut combat, state, weapon) in players.iter_mut() {
        if !input.attack_held() || combat.attacking || state.is_dead() || input.airborne {
            continue;
        }
        if weapon.is_none() {
            continue;
        }

        let (section, rate) = if input.light_attack_held {
            (MontageSection::Attack1, LIGHT_ATTACK_RATE)
        } else {
            (MontageSection::Attack2, HEAVY_ATTACK_RATE)
        };

        combat.attacking = true;
        combat.interp_to_enemy = true;
        animation_commands.write(AnimationCommand::play(player, section, rate));
    }
}

/// Система: animation notifies игрока
///
/// - AttackEnd → attacking/interp сброшены, hitbox оружия off
/// - DeathEnd → анимация заморожена (до load)
/// - HitboxOn/HitboxOff → окно урона экипированного оружия
pub fn player_animation_signals(
    mut commands: Commands,
    mut signals: EventReader<AnimationSignal>,
    mut cosmetic_cues: EventWriter<CosmeticCue>,
    mut players: Query<(&mut PlayerCombat, &MovementState, Option<&EquippedWeapon>), With<Player>>,
    mut volumes: Query<&mut ZoneVolume>,
) {
    for signal in signals.read() {
        let player = signal.actor;
        let Ok((mut combat, state, weapon)) = players.get_mut(player) else {
            continue;
        };
        let weapon = weapon.map(|equipped| equipped.weapon);

        match signal.kind {
            AnimationSignalKind::AttackEnd => {
                combat.attacking = false;
                combat.interp_to_enemy = false;
                if let Some(weapon) = weapon {
                    set_owner_volumes_enabled(weapon, Some(ZoneKind::Hitbox), false, &mut volumes);
                }
            }
            AnimationSignalKind::DeathEnd => {
                if state.is_dead() {
                    commands.entity(player).insert(AnimationFrozen);
                }
            }
            AnimationSignalKind::HitboxOn => {
                let Some(weapon) = weapon else {
                    continue;
                };
                if state.is_dead() {
                    continue;
                }
                set_owner_volumes_enabled(weapon, Some(ZoneKind::Hitbox), true, &mut volumes);
                cosmetic_cues.write(CosmeticCue::Sound { source: weapon, cue: SoundCue::Swing });
            }
            AnimationSignalKind::HitboxOff => {
                if let Some(weapon) = weapon {
                    set_owner_volumes_enabled(weapon, Some(ZoneKind::Hitbox), false, &mut volumes);
                }
            }
        }
    }
}

/// Система: EntityDied → player Dead
///
/// Death montage и MovementStatus::Dead ровно один раз. Враги, которые
/// держали игрока целью, теряют has_valid_target (таймеры атак дальше
/// срабатывают вхолостую).
pub fn player_death(
    mut died_events: EventReader<EntityDied>,
    mut animation_commands: EventWriter<AnimationCommand>,
    mut players: Query<(&mut MovementState, &mut PlayerCombat, Option<&EquippedWeapon>), With<Player>>,
    mut enemies: Query<&mut EnemyCombat, With<Enemy>>,
    mut volumes: Query<&mut ZoneVolume>,
) {
    for event in died_events.read() {
        let player = event.entity;
        let Ok((mut state, mut combat, weapon)) = players.get_mut(player) else {
            continue;
        };

        if !state.force_dead() {
            continue;
        }

        combat.attacking = false;
        combat.interp_to_enemy = false;
        if let Some(equipped) = weapon {
            set_owner_volumes_enabled(equipped.weapon, Some(ZoneKind::Hitbox), false, &mut volumes);
        }

        animation_commands.write(AnimationCommand::play(player, MontageSection::Death, 1.0));

        for mut enemy_combat in enemies.iter_mut() {
            if enemy_combat.targets(player) {
                enemy_combat.has_valid_target = false;
            }
        }

        crate::logger::log_info(&format!("Player {:?} died (killer: {:?})", player, event.killer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn setup() -> World {
        let mut world = World::new();
        world.init_resource::<Events<AnimationCommand>>();
        world.init_resource::<Events<AnimationSignal>>();
        world.init_resource::<Events<CosmeticCue>>();
        world.init_resource::<Events<EntityDied>>();
        world
    }

    fn animation_commands(world: &World) -> Vec<AnimationCommand> {
        world
            .resource::<Events<AnimationCommand>>()
            .iter_current_update_events()
            .copied()
            .collect()
    }

    fn armed_player(world: &mut World, input: PlayerInput) -> (Entity, Entity) {
        let player = world.spawn((Player, input)).id();
        let weapon = world.spawn_empty().id();
        let hitbox = world
            .spawn(ZoneVolume::new(ZoneKind::Hitbox, weapon, 40.0).disabled())
            .id();
        world.entity_mut(player).insert(EquippedWeapon {
            weapon,
            spec: crate::items::WeaponSpec::new("sword", 50.0),
        });
        (player, hitbox)
    }

    #[test]
    fn test_light_attack_plays_attack_1() {
        let mut world = setup();
        let (player, _) = armed_player(
            &mut world,
            PlayerInput { light_attack_held: true, heavy_attack_held: true, ..Default::default() },
        );

        world.run_system_once(player_attack_input).unwrap();

        assert!(world.get::<PlayerCombat>(player).unwrap().attacking);
        assert_eq!(
            animation_commands(&world),
            vec![AnimationCommand::play(player, MontageSection::Attack1, LIGHT_ATTACK_RATE)]
        );

        // Уже атакует → вторая атака не стартует
        world.run_system_once(player_attack_input).unwrap();
        assert_eq!(animation_commands(&world).len(), 1);
    }

    #[test]
    fn test_no_attack_without_weapon_or_in_air() {
        let mut world = setup();
        let unarmed = world
            .spawn((Player, PlayerInput { heavy_attack_held: true, ..Default::default() }))
            .id();
        let (airborne, _) = armed_player(
            &mut world,
            PlayerInput { heavy_attack_held: true, airborne: true, ..Default::default() },
        );

        world.run_system_once(player_attack_input).unwrap();

        assert!(!world.get::<PlayerCombat>(unarmed).unwrap().attacking);
        assert!(!world.get::<PlayerCombat>(airborne).unwrap().attacking);
        assert!(animation_commands(&world).is_empty());
    }

    #[test]
    fn test_hitbox_window_and_attack_end() {
        let mut world = setup();
        let (player, hitbox) = armed_player(&mut world, PlayerInput::default());
        world.get_mut::<PlayerCombat>(player).unwrap().attacking = true;

        world.send_event(AnimationSignal::new(player, AnimationSignalKind::HitboxOn));
        world.run_system_once(player_animation_signals).unwrap();
        assert!(world.get::<ZoneVolume>(hitbox).unwrap().enabled);

        world.send_event(AnimationSignal::new(player, AnimationSignalKind::AttackEnd));
        world.run_system_once(player_animation_signals).unwrap();
        assert!(!world.get::<ZoneVolume>(hitbox).unwrap().enabled);
        assert_eq!(*world.get::<PlayerCombat>(player).unwrap(), PlayerCombat::default());
    }

    #[test]
    fn test_player_death_once_and_invalidates_enemies() {
        let mut world = setup();
        let player = world.spawn(Player).id();
        let enemy = world
            .spawn((
                Enemy,
                EnemyCombat {
                    target: Some(player),
                    has_valid_target: true,
                    overlapping_combat: true,
                    ..Default::default()
                },
            ))
            .id();

        world.send_event(EntityDied { entity: player, killer: Some(enemy) });
        world.send_event(EntityDied { entity: player, killer: Some(enemy) });
        world.run_system_once(player_death).unwrap();

        assert!(world.get::<MovementState>(player).unwrap().is_dead());
        assert!(!world.get::<EnemyCombat>(enemy).unwrap().has_valid_target);
        assert_eq!(
            animation_commands(&world),
            vec![AnimationCommand::play(player, MontageSection::Death, 1.0)]
        );

        world.send_event(AnimationSignal::new(player, AnimationSignalKind::DeathEnd));
        world.run_system_once(player_animation_signals).unwrap();
        assert!(world.get::<AnimationFrozen>(player).is_some());
    }
}
