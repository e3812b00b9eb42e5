//! Headless дуэль Emberfall
//!
//! Скриптовый "хост" вместо движка: на каждую AnimationCommand отвечает
//! notify'ями (hitbox окно, конец атаки, конец смерти) и overlap
//! событиями hitbox'а. Игрок с мечом держит light attack, враг атакует
//! по своим таймерам. Прогон детерминирован (seed 42).

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use emberfall_simulation::items::{equip_weapon, spawn_weapon};
use emberfall_simulation::*;

const MAX_TICKS: u64 = 3000;

/// Действие скриптового хоста
#[derive(Debug, Clone, Copy)]
enum HostAction {
    Signal(AnimationSignal),
    Zone(ZoneEvent),
}

fn main() {
    let seed = 42;
    println!("Starting Emberfall headless duel (seed: {})", seed);

    let mut app = create_headless_app(seed);
    let world = app.world_mut();

    world.resource_mut::<WeaponCatalog>().insert(WeaponSpec::new("sword", 50.0));

    let player = spawn_player(world, Vec3::ZERO, PlayerConfig::default());
    let sword = spawn_weapon(world, WeaponSpec::new("sword", 50.0), Vec3::ZERO);
    equip_weapon(world, player, sword);

    let enemy = spawn_enemy(world, Vec3::new(80.0, 0.0, 0.0), EnemyConfig::default());
    let sword_hitbox = volume_of(world, sword, ZoneKind::Hitbox);

    if let Some(mut input) = world.get_mut::<PlayerInput>(player) {
        input.light_attack_held = true;
    }

    world.send_event(ZoneEvent::enter(enemy.aggro, player));
    world.send_event(ZoneEvent::enter(enemy.combat, player));

    let mut cursor: EventCursor<AnimationCommand> = world.resource::<Events<AnimationCommand>>().get_cursor();
    let mut pending: Vec<(u64, HostAction)> = Vec::new();

    for tick in 0..MAX_TICKS {
        let world = app.world_mut();

        // Хост: отправить созревшие действия
        let (due, later): (Vec<_>, Vec<_>) = pending.drain(..).partition(|(at, _)| *at <= tick);
        pending = later;
        for (_, action) in due {
            match action {
                HostAction::Signal(signal) => {
                    world.send_event(signal);
                }
                HostAction::Zone(event) => {
                    world.send_event(event);
                }
            }
        }

        if !run_fixed_tick(world) {
            log_error("FixedUpdate schedule missing");
            return;
        }

        // Хост: реакция на новые animation команды
        let commands: Vec<AnimationCommand> = cursor
            .read(world.resource::<Events<AnimationCommand>>())
            .copied()
            .collect();

        for command in commands {
            let AnimationCommand::PlaySection { actor, section, .. } = command;
            match section {
                MontageSection::Attack1 | MontageSection::Attack2 => {
                    let (hitbox, victim) = if actor == player {
                        (sword_hitbox, enemy.actor)
                    } else {
                        (enemy.hitbox, player)
                    };
                    pending.push((tick + 10, HostAction::Signal(AnimationSignal::new(actor, AnimationSignalKind::HitboxOn))));
                    pending.push((tick + 12, HostAction::Zone(ZoneEvent::enter(hitbox, victim))));
                    pending.push((tick + 14, HostAction::Zone(ZoneEvent::exit(hitbox, victim))));
                    pending.push((tick + 16, HostAction::Signal(AnimationSignal::new(actor, AnimationSignalKind::HitboxOff))));
                    pending.push((tick + 40, HostAction::Signal(AnimationSignal::new(actor, AnimationSignalKind::AttackEnd))));
                }
                MontageSection::Death => {
                    pending.push((tick + 60, HostAction::Signal(AnimationSignal::new(actor, AnimationSignalKind::DeathEnd))));
                }
            }
        }

        if tick % 100 == 0 {
            print_status(world, tick, player, enemy.actor);
        }

        if world.get_entity(enemy.actor).is_err() {
            println!("Tick {}: enemy despawned", tick);
            break;
        }
    }

    let world = app.world_mut();
    print_status(world, MAX_TICKS, player, enemy.actor);

    match capture_snapshot(world, player) {
        Some(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("Player snapshot:\n{}", json),
            Err(error) => log_error(&format!("Snapshot serialization failed: {}", error)),
        },
        None => log_error("Player missing at the end of the duel"),
    }

    println!("Simulation complete!");
}

fn volume_of(world: &mut World, owner: Entity, kind: ZoneKind) -> Entity {
    let mut volumes = world.query::<(Entity, &ZoneVolume)>();
    volumes
        .iter(world)
        .find(|(_, volume)| volume.owner == owner && volume.kind == kind)
        .map(|(entity, _)| entity)
        .unwrap_or(Entity::PLACEHOLDER)
}

fn print_status(world: &World, tick: u64, player: Entity, enemy: Entity) {
    let player_health = world.get::<CombatStats>(player).map(|stats| stats.health());
    let enemy_health = world.get::<CombatStats>(enemy).map(|stats| stats.health());
    let enemy_status = world.get::<EnemyMovementStatus>(enemy).copied();

    println!(
        "Tick {}: player health {:?}, enemy health {:?} ({:?})",
        tick, player_health, enemy_health, enemy_status
    );
}
