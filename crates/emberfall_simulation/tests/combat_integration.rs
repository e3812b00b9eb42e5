//! Combat integration test
//!
//! Полный SimulationPlugin, тики через run_fixed_tick, хост эмулируется
//! отправкой ZoneEvent/AnimationSignal.
//!
//! Проверяем:
//! - Enemy FSM: aggro → combat → attack timer → attack → attack end
//! - Hitbox урон 10 по игроку, смерть врага от двух ударов мечом
//! - Retarget на ближайшего живого (ничья → первый вошедший)
//! - Combat exit отменяет атаку
//! - Stamina инварианты при спринте
//! - Event буферы не растут между тиками

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use emberfall_simulation::items::{equip_weapon, spawn_weapon};
use emberfall_simulation::scheduler::ActorTimers;
use emberfall_simulation::*;

/// Attack max delay 2.0s при 60Hz + запас
const ATTACK_WINDOW_TICKS: usize = 130;

/// Все AnimationCommand с начала теста (хост читает их через cursor)
#[derive(Resource, Default)]
struct CommandLog {
    cursor: EventCursor<AnimationCommand>,
    commands: Vec<AnimationCommand>,
}

fn create_combat_app() -> App {
    let mut app = create_headless_app(42);
    app.init_resource::<CommandLog>();
    app
}

fn step(app: &mut App) {
    let world = app.world_mut();
    assert!(run_fixed_tick(world));

    world.resource_scope(|world, mut log: Mut<CommandLog>| {
        let CommandLog { cursor, commands } = &mut *log;
        commands.extend(cursor.read(world.resource::<Events<AnimationCommand>>()).copied());
    });
}

fn step_n(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        step(app);
    }
}

fn send<E: Event>(app: &mut App, event: E) {
    app.world_mut().send_event(event);
}

fn animation_commands(app: &App) -> Vec<AnimationCommand> {
    app.world().resource::<CommandLog>().commands.clone()
}

fn played(app: &App, actor: Entity, section: MontageSection) -> usize {
    animation_commands(app)
        .iter()
        .filter(|command| {
            let AnimationCommand::PlaySection { actor: a, section: s, .. } = command;
            *a == actor && *s == section
        })
        .count()
}

fn status(app: &App, enemy: Entity) -> EnemyMovementStatus {
    *app.world().get::<EnemyMovementStatus>(enemy).unwrap()
}

fn engage(app: &mut App, enemy: EnemyHandles, player: Entity) {
    send(app, ZoneEvent::enter(enemy.aggro, player));
    send(app, ZoneEvent::enter(enemy.combat, player));
    step(app);
}

fn armed_player(app: &mut App) -> (Entity, Entity, Entity) {
    let world = app.world_mut();
    let player = spawn_player(world, Vec3::ZERO, PlayerConfig::default());
    let sword = spawn_weapon(world, WeaponSpec::new("sword", 50.0), Vec3::ZERO);
    assert!(equip_weapon(world, player, sword));

    let mut volumes = world.query::<(Entity, &ZoneVolume)>();
    let hitbox = volumes
        .iter(world)
        .find(|(_, volume)| volume.owner == sword && volume.kind == ZoneKind::Hitbox)
        .map(|(entity, _)| entity)
        .unwrap();

    (player, sword, hitbox)
}

/// Удар мечом: hitbox окно + overlap с врагом
fn sword_hit(app: &mut App, player: Entity, hitbox: Entity, target: Entity) {
    send(app, AnimationSignal::new(player, AnimationSignalKind::HitboxOn));
    step(app);
    send(app, ZoneEvent::enter(hitbox, target));
    step(app);
    send(app, ZoneEvent::exit(hitbox, target));
    send(app, AnimationSignal::new(player, AnimationSignalKind::HitboxOff));
    step(app);
}

#[test]
fn test_enemy_attack_cycle_damages_player() {
    let mut app = create_combat_app();
    let player = spawn_player(app.world_mut(), Vec3::ZERO, PlayerConfig::default());
    let enemy = spawn_enemy(app.world_mut(), Vec3::new(80.0, 0.0, 0.0), EnemyConfig::default());

    send(&mut app, ZoneEvent::enter(enemy.aggro, player));
    step(&mut app);
    assert_eq!(status(&app, enemy.actor), EnemyMovementStatus::MoveToTarget);
    assert_eq!(
        *app.world().get::<MovementCommand>(enemy.actor).unwrap(),
        MovementCommand::FollowEntity { target: player }
    );

    send(&mut app, ZoneEvent::enter(enemy.combat, player));
    step(&mut app);

    let combat = *app.world().get::<EnemyCombat>(enemy.actor).unwrap();
    assert!(combat.overlapping_combat && combat.has_valid_target);
    assert_eq!(app.world().get::<CombatTarget>(player).unwrap().get(), Some(enemy.actor));
    assert!(app.world().get::<TargetDisplay>(player).unwrap().visible);
    assert!(app.world().get::<ActorTimers>(enemy.actor).unwrap().attack.is_some());

    step_n(&mut app, ATTACK_WINDOW_TICKS);
    assert_eq!(played(&app, enemy.actor, MontageSection::Attack1), 1);
    assert_eq!(status(&app, enemy.actor), EnemyMovementStatus::Attacking);
    assert_eq!(*app.world().get::<MovementCommand>(enemy.actor).unwrap(), MovementCommand::Stop);

    // Hitbox вне окна атаки: урона нет
    send(&mut app, ZoneEvent::enter(enemy.hitbox, player));
    step(&mut app);
    assert_eq!(app.world().get::<CombatStats>(player).unwrap().health(), 100.0);

    send(&mut app, ZoneEvent::exit(enemy.hitbox, player));
    send(&mut app, AnimationSignal::new(enemy.actor, AnimationSignalKind::HitboxOn));
    step(&mut app);
    assert!(app.world().get::<ZoneVolume>(enemy.hitbox).unwrap().enabled);

    send(&mut app, ZoneEvent::enter(enemy.hitbox, player));
    step(&mut app);
    assert_eq!(app.world().get::<CombatStats>(player).unwrap().health(), 90.0);

    send(&mut app, AnimationSignal::new(enemy.actor, AnimationSignalKind::AttackEnd));
    step(&mut app);
    assert!(!app.world().get::<EnemyCombat>(enemy.actor).unwrap().attacking);
    assert!(!app.world().get::<ZoneVolume>(enemy.hitbox).unwrap().enabled);
    assert!(app.world().get::<ActorTimers>(enemy.actor).unwrap().attack.is_some());

    // Следующая атака по новому таймеру
    step_n(&mut app, ATTACK_WINDOW_TICKS);
    assert_eq!(played(&app, enemy.actor, MontageSection::Attack1), 2);
}

#[test]
fn test_combat_exit_cancels_attack() {
    let mut app = create_combat_app();
    let player = spawn_player(app.world_mut(), Vec3::ZERO, PlayerConfig::default());
    let enemy = spawn_enemy(app.world_mut(), Vec3::new(60.0, 0.0, 0.0), EnemyConfig::default());

    engage(&mut app, enemy, player);
    assert!(app.world().get::<ActorTimers>(enemy.actor).unwrap().attack.is_some());

    send(&mut app, ZoneEvent::exit(enemy.combat, player));
    step(&mut app);

    assert!(app.world().get::<ActorTimers>(enemy.actor).unwrap().attack.is_none());
    assert_eq!(status(&app, enemy.actor), EnemyMovementStatus::MoveToTarget);
    assert_eq!(app.world().get::<CombatTarget>(player).unwrap().get(), None);
    assert!(!app.world().get::<TargetDisplay>(player).unwrap().visible);
    assert!(app.world().get::<EngagedEnemies>(player).unwrap().enemies.is_empty());

    step_n(&mut app, ATTACK_WINDOW_TICKS * 2);
    assert_eq!(played(&app, enemy.actor, MontageSection::Attack1), 0);

    // Aggro exit → Idle + Stop
    send(&mut app, ZoneEvent::exit(enemy.aggro, player));
    step(&mut app);
    assert_eq!(status(&app, enemy.actor), EnemyMovementStatus::Idle);
    assert_eq!(*app.world().get::<MovementCommand>(enemy.actor).unwrap(), MovementCommand::Stop);
}

#[test]
fn test_weapon_kills_enemy_and_retargets_closest() {
    let mut app = create_combat_app();
    let (player, _sword, hitbox) = armed_player(&mut app);

    let far = spawn_enemy(app.world_mut(), Vec3::new(10.0, 0.0, 0.0), EnemyConfig::default());
    let first_near = spawn_enemy(app.world_mut(), Vec3::new(0.0, 0.0, 5.0), EnemyConfig::default());
    let second_near = spawn_enemy(app.world_mut(), Vec3::new(-5.0, 0.0, 0.0), EnemyConfig::default());

    for enemy in [far, first_near, second_near] {
        send(&mut app, ZoneEvent::enter(enemy.combat, player));
    }
    step(&mut app);

    // [10, 5, 5] → первый из равных
    assert_eq!(app.world().get::<CombatTarget>(player).unwrap().get(), Some(first_near.actor));

    sword_hit(&mut app, player, hitbox, first_near.actor);
    assert_eq!(app.world().get::<CombatStats>(first_near.actor).unwrap().health(), 50.0);

    sword_hit(&mut app, player, hitbox, first_near.actor);
    assert_eq!(app.world().get::<CombatStats>(first_near.actor).unwrap().health(), 0.0);
    assert_eq!(status(&app, first_near.actor), EnemyMovementStatus::Dead);
    assert_eq!(played(&app, first_near.actor, MontageSection::Death), 1);

    // Все volumes мёртвого выключены, таймеры отменены
    let mut volumes = app.world_mut().query::<&ZoneVolume>();
    assert!(volumes
        .iter(app.world())
        .filter(|volume| volume.owner == first_near.actor)
        .all(|volume| !volume.enabled));
    assert_eq!(
        *app.world().get::<ActorTimers>(first_near.actor).unwrap(),
        ActorTimers::default()
    );

    assert_eq!(app.world().get::<CombatTarget>(player).unwrap().get(), Some(second_near.actor));
    assert_eq!(
        app.world().get::<EngagedEnemies>(player).unwrap().enemies,
        vec![far.actor, second_near.actor]
    );

    // Повторный удар по мертвому: ни урона, ни второй смерти
    sword_hit(&mut app, player, hitbox, first_near.actor);
    assert_eq!(played(&app, first_near.actor, MontageSection::Death), 1);

    // Death end → freeze, через death_delay (3s) despawn
    send(&mut app, AnimationSignal::new(first_near.actor, AnimationSignalKind::DeathEnd));
    step(&mut app);
    assert!(app.world().get::<AnimationFrozen>(first_near.actor).is_some());

    step_n(&mut app, 170);
    assert!(app.world().get_entity(first_near.actor).is_ok());
    step_n(&mut app, 20);
    assert!(app.world().get_entity(first_near.actor).is_err());
    assert!(app.world().get_entity(first_near.combat).is_err());
}

#[test]
fn test_player_death_stops_enemy_attacks() {
    let mut app = create_combat_app();
    let player = spawn_player(app.world_mut(), Vec3::ZERO, PlayerConfig::default());
    let config = EnemyConfig {
        damage: 60.0,
        ..Default::default()
    };
    let enemy = spawn_enemy(app.world_mut(), Vec3::new(50.0, 0.0, 0.0), config);

    engage(&mut app, enemy, player);

    send(&mut app, AnimationSignal::new(enemy.actor, AnimationSignalKind::HitboxOn));
    step(&mut app);
    for _ in 0..2 {
        send(&mut app, ZoneEvent::enter(enemy.hitbox, player));
        step(&mut app);
        send(&mut app, ZoneEvent::exit(enemy.hitbox, player));
        step(&mut app);
    }

    assert_eq!(app.world().get::<CombatStats>(player).unwrap().health(), 0.0);
    assert!(app.world().get::<MovementState>(player).unwrap().is_dead());
    assert_eq!(played(&app, player, MontageSection::Death), 1);
    assert!(!app.world().get::<EnemyCombat>(enemy.actor).unwrap().has_valid_target);

    let attacks_before = played(&app, enemy.actor, MontageSection::Attack1);
    step_n(&mut app, ATTACK_WINDOW_TICKS * 2);
    assert_eq!(played(&app, enemy.actor, MontageSection::Attack1), attacks_before);

    // Мёртвый игрок не атакует и не спринтует
    let world = app.world_mut();
    let mut input = world.get_mut::<PlayerInput>(player).unwrap();
    input.light_attack_held = true;
    input.sprint_held = true;
    input.moving_forward = true;
    step(&mut app);
    assert_eq!(played(&app, player, MontageSection::Attack1), 0);
    assert_eq!(
        app.world().get::<MovementState>(player).unwrap().movement(),
        MovementStatus::Dead
    );
}

#[test]
fn test_sprint_exhaustion_over_ticks() {
    let mut app = create_combat_app();
    let player = spawn_player(app.world_mut(), Vec3::ZERO, PlayerConfig::default());

    {
        let mut input = app.world_mut().get_mut::<PlayerInput>(player).unwrap();
        input.sprint_held = true;
        input.moving_forward = true;
    }

    step_n(&mut app, 60);
    let stats = *app.world().get::<CombatStats>(player).unwrap();
    assert!((stats.stamina() - 150.0).abs() < 0.1, "stamina = {}", stats.stamina());
    assert_eq!(app.world().get::<MovementSpeed>(player).unwrap().speed, 800.0);

    // 300 тиков = 5s спринта: давно исчерпан
    for _ in 0..240 {
        step(&mut app);
        let stats = app.world().get::<CombatStats>(player).unwrap();
        assert!(stats.stamina() >= 0.0 && stats.stamina() <= stats.max_stamina());
    }

    let state = *app.world().get::<MovementState>(player).unwrap();
    assert_eq!(state.stamina_status(), StaminaStatus::Exhausted);
    assert_eq!(state.movement(), MovementStatus::Normal);
    assert_eq!(app.world().get::<CombatStats>(player).unwrap().stamina(), 0.0);
    assert_eq!(app.world().get::<MovementSpeed>(player).unwrap().speed, 350.0);

    app.world_mut().get_mut::<PlayerInput>(player).unwrap().sprint_held = false;
    step(&mut app);
    assert_eq!(
        app.world().get::<MovementState>(player).unwrap().stamina_status(),
        StaminaStatus::Recovering
    );
}

#[test]
fn test_pickups_through_zone_events() {
    let mut app = create_combat_app();
    let player = spawn_player(app.world_mut(), Vec3::ZERO, PlayerConfig::default());
    let coin = items::spawn_pickup(app.world_mut(), PickupEffect::Coins(5), Vec3::X);

    let mut volumes = app.world_mut().query::<(Entity, &ZoneVolume)>();
    let coin_zone = volumes
        .iter(app.world())
        .find(|(_, volume)| volume.owner == coin)
        .map(|(entity, _)| entity)
        .unwrap();

    send(&mut app, ZoneEvent::enter(coin_zone, player));
    step(&mut app);

    assert_eq!(app.world().get::<Coins>(player).unwrap().0, 5);
    assert!(app.world().get_entity(coin).is_err());
}

#[test]
fn test_event_buffers_stay_bounded() {
    let mut app = create_combat_app();
    let player = spawn_player(app.world_mut(), Vec3::ZERO, PlayerConfig::default());
    let enemy = spawn_enemy(app.world_mut(), Vec3::new(80.0, 0.0, 0.0), EnemyConfig::default());

    for tick in 0..1000 {
        if tick % 2 == 0 {
            send(&mut app, ZoneEvent::enter(enemy.aggro, player));
        } else {
            send(&mut app, ZoneEvent::exit(enemy.aggro, player));
        }
        step(&mut app);
    }

    let world = app.world();
    assert!(world.resource::<Events<ZoneEvent>>().len() <= 2);
    assert!(world.resource::<Events<proximity::ZoneContact>>().len() <= 2);
    assert!(world.resource::<Events<RetargetRequested>>().len() <= 2);

    // Последний exit всё равно обработан
    assert_eq!(status(&app, enemy.actor), EnemyMovementStatus::Idle);
}

#[test]
fn test_save_taken_after_death_does_not_revive() {
    let mut app = create_combat_app();
    let player = spawn_player(app.world_mut(), Vec3::ZERO, PlayerConfig::default());
    let config = EnemyConfig {
        damage: 200.0,
        ..Default::default()
    };
    let enemy = spawn_enemy(app.world_mut(), Vec3::new(50.0, 0.0, 0.0), config);

    engage(&mut app, enemy, player);
    send(&mut app, AnimationSignal::new(enemy.actor, AnimationSignalKind::HitboxOn));
    step(&mut app);
    send(&mut app, ZoneEvent::enter(enemy.hitbox, player));
    step(&mut app);
    assert!(app.world().get::<MovementState>(player).unwrap().is_dead());

    let snapshot = capture_snapshot(app.world(), player).unwrap();
    assert_eq!(snapshot.health, 0.0);
    assert!(!restore_snapshot(app.world_mut(), player, &snapshot, RestoreOptions::default()));

    send(&mut app, ZoneEvent::exit(enemy.hitbox, player));
    step(&mut app);
    send(&mut app, ZoneEvent::enter(enemy.hitbox, player));
    step(&mut app);

    assert_eq!(app.world().get::<CombatStats>(player).unwrap().health(), 0.0);
    assert!(app.world().get::<MovementState>(player).unwrap().is_dead());
    assert_eq!(played(&app, player, MontageSection::Death), 1);
}
