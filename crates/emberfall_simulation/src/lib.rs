//! Emberfall Simulation Core
//!
//! ECS-симуляция боя на Bevy 0.16 (headless)
//!
//! Хост (движок) отвечает за рендер, ассеты, физику движения, input
//! mapping и UI. Core общается с ним событиями:
//! - in: ZoneEvent (overlap), AnimationSignal (notify), PlayerInput
//! - out: AnimationCommand, CosmeticCue, MovementCommand/MovementSpeed

use bevy::ecs::component::Tick;
use bevy::ecs::event::EventRegistry;
use bevy::ecs::schedule::ExecutorKind;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod animation;
pub mod combat;
pub mod components;
pub mod config;
pub mod cosmetics;
pub mod items;
pub mod logger;
pub mod movement;
pub mod persistence;
pub mod proximity;
pub mod scheduler;

// Re-export базовых типов для удобства
pub use ai::{EnemyCombat, EnemyMovementStatus};
pub use animation::{AnimationCommand, AnimationFrozen, AnimationSignal, AnimationSignalKind, MontageSection};
pub use combat::{
    apply_damage, select_closest_target, CombatPlugin, CombatTarget, DamageDealt, DamageRequest, DamageSource,
    EngagedEnemies, EntityDied, RetargetRequested, TargetDisplay,
};
pub use components::*;
pub use config::{EnemyConfig, PlayerConfig, SimulationConfig};
pub use cosmetics::{CosmeticCue, SoundCue};
pub use items::{Interactable, PickupEffect, WeaponCatalog, WeaponSpec};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use movement::{MovementState, MovementStatus, StaminaStatus};
pub use persistence::{capture_snapshot, restore_snapshot, CharacterSnapshot, RestoreOptions, SaveSlot};
pub use proximity::{ZoneEvent, ZoneKind, ZoneVolume};
pub use scheduler::{FixedTickCounter, Scheduler};

/// Радиус hitbox'а врага (оружие в руке)
pub const ENEMY_HITBOX_RADIUS: f32 = 30.0;

/// Главный plugin симуляции
///
/// FixedUpdate chain (один проход = один тик, строгий порядок):
/// 1. tick counter
/// 2. player movement/stamina (ДО AI)
/// 3. ZoneEvent → ZoneContact
/// 4. aggro/combat зоны врагов
/// 5. hitbox урон, pickups, экипировка
/// 6. таймеры (attack/death)
/// 7. player attack input, animation notifies
/// 8. смерть врагов и игрока
/// 9. retarget, health bar, поворот к цели
///
/// Retarget идёт после всех мест, которые инвалидируют CombatTarget.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        app.insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            .insert_resource(DeterministicRng::new(config.seed))
            .insert_resource(config)
            .init_resource::<Scheduler>()
            .init_resource::<FixedTickCounter>()
            .init_resource::<WeaponCatalog>()
            .add_event::<proximity::ZoneEvent>()
            .add_event::<proximity::ZoneContact>()
            .add_event::<scheduler::TimerFired>()
            .add_event::<AnimationCommand>()
            .add_event::<AnimationSignal>()
            .add_event::<CosmeticCue>()
            .add_plugins(CombatPlugin);

        // Детерминизм: один поток, порядок = порядок chain
        app.edit_schedule(FixedUpdate, |schedule| {
            schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        });

        app.add_systems(
            FixedUpdate,
            (
                scheduler::increment_tick_counter,
                movement::update_player_movement,
                proximity::dispatch_zone_events,
                (ai::enemy_aggro_contacts, ai::enemy_combat_contacts).chain(),
                (
                    combat::resolve_hitbox_contacts,
                    items::resolve_item_contacts,
                    items::equip_on_interact,
                )
                    .chain(),
                (scheduler::tick_scheduler, ai::dispatch_enemy_timers).chain(),
                (
                    combat::player_attack_input,
                    combat::player_animation_signals,
                    ai::enemy_animation_signals,
                )
                    .chain(),
                (ai::enemy_death, combat::player_death).chain(),
                (
                    combat::retarget_players,
                    combat::track_target_display,
                    combat::interp_to_combat_target,
                )
                    .chain(),
            )
                .chain(),
        );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(SimulationConfig {
            seed,
            ..Default::default()
        })
        .add_plugins(SimulationPlugin);

    app
}

/// Один детерминированный тик: Time<Fixed> += timestep, FixedUpdate,
/// затем ротация event буферов
///
/// Не зависит от wall clock (тесты, headless прогоны, replay).
/// `app.update()` не вызывается, поэтому буферы крутим сами (как `First`):
/// событие живёт два тика, хост читает вывод через `EventCursor`.
/// false — SimulationPlugin не добавлен.
pub fn run_fixed_tick(world: &mut World) -> bool {
    let Some(mut time) = world.get_resource_mut::<Time<Fixed>>() else {
        return false;
    };
    let timestep = time.timestep();
    time.advance_by(timestep);

    if world.try_run_schedule(FixedUpdate).is_err() {
        return false;
    }

    rotate_event_buffers(world);
    true
}

/// Change tick последней ротации event буферов
#[derive(Resource, Debug, Clone, Copy)]
struct EventRotationTick(Tick);

/// Double-buffer swap всех зарегистрированных Events<T>
fn rotate_event_buffers(world: &mut World) {
    let last_change_tick = world
        .get_resource::<EventRotationTick>()
        .map(|rotation| rotation.0)
        .unwrap_or(Tick::new(0));

    if world.contains_resource::<EventRegistry>() {
        world.resource_scope(|world, mut registry: Mut<EventRegistry>| {
            registry.run_updates(world, last_change_tick);
        });
    }

    let change_tick = world.change_tick();
    world.insert_resource(EventRotationTick(change_tick));
}

/// Spawn игрока со stats из конфига
pub fn spawn_player(world: &mut World, position: Vec3, config: PlayerConfig) -> Entity {
    world
        .spawn((
            Player,
            Transform::from_translation(position),
            CombatStats::new(config.max_health, config.max_stamina),
            MovementSpeed { speed: config.running_speed },
            config,
        ))
        .id()
}

/// Entity врага и его volumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyHandles {
    pub actor: Entity,
    pub aggro: Entity,
    pub combat: Entity,
    pub hitbox: Entity,
}

/// Spawn врага: actor + aggro/combat/hitbox volumes (children)
///
/// Hitbox выключен до HitboxOn notify.
pub fn spawn_enemy(world: &mut World, position: Vec3, config: EnemyConfig) -> EnemyHandles {
    let actor = world
        .spawn((
            Enemy,
            Transform::from_translation(position),
            CombatStats::new(config.max_health, 0.0),
            DamageSource::Enemy { damage: config.damage },
            config.clone(),
        ))
        .id();

    let aggro = world
        .spawn((ZoneVolume::new(ZoneKind::Aggro, actor, config.aggro_radius), ChildOf(actor)))
        .id();
    let combat = world
        .spawn((ZoneVolume::new(ZoneKind::Combat, actor, config.combat_radius), ChildOf(actor)))
        .id();
    let hitbox = world
        .spawn((
            ZoneVolume::new(ZoneKind::Hitbox, actor, ENEMY_HITBOX_RADIUS).disabled(),
            ChildOf(actor),
        ))
        .id();

    EnemyHandles { actor, aggro, combat, hitbox }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
