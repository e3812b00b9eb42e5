//! Targeting link: player → ближайший вовлечённый враг
//!
//! Ownership правило для CombatTarget:
//! - invalidation sites (combat exit, aggro exit, death) пишут только None
//! - непустую цель пишет только `retarget_players`
//! - retarget запускается в chain ПОСЛЕ всех invalidation sites

use bevy::prelude::*;

use crate::ai::EnemyMovementStatus;
use crate::components::{CombatStats, Enemy, Player, PlayerCombat};
use crate::config::PlayerConfig;

/// Враги, в чьей combat зоне сейчас стоит игрок (порядок входа)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EngagedEnemies {
    pub enemies: Vec<Entity>,
}

impl EngagedEnemies {
    /// false если уже был в списке
    pub fn add(&mut self, enemy: Entity) -> bool {
        if self.enemies.contains(&enemy) {
            return false;
        }
        self.enemies.push(enemy);
        true
    }

    pub fn remove(&mut self, enemy: Entity) -> bool {
        let before = self.enemies.len();
        self.enemies.retain(|e| *e != enemy);
        self.enemies.len() != before
    }

    pub fn contains(&self, enemy: Entity) -> bool {
        self.enemies.contains(&enemy)
    }
}

/// Текущая цель игрока (non-owning handle, None = нет цели)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct CombatTarget(pub Option<Entity>);

impl CombatTarget {
    pub fn get(&self) -> Option<Entity> {
        self.0
    }

    /// Очистить, если цель == enemy. true если очистили
    pub fn clear_if(&mut self, enemy: Entity) -> bool {
        if self.0 == Some(enemy) {
            self.0 = None;
            true
        } else {
            false
        }
    }
}

/// Health bar цели (UI хоста читает visible, location, заполненность)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TargetDisplay {
    pub visible: bool,
    pub location: Vec3,
    /// health / max_health цели, 0..=1
    pub health_percent: f32,
}

/// Запрос пересчитать цель игрока
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetargetRequested {
    pub player: Entity,
}

/// Ближайший кандидат к origin
///
/// Ничья → побеждает первый в порядке итерации (строгое `<`).
pub fn select_closest_target<I>(candidates: I, origin: Vec3) -> Option<Entity>
where
    I: IntoIterator<Item = (Entity, Vec3)>,
{
    let mut closest: Option<(Entity, f32)> = None;

    for (entity, position) in candidates {
        let distance = position.distance(origin);
        match closest {
            Some((_, min_distance)) if distance >= min_distance => {}
            _ => closest = Some((entity, distance)),
        }
    }

    closest.map(|(entity, _)| entity)
}

type LiveEnemyQuery<'w, 's> =
    Query<'w, 's, (&'static Transform, &'static CombatStats, &'static EnemyMovementStatus), With<Enemy>>;

fn live_enemy(enemies: &LiveEnemyQuery, enemy: Entity) -> Option<(Vec3, f32)> {
    let (transform, stats, status) = enemies.get(enemy).ok()?;
    if *status == EnemyMovementStatus::Dead || !stats.is_alive() {
        return None;
    }
    Some((transform.translation, stats.health_percent()))
}

fn live_enemy_position(enemies: &LiveEnemyQuery, enemy: Entity) -> Option<Vec3> {
    live_enemy(enemies, enemy).map(|(position, _)| position)
}

/// Система: RetargetRequested → ближайший живой враг из EngagedEnemies
pub fn retarget_players(
    mut requests: EventReader<RetargetRequested>,
    mut players: Query<
        (&Transform, &mut EngagedEnemies, &mut CombatTarget, &mut TargetDisplay),
        (With<Player>, Without<Enemy>),
    >,
    enemies: LiveEnemyQuery,
) {
    let mut pending: Vec<Entity> = Vec::new();
    for request in requests.read() {
        if !pending.contains(&request.player) {
            pending.push(request.player);
        }
    }

    for player in pending {
        let Ok((transform, mut engaged, mut target, mut display)) = players.get_mut(player) else {
            continue;
        };

        engaged.enemies.retain(|enemy| live_enemy_position(&enemies, *enemy).is_some());

        let candidates = engaged
            .enemies
            .iter()
            .filter_map(|enemy| live_enemy_position(&enemies, *enemy).map(|pos| (*enemy, pos)));

        match select_closest_target(candidates, transform.translation) {
            Some(enemy) => {
                target.0 = Some(enemy);
                display.visible = true;
                if let Some((location, health_percent)) = live_enemy(&enemies, enemy) {
                    display.location = location;
                    display.health_percent = health_percent;
                }
            }
            None => {
                target.0 = None;
                display.visible = false;
            }
        }
    }
}

/// Система: health bar следует за целью каждый тик
///
/// Цель пропала без события (despawn) → очищаем и прячем.
pub fn track_target_display(
    mut players: Query<(&mut CombatTarget, &mut TargetDisplay), With<Player>>,
    enemies: LiveEnemyQuery,
) {
    for (mut target, mut display) in players.iter_mut() {
        let Some(enemy) = target.get() else {
            if display.visible {
                display.visible = false;
            }
            continue;
        };

        match live_enemy(&enemies, enemy) {
            Some((location, health_percent)) => {
                display.visible = true;
                display.location = location;
                display.health_percent = health_percent;
            }
            None => {
                target.0 = None;
                display.visible = false;
            }
        }
    }
}

/// Система: поворот игрока к цели во время атаки (yaw only)
pub fn interp_to_combat_target(
    mut players: Query<
        (&mut Transform, &PlayerCombat, &CombatTarget, &PlayerConfig),
        (With<Player>, Without<Enemy>),
    >,
    enemies: Query<&Transform, (With<Enemy>, Without<Player>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, combat, target, config) in players.iter_mut() {
        if !combat.interp_to_enemy {
            continue;
        }
        let Some(enemy) = target.get() else {
            continue;
        };
        let Ok(enemy_transform) = enemies.get(enemy) else {
            continue;
        };

        let mut direction = enemy_transform.translation - transform.translation;
        direction.y = 0.0;
        if direction.length_squared() < 1e-6 {
            continue;
        }

        let look = Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation;
        let t = (config.interp_speed * delta).clamp(0.0, 1.0);
        transform.rotation = transform.rotation.slerp(look, t);
    }
}
