//! Rapier adapter: sensor colliders для zone volumes → ZoneEvent
//!
//! Опциональный plugin для хостов, которые используют bevy_rapier3d как
//! overlap detector. Хосты с собственной физикой пишут ZoneEvent напрямую.
//!
//! - ZoneVolume без коллайдера → ball sensor с COLLISION_EVENTS
//! - ZoneVolume.enabled == false → ColliderDisabled
//! - CollisionEvent::Started/Stopped (volume vs body) → ZoneEvent Enter/Exit

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::{dispatch_zone_events, ZoneEvent, ZonePhase, ZoneVolume};
use crate::components::CombatStats;

/// Plugin: rapier sensors как ProximityTracker
///
/// Физику (RapierPhysicsPlugin) добавляет хост — здесь только трансляция.
pub struct ProximityPhysicsPlugin;

impl Plugin for ProximityPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollisionEvent>();

        app.add_systems(
            FixedUpdate,
            (
                attach_sensor_colliders,
                sync_collider_enabled,
                translate_collision_events,
            )
                .chain()
                .before(dispatch_zone_events),
        );
    }
}

/// Система: создать sensor collider для новых zone volumes
pub fn attach_sensor_colliders(
    mut commands: Commands,
    volumes: Query<(Entity, &ZoneVolume), Without<Collider>>,
) {
    for (entity, volume) in volumes.iter() {
        commands.entity(entity).insert((
            Collider::ball(volume.radius),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
        ));
    }
}

/// Система: ZoneVolume.enabled → ColliderDisabled
pub fn sync_collider_enabled(
    mut commands: Commands,
    volumes: Query<(Entity, &ZoneVolume, Has<ColliderDisabled>), Changed<ZoneVolume>>,
) {
    for (entity, volume, disabled) in volumes.iter() {
        if volume.enabled && disabled {
            commands.entity(entity).remove::<ColliderDisabled>();
        } else if !volume.enabled && !disabled {
            commands.entity(entity).insert(ColliderDisabled);
        }
    }
}

/// Система: rapier CollisionEvent → ZoneEvent
///
/// Одна сторона пары должна быть zone volume, другая — нет
/// (sensor vs sensor пары игнорируются). Body collider, висящий child'ом
/// на акторе, резолвится в самого актора.
pub fn translate_collision_events(
    mut collision_events: EventReader<CollisionEvent>,
    mut zone_events: EventWriter<ZoneEvent>,
    volumes: Query<(), With<ZoneVolume>>,
    actors: Query<(), With<CombatStats>>,
    parents: Query<&ChildOf>,
) {
    for event in collision_events.read() {
        let (a, b, phase) = match event {
            CollisionEvent::Started(a, b, _) => (*a, *b, ZonePhase::Enter),
            CollisionEvent::Stopped(a, b, _) => (*a, *b, ZonePhase::Exit),
        };

        let (volume, other) = match (volumes.contains(a), volumes.contains(b)) {
            (true, false) => (a, b),
            (false, true) => (b, a),
            _ => continue,
        };

        let other = if actors.contains(other) {
            other
        } else {
            parents.get(other).map(|child_of| child_of.parent()).unwrap_or(other)
        };

        zone_events.write(ZoneEvent { volume, other, phase });
    }
}
