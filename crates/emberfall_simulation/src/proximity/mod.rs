//! ProximityTracker interface: zone volumes + enter/exit события
//!
//! Хост (физика движка или rapier adapter из `physics`) сообщает
//! overlap начала/конца через `ZoneEvent`. Core не знает ничего о
//! коллайдерах — только о volume entity и о том, кто в него вошёл.
//!
//! Flow:
//! 1. Хост пишет ZoneEvent { volume, other, phase }
//! 2. dispatch_zone_events резолвит volume → ZoneContact { kind, owner, ... }
//! 3. Обработчики матчат по ZoneKind (aggro/combat → AI, hitbox → resolver, pickup → items)

use bevy::prelude::*;

pub mod physics;

pub use physics::ProximityPhysicsPlugin;

/// Тип зоны (что означает overlap)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ZoneKind {
    /// Detection зона врага: вход запускает преследование
    Aggro,
    /// Ближняя зона врага: вход запускает attack timer
    Combat,
    /// Короткоживущая зона урона (включена только в attack frames)
    Hitbox,
    /// Зона подбора предмета (монеты, зелья, оружие на земле)
    Pickup,
}

/// Volume, принадлежащий актору или предмету
///
/// Обычно spawn'ится как child своего owner'а.
/// Disabled volume не генерирует Enter контакты (death, hitbox вне атаки).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ZoneVolume {
    pub kind: ZoneKind,
    pub owner: Entity,
    pub radius: f32,
    pub enabled: bool,
}

impl ZoneVolume {
    pub fn new(kind: ZoneKind, owner: Entity, radius: f32) -> Self {
        Self {
            kind,
            owner,
            radius,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ZonePhase {
    Enter,
    Exit,
}

/// Событие от хоста: `other` вошёл в volume / вышел из него
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ZoneEvent {
    pub volume: Entity,
    pub other: Entity,
    pub phase: ZonePhase,
}

impl ZoneEvent {
    pub fn enter(volume: Entity, other: Entity) -> Self {
        Self { volume, other, phase: ZonePhase::Enter }
    }

    pub fn exit(volume: Entity, other: Entity) -> Self {
        Self { volume, other, phase: ZonePhase::Exit }
    }
}

/// Резолвленный контакт (volume → kind + owner)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ZoneContact {
    pub volume: Entity,
    pub kind: ZoneKind,
    pub owner: Entity,
    pub other: Entity,
    pub phase: ZonePhase,
}

/// Система: ZoneEvent → ZoneContact
///
/// - Неизвестный volume (despawned) — пропускаем
/// - Overlap owner'а со своим же volume — пропускаем
/// - Enter в disabled volume — пропускаем (Exit пропускаем дальше,
///   обработчики сами проверяют liveness)
pub fn dispatch_zone_events(
    mut zone_events: EventReader<ZoneEvent>,
    mut contacts: EventWriter<ZoneContact>,
    volumes: Query<&ZoneVolume>,
) {
    for event in zone_events.read() {
        let Ok(volume) = volumes.get(event.volume) else {
            crate::logger::log(&format!("Zone event for unknown volume {:?} skipped", event.volume));
            continue;
        };

        if event.other == volume.owner {
            continue;
        }

        if event.phase == ZonePhase::Enter && !volume.enabled {
            continue;
        }

        contacts.write(ZoneContact {
            volume: event.volume,
            kind: volume.kind,
            owner: volume.owner,
            other: event.other,
            phase: event.phase,
        });
    }
}

/// Включить/выключить все volumes владельца указанного kind (None = все kinds)
pub fn set_owner_volumes_enabled(
    owner: Entity,
    kind: Option<ZoneKind>,
    enabled: bool,
    volumes: &mut Query<&mut ZoneVolume>,
) {
    for mut volume in volumes.iter_mut() {
        if volume.owner != owner {
            continue;
        }
        if kind.is_some_and(|kind| kind != volume.kind) {
            continue;
        }
        if volume.enabled != enabled {
            volume.enabled = enabled;
        }
    }
}
