//! Damage resolution: hitbox overlap → CombatStats → death events.

use bevy::prelude::*;

use crate::components::{CombatStats, DamageOutcome, Enemy, Player};
use crate::cosmetics::{CosmeticCue, SoundCue};
use crate::proximity::{ZoneContact, ZoneKind, ZonePhase};

/// Кто наносит урон своим hitbox volume (компонент на owner'е volume)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum DamageSource {
    /// Hitbox врага: бьёт только игроков
    Enemy { damage: f32 },
    /// Экипированное оружие: бьёт только врагов, пока есть wielder
    Weapon { damage: f32, wielder: Option<Entity> },
    /// Одноразовая ловушка: бьёт любого актора, после удара despawn
    Hazard { damage: f32 },
}

/// Запрос на урон
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
    /// Контроллер атакующего (None для hazard)
    pub instigator: Option<Entity>,
    /// Entity, чей hitbox ударил
    pub causer: Entity,
}

/// Событие: урон применён
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub target: Entity,
    pub instigator: Option<Entity>,
    pub causer: Entity,
    /// Реально снятое здоровье (≤ запрошенного)
    pub amount: f32,
    pub remaining_health: f32,
}

/// Событие: актор умер (ровно один раз на актора)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Применить урон к CombatStats цели
///
/// Health вычитается с полом 0. EntityDied пишется только на убивающий
/// удар, повторный урон по мёртвому ничего не меняет и событий не пишет.
/// Возвращает запрошенный amount (контракт вызывающей стороны).
pub fn apply_damage(
    request: &DamageRequest,
    stats: &mut CombatStats,
    dealt_events: &mut EventWriter<DamageDealt>,
    died_events: &mut EventWriter<EntityDied>,
) -> f32 {
    let before = stats.health();
    let outcome = stats.take_damage(request.amount);

    if outcome == DamageOutcome::AlreadyDead {
        return request.amount;
    }

    dealt_events.write(DamageDealt {
        target: request.target,
        instigator: request.instigator,
        causer: request.causer,
        amount: before - stats.health(),
        remaining_health: stats.health(),
    });

    if outcome == DamageOutcome::Killed {
        died_events.write(EntityDied {
            entity: request.target,
            killer: request.instigator.or(Some(request.causer)),
        });
    }

    request.amount
}

/// Система: hitbox Enter → apply_damage
///
/// Единственный путь нанесения урона. Cosmetic cues (частицы, звук удара)
/// пишутся до урона. Мёртвые цели игнорируются.
pub fn resolve_hitbox_contacts(
    mut commands: Commands,
    mut contacts: EventReader<ZoneContact>,
    mut dealt_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
    mut cosmetic_cues: EventWriter<CosmeticCue>,
    sources: Query<&DamageSource>,
    mut targets: Query<(&mut CombatStats, &Transform, Has<Player>, Has<Enemy>)>,
    mut consumed_hazards: Local<Vec<Entity>>,
) {
    consumed_hazards.clear();

    for contact in contacts.read() {
        if contact.kind != ZoneKind::Hitbox || contact.phase != ZonePhase::Enter {
            continue;
        }

        let Ok(source) = sources.get(contact.owner) else {
            continue;
        };
        let Ok((mut stats, transform, is_player, is_enemy)) = targets.get_mut(contact.other) else {
            continue;
        };

        if !stats.is_alive() || consumed_hazards.contains(&contact.owner) {
            continue;
        }

        let (amount, instigator) = match *source {
            DamageSource::Enemy { damage } if is_player => (damage, Some(contact.owner)),
            DamageSource::Weapon { damage, wielder: Some(wielder) } if is_enemy => (damage, Some(wielder)),
            DamageSource::Hazard { damage } if is_player || is_enemy => {
                consumed_hazards.push(contact.owner);
                cosmetic_cues.write(CosmeticCue::Sound { source: contact.owner, cue: SoundCue::Explosion });
                if let Ok(mut hazard) = commands.get_entity(contact.owner) {
                    hazard.despawn();
                }
                (damage, None)
            }
            _ => continue,
        };

        cosmetic_cues.write(CosmeticCue::HitParticles {
            target: contact.other,
            at: transform.translation,
        });
        cosmetic_cues.write(CosmeticCue::Sound { source: contact.other, cue: SoundCue::Hit });

        apply_damage(
            &DamageRequest {
                target: contact.other,
                amount,
                instigator,
                causer: contact.owner,
            },
            &mut stats,
            &mut dealt_events,
            &mut died_events,
        );

        crate::logger::log(&format!(
            "Combat: {:?} hit {:?} for {:.1} (health {:.1})",
            contact.owner, contact.other, amount, stats.health()
        ));
    }
}
