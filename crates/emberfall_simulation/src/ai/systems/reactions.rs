//! AI reaction systems (animation notifies, death).

use bevy::prelude::*;

use crate::ai::{EnemyCombat, EnemyMovementStatus};
use crate::animation::{AnimationCommand, AnimationFrozen, AnimationSignal, AnimationSignalKind, MontageSection};
use crate::combat::{CombatTarget, EngagedEnemies, EntityDied, RetargetRequested};
use crate::components::{Enemy, MovementCommand, Player};
use crate::config::EnemyConfig;
use crate::cosmetics::{CosmeticCue, SoundCue};
use crate::proximity::{set_owner_volumes_enabled, ZoneKind, ZoneVolume};
use crate::scheduler::{ActorTimers, Scheduler, TimerKind};
use crate::DeterministicRng;

use super::roll_attack_delay;

/// Система: animation notifies врага
///
/// - AttackEnd → attacking = false, hitbox off; всё ещё в combat зоне →
///   новый attack timer со свежей задержкой
/// - DeathEnd → анимация заморожена, death timer (death_delay)
/// - HitboxOn/HitboxOff → окно урона hitbox'а (+ swing звук)
pub fn enemy_animation_signals(
    mut commands: Commands,
    mut signals: EventReader<AnimationSignal>,
    mut cosmetic_cues: EventWriter<CosmeticCue>,
    mut enemies: Query<(&EnemyConfig, &EnemyMovementStatus, &mut EnemyCombat, &mut ActorTimers), With<Enemy>>,
    mut volumes: Query<&mut ZoneVolume>,
    mut scheduler: ResMut<Scheduler>,
    mut rng: ResMut<DeterministicRng>,
) {
    for signal in signals.read() {
        let actor = signal.actor;
        let Ok((config, status, mut combat, mut timers)) = enemies.get_mut(actor) else {
            continue;
        };

        match signal.kind {
            AnimationSignalKind::AttackEnd => {
                combat.attacking = false;
                set_owner_volumes_enabled(actor, Some(ZoneKind::Hitbox), false, &mut volumes);

                if !status.is_dead() && combat.overlapping_combat {
                    let delay = roll_attack_delay(&mut rng, config);
                    timers.arm(actor, TimerKind::Attack, delay, &mut scheduler);
                }
            }
            AnimationSignalKind::DeathEnd => {
                if !status.is_dead() {
                    continue;
                }
                commands.entity(actor).insert(AnimationFrozen);
                timers.arm(actor, TimerKind::Death, config.death_delay.max(0.0), &mut scheduler);
            }
            AnimationSignalKind::HitboxOn => {
                if status.is_dead() {
                    continue;
                }
                set_owner_volumes_enabled(actor, Some(ZoneKind::Hitbox), true, &mut volumes);
                cosmetic_cues.write(CosmeticCue::Sound { source: actor, cue: SoundCue::Swing });
            }
            AnimationSignalKind::HitboxOff => {
                set_owner_volumes_enabled(actor, Some(ZoneKind::Hitbox), false, &mut volumes);
            }
        }
    }
}

/// Система: EntityDied → enemy Dead
///
/// Один раз на врага: timers отменены, все volumes выключены, движение
/// остановлено, Death montage, враг убран из EngagedEnemies всех игроков.
pub fn enemy_death(
    mut died_events: EventReader<EntityDied>,
    mut animation_commands: EventWriter<AnimationCommand>,
    mut retarget_events: EventWriter<RetargetRequested>,
    mut enemies: Query<
        (&mut EnemyMovementStatus, &mut EnemyCombat, &mut MovementCommand, &mut ActorTimers),
        (With<Enemy>, Without<Player>),
    >,
    mut players: Query<(Entity, &mut EngagedEnemies, &mut CombatTarget), (With<Player>, Without<Enemy>)>,
    mut volumes: Query<&mut ZoneVolume>,
    mut scheduler: ResMut<Scheduler>,
) {
    for event in died_events.read() {
        let enemy = event.entity;
        let Ok((mut status, mut combat, mut command, mut timers)) = enemies.get_mut(enemy) else {
            continue;
        };

        if status.is_dead() {
            continue;
        }

        *status = EnemyMovementStatus::Dead;
        combat.disengage();
        *command = MovementCommand::Stop;
        timers.cancel_all(&mut scheduler);
        set_owner_volumes_enabled(enemy, None, false, &mut volumes);

        animation_commands.write(AnimationCommand::play(enemy, MontageSection::Death, 1.0));

        for (player, mut engaged, mut target) in players.iter_mut() {
            let removed = engaged.remove(enemy);
            let cleared = target.clear_if(enemy);
            if removed || cleared {
                retarget_events.write(RetargetRequested { player });
            }
        }

        crate::logger::log_info(&format!("AI: {:?} died (killer: {:?})", enemy, event.killer));
    }
}
