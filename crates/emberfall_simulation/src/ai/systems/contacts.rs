//! Aggro/combat volume contacts → FSM transitions.

use bevy::prelude::*;

use crate::ai::{EnemyCombat, EnemyMovementStatus};
use crate::combat::{CombatTarget, EngagedEnemies, RetargetRequested};
use crate::components::{CombatStats, Enemy, MovementCommand, Player};
use crate::config::EnemyConfig;
use crate::proximity::{ZoneContact, ZoneKind, ZonePhase};
use crate::scheduler::{ActorTimers, Scheduler, TimerKind};
use crate::DeterministicRng;

use super::roll_attack_delay;

/// Враг жив: не в Dead и health > 0
///
/// Health проверяется отдельно: между смертельным ударом и `enemy_death`
/// в том же тике статус ещё не Dead.
pub fn enemy_alive(status: &EnemyMovementStatus, stats: &CombatStats) -> bool {
    !status.is_dead() && stats.is_alive()
}

/// Система: aggro зона врага
///
/// Enter → MoveToTarget + FollowEntity (если враг и игрок живы)
/// Exit → Idle + Stop, цель невалидна, CombatTarget игрока очищается
pub fn enemy_aggro_contacts(
    mut contacts: EventReader<ZoneContact>,
    mut retarget_events: EventWriter<RetargetRequested>,
    mut enemies: Query<
        (&CombatStats, &mut EnemyMovementStatus, &mut EnemyCombat, &mut MovementCommand),
        (With<Enemy>, Without<Player>),
    >,
    mut players: Query<(&CombatStats, &mut CombatTarget), (With<Player>, Without<Enemy>)>,
) {
    for contact in contacts.read() {
        if contact.kind != ZoneKind::Aggro {
            continue;
        }

        let enemy = contact.owner;
        let player = contact.other;

        let Ok((stats, mut status, mut combat, mut command)) = enemies.get_mut(enemy) else {
            continue;
        };
        let Ok((player_stats, mut target)) = players.get_mut(player) else {
            continue;
        };

        match contact.phase {
            ZonePhase::Enter => {
                if !enemy_alive(&status, stats) || !player_stats.is_alive() {
                    continue;
                }

                combat.chase_target = Some(player);
                // Атакующий враг сам вернётся к преследованию на combat exit
                if *status != EnemyMovementStatus::Attacking {
                    *status = EnemyMovementStatus::MoveToTarget;
                }
                *command = MovementCommand::FollowEntity { target: player };

                crate::logger::log(&format!("AI: {:?} aggro → chasing {:?}", enemy, player));
            }
            ZonePhase::Exit => {
                if status.is_dead() {
                    continue;
                }

                combat.chase_target = None;
                combat.has_valid_target = false;
                *status = EnemyMovementStatus::Idle;
                *command = MovementCommand::Stop;

                target.clear_if(enemy);
                retarget_events.write(RetargetRequested { player });

                crate::logger::log(&format!("AI: {:?} lost {:?} → Idle", enemy, player));
            }
        }
    }
}

/// Система: combat зона врага
///
/// Enter → цель валидна, враг в EngagedEnemies игрока, attack timer
/// Exit → назад к преследованию (или Idle), attack timer отменён
pub fn enemy_combat_contacts(
    mut contacts: EventReader<ZoneContact>,
    mut retarget_events: EventWriter<RetargetRequested>,
    mut enemies: Query<
        (
            &CombatStats,
            &EnemyConfig,
            &mut EnemyMovementStatus,
            &mut EnemyCombat,
            &mut MovementCommand,
            &mut ActorTimers,
        ),
        (With<Enemy>, Without<Player>),
    >,
    mut players: Query<
        (&CombatStats, &mut EngagedEnemies, &mut CombatTarget),
        (With<Player>, Without<Enemy>),
    >,
    mut scheduler: ResMut<Scheduler>,
    mut rng: ResMut<DeterministicRng>,
) {
    for contact in contacts.read() {
        if contact.kind != ZoneKind::Combat {
            continue;
        }

        let enemy = contact.owner;
        let player = contact.other;

        let Ok((stats, config, mut status, mut combat, mut command, mut timers)) =
            enemies.get_mut(enemy)
        else {
            continue;
        };
        let Ok((player_stats, mut engaged, mut target)) = players.get_mut(player) else {
            continue;
        };

        match contact.phase {
            ZonePhase::Enter => {
                if !enemy_alive(&status, stats) || !player_stats.is_alive() {
                    continue;
                }

                combat.overlapping_combat = true;
                combat.has_valid_target = true;
                combat.target = Some(player);

                engaged.add(enemy);
                retarget_events.write(RetargetRequested { player });

                let delay = roll_attack_delay(&mut rng, config);
                timers.arm(enemy, TimerKind::Attack, delay, &mut scheduler);

                crate::logger::log(&format!(
                    "AI: {:?} engaged {:?}, attack in {:.2}s",
                    enemy, player, delay
                ));
            }
            ZonePhase::Exit => {
                if status.is_dead() {
                    continue;
                }

                combat.overlapping_combat = false;
                combat.target = None;

                if player_stats.is_alive() && combat.chase_target == Some(player) {
                    *status = EnemyMovementStatus::MoveToTarget;
                    *command = MovementCommand::FollowEntity { target: player };
                } else {
                    *status = EnemyMovementStatus::Idle;
                    *command = MovementCommand::Stop;
                }

                timers.cancel(TimerKind::Attack, &mut scheduler);

                engaged.remove(enemy);
                target.clear_if(enemy);
                retarget_events.write(RetargetRequested { player });

                crate::logger::log(&format!(
                    "AI: {:?} disengaged from {:?} → {:?}",
                    enemy, player, *status
                ));
            }
        }
    }
}
