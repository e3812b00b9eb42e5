//! Timer dispatch: attack/death таймеры врагов.

use bevy::prelude::*;

use crate::ai::{EnemyCombat, EnemyMovementStatus};
use crate::animation::{AnimationCommand, MontageSection};
use crate::components::{CombatStats, Enemy, MovementCommand};
use crate::scheduler::{ActorTimers, TimerFired, TimerKind};

use super::enemy_alive;

/// Система: TimerFired → атака / despawn
///
/// Устаревший handle (таймер перевзведён или отменён) игнорируется.
/// Актор уже despawned → пропускаем (fail-soft).
pub fn dispatch_enemy_timers(
    mut commands: Commands,
    mut fired_events: EventReader<TimerFired>,
    mut animation_commands: EventWriter<AnimationCommand>,
    mut enemies: Query<
        (
            &CombatStats,
            &mut EnemyMovementStatus,
            &mut EnemyCombat,
            &mut MovementCommand,
            &mut ActorTimers,
        ),
        With<Enemy>,
    >,
) {
    for fired in fired_events.read() {
        let actor = fired.action.actor;
        let kind = fired.action.kind;

        let Ok((stats, mut status, mut combat, mut command, mut timers)) = enemies.get_mut(actor)
        else {
            crate::logger::log(&format!("Timer {:?} for missing actor {:?} skipped", kind, actor));
            continue;
        };

        if !timers.take_fired(kind, fired.handle) {
            continue;
        }

        match kind {
            TimerKind::Attack => {
                if !enemy_alive(&status, stats) || !combat.has_valid_target || combat.attacking {
                    continue;
                }

                combat.attacking = true;
                *status = EnemyMovementStatus::Attacking;
                *command = MovementCommand::Stop;
                animation_commands.write(AnimationCommand::play(actor, MontageSection::Attack1, 1.0));

                crate::logger::log(&format!("AI: {:?} attacks {:?}", actor, combat.target));
            }
            TimerKind::Death => {
                if let Ok(mut entity) = commands.get_entity(actor) {
                    entity.despawn();
                    crate::logger::log(&format!("AI: {:?} disappeared", actor));
                }
            }
        }
    }
}
