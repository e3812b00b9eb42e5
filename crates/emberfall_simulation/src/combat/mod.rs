//! Combat module
//!
//! - damage: DamageSource (tagged hitbox owner), apply_damage, hitbox resolver
//! - player: attack input, animation notifies, смерть игрока
//! - targeting: EngagedEnemies → CombatTarget (ближайший живой враг)
//!
//! Events: DamageDealt, EntityDied, RetargetRequested

use bevy::prelude::*;

pub mod damage;
pub mod player;
pub mod targeting;


// Re-export основных типов
pub use damage::{apply_damage, resolve_hitbox_contacts, DamageDealt, DamageRequest, DamageSource, EntityDied};
pub use player::{player_animation_signals, player_attack_input, player_death, HEAVY_ATTACK_RATE, LIGHT_ATTACK_RATE};
pub use targeting::{
    interp_to_combat_target, retarget_players, select_closest_target, track_target_display, CombatTarget,
    EngagedEnemies, RetargetRequested, TargetDisplay,
};

/// Combat Plugin: события combat слоя
///
/// Системы добавляет SimulationPlugin (общий FixedUpdate chain).
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<RetargetRequested>();
    }
}
