//! Enemy marker

use bevy::prelude::*;

use crate::components::{MovementCommand, MovementSpeed};

/// Marker component для AI-controlled врага
///
/// Volumes врага (aggro/combat/hitbox) — отдельные child entity с
/// ZoneVolume, owner = этот entity.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(
    Transform,
    MovementCommand,
    MovementSpeed,
    crate::ai::EnemyMovementStatus,
    crate::ai::EnemyCombat,
    crate::scheduler::ActorTimers
)]
pub struct Enemy;
