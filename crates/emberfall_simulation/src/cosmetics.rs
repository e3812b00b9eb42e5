//! Cosmetic collaborator: fire-and-forget particle/sound cues
//!
//! Core только пишет события, хост проигрывает. Никакая логика не ждёт
//! завершения и не читает результат.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SoundCue {
    /// Удар по цели (звук цели)
    Hit,
    /// Замах (hitbox on)
    Swing,
    /// Оружие экипировано
    Equip,
    /// Подобран предмет
    Pickup,
    /// Сработал hazard
    Explosion,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum CosmeticCue {
    /// Частицы попадания в точке удара
    HitParticles { target: Entity, at: Vec3 },
    /// 2D звук от source
    Sound { source: Entity, cue: SoundCue },
}
