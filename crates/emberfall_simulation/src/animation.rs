//! Animation collaborator interface
//!
//! Core → хост: AnimationCommand::PlaySection (montage + section)
//! Хост → core: AnimationSignal (notify из анимации: конец атаки, конец
//! death анимации, окно hitbox'а)
//!
//! Отсутствующий ассет/montage — проблема хоста: команда просто не
//! проигрывается, core от этого не зависит.

use bevy::prelude::*;

/// Montage актора (у всех акторов сейчас один combat montage)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Montage {
    Combat,
}

/// Секция combat montage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum MontageSection {
    Attack1,
    Attack2,
    Death,
}

impl MontageSection {
    /// Имя секции в ассете
    pub fn as_str(&self) -> &'static str {
        match self {
            MontageSection::Attack1 => "Attack_1",
            MontageSection::Attack2 => "Attack_2",
            MontageSection::Death => "Death",
        }
    }
}

/// Команда хосту: проиграть секцию montage
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum AnimationCommand {
    PlaySection {
        actor: Entity,
        montage: Montage,
        section: MontageSection,
        /// Play rate (1.0 = нормальная скорость)
        rate: f32,
    },
}

impl AnimationCommand {
    pub fn play(actor: Entity, section: MontageSection, rate: f32) -> Self {
        Self::PlaySection {
            actor,
            montage: Montage::Combat,
            section,
            rate,
        }
    }
}

/// Notify из анимации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AnimationSignalKind {
    /// Attack секция закончилась
    AttackEnd,
    /// Death секция закончилась
    DeathEnd,
    /// Начало активных attack frames (hitbox on)
    HitboxOn,
    /// Конец активных attack frames (hitbox off)
    HitboxOff,
}

/// Событие от хоста: animation notify актора
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AnimationSignal {
    pub actor: Entity,
    pub kind: AnimationSignalKind,
}

impl AnimationSignal {
    pub fn new(actor: Entity, kind: AnimationSignalKind) -> Self {
        Self { actor, kind }
    }
}

/// Маркер: анимация заморожена на последнем кадре (после смерти)
///
/// Хост ставит паузу анимации и отключает skeleton update.
/// Снимается только при load.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AnimationFrozen;
