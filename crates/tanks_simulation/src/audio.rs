//! Звуковые сигналы для хоста
//!
//! Симуляция звук не проигрывает — только сообщает что и где.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AudioCueKind {
    ShotCharging,
    ShotFired,
    ShellExplosion,
    TankExplosion,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AudioCue {
    pub kind: AudioCueKind,
    /// Источник звука (танк или снаряд)
    pub source: Entity,
    pub position: Vec3,
}
