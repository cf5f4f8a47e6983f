//! Input танка
//!
//! Для headless тестов — mock input через этот компонент.
//! Для игры — хост заполняет из своих осей "Vertical{n}" / "Horizontal{n}" / "Fire{n}".

use bevy::prelude::*;

/// Порог, ниже которого ось считается нулевой (для звука двигателя)
pub const AXIS_DEAD_ZONE: f32 = 0.1;

/// Состояние кнопки огня за кадр
///
/// `down`/`up` — фронты, живут один кадр (сбрасываются после стрельбы).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct FireButton {
    pub down: bool,
    pub held: bool,
    pub up: bool,
}

impl FireButton {
    pub fn press(&mut self) {
        self.down = true;
        self.held = true;
        self.up = false;
    }

    pub fn release(&mut self) {
        if self.held {
            self.held = false;
            self.up = true;
        }
    }

    pub fn consume_edges(&mut self) {
        self.down = false;
        self.up = false;
    }
}

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TankInput {
    /// Вперёд/назад, [-1, 1]
    pub movement: f32,
    /// Поворот, [-1, 1]; положительный — вправо (по часовой сверху)
    pub turn: f32,
    pub fire: FireButton,
}

impl TankInput {
    pub fn movement_axis(&self) -> f32 {
        self.movement.clamp(-1.0, 1.0)
    }

    pub fn turn_axis(&self) -> f32 {
        self.turn.clamp(-1.0, 1.0)
    }

    /// Обе оси в dead zone
    pub fn is_idle(&self) -> bool {
        self.movement.abs() < AXIS_DEAD_ZONE && self.turn.abs() < AXIS_DEAD_ZONE
    }
}
