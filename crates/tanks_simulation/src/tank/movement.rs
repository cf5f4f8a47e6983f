//! Движение танка
//!
//! Kinematic: Transform двигаем сами, без сил. Физика хоста получает итоговую
//! позицию (аналог MovePosition/MoveRotation). Работает в FixedUpdate.

use bevy::prelude::*;

use crate::config::TankConfig;
use crate::session::TankSessions;
use crate::tank::{Tank, TankInput};

/// Система: движение и поворот управляемых танков
///
/// Пробег копится в сессии (HEAVY_DUTY_TRAVELER highlight).
pub fn drive_tanks(
    time: Res<Time<Fixed>>,
    config: Res<TankConfig>,
    mut sessions: ResMut<TankSessions>,
    mut tanks: Query<(&Tank, &TankInput, &mut Transform)>,
) {
    let delta = time.delta_secs();

    for (tank, input, mut transform) in tanks.iter_mut() {
        let Some(session) = sessions.get_mut(tank.session) else {
            continue;
        };
        if !session.is_controllable() {
            continue;
        }

        let step = move_step(&transform, input.movement_axis(), config.speed, delta);
        transform.translation += step;
        session.distance_traveled += step.length();

        transform.rotation *= turn_step(input.turn_axis(), config.turn_speed, delta);
    }
}

/// Смещение за тик вдоль forward танка
pub fn move_step(transform: &Transform, axis: f32, speed: f32, delta: f32) -> Vec3 {
    transform.forward().as_vec3() * axis * speed * delta
}

/// Поворот за тик; положительная ось — по часовой стрелке сверху
pub fn turn_step(axis: f32, turn_speed_degrees: f32, delta: f32) -> Quat {
    Quat::from_rotation_y(-(axis * turn_speed_degrees * delta).to_radians())
}
