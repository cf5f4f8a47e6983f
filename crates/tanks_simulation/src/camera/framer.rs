//! Чистая математика кадрирования: центр, размер, сглаживание

use bevy::prelude::*;

/// Средняя позиция целей; высота заменена на `height` (высоту rig'а)
///
/// None — целей нет (камера стоит на месте).
pub fn average_position(targets: impl IntoIterator<Item = Vec3>, height: f32) -> Option<Vec3> {
    let mut sum = Vec3::ZERO;
    let mut count = 0u32;

    for position in targets {
        sum += position;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let mut average = sum / count as f32;
    average.y = height;
    Some(average)
}

/// Orthographic size, при котором все цели видны вокруг `desired`
///
/// Смещения считаются в локальном пространстве rig'а: экран видит local x/y.
pub fn required_size(
    rig: &Transform,
    desired: Vec3,
    targets: impl IntoIterator<Item = Vec3>,
    screen_edge_buffer: f32,
    min_size: f32,
) -> f32 {
    let inverse = rig.rotation.inverse();
    let desired_local = inverse * (desired - rig.translation);

    let mut size: f32 = 0.0;
    for target in targets {
        let target_local = inverse * (target - rig.translation);
        let offset = target_local - desired_local;
        size = size.max(offset.y.abs()).max(offset.x.abs());
    }

    (size + screen_edge_buffer).max(min_size)
}

/// Critically damped сглаживание к `target` (скаляр)
///
/// `velocity` хранится у вызывающего между тиками. Не перелетает цель.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, delta: f32) -> f32 {
    if delta <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * delta;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * delta;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Перелёт: встаём ровно в цель
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }

    output
}

/// Critically damped сглаживание к `target` (вектор)
pub fn smooth_damp_vec3(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    delta: f32,
) -> Vec3 {
    if delta <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * delta;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * delta;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = Vec3::ZERO;
    }

    output
}
