//! Camera rig: держит все живые танки в кадре
//!
//! Rig — повёрнутый (pitch/yaw) pivot, ortho камера хоста висит на нём.
//! ECS двигает rig и задаёт orthographic size; рендер на стороне хоста.

use bevy::prelude::*;

pub mod framer;

pub use framer::{average_position, required_size, smooth_damp, smooth_damp_vec3};

use crate::config::CameraConfig;
use crate::round::RoundEffect;
use crate::session::TankSessions;
use crate::tank::Tank;
use crate::SimulationSet;

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CameraRig {
    pub orthographic_size: f32,
    /// Скорость сглаживания позиции (между тиками)
    pub move_velocity: Vec3,
    /// Скорость сглаживания zoom
    pub zoom_velocity: f32,
}

/// Camera Plugin
///
/// FixedUpdate: frame_active_tanks (сглаженное следование).
/// Update: snap_camera_on_round_start (RoundEffect::SnapCamera, после сброса танков).
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CameraRig>()
            .add_systems(Startup, spawn_camera_rig)
            .add_systems(
                FixedUpdate,
                frame_active_tanks.in_set(SimulationSet::Camera),
            )
            .add_systems(
                Update,
                snap_camera_on_round_start.in_set(SimulationSet::Camera),
            );
    }
}

pub fn spawn_camera_rig(mut commands: Commands, config: Res<CameraConfig>) {
    commands.spawn((
        Name::new("CameraRig"),
        CameraRig {
            orthographic_size: config.min_size,
            move_velocity: Vec3::ZERO,
            zoom_velocity: 0.0,
        },
        Transform::from_rotation(config.rig_rotation()),
    ));
}

/// Позиции танков активных сессий
fn active_positions(
    sessions: &TankSessions,
    tanks: &Query<(&Tank, &Transform), Without<CameraRig>>,
) -> Vec<Vec3> {
    tanks
        .iter()
        .filter(|(tank, _)| sessions.is_active(tank.session))
        .map(|(_, transform)| transform.translation)
        .collect()
}

/// Система: плавное следование за средней точкой и zoom по разбросу
pub fn frame_active_tanks(
    time: Res<Time<Fixed>>,
    config: Res<CameraConfig>,
    sessions: Res<TankSessions>,
    tanks: Query<(&Tank, &Transform), Without<CameraRig>>,
    mut rigs: Query<(&mut Transform, &mut CameraRig)>,
) {
    let delta = time.delta_secs();
    let targets = active_positions(&sessions, &tanks);

    for (mut transform, mut rig) in rigs.iter_mut() {
        let Some(desired) = average_position(targets.iter().copied(), transform.translation.y)
        else {
            continue;
        };

        let mut move_velocity = rig.move_velocity;
        transform.translation = smooth_damp_vec3(
            transform.translation,
            desired,
            &mut move_velocity,
            config.damp_time,
            delta,
        );
        rig.move_velocity = move_velocity;

        let required = required_size(
            &transform,
            desired,
            targets.iter().copied(),
            config.screen_edge_buffer,
            config.min_size,
        );
        let mut zoom_velocity = rig.zoom_velocity;
        rig.orthographic_size = smooth_damp(
            rig.orthographic_size,
            required,
            &mut zoom_velocity,
            config.damp_time,
            delta,
        );
        rig.zoom_velocity = zoom_velocity;
    }
}

/// Система: на старте раунда позиция и size ставятся сразу, без сглаживания
pub fn snap_camera_on_round_start(
    mut effects: EventReader<RoundEffect>,
    config: Res<CameraConfig>,
    sessions: Res<TankSessions>,
    tanks: Query<(&Tank, &Transform), Without<CameraRig>>,
    mut rigs: Query<(&mut Transform, &mut CameraRig)>,
) {
    let snap_requested = effects
        .read()
        .filter(|effect| matches!(effect, RoundEffect::SnapCamera))
        .count()
        > 0;
    if !snap_requested {
        return;
    }

    let targets = active_positions(&sessions, &tanks);
    for (mut transform, mut rig) in rigs.iter_mut() {
        let Some(desired) = average_position(targets.iter().copied(), transform.translation.y)
        else {
            continue;
        };

        transform.translation = desired;
        rig.orthographic_size = required_size(
            &transform,
            desired,
            targets.iter().copied(),
            config.screen_edge_buffer,
            config.min_size,
        );
        rig.move_velocity = Vec3::ZERO;
        rig.zoom_velocity = 0.0;

        crate::logger::log(&format!(
            "Camera snapped to {:?}, size {:.2}",
            desired, rig.orthographic_size
        ));
    }
}
