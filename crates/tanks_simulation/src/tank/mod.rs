//! Tank domain — танк в арене
//!
//! Содержит:
//! - Tank (связь с сессией игрока)
//! - TankInput (оси и кнопка огня, заполняет хост)
//! - movement: движение и поворот от input
//! - engine_audio: idle/driving клип двигателя

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionGroups, ExternalImpulse, Group, RigidBody, Velocity};

pub mod engine_audio;
pub mod input;
pub mod movement;

pub use engine_audio::{EngineAudio, EngineClip};
pub use input::{FireButton, TankInput};

use crate::combat::{TankHealth, TankShooting};
use crate::config::{SpawnPoint, TankConfig, TANK_LAYER};
use crate::SimulationSet;

/// Танк в арене. `session` — индекс в `TankSessions`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Tank {
    pub session: usize,
}

/// Спавн танка со всеми компонентами на точке спавна
pub fn spawn_tank(
    commands: &mut Commands,
    config: &TankConfig,
    spawn: &SpawnPoint,
    session: usize,
) -> Entity {
    commands
        .spawn((
            Name::new(format!("Tank {}", session + 1)),
            Tank { session },
            Transform::from_translation(spawn.position).with_rotation(spawn.rotation()),
            TankInput::default(),
            TankHealth::new(config.starting_health),
            TankShooting::new(config),
            EngineAudio::new(config.original_pitch, config.pitch_range),
            // Physics (контракт с хостом)
            RigidBody::Dynamic,
            Velocity::zero(),
            ExternalImpulse::default(),
            CollisionGroups::new(TANK_LAYER, Group::ALL),
        ))
        .id()
}

/// Tank Plugin
///
/// FixedUpdate: drive_tanks (физический тик).
/// Update: update_engine_audio (кадр, как чтение input).
pub struct TankPlugin;

impl Plugin for TankPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Tank>()
            .register_type::<TankInput>()
            .register_type::<EngineAudio>()
            .add_systems(
                FixedUpdate,
                movement::drive_tanks.in_set(SimulationSet::Tanks),
            )
            .add_systems(
                Update,
                engine_audio::update_engine_audio.in_set(SimulationSet::Tanks),
            );
    }
}
