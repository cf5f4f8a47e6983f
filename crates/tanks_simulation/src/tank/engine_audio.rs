//! Звук двигателя: idle vs driving
//!
//! Хост проигрывает `clip` с `pitch`; здесь только выбор клипа.
//! При каждой смене клипа pitch случайно сдвигается в ±pitch_range,
//! чтобы танки не звучали одинаково.

use bevy::prelude::*;
use rand::Rng;

use crate::session::TankSessions;
use crate::tank::{Tank, TankInput};
use crate::DeterministicRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum EngineClip {
    Idle,
    Driving,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EngineAudio {
    pub clip: EngineClip,
    pub pitch: f32,
    pub original_pitch: f32,
    pub pitch_range: f32,
}

impl EngineAudio {
    pub fn new(original_pitch: f32, pitch_range: f32) -> Self {
        Self {
            clip: EngineClip::Idle,
            pitch: original_pitch,
            original_pitch,
            pitch_range,
        }
    }

    /// Переключает клип по input. true — клип сменился.
    pub fn update<R: Rng>(&mut self, input: &TankInput, rng: &mut R) -> bool {
        let wanted = if input.is_idle() {
            EngineClip::Idle
        } else {
            EngineClip::Driving
        };

        if wanted == self.clip {
            return false;
        }

        self.clip = wanted;
        self.pitch = rng.gen_range(
            self.original_pitch - self.pitch_range..=self.original_pitch + self.pitch_range,
        );
        true
    }
}

/// Система: выбор клипа двигателя для управляемых танков
pub fn update_engine_audio(
    mut rng: ResMut<DeterministicRng>,
    sessions: Res<TankSessions>,
    mut tanks: Query<(&Tank, &TankInput, &mut EngineAudio)>,
) {
    for (tank, input, mut engine) in tanks.iter_mut() {
        if !sessions.is_controllable(tank.session) {
            continue;
        }
        engine.update(input, &mut rng.rng);
    }
}
