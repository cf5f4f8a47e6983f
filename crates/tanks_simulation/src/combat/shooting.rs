//! Зарядка и выстрел
//!
//! Зажатая кнопка огня копит launch force от min до max за max_charge_time.
//! Выстрел — при отпускании или автоматически на максимуме.

use bevy::prelude::*;

use crate::audio::{AudioCue, AudioCueKind};
use crate::combat::shell::spawn_shell;
use crate::config::TankConfig;
use crate::session::TankSessions;
use crate::tank::{FireButton, Tank, TankInput};

/// Результат шага стрельбы за кадр
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotAction {
    Idle,
    ChargeStarted,
    Fire { launch_force: f32 },
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TankShooting {
    pub current_launch_force: f32,
    pub min_launch_force: f32,
    pub max_launch_force: f32,
    /// Прирост силы в секунду
    pub charging_speed: f32,
    /// Выстрел уже сделан за текущее нажатие
    pub fired: bool,
    /// Значение aim slider (UI хоста)
    pub aim_slider: f32,
}

impl TankShooting {
    pub fn new(config: &TankConfig) -> Self {
        Self {
            current_launch_force: config.min_launch_force,
            min_launch_force: config.min_launch_force,
            max_launch_force: config.max_launch_force,
            charging_speed: (config.max_launch_force - config.min_launch_force)
                / config.max_charge_time,
            fired: false,
            aim_slider: config.min_launch_force,
        }
    }

    /// Сброс заряда (танк снова получил управление)
    pub fn reset_charge(&mut self) {
        self.current_launch_force = self.min_launch_force;
        self.aim_slider = self.min_launch_force;
    }

    /// Один кадр стрельбы
    ///
    /// Порядок веток важен: автовыстрел на максимуме проверяется раньше
    /// нового нажатия.
    pub fn update(&mut self, fire: &FireButton, delta: f32) -> ShotAction {
        self.aim_slider = self.min_launch_force;

        if self.current_launch_force >= self.max_launch_force && !self.fired {
            self.current_launch_force = self.max_launch_force;
            self.fire()
        } else if fire.down {
            self.fired = false;
            self.current_launch_force = self.min_launch_force;
            ShotAction::ChargeStarted
        } else if fire.held && !self.fired {
            self.current_launch_force += self.charging_speed * delta;
            self.aim_slider = self.current_launch_force;
            ShotAction::Idle
        } else if fire.up && !self.fired {
            self.fire()
        } else {
            ShotAction::Idle
        }
    }

    fn fire(&mut self) -> ShotAction {
        self.fired = true;
        let launch_force = self.current_launch_force;
        self.current_launch_force = self.min_launch_force;
        ShotAction::Fire { launch_force }
    }
}

/// Система: зарядка и выстрел управляемых танков
///
/// Фронты кнопки огня гасятся каждый кадр, даже без управления.
pub fn charge_and_fire(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<TankConfig>,
    sessions: Res<TankSessions>,
    mut tanks: Query<(Entity, &Tank, &Transform, &mut TankInput, &mut TankShooting)>,
    mut cues: EventWriter<AudioCue>,
) {
    let delta = time.delta_secs();

    for (entity, tank, transform, mut input, mut shooting) in tanks.iter_mut() {
        if sessions.is_controllable(tank.session) {
            match shooting.update(&input.fire, delta) {
                ShotAction::Idle => {}
                ShotAction::ChargeStarted => {
                    cues.write(AudioCue {
                        kind: AudioCueKind::ShotCharging,
                        source: entity,
                        position: transform.translation,
                    });
                }
                ShotAction::Fire { launch_force } => {
                    let shell = spawn_shell(&mut commands, entity, transform, &config, launch_force);
                    crate::logger::log(&format!(
                        "Tank {:?} fired shell {:?} (force {:.1})",
                        entity, shell, launch_force
                    ));
                    cues.write(AudioCue {
                        kind: AudioCueKind::ShotFired,
                        source: entity,
                        position: transform.translation,
                    });
                }
            }
        }

        input.fire.consume_edges();
    }
}
