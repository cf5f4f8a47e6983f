//! Bevy-системы раундов.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ExternalImpulse, Velocity};

use crate::combat::{ExplosionFx, Shell, TankHealth, TankShooting};
use crate::config::{SpawnPoints, TankConfig};
use crate::round::{RoundEffect, RoundStateMachine};
use crate::session::{TankSession, TankSessions};
use crate::tank::{spawn_tank, Tank, TankInput};

/// Текст поверх арены ("ROUND 2", результат раунда). Пустой = скрыт.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct RoundMessage {
    pub text: String,
}

/// Система: спавн танка и сессии на каждую точку спавна
pub fn spawn_all_tanks(
    mut commands: Commands,
    spawn_points: Res<SpawnPoints>,
    config: Res<TankConfig>,
    mut sessions: ResMut<TankSessions>,
) {
    for (index, spawn) in spawn_points.0.iter().enumerate() {
        let entity = spawn_tank(&mut commands, &config, spawn, index);
        sessions.push(TankSession::new(index as u32 + 1, spawn, entity));
    }

    crate::logger::log_info(&format!("Spawned {} tanks", sessions.len()));
}

/// Система: один кадр round state machine
///
/// Первый кадр после спавна сам запускает игру (Starting раунда 1).
/// Без сессий машина стоит (предупреждение один раз).
pub fn drive_round_state_machine(
    time: Res<Time>,
    mut machine: ResMut<RoundStateMachine>,
    mut sessions: ResMut<TankSessions>,
    mut effects: EventWriter<RoundEffect>,
    mut warned: Local<bool>,
) {
    if sessions.is_empty() {
        if !*warned {
            crate::logger::log_warning("No tank sessions, round state machine is idle");
            *warned = true;
        }
        return;
    }

    for effect in machine.tick(time.delta_secs(), sessions.as_mut_slice()) {
        effects.write(effect);
    }
}

/// Система: применение RoundEffect к арене
///
/// - ResetTanks: танки на spawn point, здоровье/заряд/инерция сброшены
/// - ControlChanged(true): заряд выстрела снова с минимума
/// - Message: обновить RoundMessage
/// - GameWon: убрать снаряды и эффекты (новая игра стартует с чистой арены)
///
/// SnapCamera обрабатывает camera plugin (после этой системы).
pub fn apply_round_effects(
    mut commands: Commands,
    mut effects: EventReader<RoundEffect>,
    sessions: Res<TankSessions>,
    mut message: ResMut<RoundMessage>,
    mut tanks: Query<(
        &Tank,
        &mut Transform,
        &mut TankHealth,
        &mut TankShooting,
        &mut TankInput,
        Option<&mut Velocity>,
        Option<&mut ExternalImpulse>,
    )>,
    leftovers: Query<Entity, Or<(With<Shell>, With<ExplosionFx>)>>,
) {
    for effect in effects.read() {
        match effect {
            RoundEffect::ResetTanks => {
                for (tank, mut transform, mut health, mut shooting, mut input, velocity, impulse) in
                    tanks.iter_mut()
                {
                    let Some(session) = sessions.get(tank.session) else {
                        continue;
                    };

                    transform.translation = session.start_position;
                    transform.rotation = session.start_rotation;
                    health.reset();
                    shooting.reset_charge();
                    *input = TankInput::default();

                    if let Some(mut velocity) = velocity {
                        *velocity = Velocity::zero();
                    }
                    if let Some(mut impulse) = impulse {
                        *impulse = ExternalImpulse::default();
                    }
                }
            }

            RoundEffect::ControlChanged { enabled: true } => {
                for (_, _, _, mut shooting, _, _, _) in tanks.iter_mut() {
                    shooting.reset_charge();
                }
            }

            RoundEffect::Message(text) => {
                message.text.clone_from(text);
                if !text.is_empty() {
                    crate::logger::log(&format!("📢 {}", text.replace('\n', " | ")));
                }
            }

            RoundEffect::GameWon { winner } => {
                let mut cleared = 0;
                for entity in leftovers.iter() {
                    commands.entity(entity).despawn();
                    cleared += 1;
                }
                crate::logger::log_info(&format!(
                    "Game over (winner session {}), arena cleared ({} leftovers)",
                    winner, cleared
                ));
            }

            _ => {}
        }
    }
}
