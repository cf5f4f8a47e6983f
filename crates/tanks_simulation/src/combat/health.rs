//! Здоровье танка и смерть.

use bevy::prelude::*;

use crate::audio::{AudioCue, AudioCueKind};
use crate::combat::explosion::{DespawnAfter, ExplosionFx, ExplosionKind};
use crate::config::ShellConfig;
use crate::session::TankSessions;

/// Здоровье танка
///
/// Инвариант: `dead` выставляется один раз, при первом падении до ≤ 0.
/// `current` — значение для health slider.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TankHealth {
    pub current: f32,
    pub starting: f32,
    pub dead: bool,
}

impl Default for TankHealth {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl TankHealth {
    pub fn new(starting: f32) -> Self {
        Self {
            current: starting,
            starting,
            dead: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Применяет урон. true — этот удар убил танк.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.current -= amount;

        if self.current <= 0.0 && !self.dead {
            self.dead = true;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.current = self.starting;
        self.dead = false;
    }
}

/// Событие: танк уничтожен (health ≤ 0)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TankDestroyed {
    pub entity: Entity,
    /// Индекс сессии (None если у entity нет Tank)
    pub session: Option<usize>,
    pub position: Vec3,
}

/// Система: уничтоженный танк выходит из раунда
///
/// Сессия становится неактивной (round state machine это увидит),
/// на месте танка — detached взрыв + звук.
pub fn deactivate_destroyed_tanks(
    mut commands: Commands,
    mut destroyed: EventReader<TankDestroyed>,
    mut sessions: ResMut<TankSessions>,
    mut cues: EventWriter<AudioCue>,
    config: Res<ShellConfig>,
    time: Res<Time>,
) {
    for event in destroyed.read() {
        if let Some(session) = event.session.and_then(|i| sessions.get_mut(i)) {
            session.is_active = false;
            crate::logger::log_info(&format!(
                "💥 Player {} tank destroyed at {:?}",
                session.player_number, event.position
            ));
        }

        commands.spawn((
            Name::new("TankExplosion"),
            ExplosionFx {
                kind: ExplosionKind::Tank,
            },
            Transform::from_translation(event.position),
            DespawnAfter {
                despawn_time: time.elapsed_secs() + config.explosion_effect_duration,
            },
        ));

        cues.write(AudioCue {
            kind: AudioCueKind::TankExplosion,
            source: event.entity,
            position: event.position,
        });
    }
}
