//! Взрыв снаряда: радиальный урон и impulse
//!
//! Формула урона (linear falloff):
//! - damage = max_damage × (radius - distance) / radius, не меньше 0
//!   - distance 0 → max_damage
//!   - distance = radius → 0
//!   - дальше радиуса → 0

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionGroups, ExternalImpulse, RigidBody};

use crate::audio::{AudioCue, AudioCueKind};
use crate::combat::health::{TankDestroyed, TankHealth};
use crate::combat::shell::{Shell, ShellContact};
use crate::config::ShellConfig;
use crate::session::TankSessions;
use crate::tank::Tank;

/// Параметры одного взрыва. Живёт только внутри detonate_shells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionEvent {
    pub origin: Vec3,
    pub radius: f32,
    pub max_damage: f32,
    pub max_force: f32,
}

impl ExplosionEvent {
    pub fn from_config(origin: Vec3, config: &ShellConfig) -> Self {
        Self {
            origin,
            radius: config.explosion_radius,
            max_damage: config.max_damage,
            max_force: config.explosion_force,
        }
    }

    pub fn damage_at(&self, distance: f32) -> f32 {
        calculate_damage(distance, self.radius, self.max_damage)
    }

    /// Impulse от центра взрыва к цели за один тик силы
    ///
    /// Сила спадает линейно как и урон; цель в самом центре толкаем вверх.
    pub fn impulse_at(&self, target: Vec3, delta: f32) -> Vec3 {
        let offset = target - self.origin;
        let distance = offset.length();
        if distance >= self.radius {
            return Vec3::ZERO;
        }

        let direction = offset.try_normalize().unwrap_or(Vec3::Y);
        direction * self.max_force * (1.0 - distance / self.radius) * delta
    }
}

/// Урон на расстоянии `distance` от центра взрыва
pub fn calculate_damage(distance: f32, radius: f32, max_damage: f32) -> f32 {
    let relative_distance = (radius - distance) / radius;
    (relative_distance * max_damage).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ExplosionKind {
    Shell,
    Tank,
}

/// Detached визуальный эффект взрыва (частицы рисует хост)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ExplosionFx {
    pub kind: ExplosionKind,
}

/// Компонент-маркер: деспавн entity после указанного времени
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах от старта)
    pub despawn_time: f32,
}

/// Система: ShellContact → взрыв
///
/// 1. Собираем rigid body на target layer в радиусе взрыва
/// 2. Толкаем impulse'ом (если у тела есть ExternalImpulse)
/// 3. Если есть TankHealth — linear falloff урон
/// 4. Снаряд удаляем, на его месте detached эффект + звук
///
/// Мёртвые танки (неактивная сессия) в overlap не попадают.
pub fn detonate_shells(
    mut commands: Commands,
    mut contacts: EventReader<ShellContact>,
    shells: Query<&Transform, With<Shell>>,
    mut bodies: Query<
        (
            Entity,
            &Transform,
            &CollisionGroups,
            Option<&Tank>,
            Option<&mut ExternalImpulse>,
            Option<&mut TankHealth>,
        ),
        (With<RigidBody>, Without<Shell>),
    >,
    sessions: Res<TankSessions>,
    config: Res<ShellConfig>,
    time: Res<Time>,
    mut destroyed: EventWriter<TankDestroyed>,
    mut cues: EventWriter<AudioCue>,
) {
    let target_layer = config.target_group();
    let delta = time.delta_secs();
    let mut detonated: Vec<Entity> = Vec::new();

    for contact in contacts.read() {
        // Один снаряд — один взрыв, даже если контактов несколько
        if detonated.contains(&contact.shell) {
            continue;
        }
        let Ok(shell_transform) = shells.get(contact.shell) else {
            continue;
        };
        detonated.push(contact.shell);

        let explosion = ExplosionEvent::from_config(shell_transform.translation, &config);

        for (entity, transform, groups, tank, impulse, health) in bodies.iter_mut() {
            if !groups.memberships.intersects(target_layer) {
                continue;
            }
            if let Some(tank) = tank {
                if !sessions.is_active(tank.session) {
                    continue;
                }
            }

            let distance = explosion.origin.distance(transform.translation);
            if distance > explosion.radius {
                continue;
            }

            if let Some(mut impulse) = impulse {
                impulse.impulse += explosion.impulse_at(transform.translation, delta);
            }

            let Some(mut health) = health else {
                continue;
            };

            let damage = explosion.damage_at(distance);
            let killed = health.take_damage(damage);

            crate::logger::log(&format!(
                "Shell hit {:?}: {:.1} damage at {:.2}m (health {:.1})",
                entity, damage, distance, health.current
            ));

            if killed {
                destroyed.write(TankDestroyed {
                    entity,
                    session: tank.map(|t| t.session),
                    position: transform.translation,
                });
            }
        }

        commands.spawn((
            Name::new("ShellExplosion"),
            ExplosionFx {
                kind: ExplosionKind::Shell,
            },
            Transform::from_translation(explosion.origin),
            DespawnAfter {
                despawn_time: time.elapsed_secs() + config.explosion_effect_duration,
            },
        ));
        cues.write(AudioCue {
            kind: AudioCueKind::ShellExplosion,
            source: contact.shell,
            position: explosion.origin,
        });

        commands.entity(contact.shell).despawn();
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            commands.entity(entity).despawn();
        }
    }
}
