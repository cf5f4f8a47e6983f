//! Снаряд: полёт, самоуничтожение, контакт
//!
//! В игре контакт приходит от trigger-коллайдера хоста (ShellContact).
//! Headless: простая ballistics — гравитация, земля на y = 0, корпус танка
//! как вертикальный цилиндр радиуса `hit_radius`.

use bevy::prelude::*;

use crate::config::{ShellConfig, TankConfig};
use crate::session::TankSessions;
use crate::tank::Tank;

pub const GRAVITY: f32 = -9.81;

/// Высота корпуса танка для headless hit test
pub const HULL_HEIGHT: f32 = 2.0;

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Shell {
    /// Танк-стрелок (свой корпус снаряд не задевает при вылете)
    pub shooter: Entity,
    pub velocity: Vec3,
    /// Секунды с момента выстрела
    pub age: f32,
}

/// Событие: снаряд коснулся чего-либо (физика → ECS)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellContact {
    pub shell: Entity,
}

/// Спавн снаряда из fire transform танка
///
/// Скорость = launch_force × shell_speed_multiplier вдоль forward танка.
pub fn spawn_shell(
    commands: &mut Commands,
    shooter: Entity,
    tank_transform: &Transform,
    config: &TankConfig,
    launch_force: f32,
) -> Entity {
    let forward = tank_transform.forward().as_vec3();
    let position = tank_transform.translation
        + Vec3::Y * config.fire_height
        + forward * config.fire_forward_offset;

    commands
        .spawn((
            Name::new("Shell"),
            Shell {
                shooter,
                velocity: forward * launch_force * config.shell_speed_multiplier,
                age: 0.0,
            },
            Transform::from_translation(position).with_rotation(tank_transform.rotation),
        ))
        .id()
}

/// Система: интеграция полёта (semi-implicit Euler)
pub fn integrate_shells(time: Res<Time<Fixed>>, mut shells: Query<(&mut Shell, &mut Transform)>) {
    let delta = time.delta_secs();

    for (mut shell, mut transform) in shells.iter_mut() {
        shell.velocity.y += GRAVITY * delta;
        transform.translation += shell.velocity * delta;
        shell.age += delta;
    }
}

/// Система: снаряд без контакта живёт не дольше max_lifetime
pub fn expire_shells(
    mut commands: Commands,
    config: Res<ShellConfig>,
    shells: Query<(Entity, &Shell)>,
) {
    for (entity, shell) in shells.iter() {
        if shell.age >= config.max_lifetime {
            commands.entity(entity).despawn();
        }
    }
}

/// Система: headless контакты снаряда (земля или корпус чужого танка)
pub fn detect_shell_contacts(
    config: Res<ShellConfig>,
    sessions: Res<TankSessions>,
    shells: Query<(Entity, &Shell, &Transform)>,
    tanks: Query<(Entity, &Tank, &Transform), Without<Shell>>,
    mut contacts: EventWriter<ShellContact>,
) {
    for (entity, shell, transform) in shells.iter() {
        if shell.age >= config.max_lifetime {
            continue; // Уже удалён expire_shells
        }

        let position = transform.translation;
        let touched_ground = position.y <= 0.0;
        let touched_tank = || {
            tanks.iter().any(|(tank_entity, tank, tank_transform)| {
                tank_entity != shell.shooter
                    && sessions.is_active(tank.session)
                    && hits_hull(position, tank_transform.translation, config.hit_radius)
            })
        };

        if touched_ground || touched_tank() {
            contacts.write(ShellContact { shell: entity });
        }
    }
}

/// Точка внутри цилиндра корпуса (ось Y через центр танка)
pub fn hits_hull(point: Vec3, tank_position: Vec3, hit_radius: f32) -> bool {
    let horizontal = Vec2::new(point.x - tank_position.x, point.z - tank_position.z);
    let height = point.y - tank_position.y;

    horizontal.length() <= hit_radius && (0.0..=HULL_HEIGHT).contains(&height)
}
