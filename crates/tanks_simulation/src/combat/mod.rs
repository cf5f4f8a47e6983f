//! Combat module: стрельба, снаряды, взрывы, здоровье
//!
//! ECS ответственность:
//! - Game state: TankHealth, TankShooting (заряд)
//! - Combat rules: linear falloff damage, explosion impulse
//! - Events: ShellContact (физика → ECS), TankDestroyed, AudioCue
//!
//! Хост (физика) ответственность:
//! - Trigger/collision detection снаряда → ShellContact
//! - Интеграция ExternalImpulse
//!
//! Для headless режима есть упрощённая ballistics (shell.rs): гравитация +
//! контакт с землёй или корпусом танка.

use bevy::prelude::*;

pub mod explosion;
pub mod health;
pub mod shell;
pub mod shooting;


pub use explosion::{
    calculate_damage, DespawnAfter, ExplosionEvent, ExplosionFx, ExplosionKind,
};
pub use health::{TankDestroyed, TankHealth};
pub use shell::{spawn_shell, Shell, ShellContact};
pub use shooting::{ShotAction, TankShooting};

use crate::SimulationSet;

/// Combat Plugin
///
/// FixedUpdate (SimulationSet::Combat), порядок:
/// 1. integrate_shells — полёт снарядов
/// 2. expire_shells — самоуничтожение по max_lifetime
/// 3. detect_shell_contacts — headless контакты (земля / танк)
/// 4. detonate_shells — ShellContact → взрыв, урон, impulse
/// 5. deactivate_destroyed_tanks — TankDestroyed → сессия неактивна
/// 6. despawn_after_timeout — уборка detached эффектов
///
/// Update (SimulationSet::Combat): charge_and_fire — зарядка и выстрел по input.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ShellContact>()
            .add_event::<TankDestroyed>()
            .register_type::<TankHealth>()
            .register_type::<TankShooting>()
            .register_type::<Shell>();

        app.add_systems(
            FixedUpdate,
            (
                shell::integrate_shells,
                shell::expire_shells,
                shell::detect_shell_contacts,
                explosion::detonate_shells,
                health::deactivate_destroyed_tanks,
                explosion::despawn_after_timeout,
            )
                .chain() // Последовательное выполнение
                .in_set(SimulationSet::Combat),
        );

        app.add_systems(
            Update,
            shooting::charge_and_fire.in_set(SimulationSet::Combat),
        );
    }
}
