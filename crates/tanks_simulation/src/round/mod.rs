//! Round/Game management (GameManager)
//!
//! - state_machine: чистая логика раундов, тикается снаружи
//! - systems: Bevy-обвязка (спавн танков, тик машины, применение эффектов)
//!
//! Машина работает в Update (кадр), а не в FixedUpdate: ожидание "остался
//! один танк" проверяется раз в кадр.

use bevy::prelude::*;

pub mod state_machine;
pub mod systems;

#[cfg(test)]
mod state_machine_tests;

pub use state_machine::{end_message, RoundEffect, RoundState, RoundStateMachine};
pub use systems::RoundMessage;

use crate::SimulationSet;

/// Round Plugin
///
/// Startup: spawn_all_tanks (одна сессия на spawn point).
/// Update (SimulationSet::Rounds):
/// 1. drive_round_state_machine — тик машины, публикация RoundEffect
/// 2. apply_round_effects — сброс танков, текст, очистка арены
pub struct RoundPlugin;

impl Plugin for RoundPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RoundEffect>()
            .init_resource::<RoundMessage>()
            .add_systems(Startup, systems::spawn_all_tanks)
            .add_systems(
                Update,
                (
                    systems::drive_round_state_machine,
                    systems::apply_round_effects,
                )
                    .chain()
                    .in_set(SimulationSet::Rounds),
            );
    }
}
