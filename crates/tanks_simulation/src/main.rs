//! Headless матч Tanks
//!
//! Запускает полную игру без рендера: танками управляет простой автопилот
//! (поворот к ближайшему врагу, сближение, выстрел с зарядом по дистанции).
//! Печатает сообщения раундов до первой победы в игре.

use bevy::prelude::*;
use rand::Rng;
use tanks_simulation::{
    create_game_app, log_error, log_info, DeterministicRng, GameSetup, RoundMessage,
    RoundStateMachine, SimulationSet, Tank, TankInput, TankSessions, TankShooting,
};

/// Предел матча в тиках (20 минут игрового времени)
const MAX_TICKS: u32 = 60 * 60 * 20;

/// Ближе этой дистанции автопилот не подъезжает
const HOLD_DISTANCE: f32 = 18.0;
/// Дальность уверенного выстрела
const FIRE_RANGE: f32 = 32.0;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    println!("Starting Tanks headless match (seed: {})", seed);

    let mut app = match create_game_app(seed, GameSetup::default()) {
        Ok(app) => app,
        Err(error) => {
            log_error(&format!("Invalid game setup: {}", error));
            std::process::exit(1);
        }
    };
    app.add_systems(Update, autopilot.before(SimulationSet::Tanks));

    let mut last_message = String::new();
    for tick in 0..MAX_TICKS {
        app.update();

        let message = &app.world().resource::<RoundMessage>().text;
        if *message != last_message {
            if !message.is_empty() {
                println!("[tick {}] {}", tick, message);
            }
            last_message.clone_from(message);
        }

        if app.world().resource::<RoundStateMachine>().games_completed() > 0 {
            log_info(&format!("Match finished after {} ticks", tick + 1));
            println!("Match complete!");
            return;
        }
    }

    println!("Match stopped after {} ticks without a winner", MAX_TICKS);
}

/// Автопилот: заполняет TankInput как игрок с геймпадом
fn autopilot(
    sessions: Res<TankSessions>,
    mut rng: ResMut<DeterministicRng>,
    mut tanks: Query<(&Tank, &Transform, &TankShooting, &mut TankInput)>,
) {
    let positions: Vec<(usize, Vec3)> = tanks
        .iter()
        .filter(|(tank, ..)| sessions.is_active(tank.session))
        .map(|(tank, transform, ..)| (tank.session, transform.translation))
        .collect();

    for (tank, transform, shooting, mut input) in tanks.iter_mut() {
        if !sessions.is_controllable(tank.session) {
            continue;
        }

        let nearest = positions
            .iter()
            .filter(|(session, _)| *session != tank.session)
            .map(|(_, position)| *position - transform.translation)
            .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()));

        let Some(offset) = nearest else {
            *input = TankInput::default();
            continue;
        };

        let distance = offset.length();
        let forward = transform.forward().as_vec3();
        let direction = Vec3::new(offset.x, 0.0, offset.z).normalize_or_zero();

        // > 0 — цель справа
        let side = forward.x * direction.z - forward.z * direction.x;
        let facing = forward.dot(direction);

        input.turn = if facing < 0.0 && side.abs() < 0.1 {
            1.0
        } else {
            (side * 3.0).clamp(-1.0, 1.0)
        };
        input.movement = if distance > HOLD_DISTANCE && facing > 0.5 {
            1.0
        } else {
            0.0
        };

        // Дальность полёта снаряда ≈ launch force (при высоте ствола 1.7)
        if input.fire.held {
            let jitter = rng.rng.gen_range(-2.0..2.0);
            // Автовыстрел на максимуме уже случился — отпускаем кнопку
            if shooting.fired || shooting.current_launch_force >= distance + jitter {
                input.fire.release();
            }
        } else if facing > 0.97 && distance < FIRE_RANGE {
            input.fire.press();
        }
    }
}
