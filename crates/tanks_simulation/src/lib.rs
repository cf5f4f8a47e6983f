//! Tanks Simulation Core
//!
//! ECS-симуляция локального tank deathmatch на Bevy 0.16
//!
//! Разделение ответственности:
//! - ECS = game state (сессии, раунды, урон, камера, телеметрия)
//! - Хост = рендер, физика коллизий, звук, UI (читает компоненты/события)

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod audio;
pub mod camera;
pub mod combat;
pub mod config;
pub mod logger;
pub mod round;
pub mod session;
pub mod tank;
pub mod telemetry;

// Re-export для удобства
pub use audio::{AudioCue, AudioCueKind};
pub use camera::{CameraPlugin, CameraRig};
pub use combat::{
    calculate_damage, CombatPlugin, ExplosionFx, Shell, ShellContact, TankDestroyed, TankHealth,
    TankShooting,
};
pub use config::{
    CameraConfig, ConfigError, GameConfig, GameSetup, ShellConfig, SpawnPoint, SpawnPoints,
    TankConfig,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use round::{RoundEffect, RoundMessage, RoundPlugin, RoundState, RoundStateMachine};
pub use session::{TankColor, TankSession, TankSessions};
pub use tank::{FireButton, Tank, TankInput, TankPlugin};
pub use telemetry::{HighlightRequest, HighlightSink, Highlights, TelemetryPlugin};

/// Частота физического тика
pub const SIMULATION_HZ: u64 = 60;

/// Длительность одного тика (FixedUpdate и Update в headless режиме)
pub fn simulation_tick() -> Duration {
    Duration::from_nanos(1_000_000_000 / SIMULATION_HZ)
}

/// Порядок подсистем внутри кадра (и в Update, и в FixedUpdate)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Tanks,
    Combat,
    Rounds,
    Camera,
    Telemetry,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Конфигурация проверяется при создании: невалидный setup не доходит до App.
pub struct SimulationPlugin {
    setup: GameSetup,
}

impl SimulationPlugin {
    pub fn new(setup: GameSetup) -> Result<Self, ConfigError> {
        setup.validate()?;
        Ok(Self { setup })
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let sets = (
            SimulationSet::Tanks,
            SimulationSet::Combat,
            SimulationSet::Rounds,
            SimulationSet::Camera,
            SimulationSet::Telemetry,
        );

        app.configure_sets(Update, sets.chain())
            .configure_sets(FixedUpdate, sets.chain())
            // Конфигурация (read-only во время игры)
            .insert_resource(self.setup.game.clone())
            .insert_resource(self.setup.tank.clone())
            .insert_resource(self.setup.shell.clone())
            .insert_resource(self.setup.camera.clone())
            .insert_resource(SpawnPoints(self.setup.spawn_points.clone()))
            // Состояние игры
            .insert_resource(RoundStateMachine::new(self.setup.game.clone()))
            .init_resource::<TankSessions>()
            .init_resource::<DeterministicRng>()
            .add_event::<AudioCue>()
            .register_type::<GameConfig>()
            .register_type::<TankConfig>()
            .register_type::<ShellConfig>()
            .register_type::<CameraConfig>()
            // Подсистемы
            .add_plugins((
                TankPlugin,
                CombatPlugin,
                RoundPlugin,
                CameraPlugin,
                TelemetryPlugin,
            ));

        logger::log_info(&format!(
            "Simulation configured: {} tanks, {} rounds to win",
            self.setup.spawn_points.len(),
            self.setup.game.rounds_to_win
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `update()` = ровно один тик, FixedUpdate срабатывает
/// один раз за кадр (первый кадр — нулевой delta).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(simulation_tick()))
        .insert_resource(TimeUpdateStrategy::ManualDuration(simulation_tick()));

    app
}

/// Headless App с полной симуляцией игры
pub fn create_game_app(seed: u64, setup: GameSetup) -> Result<App, ConfigError> {
    let plugin = SimulationPlugin::new(setup)?;
    let mut app = create_headless_app(seed);
    app.add_plugins(plugin);

    Ok(app)
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
