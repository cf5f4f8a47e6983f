//! Authoring-time конфигурация матча
//!
//! Все значения задаются до старта (как поля сцены), в рантайме не парсятся.
//! `GameSetup::validate` — единственное место, где ловим мисконфигурацию:
//! симуляция дальше считает предусловия выполненными.

use std::fmt;

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;
use serde::{Deserialize, Serialize};

use crate::session::TankColor;

/// Физический слой танков (explosion overlap фильтрует по нему)
pub const TANK_LAYER: Group = Group::GROUP_1;

/// Параметры раундов (GameManager)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
pub struct GameConfig {
    /// Сколько раундов нужно выиграть для победы в игре
    pub rounds_to_win: u32,
    /// Пауза между "ROUND N" и началом игры (секунды)
    pub start_delay: f32,
    /// Пауза после объявления результата раунда (секунды)
    pub end_delay: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rounds_to_win: 5,
            start_delay: 3.0,
            end_delay: 3.0,
        }
    }
}

/// Параметры танка: движение, здоровье, стрельба
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
pub struct TankConfig {
    /// Скорость движения (m/s)
    pub speed: f32,
    /// Скорость поворота (градусы/сек)
    pub turn_speed: f32,
    pub starting_health: f32,
    /// Базовый pitch звука двигателя
    pub original_pitch: f32,
    /// Разброс pitch при смене клипа (±)
    pub pitch_range: f32,
    pub min_launch_force: f32,
    pub max_launch_force: f32,
    /// Время зарядки от min до max (секунды)
    pub max_charge_time: f32,
    /// Множитель скорости снаряда поверх launch force
    pub shell_speed_multiplier: f32,
    /// Точка выстрела: высота над корпусом
    pub fire_height: f32,
    /// Точка выстрела: вынос вперёд от центра
    pub fire_forward_offset: f32,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            speed: 15.0,
            turn_speed: 180.0,
            starting_health: 100.0,
            original_pitch: 1.0,
            pitch_range: 0.2,
            min_launch_force: 15.0,
            max_launch_force: 30.0,
            max_charge_time: 0.75,
            shell_speed_multiplier: 1.7,
            fire_height: 1.7,
            fire_forward_offset: 1.35,
        }
    }
}

/// Параметры снаряда и взрыва
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
pub struct ShellConfig {
    pub explosion_force: f32,
    pub max_damage: f32,
    /// Снаряд самоуничтожается без взрыва через это время
    pub max_lifetime: f32,
    pub explosion_radius: f32,
    /// Bits слоя, по которому ищем цели (см. `TANK_LAYER`)
    pub target_layer: u32,
    /// Дистанция до танка, на которой считаем контакт (headless ballistics)
    pub hit_radius: f32,
    /// Длительность detached эффекта взрыва снаряда
    pub explosion_effect_duration: f32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            explosion_force: 1000.0,
            max_damage: 100.0,
            max_lifetime: 2.0,
            explosion_radius: 5.0,
            target_layer: TANK_LAYER.bits(),
            hit_radius: 1.0,
            explosion_effect_duration: 1.5,
        }
    }
}

impl ShellConfig {
    pub fn target_group(&self) -> Group {
        Group::from_bits_truncate(self.target_layer)
    }
}

/// Параметры camera rig
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
pub struct CameraConfig {
    /// Примерное время, за которое камера догоняет цель (секунды)
    pub damp_time: f32,
    /// Запас по краям экрана поверх самого дальнего танка
    pub screen_edge_buffer: f32,
    /// Минимальный orthographic size
    pub min_size: f32,
    /// Наклон rig'а (градусы, вокруг X)
    pub pitch_degrees: f32,
    /// Поворот rig'а (градусы, вокруг Y)
    pub yaw_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            damp_time: 0.3,
            screen_edge_buffer: 4.0,
            min_size: 18.0,
            pitch_degrees: 40.0,
            yaw_degrees: 60.0,
        }
    }
}

impl CameraConfig {
    /// Поворот rig'а: forward (-Z) наклонён вниз на арену
    pub fn rig_rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw_degrees.to_radians(),
            -self.pitch_degrees.to_radians(),
            0.0,
        )
    }
}

/// Точка спавна одного игрока
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SpawnPoint {
    pub position: Vec3,
    /// Поворот вокруг Y (градусы)
    pub yaw_degrees: f32,
    pub color: TankColor,
}

impl SpawnPoint {
    pub fn new(position: Vec3, yaw_degrees: f32, color: TankColor) -> Self {
        Self {
            position,
            yaw_degrees,
            color,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw_degrees.to_radians())
    }
}

/// Список точек спавна (один игрок на точку, порядок = player number)
#[derive(Resource, Debug, Clone, Default)]
pub struct SpawnPoints(pub Vec<SpawnPoint>);

/// Полная конфигурация матча
#[derive(Debug, Clone, PartialEq)]
pub struct GameSetup {
    pub game: GameConfig,
    pub tank: TankConfig,
    pub shell: ShellConfig,
    pub camera: CameraConfig,
    pub spawn_points: Vec<SpawnPoint>,
}

impl Default for GameSetup {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            tank: TankConfig::default(),
            shell: ShellConfig::default(),
            camera: CameraConfig::default(),
            spawn_points: vec![
                SpawnPoint::new(Vec3::new(-3.0, 0.0, 30.0), 180.0, TankColor::BLUE),
                SpawnPoint::new(Vec3::new(13.0, 0.0, -5.0), 0.0, TankColor::RED),
            ],
        }
    }
}

impl GameSetup {
    /// Минимум сессий, при котором "остался один танк" имеет смысл
    pub const MIN_TANKS: usize = 2;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn_points.len() < Self::MIN_TANKS {
            return Err(ConfigError::NotEnoughTanks {
                configured: self.spawn_points.len(),
            });
        }

        if self.game.rounds_to_win == 0 {
            return Err(ConfigError::ZeroRoundsToWin);
        }
        check_non_negative("start_delay", self.game.start_delay)?;
        check_non_negative("end_delay", self.game.end_delay)?;

        check_positive("tank.speed", self.tank.speed)?;
        check_non_negative("tank.turn_speed", self.tank.turn_speed)?;
        check_positive("tank.starting_health", self.tank.starting_health)?;
        check_non_negative("tank.pitch_range", self.tank.pitch_range)?;
        check_positive("tank.max_charge_time", self.tank.max_charge_time)?;
        check_positive("tank.min_launch_force", self.tank.min_launch_force)?;
        if self.tank.min_launch_force > self.tank.max_launch_force {
            return Err(ConfigError::LaunchForceRange {
                min: self.tank.min_launch_force,
                max: self.tank.max_launch_force,
            });
        }

        check_positive("shell.explosion_radius", self.shell.explosion_radius)?;
        check_non_negative("shell.max_damage", self.shell.max_damage)?;
        check_non_negative("shell.explosion_force", self.shell.explosion_force)?;
        check_positive("shell.max_lifetime", self.shell.max_lifetime)?;
        check_non_negative("shell.hit_radius", self.shell.hit_radius)?;
        if self.shell.target_group().is_empty() {
            return Err(ConfigError::EmptyTargetLayer);
        }

        check_positive("camera.damp_time", self.camera.damp_time)?;
        check_positive("camera.min_size", self.camera.min_size)?;
        check_non_negative("camera.screen_edge_buffer", self.camera.screen_edge_buffer)?;

        Ok(())
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

/// Ошибки валидации конфигурации (до старта симуляции)
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NotEnoughTanks { configured: usize },
    ZeroRoundsToWin,
    NotPositive { field: &'static str, value: f32 },
    Negative { field: &'static str, value: f32 },
    LaunchForceRange { min: f32, max: f32 },
    EmptyTargetLayer,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotEnoughTanks { configured } => write!(
                f,
                "at least {} spawn points required, got {}",
                GameSetup::MIN_TANKS,
                configured
            ),
            ConfigError::ZeroRoundsToWin => write!(f, "rounds_to_win must be positive"),
            ConfigError::NotPositive { field, value } => {
                write!(f, "{} must be positive and finite, got {}", field, value)
            }
            ConfigError::Negative { field, value } => {
                write!(f, "{} must be non-negative and finite, got {}", field, value)
            }
            ConfigError::LaunchForceRange { min, max } => write!(
                f,
                "min_launch_force ({}) exceeds max_launch_force ({})",
                min, max
            ),
            ConfigError::EmptyTargetLayer => write!(f, "shell target layer has no bits set"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_setup_is_valid() {
        assert_eq!(GameSetup::default().validate(), Ok(()));
    }

    #[test]
    fn test_single_tank_rejected() {
        let mut setup = GameSetup::default();
        setup.spawn_points.truncate(1);

        assert_eq!(
            setup.validate(),
            Err(ConfigError::NotEnoughTanks { configured: 1 })
        );
    }

    #[test]
    fn test_zero_tanks_rejected() {
        let mut setup = GameSetup::default();
        setup.spawn_points.clear();

        assert!(matches!(
            setup.validate(),
            Err(ConfigError::NotEnoughTanks { configured: 0 })
        ));
    }

    #[test]
    fn test_zero_rounds_to_win_rejected() {
        let mut setup = GameSetup::default();
        setup.game.rounds_to_win = 0;

        assert_eq!(setup.validate(), Err(ConfigError::ZeroRoundsToWin));
    }

    #[test]
    fn test_bad_radius_rejected() {
        let mut setup = GameSetup::default();
        setup.shell.explosion_radius = 0.0;

        assert!(matches!(
            setup.validate(),
            Err(ConfigError::NotPositive { field: "shell.explosion_radius", .. })
        ));
    }

    #[test]
    fn test_nan_delay_rejected() {
        let mut setup = GameSetup::default();
        setup.game.end_delay = f32::NAN;

        assert!(matches!(
            setup.validate(),
            Err(ConfigError::Negative { field: "end_delay", .. })
        ));
    }

    #[test]
    fn test_inverted_launch_forces_rejected() {
        let mut setup = GameSetup::default();
        setup.tank.min_launch_force = 40.0;

        assert_eq!(
            setup.validate(),
            Err(ConfigError::LaunchForceRange { min: 40.0, max: 30.0 })
        );
    }

    #[test]
    fn test_empty_target_layer_rejected() {
        let mut setup = GameSetup::default();
        setup.shell.target_layer = 0;

        assert_eq!(setup.validate(), Err(ConfigError::EmptyTargetLayer));
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::NotEnoughTanks { configured: 1 };
        assert_eq!(err.to_string(), "at least 2 spawn points required, got 1");
    }

    #[test]
    fn test_spawn_rotation() {
        let spawn = SpawnPoint::new(Vec3::ZERO, 90.0, TankColor::RED);
        let forward = spawn.rotation() * Vec3::NEG_Z;

        assert!((forward - Vec3::NEG_X).length() < 1e-5, "forward = {:?}", forward);
    }

    #[test]
    fn test_rig_looks_down() {
        let forward = CameraConfig::default().rig_rotation() * Vec3::NEG_Z;

        // sin(40°) ≈ 0.643 вниз
        assert!((forward.y + 40f32.to_radians().sin()).abs() < 1e-5, "forward = {:?}", forward);
    }
}
