//! Tank sessions — состояние игрока, живущее дольше одного раунда
//!
//! Сессия (wins, цвет, spawn point) отделена от танка в арене:
//! танк может умереть и воскреснуть, сессия остаётся.
//! Сессии — простые данные, их мутирует round state machine.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SpawnPoint;

/// Цвет игрока (RGB, 0-255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub struct TankColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TankColor {
    pub const BLUE: Self = Self::rgb(42, 100, 178);
    pub const RED: Self = Self::rgb(229, 46, 40);
    pub const GREEN: Self = Self::rgb(65, 160, 60);
    pub const YELLOW: Self = Self::rgb(225, 200, 40);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// HTML hex без '#', upper case ("2A64B2")
    pub fn to_html_rgb(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Состояние одного игрока на всю игру
#[derive(Debug, Clone, PartialEq)]
pub struct TankSession {
    /// 1-based номер игрока
    pub player_number: u32,
    /// Выигранные раунды (монотонно растёт внутри игры)
    pub wins: u32,
    /// Танк в арене жив
    pub is_active: bool,
    /// Input обрабатывается (движение, стрельба, звук двигателя)
    pub control_enabled: bool,
    pub color: TankColor,
    pub start_position: Vec3,
    pub start_rotation: Quat,
    /// Суммарный пробег танка за игру (для highlights)
    pub distance_traveled: f32,
    /// Танк в арене, которым управляет сессия
    pub instance: Entity,
}

impl TankSession {
    pub fn new(player_number: u32, spawn: &SpawnPoint, instance: Entity) -> Self {
        Self {
            player_number,
            wins: 0,
            is_active: true,
            control_enabled: false,
            color: spawn.color,
            start_position: spawn.position,
            start_rotation: spawn.rotation(),
            distance_traveled: 0.0,
            instance,
        }
    }

    /// "<color=#2A64B2>PLAYER 1</color>" — rich text для UI
    pub fn colored_player_text(&self) -> String {
        format!(
            "<color=#{}>PLAYER {}</color>",
            self.color.to_html_rgb(),
            self.player_number
        )
    }

    /// Начало раунда: танк снова в арене, но без управления.
    /// Позицию/поворот танка ставит хост по `start_position`/`start_rotation`.
    pub fn reset(&mut self) {
        self.is_active = true;
        self.control_enabled = false;
    }

    pub fn enable_control(&mut self) {
        self.control_enabled = true;
    }

    pub fn disable_control(&mut self) {
        self.control_enabled = false;
    }

    pub fn is_controllable(&self) -> bool {
        self.is_active && self.control_enabled
    }

    /// Новая игра: счёт и пробег обнуляются
    pub fn clear_game_progress(&mut self) {
        self.wins = 0;
        self.distance_traveled = 0.0;
    }
}

/// Все сессии в порядке player number
#[derive(Resource, Debug, Clone, Default)]
pub struct TankSessions {
    sessions: Vec<TankSession>,
}

impl TankSessions {
    pub fn new(sessions: Vec<TankSession>) -> Self {
        Self { sessions }
    }

    pub fn push(&mut self, session: TankSession) -> usize {
        self.sessions.push(session);
        self.sessions.len() - 1
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TankSession> {
        self.sessions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TankSession> {
        self.sessions.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TankSession> {
        self.sessions.iter()
    }

    pub fn as_slice(&self) -> &[TankSession] {
        &self.sessions
    }

    pub fn as_mut_slice(&mut self) -> &mut [TankSession] {
        &mut self.sessions
    }

    pub fn active_count(&self) -> usize {
        self.sessions.iter().filter(|s| s.is_active).count()
    }

    /// Управляемость танка сессии `index` (false для несуществующей сессии)
    pub fn is_controllable(&self, index: usize) -> bool {
        self.sessions
            .get(index)
            .is_some_and(TankSession::is_controllable)
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.sessions.get(index).is_some_and(|s| s.is_active)
    }
}
