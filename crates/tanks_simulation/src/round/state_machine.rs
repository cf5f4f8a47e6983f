//! Round/Game state machine
//!
//! Цикл: Starting → Playing → Ending → (Starting | новая игра → Starting).
//! Машина тикается снаружи (`tick(dt, sessions)`), таймеры — счётчики,
//! уменьшаемые на dt. Побочные эффекты (сброс танков, камера, текст) не
//! выполняются здесь, а возвращаются списком `RoundEffect` для хоста.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::session::TankSession;

/// Фаза раунда
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum RoundState {
    /// Танки сброшены, показываем "ROUND N", ждём start_delay
    Starting { remaining: f32 },
    /// Управление включено, ждём пока останется ≤ 1 танка
    Playing,
    /// Управление выключено, показываем результат, ждём end_delay
    Ending { remaining: f32 },
}

/// Что хост должен сделать после тика (в порядке выдачи)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum RoundEffect {
    /// Вернуть танки всех сессий на spawn point, восстановить здоровье
    ResetTanks,
    /// Поставить камеру в позицию/размер без сглаживания
    SnapCamera,
    /// Управление включено/выключено у всех сессий
    ControlChanged { enabled: bool },
    /// Текст для message UI (пустая строка = очистить)
    Message(String),
    /// Playing закончился (до подсчёта победителя)
    PlayFinished { round: u32 },
    /// Раунд закончился; `winner` — индекс сессии, None = ничья
    RoundEnded { round: u32, winner: Option<usize> },
    /// Игра закончилась (после end_delay), дальше начнётся новая
    GameWon { winner: usize },
}

/// GameManager: раунды, счёт, победители
#[derive(Resource, Debug, Clone)]
pub struct RoundStateMachine {
    config: GameConfig,
    /// None — игра ещё не стартовала
    state: Option<RoundState>,
    round_number: u32,
    round_winner: Option<usize>,
    game_winner: Option<usize>,
    games_completed: u32,
}

impl RoundStateMachine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
            round_number: 0,
            round_winner: None,
            game_winner: None,
            games_completed: 0,
        }
    }

    pub fn state(&self) -> Option<RoundState> {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.state.is_some()
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, Some(RoundState::Playing))
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn round_winner(&self) -> Option<usize> {
        self.round_winner
    }

    pub fn game_winner(&self) -> Option<usize> {
        self.game_winner
    }

    pub fn games_completed(&self) -> u32 {
        self.games_completed
    }

    /// Старт первого раунда. Повторный вызов игнорируется.
    pub fn start(&mut self, sessions: &mut [TankSession]) -> Vec<RoundEffect> {
        let mut effects = Vec::new();
        if self.state.is_none() {
            self.enter_starting(sessions, &mut effects);
        }
        effects
    }

    /// Один кадр. Первый тик без `start` сам запускает игру.
    pub fn tick(&mut self, dt: f32, sessions: &mut [TankSession]) -> Vec<RoundEffect> {
        let mut effects = Vec::new();

        match self.state {
            None => self.enter_starting(sessions, &mut effects),

            Some(RoundState::Starting { remaining }) => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.enter_playing(sessions, &mut effects);
                } else {
                    self.state = Some(RoundState::Starting { remaining });
                }
            }

            Some(RoundState::Playing) => {
                if one_tank_left(sessions) {
                    self.finish_playing(sessions, &mut effects);
                }
            }

            Some(RoundState::Ending { remaining }) => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.state = Some(RoundState::Ending { remaining });
                } else {
                    if let Some(winner) = self.game_winner {
                        effects.push(RoundEffect::GameWon { winner });
                        self.restart_game(sessions);
                    }
                    self.enter_starting(sessions, &mut effects);
                }
            }
        }

        effects
    }

    fn enter_starting(&mut self, sessions: &mut [TankSession], effects: &mut Vec<RoundEffect>) {
        for session in sessions.iter_mut() {
            session.reset();
        }
        effects.push(RoundEffect::ResetTanks);
        effects.push(RoundEffect::ControlChanged { enabled: false });
        effects.push(RoundEffect::SnapCamera);

        self.round_number += 1;
        effects.push(RoundEffect::Message(format!("ROUND {}", self.round_number)));

        crate::logger::log_info(&format!("🏁 Round {} starting", self.round_number));
        self.state = Some(RoundState::Starting {
            remaining: self.config.start_delay,
        });
    }

    fn enter_playing(&mut self, sessions: &mut [TankSession], effects: &mut Vec<RoundEffect>) {
        for session in sessions.iter_mut() {
            session.enable_control();
        }
        effects.push(RoundEffect::ControlChanged { enabled: true });
        effects.push(RoundEffect::Message(String::new()));

        crate::logger::log(&format!("Round {}: Starting → Playing", self.round_number));
        self.state = Some(RoundState::Playing);

        // Предикат проверяется уже в кадре входа
        if one_tank_left(sessions) {
            self.finish_playing(sessions, effects);
        }
    }

    fn finish_playing(&mut self, sessions: &mut [TankSession], effects: &mut Vec<RoundEffect>) {
        effects.push(RoundEffect::PlayFinished {
            round: self.round_number,
        });
        self.enter_ending(sessions, effects);
    }

    fn enter_ending(&mut self, sessions: &mut [TankSession], effects: &mut Vec<RoundEffect>) {
        for session in sessions.iter_mut() {
            session.disable_control();
        }
        effects.push(RoundEffect::ControlChanged { enabled: false });

        self.round_winner = round_winner(sessions);
        if let Some(winner) = self.round_winner {
            sessions[winner].wins += 1;
        }
        self.game_winner = game_winner(sessions, self.config.rounds_to_win);

        effects.push(RoundEffect::RoundEnded {
            round: self.round_number,
            winner: self.round_winner,
        });
        effects.push(RoundEffect::Message(end_message(
            sessions,
            self.round_winner,
            self.game_winner,
        )));

        match (self.round_winner, self.game_winner) {
            (_, Some(game)) => crate::logger::log_info(&format!(
                "🏆 Player {} wins the game after round {}",
                sessions[game].player_number, self.round_number
            )),
            (Some(round), None) => crate::logger::log_info(&format!(
                "Round {} won by player {} ({} wins)",
                self.round_number, sessions[round].player_number, sessions[round].wins
            )),
            (None, None) => {
                crate::logger::log_info(&format!("Round {} ended in a draw", self.round_number))
            }
        }

        self.state = Some(RoundState::Ending {
            remaining: self.config.end_delay,
        });
    }

    /// Аналог перезагрузки сцены: новая игра с нуля
    fn restart_game(&mut self, sessions: &mut [TankSession]) {
        for session in sessions.iter_mut() {
            session.clear_game_progress();
        }
        self.round_number = 0;
        self.round_winner = None;
        self.game_winner = None;
        self.games_completed += 1;
    }
}

/// Раунд окончен, когда в арене ≤ 1 живого танка
pub fn one_tank_left(sessions: &[TankSession]) -> bool {
    sessions.iter().filter(|s| s.is_active).count() <= 1
}

/// Первая живая сессия. Вызывается когда живых ≤ 1, так что она единственная.
pub fn round_winner(sessions: &[TankSession]) -> Option<usize> {
    sessions.iter().position(|s| s.is_active)
}

/// Первая сессия, набравшая `rounds_to_win`
pub fn game_winner(sessions: &[TankSession], rounds_to_win: u32) -> Option<usize> {
    sessions.iter().position(|s| s.wins == rounds_to_win)
}

/// Текст конца раунда: заголовок + счёт всех игроков, либо объявление победителя игры
pub fn end_message(
    sessions: &[TankSession],
    round_winner: Option<usize>,
    game_winner: Option<usize>,
) -> String {
    if let Some(game) = game_winner.and_then(|i| sessions.get(i)) {
        return format!("{} WINS THE GAME!", game.colored_player_text());
    }

    let mut message = match round_winner.and_then(|i| sessions.get(i)) {
        Some(winner) => format!("{} WINS THE ROUND!", winner.colored_player_text()),
        None => String::from("DRAW!"),
    };

    message.push_str("\n\n\n\n");

    for session in sessions {
        message.push_str(&format!(
            "{}: {} WINS\n",
            session.colored_player_text(),
            session.wins
        ));
    }

    message
}
