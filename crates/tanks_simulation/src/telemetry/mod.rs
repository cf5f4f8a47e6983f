//! Highlights telemetry (скриншоты/видео достижений)
//!
//! Сам SDK записи — внешний коллаборатор за трейтом `HighlightSink`.
//! По умолчанию sink пустой (NoopHighlights): игра от него не зависит.
//!
//! Когда что отправляем:
//! - HEAVY_DUTY_TRAVELER (скриншот, MISC_GROUP): игрок 1 проехал > 200 за
//!   игру, во время Playing, один раз за игру
//! - KABOOM (скриншот, SHOT_HIGHLIGHT_GROUP): Playing закончился в чётном раунде
//! - HURT_ME_PLENTY (видео -3000..+2000 мс, SHOT_HIGHLIGHT_GROUP): конец
//!   Playing в раунде 3
//! - Summary: игра выиграна

use bevy::prelude::*;

use crate::round::{RoundEffect, RoundStateMachine};
use crate::session::TankSessions;
use crate::SimulationSet;

/// Пробег игрока 1, после которого срабатывает HEAVY_DUTY_TRAVELER
pub const TRAVELER_DISTANCE: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightId {
    HurtMePlenty,
    Kaboom,
    HeavyDutyTraveler,
}

impl HighlightId {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightId::HurtMePlenty => "HURT_ME_PLENTY",
            HighlightId::Kaboom => "KABOOM",
            HighlightId::HeavyDutyTraveler => "HEAVY_DUTY_TRAVELER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightGroup {
    ShotHighlights,
    Misc,
}

impl HighlightGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightGroup::ShotHighlights => "SHOT_HIGHLIGHT_GROUP",
            HighlightGroup::Misc => "MISC_GROUP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightCapture {
    Screenshot,
    /// Окно видео относительно момента запроса, мс (отрицательное — прошлое)
    Video { start_delta_ms: i32, end_delta_ms: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRequest {
    pub id: HighlightId,
    pub group: HighlightGroup,
    pub capture: HighlightCapture,
}

impl HighlightRequest {
    pub fn heavy_duty_traveler() -> Self {
        Self {
            id: HighlightId::HeavyDutyTraveler,
            group: HighlightGroup::Misc,
            capture: HighlightCapture::Screenshot,
        }
    }

    pub fn kaboom() -> Self {
        Self {
            id: HighlightId::Kaboom,
            group: HighlightGroup::ShotHighlights,
            capture: HighlightCapture::Screenshot,
        }
    }

    pub fn hurt_me_plenty() -> Self {
        Self {
            id: HighlightId::HurtMePlenty,
            group: HighlightGroup::ShotHighlights,
            capture: HighlightCapture::Video {
                start_delta_ms: -3000,
                end_delta_ms: 2000,
            },
        }
    }
}

/// Внешний сервис highlights
pub trait HighlightSink: Send + Sync {
    fn record(&mut self, request: HighlightRequest);

    /// Показать сводку highlights за игру
    fn open_summary(&mut self) {}
}

/// Sink по умолчанию: ничего не делает
pub struct NoopHighlights;

impl HighlightSink for NoopHighlights {
    fn record(&mut self, _request: HighlightRequest) {}
}

/// Highlights текущей игры + подключённый sink
#[derive(Resource)]
pub struct Highlights {
    sink: Box<dyn HighlightSink>,
    /// HEAVY_DUTY_TRAVELER уже выдан в этой игре
    traveler_awarded: bool,
}

impl Default for Highlights {
    fn default() -> Self {
        Self::with_sink(Box::new(NoopHighlights))
    }
}

impl Highlights {
    pub fn with_sink(sink: Box<dyn HighlightSink>) -> Self {
        Self {
            sink,
            traveler_awarded: false,
        }
    }

    pub fn traveler_awarded(&self) -> bool {
        self.traveler_awarded
    }

    /// Проверка пробега игрока 1 (вызывается каждый кадр Playing)
    pub fn check_traveler(&mut self, sessions: &TankSessions) {
        if self.traveler_awarded {
            return;
        }
        let Some(player_one) = sessions.get(0) else {
            return;
        };

        if player_one.distance_traveled > TRAVELER_DISTANCE {
            self.traveler_awarded = true;
            self.submit(HighlightRequest::heavy_duty_traveler());
        }
    }

    /// Реакция на переходы раунда
    pub fn observe(&mut self, effect: &RoundEffect) {
        match effect {
            RoundEffect::PlayFinished { round } => {
                if round % 2 == 0 {
                    self.submit(HighlightRequest::kaboom());
                }
                if *round == 3 {
                    self.submit(HighlightRequest::hurt_me_plenty());
                }
            }
            RoundEffect::GameWon { .. } => {
                crate::logger::log_info("Opening highlights summary");
                self.sink.open_summary();
                // Новая игра — достижение снова доступно
                self.traveler_awarded = false;
            }
            _ => {}
        }
    }

    fn submit(&mut self, request: HighlightRequest) {
        crate::logger::log(&format!(
            "Highlight {} ({}) {:?}",
            request.id.as_str(),
            request.group.as_str(),
            request.capture
        ));
        self.sink.record(request);
    }
}

/// Система: переходы раунда и пробег → highlights
pub fn report_highlights(
    mut effects: EventReader<RoundEffect>,
    machine: Res<RoundStateMachine>,
    sessions: Res<TankSessions>,
    mut highlights: ResMut<Highlights>,
) {
    if machine.is_playing() {
        highlights.check_traveler(&sessions);
    }

    for effect in effects.read() {
        highlights.observe(effect);
    }
}

/// Telemetry Plugin
///
/// Update (SimulationSet::Telemetry, после раундов): report_highlights.
/// Sink подключается вставкой `Highlights::with_sink(..)` до запуска.
pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Highlights>()
            .add_systems(Update, report_highlights.in_set(SimulationSet::Telemetry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnPoint;
    use crate::session::{TankColor, TankSession};
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct RecordingSink {
        requests: Arc<Mutex<Vec<HighlightRequest>>>,
        summaries: Arc<Mutex<u32>>,
    }

    impl HighlightSink for RecordingSink {
        fn record(&mut self, request: HighlightRequest) {
            self.requests.lock().unwrap().push(request);
        }

        fn open_summary(&mut self) {
            *self.summaries.lock().unwrap() += 1;
        }
    }

    fn sessions(player_one_distance: f32) -> TankSessions {
        let spawn = SpawnPoint::new(Vec3::ZERO, 0.0, TankColor::BLUE);
        let mut first = TankSession::new(1, &spawn, Entity::PLACEHOLDER);
        first.distance_traveled = player_one_distance;
        let second = TankSession::new(2, &spawn, Entity::PLACEHOLDER);
        TankSessions::new(vec![first, second])
    }

    #[test]
    fn test_even_round_kaboom_only() {
        let sink = RecordingSink::default();
        let mut highlights = Highlights::with_sink(Box::new(sink.clone()));

        highlights.observe(&RoundEffect::PlayFinished { round: 1 });
        highlights.observe(&RoundEffect::PlayFinished { round: 2 });

        assert_eq!(*sink.requests.lock().unwrap(), vec![HighlightRequest::kaboom()]);
    }

    #[test]
    fn test_round_three_video() {
        let sink = RecordingSink::default();
        let mut highlights = Highlights::with_sink(Box::new(sink.clone()));

        highlights.observe(&RoundEffect::PlayFinished { round: 3 });

        let requests = sink.requests.lock().unwrap().clone();
        assert_eq!(requests, vec![HighlightRequest::hurt_me_plenty()]);
        assert_eq!(
            requests[0].capture,
            HighlightCapture::Video {
                start_delta_ms: -3000,
                end_delta_ms: 2000
            }
        );
    }

    #[test]
    fn test_traveler_once_per_game() {
        let sink = RecordingSink::default();
        let mut highlights = Highlights::with_sink(Box::new(sink.clone()));

        highlights.check_traveler(&sessions(150.0));
        assert!(sink.requests.lock().unwrap().is_empty());

        highlights.check_traveler(&sessions(200.5));
        highlights.check_traveler(&sessions(300.0));
        assert_eq!(sink.requests.lock().unwrap().len(), 1);
        assert!(highlights.traveler_awarded());

        // После победы в игре — снова доступно
        highlights.observe(&RoundEffect::GameWon { winner: 0 });
        assert!(!highlights.traveler_awarded());
        assert_eq!(*sink.summaries.lock().unwrap(), 1);

        highlights.check_traveler(&sessions(250.0));
        assert_eq!(sink.requests.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_other_effects_ignored() {
        let sink = RecordingSink::default();
        let mut highlights = Highlights::with_sink(Box::new(sink.clone()));

        highlights.observe(&RoundEffect::ResetTanks);
        highlights.observe(&RoundEffect::RoundEnded { round: 2, winner: Some(1) });
        highlights.observe(&RoundEffect::Message("ROUND 2".to_string()));

        assert!(sink.requests.lock().unwrap().is_empty());
        assert_eq!(*sink.summaries.lock().unwrap(), 0);
    }

    #[test]
    fn test_ids_and_groups() {
        assert_eq!(HighlightId::HeavyDutyTraveler.as_str(), "HEAVY_DUTY_TRAVELER");
        assert_eq!(HighlightGroup::ShotHighlights.as_str(), "SHOT_HIGHLIGHT_GROUP");
        assert_eq!(HighlightRequest::heavy_duty_traveler().group, HighlightGroup::Misc);
    }
}
