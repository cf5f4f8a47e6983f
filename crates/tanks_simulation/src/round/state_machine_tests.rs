//! Tests for the round/game state machine.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::config::{GameConfig, SpawnPoint};
    use crate::round::state_machine::*;
    use crate::session::{TankColor, TankSession};

    const DT: f32 = 0.5;

    const BLUE: &str = "<color=#2A64B2>PLAYER 1</color>";
    const RED: &str = "<color=#E52E28>PLAYER 2</color>";

    fn sessions(count: usize) -> Vec<TankSession> {
        let colors = [TankColor::BLUE, TankColor::RED, TankColor::GREEN, TankColor::YELLOW];
        (0..count)
            .map(|i| {
                let spawn = SpawnPoint::new(Vec3::new(i as f32 * 10.0, 0.0, 0.0), 0.0, colors[i % 4]);
                TankSession::new(i as u32 + 1, &spawn, Entity::PLACEHOLDER)
            })
            .collect()
    }

    fn machine(rounds_to_win: u32) -> RoundStateMachine {
        RoundStateMachine::new(GameConfig {
            rounds_to_win,
            start_delay: 3.0,
            end_delay: 3.0,
        })
    }

    /// Тикаем пока не начнётся Playing (или раунд сразу не закончится)
    fn run_until_playing(machine: &mut RoundStateMachine, sessions: &mut [TankSession]) -> Vec<RoundEffect> {
        let mut effects = Vec::new();
        for _ in 0..100 {
            effects.extend(machine.tick(DT, sessions));
            if !matches!(machine.state(), Some(RoundState::Starting { .. })) {
                return effects;
            }
        }
        panic!("Starting never finished");
    }

    fn run_until_starting(machine: &mut RoundStateMachine, sessions: &mut [TankSession]) -> Vec<RoundEffect> {
        let mut effects = Vec::new();
        for _ in 0..100 {
            effects.extend(machine.tick(DT, sessions));
            if matches!(machine.state(), Some(RoundState::Starting { .. })) {
                return effects;
            }
        }
        panic!("Ending never finished");
    }

    fn messages(effects: &[RoundEffect]) -> Vec<&str> {
        effects
            .iter()
            .filter_map(|e| match e {
                RoundEffect::Message(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_resets_and_announces_round() {
        let mut machine = machine(5);
        let mut sessions = sessions(2);
        sessions[1].is_active = false;
        sessions[0].control_enabled = true;

        let effects = machine.start(&mut sessions);

        assert_eq!(
            effects,
            vec![
                RoundEffect::ResetTanks,
                RoundEffect::ControlChanged { enabled: false },
                RoundEffect::SnapCamera,
                RoundEffect::Message("ROUND 1".to_string()),
            ]
        );
        assert!(sessions.iter().all(|s| s.is_active && !s.control_enabled));
        assert_eq!(machine.round_number(), 1);
        assert_eq!(machine.state(), Some(RoundState::Starting { remaining: 3.0 }));

        // Повторный start ничего не делает
        assert!(machine.start(&mut sessions).is_empty());
        assert_eq!(machine.round_number(), 1);
    }

    #[test]
    fn test_first_tick_starts_game() {
        let mut machine = machine(5);
        let mut sessions = sessions(2);

        let effects = machine.tick(DT, &mut sessions);

        assert!(effects.contains(&RoundEffect::SnapCamera));
        assert!(machine.is_started());
        assert_eq!(machine.round_number(), 1);
    }

    #[test]
    fn test_start_delay_counts_down() {
        let mut machine = machine(5);
        let mut sessions = sessions(2);
        machine.start(&mut sessions);

        // 3.0 сек / 0.5 = 6 тиков
        for tick in 0..5 {
            machine.tick(DT, &mut sessions);
            assert!(
                matches!(machine.state(), Some(RoundState::Starting { .. })),
                "tick {} left Starting early",
                tick
            );
            assert!(!sessions[0].control_enabled);
        }

        let effects = machine.tick(DT, &mut sessions);
        assert!(machine.is_playing());
        assert!(effects.contains(&RoundEffect::ControlChanged { enabled: true }));
        assert_eq!(messages(&effects), vec![""]);
        assert!(sessions.iter().all(|s| s.control_enabled));
    }

    #[test]
    fn test_playing_ends_exactly_when_one_left() {
        let mut machine = machine(5);
        let mut sessions = sessions(3);
        machine.start(&mut sessions);
        run_until_playing(&mut machine, &mut sessions);

        for _ in 0..10 {
            machine.tick(DT, &mut sessions);
            assert!(machine.is_playing());
        }

        sessions[0].is_active = false;
        machine.tick(DT, &mut sessions);
        assert!(machine.is_playing(), "2 active tanks must keep playing");

        sessions[2].is_active = false;
        let effects = machine.tick(DT, &mut sessions);
        assert!(matches!(machine.state(), Some(RoundState::Ending { .. })));
        assert!(effects.contains(&RoundEffect::PlayFinished { round: 1 }));
        assert!(effects.contains(&RoundEffect::RoundEnded { round: 1, winner: Some(1) }));
        assert!(sessions.iter().all(|s| !s.control_enabled));
        assert_eq!(sessions[1].wins, 1);
    }

    #[test]
    fn test_round_ends_on_entering_frame_if_already_decided() {
        let mut machine = machine(5);
        let mut sessions = sessions(2);
        machine.start(&mut sessions);

        // Танк погиб ещё во время Starting
        sessions[1].is_active = false;
        let effects = run_until_playing(&mut machine, &mut sessions);

        assert!(matches!(machine.state(), Some(RoundState::Ending { .. })));
        let enabled = effects
            .iter()
            .position(|e| *e == RoundEffect::ControlChanged { enabled: true });
        let finished = effects
            .iter()
            .position(|e| *e == RoundEffect::PlayFinished { round: 1 });
        assert!(enabled.is_some() && finished.is_some());
        assert!(enabled < finished);
        assert_eq!(sessions[0].wins, 1);
    }

    #[test]
    fn test_two_round_game_scenario() {
        let mut machine = machine(2);
        let mut sessions = sessions(2);
        machine.start(&mut sessions);

        // Round 1: A выживает
        run_until_playing(&mut machine, &mut sessions);
        sessions[1].is_active = false;
        let effects = machine.tick(DT, &mut sessions);

        assert_eq!(sessions[0].wins, 1);
        assert_eq!(machine.round_winner(), Some(0));
        assert_eq!(machine.game_winner(), None);
        let expected = format!(
            "{} WINS THE ROUND!\n\n\n\n{}: 1 WINS\n{}: 0 WINS\n",
            BLUE, BLUE, RED
        );
        assert_eq!(messages(&effects), vec![expected.as_str()]);

        // Round 2: B снова в арене
        let effects = run_until_starting(&mut machine, &mut sessions);
        assert!(!effects.iter().any(|e| matches!(e, RoundEffect::GameWon { .. })));
        assert_eq!(messages(&effects), vec!["ROUND 2"]);
        assert!(sessions[1].is_active);

        run_until_playing(&mut machine, &mut sessions);
        sessions[1].is_active = false;
        let effects = machine.tick(DT, &mut sessions);

        assert_eq!(sessions[0].wins, 2);
        assert_eq!(machine.game_winner(), Some(0));
        let expected = format!("{} WINS THE GAME!", BLUE);
        assert_eq!(messages(&effects), vec![expected.as_str()]);

        // После end_delay — новая игра с нуля
        let effects = run_until_starting(&mut machine, &mut sessions);
        assert!(effects.contains(&RoundEffect::GameWon { winner: 0 }));
        assert_eq!(messages(&effects), vec!["ROUND 1"]);
        assert_eq!(machine.round_number(), 1);
        assert_eq!(machine.games_completed(), 1);
        assert_eq!(machine.game_winner(), None);
        assert!(sessions.iter().all(|s| s.wins == 0));
    }

    #[test]
    fn test_draw_when_nobody_survives() {
        let mut machine = machine(5);
        let mut sessions = sessions(2);
        machine.start(&mut sessions);
        run_until_playing(&mut machine, &mut sessions);

        sessions[0].is_active = false;
        sessions[1].is_active = false;
        let effects = machine.tick(DT, &mut sessions);

        assert_eq!(machine.round_winner(), None);
        assert!(effects.contains(&RoundEffect::RoundEnded { round: 1, winner: None }));
        assert!(sessions.iter().all(|s| s.wins == 0));

        let texts = messages(&effects);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with("DRAW!\n\n\n\n"), "message = {:?}", texts[0]);
    }

    #[test]
    fn test_end_delay_holds_ending() {
        let mut machine = machine(5);
        let mut sessions = sessions(2);
        machine.start(&mut sessions);
        run_until_playing(&mut machine, &mut sessions);
        sessions[1].is_active = false;
        machine.tick(DT, &mut sessions);

        for _ in 0..5 {
            let effects = machine.tick(DT, &mut sessions);
            assert!(effects.is_empty());
            assert!(matches!(machine.state(), Some(RoundState::Ending { .. })));
        }

        machine.tick(DT, &mut sessions);
        assert!(matches!(machine.state(), Some(RoundState::Starting { .. })));
        assert_eq!(machine.round_number(), 2);
    }

    #[test]
    fn test_wins_monotonic_until_game_won() {
        let mut machine = machine(3);
        let mut sessions = sessions(3);
        machine.start(&mut sessions);

        let mut previous = vec![0u32; 3];
        // Победители по очереди: 0, 1, 2, draw, 0, 1, 2 ...
        for round in 0..7 {
            run_until_playing(&mut machine, &mut sessions);
            for (i, s) in sessions.iter_mut().enumerate() {
                s.is_active = round % 4 != 3 && i == round % 4;
            }
            machine.tick(DT, &mut sessions);

            let wins: Vec<u32> = sessions.iter().map(|s| s.wins).collect();
            for i in 0..3 {
                assert!(wins[i] >= previous[i], "round {}: wins decreased", round);
            }
            previous = wins;

            let effects = run_until_starting(&mut machine, &mut sessions);
            if effects.iter().any(|e| matches!(e, RoundEffect::GameWon { .. })) {
                break;
            }
        }

        // 0,1,2 по разу, ничья, 0,1,2 ещё раз → никто не набрал 3
        assert_eq!(machine.games_completed(), 0);
        assert_eq!(previous, vec![2, 2, 2]);
    }

    #[test]
    fn test_game_winner_is_first_to_threshold() {
        let mut sessions = sessions(3);
        sessions[0].wins = 1;
        sessions[1].wins = 2;
        sessions[2].wins = 2;

        assert_eq!(game_winner(&sessions, 2), Some(1));
        assert_eq!(game_winner(&sessions, 3), None);
    }

    #[test]
    fn test_round_winner_helpers() {
        let mut sessions = sessions(2);
        assert!(!one_tank_left(&sessions));

        sessions[0].is_active = false;
        assert!(one_tank_left(&sessions));
        assert_eq!(round_winner(&sessions), Some(1));

        sessions[1].is_active = false;
        assert_eq!(round_winner(&sessions), None);
    }

    #[test]
    fn test_end_message_lists_all_scores() {
        let mut sessions = sessions(3);
        sessions[2].wins = 4;

        let message = end_message(&sessions, Some(2), None);

        assert_eq!(
            message,
            format!(
                "<color=#41A03C>PLAYER 3</color> WINS THE ROUND!\n\n\n\n{}: 0 WINS\n{}: 0 WINS\n<color=#41A03C>PLAYER 3</color>: 4 WINS\n",
                BLUE, RED
            )
        );
    }
}
