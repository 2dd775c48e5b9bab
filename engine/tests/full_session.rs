//! Drives the public engine API through whole scripted sessions and checks
//! the invariants that must hold on every tick.

use starfighter_engine::constants::{LOGO_DURATION_MS, MAX_ASTEROIDS, MAX_BULLETS};
use starfighter_engine::{Engine, EngineEvent, GameState, InputSnapshot};

const TICK_MS: u64 = 25; // 40 Hz physics

fn scripted_input(engine: &Engine, step: u64) -> InputSnapshot {
    match engine.state() {
        GameState::Logo => InputSnapshot::default(),
        // Press confirm on a single tick out of every 40 so it behaves
        // like a debounced edge, never a held level.
        GameState::Menu | GameState::GameOver => InputSnapshot {
            confirm_edge: step % 40 == 0,
            ..InputSnapshot::default()
        },
        GameState::Play => InputSnapshot {
            angle: ((step * 7) % 360) as u16,
            confirm_edge: false,
            move_held: (step / 80) % 2 == 0,
            fire_held: true,
        },
    }
}

fn run_session(seed: u32, ticks: u64) -> (u32, u32, Vec<EngineEvent>) {
    let mut engine = Engine::new(seed, 0, 0);
    let mut events = Vec::new();

    for step in 0..ticks {
        let now_ms = step * TICK_MS;
        let input = scripted_input(&engine, step);
        engine.tick(&input, now_ms);
        events.extend(engine.drain_events());

        assert!(engine.store().active_bullet_count() <= MAX_BULLETS);
        assert!(engine.store().active_asteroid_count() <= MAX_ASTEROIDS);
    }

    (engine.score(), engine.high_score(), events)
}

#[test]
fn same_seed_and_script_are_deterministic() {
    let a = run_session(0x1234_5678, 6_000);
    let b = run_session(0x1234_5678, 6_000);
    assert_eq!(a, b);
}

#[test]
fn session_reaches_play_and_scores_match_hit_events() {
    let (score, high_score, events) = run_session(0xC0FF_EE00, 6_000);

    let entered_play = events.iter().any(|event| {
        matches!(
            event,
            EngineEvent::StateChanged {
                to: GameState::Play,
                ..
            }
        )
    });
    assert!(entered_play);

    // Score accounting: every point comes from exactly one hit event. With
    // several rounds in one session only the last round's score survives,
    // so compare against the hits since the last Play entry.
    let last_play_start = events
        .iter()
        .rposition(|event| {
            matches!(
                event,
                EngineEvent::StateChanged {
                    to: GameState::Play,
                    ..
                }
            )
        })
        .expect("session entered play at least once");
    let hits_in_last_round = events[last_play_start..]
        .iter()
        .filter(|event| matches!(event, EngineEvent::AsteroidHit { .. }))
        .count() as u32;
    assert_eq!(score, hits_in_last_round);

    let best_beaten = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::HighScoreBeaten { score } => Some(*score),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    assert_eq!(high_score, best_beaten);
}

#[test]
fn logo_holds_until_its_duration_elapses() {
    let mut engine = Engine::new(7, 0, 0);
    let mut step = 0u64;
    while step * TICK_MS < LOGO_DURATION_MS {
        engine.tick(&InputSnapshot::default(), step * TICK_MS);
        assert_eq!(engine.state(), GameState::Logo);
        step += 1;
    }
    engine.tick(&InputSnapshot::default(), step * TICK_MS);
    assert_eq!(engine.state(), GameState::Menu);
}

#[test]
fn high_score_survives_into_the_next_round() {
    // Simulated restart: feed the record back into a fresh engine and
    // check the engine never lowers it.
    let (_, record, _) = run_session(0xFEED_F00D, 6_000);
    let engine = Engine::new(0xFEED_F00D, record, 0);
    assert_eq!(engine.high_score(), record);
}
