//! The game state machine and the engine context object that owns all
//! simulation state. Callers construct one `Engine` at startup and drive
//! it with `tick(&input, now_ms)` at the physics rate.

use crate::collision;
use crate::constants::{LOGO_DURATION_MS, SCORE_PER_ASTEROID};
use crate::entities::EntityStore;
use crate::events::EngineEvent;
use crate::input::InputSnapshot;
use crate::spawn::SpawnController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Logo,
    Menu,
    Play,
    GameOver,
}

pub struct Engine {
    state: GameState,
    state_entered_ms: u64,
    store: EntityStore,
    spawner: SpawnController,
    score: u32,
    high_score: u32,
    events: Vec<EngineEvent>,
}

impl Engine {
    /// Starts in `Logo`. `high_score` is the persisted record loaded once
    /// at startup; the engine only ever raises it.
    pub fn new(seed: u32, high_score: u32, now_ms: u64) -> Self {
        Self {
            state: GameState::Logo,
            state_entered_ms: now_ms,
            store: EntityStore::new(),
            spawner: SpawnController::new(seed),
            score: 0,
            high_score,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Time spent in the current state; drives the logo time-box and the
    /// menu blink cadence without separate timers.
    pub fn state_elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.state_entered_ms)
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn tick(&mut self, input: &InputSnapshot, now_ms: u64) {
        match self.state {
            GameState::Logo => {
                if self.state_elapsed(now_ms) >= LOGO_DURATION_MS {
                    self.enter(GameState::Menu, now_ms);
                }
            }
            GameState::Menu => {
                if input.confirm_edge {
                    self.reset_round();
                    self.enter(GameState::Play, now_ms);
                }
            }
            GameState::Play => self.play_tick(input, now_ms),
            GameState::GameOver => {
                if input.confirm_edge {
                    self.enter(GameState::Menu, now_ms);
                }
            }
        }
    }

    fn enter(&mut self, next: GameState, now_ms: u64) {
        let from = self.state;
        self.state = next;
        self.state_entered_ms = now_ms;
        tracing::debug!(?from, ?next, "state transition");
        self.events.push(EngineEvent::StateChanged { from, to: next });
    }

    fn reset_round(&mut self) {
        self.score = 0;
        self.store.reset();
        // Opening asteroid so play never starts on an empty field.
        self.spawner.maintain(&mut self.store, self.score);
    }

    fn play_tick(&mut self, input: &InputSnapshot, now_ms: u64) {
        self.store.ship.angle = input.angle % 360;
        self.store.ship.boosting = input.move_held;

        if input.fire_held && self.store.spawn_bullet(now_ms) {
            self.events.push(EngineEvent::BulletFired);
        }

        self.store.advance(now_ms);

        let report = collision::detect(&mut self.store);
        for hit in &report.asteroid_hits {
            self.score = self.score.saturating_add(SCORE_PER_ASTEROID);
            self.events.push(EngineEvent::AsteroidHit {
                x: hit.x,
                y: hit.y,
                comet: hit.comet,
            });
        }

        if report.ship_hit {
            self.events.push(EngineEvent::ShipCrashed {
                x: self.store.ship.x,
                y: self.store.ship.y,
            });
            if self.score > self.high_score {
                self.high_score = self.score;
                self.events
                    .push(EngineEvent::HighScoreBeaten { score: self.high_score });
            }
            self.enter(GameState::GameOver, now_ms);
            return;
        }

        self.spawner.maintain(&mut self.store, self.score);
    }
}
