//! The main tick loop: one cooperative thread that samples input, steps
//! the simulation, and renders, each at its own target rate. The only
//! other unit of execution is the audio worker, which shares nothing with
//! this loop beyond the player's two atomic flags.

use std::sync::{Arc, Mutex};

use starfighter_engine::constants::{ANIMATION_HZ, PHYSICS_HZ, RENDER_HZ};
use starfighter_engine::rng::SeededRng;
use starfighter_engine::{Engine, EngineEvent, GameState, InputSnapshot};

use crate::audio::{AudioPlayer, AudioSink, SoundEffect, GAMEOVER_TRACKS, INTRO_TRACKS, MAIN_TRACKS};
use crate::display::Display;
use crate::render::render;
use crate::sprites::SpriteCache;
use crate::storage::{self, Storage};

/// A cadence gate: fires when its period has elapsed, making the caller's
/// loop frequency independent of each subsystem's target rate.
#[derive(Debug)]
pub struct Cadence {
    period_ms: u64,
    next_due_ms: u64,
}

impl Cadence {
    pub fn from_hz(hz: u32) -> Self {
        Self {
            period_ms: u64::from(1_000 / hz.max(1)),
            next_due_ms: 0,
        }
    }

    pub fn due(&mut self, now_ms: u64) -> bool {
        if now_ms >= self.next_due_ms {
            self.next_due_ms = now_ms + self.period_ms;
            true
        } else {
            false
        }
    }
}

pub struct Console<D: Display> {
    engine: Engine,
    cache: SpriteCache,
    display: D,
    audio: AudioPlayer,
    storage: Arc<dyn Storage>,
    track_rng: SeededRng,
    physics: Cadence,
    renderer: Cadence,
    animation: Cadence,
    animation_frame: u32,
}

impl<D: Display> Console<D> {
    pub fn new(
        storage: Arc<dyn Storage>,
        sink: Arc<Mutex<dyn AudioSink>>,
        display: D,
        seed: u32,
        now_ms: u64,
    ) -> Self {
        storage::prepare_high_score(storage.as_ref());
        let high_score = storage::load_high_score(storage.as_ref());
        tracing::info!(high_score, "console starting");

        Self {
            engine: Engine::new(seed, high_score, now_ms),
            cache: SpriteCache::new(Arc::clone(&storage)),
            display,
            audio: AudioPlayer::new(Arc::clone(&storage), sink),
            storage,
            track_rng: SeededRng::new(seed ^ 0xA5A5_A5A5),
            physics: Cadence::from_hz(PHYSICS_HZ),
            renderer: Cadence::from_hz(RENDER_HZ),
            animation: Cadence::from_hz(ANIMATION_HZ),
            animation_frame: 0,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn audio(&self) -> &AudioPlayer {
        &self.audio
    }

    /// One pass of the main loop. Call as often as convenient; the cadence
    /// gates decide what actually runs at this timestamp.
    pub fn tick(&mut self, input: &InputSnapshot, now_ms: u64) {
        if self.physics.due(now_ms) {
            self.engine.tick(input, now_ms);
            for event in self.engine.drain_events() {
                self.dispatch(event);
            }
        }

        if self.animation.due(now_ms) {
            self.animation_frame = self.animation_frame.wrapping_add(1);
        }

        if self.renderer.due(now_ms) {
            render(
                &mut self.display,
                &mut self.cache,
                &self.engine,
                self.animation_frame,
                now_ms,
            );
        }
    }

    fn dispatch(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::BulletFired => self.audio.effect(SoundEffect::Laser),
            EngineEvent::AsteroidHit { .. } => self.audio.effect(SoundEffect::Hit),
            EngineEvent::ShipCrashed { .. } => self.audio.effect(SoundEffect::Crash),
            EngineEvent::HighScoreBeaten { score } => {
                storage::save_high_score(self.storage.as_ref(), score);
            }
            EngineEvent::StateChanged { to, .. } => match to {
                GameState::Menu => self.play_random(&INTRO_TRACKS),
                GameState::Play => self.play_random(&MAIN_TRACKS),
                GameState::GameOver => self.play_random(&GAMEOVER_TRACKS),
                GameState::Logo => {}
            },
        }
    }

    fn play_random(&mut self, tracks: &[&str]) {
        let index = self.track_rng.next_int(tracks.len() as u32) as usize;
        self.audio.play(tracks[index]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav_bytes;
    use crate::display::HeadlessDisplay;
    use crate::storage::mem::MemStorage;
    use crate::storage::{load_high_score, HIGHSCORE_FILE};
    use starfighter_engine::constants::LOGO_DURATION_MS;
    use std::thread;
    use std::time::{Duration, Instant};

    // Throttled like a real transmit buffer so in-flight playback is
    // observable from the test thread.
    struct SilentSink;

    impl AudioSink for SilentSink {
        fn write_chunk(&mut self, _pcm: &[u8]) -> std::io::Result<()> {
            thread::sleep(Duration::from_millis(1));
            Ok(())
        }

        fn tone(&mut self, _freq_hz: u32, _duration_ms: u32) {}
    }

    fn demo_storage() -> Arc<MemStorage> {
        let mut storage = MemStorage::default().with_file(HIGHSCORE_FILE, b"7\n".to_vec());
        for track in INTRO_TRACKS
            .iter()
            .chain(MAIN_TRACKS.iter())
            .chain(GAMEOVER_TRACKS.iter())
        {
            storage = storage.with_file(track, wav_bytes(0xAA, 64 * 1024));
        }
        Arc::new(storage)
    }

    fn console_with(storage: Arc<MemStorage>) -> Console<HeadlessDisplay> {
        Console::new(
            storage,
            Arc::new(Mutex::new(SilentSink)),
            HeadlessDisplay::default(),
            0xDEAD_BEEF,
            0,
        )
    }

    #[test]
    fn cadence_fires_at_its_period() {
        let mut cadence = Cadence::from_hz(40);
        assert!(cadence.due(0));
        assert!(!cadence.due(10));
        assert!(!cadence.due(24));
        assert!(cadence.due(25));
        assert!(!cadence.due(30));
        assert!(cadence.due(51));
    }

    #[test]
    fn loop_rates_are_independent() {
        // 5 ms loop over one simulated second.
        let mut physics = Cadence::from_hz(PHYSICS_HZ);
        let mut renderer = Cadence::from_hz(RENDER_HZ);
        let mut physics_steps = 0;
        let mut frames = 0;
        for step in 0..200u64 {
            let now_ms = step * 5;
            if physics.due(now_ms) {
                physics_steps += 1;
            }
            if renderer.due(now_ms) {
                frames += 1;
            }
        }
        assert!((38..=42).contains(&physics_steps));
        assert!((28..=34).contains(&frames));
    }

    #[test]
    fn console_loads_the_persisted_record_at_startup() {
        let console = console_with(demo_storage());
        assert_eq!(console.engine().high_score(), 7);
    }

    #[test]
    fn menu_entry_starts_an_intro_track() {
        let mut console = console_with(demo_storage());
        console.tick(&InputSnapshot::default(), LOGO_DURATION_MS);
        assert_eq!(console.engine().state(), GameState::Menu);
        assert!(console.audio().is_playing());
    }

    #[test]
    fn scripted_session_ends_with_a_consistent_record() {
        let storage = demo_storage();
        let mut console = console_with(Arc::clone(&storage));

        let confirm = InputSnapshot {
            confirm_edge: true,
            ..InputSnapshot::default()
        };
        console.tick(&InputSnapshot::default(), LOGO_DURATION_MS);
        console.tick(&confirm, LOGO_DURATION_MS + 25);
        assert_eq!(console.engine().state(), GameState::Play);

        // Hold position at the screen center, which every spawn is aimed
        // at, and sweep fire until the round ends.
        let mut now_ms = LOGO_DURATION_MS + 50;
        let mut step = 0u64;
        while console.engine().state() == GameState::Play && step < 400_000 {
            let drive = InputSnapshot {
                angle: ((step * 7) % 360) as u16,
                confirm_edge: false,
                move_held: false,
                fire_held: true,
            };
            console.tick(&drive, now_ms);
            now_ms += 5;
            step += 1;
        }
        assert_eq!(console.engine().state(), GameState::GameOver);
        assert!(console.display().frames_presented > 0);

        // The stored record always matches the engine's view: untouched
        // when the round scored below it, rewritten when it was beaten.
        assert!(console.engine().high_score() >= 7);
        assert_eq!(
            load_high_score(storage.as_ref()),
            console.engine().high_score()
        );
    }

    #[test]
    fn stop_is_immediate_and_idempotent() {
        let console = console_with(demo_storage());
        console.audio().play("/snd_main1.wav");
        console.audio().stop();
        assert!(!console.audio().is_playing());
        console.audio().stop();
        assert!(!console.audio().is_playing());

        // The superseded worker unwinds on its own.
        let deadline = Instant::now() + Duration::from_secs(5);
        while console.audio().is_playing() {
            assert!(Instant::now() < deadline);
            thread::sleep(Duration::from_millis(2));
        }
    }
}
