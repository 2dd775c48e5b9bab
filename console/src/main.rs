//! Headless demo: boots the console against the on-disk asset directory,
//! runs a scripted session on simulated time, and logs the outcome. Real
//! firmware swaps the headless peripherals for the TFT, the I2S codec,
//! and the encoder.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use starfighter_console::audio::{AudioSink, NullSink};
use starfighter_console::config::Config;
use starfighter_console::display::HeadlessDisplay;
use starfighter_console::input::EdgeLatch;
use starfighter_console::storage::FsStorage;
use starfighter_console::Console;
use starfighter_engine::{GameState, InputSnapshot};

const LOOP_STEP_MS: u64 = 5;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.asset_dir).with_context(|| {
        format!(
            "failed to create asset directory: {}",
            config.asset_dir.display()
        )
    })?;

    let storage = Arc::new(FsStorage::new(&config.asset_dir));
    let sink: Arc<Mutex<dyn AudioSink>> = Arc::new(Mutex::new(NullSink));
    let seed = config.effective_seed();
    tracing::info!(seed, demo_ms = config.demo_ms, "starting demo session");

    let mut console = Console::new(storage, sink, HeadlessDisplay::default(), seed, 0);

    let mut confirm = EdgeLatch::default();
    let mut rounds = 0u32;
    let mut now_ms = 0u64;
    while now_ms < config.demo_ms {
        let step = now_ms / LOOP_STEP_MS;
        let state = console.engine().state();

        // Tap confirm periodically on the text screens, sweep the field
        // while flying. The latch is sampled on physics-tick boundaries
        // only, so each press edge reaches exactly one engine tick.
        let confirm_level = matches!(state, GameState::Menu | GameState::GameOver)
            && (now_ms % 1_000) < 100;
        let physics_boundary = now_ms % 25 == 0;
        let input = InputSnapshot {
            angle: ((step * 3) % 360) as u16,
            confirm_edge: physics_boundary && confirm.sample(confirm_level),
            move_held: matches!(state, GameState::Play) && (step / 200) % 2 == 0,
            fire_held: matches!(state, GameState::Play),
        };

        console.tick(&input, now_ms);

        if state != console.engine().state()
            && console.engine().state() == GameState::GameOver
        {
            rounds += 1;
            tracing::info!(
                round = rounds,
                score = console.engine().score(),
                best = console.engine().high_score(),
                "round over"
            );
        }

        now_ms += LOOP_STEP_MS;
    }

    let display = console.display();
    tracing::info!(
        rounds,
        frames = display.frames_presented,
        sprites = display.sprites_drawn,
        best = console.engine().high_score(),
        "demo session finished"
    );

    Ok(())
}
