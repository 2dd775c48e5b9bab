//! Environment-driven configuration for the console runtime.

use std::{
    env,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

pub const DEFAULT_ASSET_DIR: &str = "assets";
pub const DEFAULT_DEMO_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub asset_dir: PathBuf,
    /// Spawn RNG seed; 0 selects a time-derived seed.
    pub seed: u32,
    /// Simulated wall-clock length of a demo run.
    pub demo_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let asset_dir = env::var("STARFIGHTER_ASSETS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ASSET_DIR));

        let seed = read_env_u32("STARFIGHTER_SEED", 0);
        let demo_ms = read_env_u64("STARFIGHTER_DEMO_MS", DEFAULT_DEMO_MS);

        Self {
            asset_dir,
            seed,
            demo_ms,
        }
    }

    /// The configured seed, or entropy from the clock when unset.
    pub fn effective_seed(&self) -> u32 {
        if self.seed != 0 {
            return self.seed;
        }
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.subsec_nanos() ^ elapsed.as_secs() as u32)
            .unwrap_or(0x5EED_5EED)
    }
}

fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}

fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
