//! Difficulty-driven asteroid spawning. The target population grows with
//! score and each spawn independently rolls the faster comet variant,
//! with a probability that also grows with score until it saturates.

use crate::constants::{
    ASTEROID_AIM_JITTER_DEG, ASTEROID_BASE_SPEED, ASTEROID_SIZE_CLASSES, ASTEROID_SPAWN_OFFSET,
    COMET_CHANCE_PER_SCORE_PCT, COMET_SPEED_MULTIPLIER, SCREEN_HEIGHT, SCREEN_WIDTH,
    SHIP_SPAWN_X, SHIP_SPAWN_Y, TARGET_COUNT_SCORE_STEP,
};
use crate::entities::{Asteroid, EntityStore};
use crate::rng::SeededRng;

pub struct SpawnController {
    rng: SeededRng,
}

/// How many asteroids should be live at the given score.
#[inline]
pub fn target_asteroid_count(score: u32) -> usize {
    (1 + score / TARGET_COUNT_SCORE_STEP) as usize
}

/// Comet probability in percent, clamped to 100.
#[inline]
pub fn comet_chance_pct(score: u32) -> u32 {
    (score.saturating_mul(COMET_CHANCE_PER_SCORE_PCT)).min(100)
}

impl SpawnController {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SeededRng::new(seed),
        }
    }

    /// Tops the population up toward the target, at most one spawn per
    /// tick. Returns true when an asteroid was spawned.
    pub fn maintain(&mut self, store: &mut EntityStore, score: u32) -> bool {
        if store.active_asteroid_count() >= target_asteroid_count(score) {
            return false;
        }
        self.spawn_asteroid(store, score)
    }

    fn spawn_asteroid(&mut self, store: &mut EntityStore, score: u32) -> bool {
        let Some(slot) = store.free_asteroid_slot() else {
            return false;
        };

        // Enter from a random edge, just outside the visible bounds but
        // inside the teleport band.
        let (x, y) = match self.rng.next_int(4) {
            0 => (self.edge_coord(SCREEN_WIDTH), -ASTEROID_SPAWN_OFFSET),
            1 => (SCREEN_WIDTH + ASTEROID_SPAWN_OFFSET, self.edge_coord(SCREEN_HEIGHT)),
            2 => (self.edge_coord(SCREEN_WIDTH), SCREEN_HEIGHT + ASTEROID_SPAWN_OFFSET),
            _ => (-ASTEROID_SPAWN_OFFSET, self.edge_coord(SCREEN_HEIGHT)),
        };

        let comet = self.rng.next_int(100) < comet_chance_pct(score);
        let speed = if comet {
            ASTEROID_BASE_SPEED * COMET_SPEED_MULTIPLIER
        } else {
            ASTEROID_BASE_SPEED
        };

        // Aim at the screen center with bounded jitter, normalized to the
        // fixed speed.
        let jitter = self
            .rng
            .next_range(-ASTEROID_AIM_JITTER_DEG, ASTEROID_AIM_JITTER_DEG + 1);
        let heading = (SHIP_SPAWN_Y - y).atan2(SHIP_SPAWN_X - x) + (jitter as f32).to_radians();
        let size = self.rng.next_int(ASTEROID_SIZE_CLASSES) as u8;

        store.asteroids[slot] = Asteroid {
            x,
            y,
            vx: heading.cos() * speed,
            vy: heading.sin() * speed,
            active: true,
            size,
            comet,
        };
        tracing::trace!(slot, comet, size, "asteroid spawned");
        true
    }

    fn edge_coord(&mut self, extent: f32) -> f32 {
        self.rng.next_int(extent as u32) as f32
    }
}
