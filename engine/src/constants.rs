//! Tuning constants for the simulation. Distances are in display pixels,
//! timestamps and durations in milliseconds of the caller's tick clock.

pub const SCREEN_WIDTH: f32 = 128.0;
pub const SCREEN_HEIGHT: f32 = 160.0;
pub const SHIP_SPAWN_X: f32 = 64.0;
pub const SHIP_SPAWN_Y: f32 = 80.0;

pub const MAX_BULLETS: usize = 10;
pub const MAX_ASTEROIDS: usize = 20;

pub const FIRE_COOLDOWN_MS: u64 = 300;
pub const BULLET_TTL_MS: u64 = 2_000;

// Velocities are per-physics-tick displacements.
pub const SHIP_SPEED: f32 = 2.0;
pub const BULLET_SPEED: f32 = 4.0;
pub const ASTEROID_BASE_SPEED: f32 = 1.0;
pub const COMET_SPEED_MULTIPLIER: f32 = 1.5;

pub const SHIP_RADIUS: f32 = 6.0;
pub const BULLET_RADIUS: f32 = 2.0;
pub const ASTEROID_RADIUS_BASE: f32 = 8.0;
pub const ASTEROID_SIZE_CLASSES: u32 = 3;

pub const GRID_CELL_SIZE: f32 = 32.0;
pub const GRID_COLS: i32 = 4; // 128 / 32
pub const GRID_ROWS: i32 = 5; // 160 / 32

// Asteroids keep their velocity across edges: they despawn-teleport once
// fully outside the margin band and re-enter from the opposite side.
pub const ASTEROID_EDGE_MARGIN: f32 = 20.0;
pub const ASTEROID_SPAWN_OFFSET: f32 = 10.0;
pub const ASTEROID_AIM_JITTER_DEG: i32 = 30;

pub const SCORE_PER_ASTEROID: u32 = 1;
pub const TARGET_COUNT_SCORE_STEP: u32 = 5;
pub const COMET_CHANCE_PER_SCORE_PCT: u32 = 5;

pub const LOGO_DURATION_MS: u64 = 3_000;

pub const PHYSICS_HZ: u32 = 40;
pub const RENDER_HZ: u32 = 30;
pub const ANIMATION_HZ: u32 = 60;
