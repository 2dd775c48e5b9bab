//! Two-phase collision detection, run once per simulation tick after the
//! motion update: grid adjacency prunes candidate pairs, then exact
//! circle-circle tests on squared distances decide hits.

use crate::constants::{
    ASTEROID_RADIUS_BASE, BULLET_RADIUS, MAX_ASTEROIDS, SHIP_RADIUS,
};
use crate::entities::EntityStore;
use crate::grid::{cell_index, cells_adjacent};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AsteroidHit {
    pub x: f32,
    pub y: f32,
    pub comet: bool,
}

#[derive(Clone, Debug, Default)]
pub struct CollisionReport {
    pub asteroid_hits: Vec<AsteroidHit>,
    pub ship_hit: bool,
}

/// The collision radius includes the asteroid's size class.
#[inline]
pub fn asteroid_radius(size: u8) -> f32 {
    ASTEROID_RADIUS_BASE + f32::from(size)
}

#[inline]
fn dist_sq(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// Finds and applies Bullet-Asteroid and Ship-Asteroid hits. Hit entities
/// are deactivated in place; scoring and the game-over transition are the
/// state machine's job.
pub fn detect(store: &mut EntityStore) -> CollisionReport {
    let mut report = CollisionReport::default();

    let mut asteroid_cells = [0u8; MAX_ASTEROIDS];
    for (index, asteroid) in store.asteroids.iter().enumerate() {
        if asteroid.active {
            asteroid_cells[index] = cell_index(asteroid.x, asteroid.y);
        }
    }

    for bullet_index in 0..store.bullets.len() {
        if !store.bullets[bullet_index].active {
            continue;
        }

        let (bullet_x, bullet_y) = {
            let bullet = &store.bullets[bullet_index];
            (bullet.x, bullet.y)
        };
        let bullet_cell = cell_index(bullet_x, bullet_y);

        for asteroid_index in 0..store.asteroids.len() {
            let asteroid = store.asteroids[asteroid_index];
            if !asteroid.active {
                continue;
            }
            if !cells_adjacent(bullet_cell, asteroid_cells[asteroid_index]) {
                continue;
            }

            let hit_dist = BULLET_RADIUS + asteroid_radius(asteroid.size);
            if dist_sq(bullet_x, bullet_y, asteroid.x, asteroid.y) < hit_dist * hit_dist {
                store.bullets[bullet_index].active = false;
                store.asteroids[asteroid_index].active = false;
                report.asteroid_hits.push(AsteroidHit {
                    x: asteroid.x,
                    y: asteroid.y,
                    comet: asteroid.comet,
                });
                // A bullet destroys at most one asteroid per tick.
                break;
            }
        }
    }

    if store.ship.active {
        let ship_cell = cell_index(store.ship.x, store.ship.y);
        for (asteroid_index, asteroid) in store.asteroids.iter().enumerate() {
            if !asteroid.active {
                continue;
            }
            if !cells_adjacent(ship_cell, asteroid_cells[asteroid_index]) {
                continue;
            }

            let hit_dist = SHIP_RADIUS + asteroid_radius(asteroid.size);
            if dist_sq(store.ship.x, store.ship.y, asteroid.x, asteroid.y) < hit_dist * hit_dist {
                store.ship.active = false;
                report.ship_hit = true;
                // Terminal: the first qualifying hit ends the scan.
                break;
            }
        }
    }

    report
}
