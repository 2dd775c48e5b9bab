use crate::constants::{
    ASTEROID_EDGE_MARGIN, BULLET_SPEED, BULLET_TTL_MS, FIRE_COOLDOWN_MS, MAX_ASTEROIDS,
    MAX_BULLETS, SCREEN_HEIGHT, SCREEN_WIDTH, SHIP_SPAWN_X, SHIP_SPAWN_Y, SHIP_SPEED,
};

#[derive(Clone, Copy, Debug)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Heading in degrees (0..360).
    pub angle: u16,
    pub boosting: bool,
    pub active: bool,
    /// None until the first shot of a round; the opening shot is never
    /// cooldown-gated.
    pub(crate) last_shot_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub active: bool,
    pub(crate) spawned_ms: u64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Asteroid {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub active: bool,
    /// Size class 0..3; the collision radius grows with it.
    pub size: u8,
    pub comet: bool,
}

/// Fixed-capacity slot pools for every simulated entity. Slots are
/// index-as-identity: an inactive slot is reclaimed by the next spawn and
/// its stale fields mean nothing until then.
pub struct EntityStore {
    pub(crate) ship: Ship,
    pub(crate) bullets: [Bullet; MAX_BULLETS],
    pub(crate) asteroids: [Asteroid; MAX_ASTEROIDS],
}

impl EntityStore {
    pub fn new() -> Self {
        let mut store = Self {
            ship: Ship {
                x: 0.0,
                y: 0.0,
                vx: 0.0,
                vy: 0.0,
                angle: 0,
                boosting: false,
                active: false,
                last_shot_ms: None,
            },
            bullets: [Bullet::default(); MAX_BULLETS],
            asteroids: [Asteroid::default(); MAX_ASTEROIDS],
        };
        store.reset();
        store
    }

    /// Deactivates every bullet and asteroid slot and re-centers the ship.
    pub fn reset(&mut self) {
        self.ship = Ship {
            x: SHIP_SPAWN_X,
            y: SHIP_SPAWN_Y,
            vx: 0.0,
            vy: 0.0,
            angle: 0,
            boosting: false,
            active: true,
            last_shot_ms: None,
        };

        for bullet in &mut self.bullets {
            bullet.active = false;
        }
        for asteroid in &mut self.asteroids {
            asteroid.active = false;
        }
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    /// Claims the first free bullet slot and launches it along the ship's
    /// heading. Returns false while the fire cooldown is running or when
    /// every slot is live.
    pub fn spawn_bullet(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.ship.last_shot_ms {
            if now_ms.saturating_sub(last) < FIRE_COOLDOWN_MS {
                return false;
            }
        }

        let Some(slot) = self.bullets.iter().position(|bullet| !bullet.active) else {
            return false;
        };

        let (sin, cos) = f32::from(self.ship.angle).to_radians().sin_cos();
        self.bullets[slot] = Bullet {
            x: self.ship.x,
            y: self.ship.y,
            vx: BULLET_SPEED * cos,
            vy: BULLET_SPEED * sin,
            active: true,
            spawned_ms: now_ms,
        };
        self.ship.last_shot_ms = Some(now_ms);
        true
    }

    /// One physics step: velocity integration plus the per-type boundary
    /// policy (ship and bullets wrap, asteroids teleport across the margin
    /// band) and bullet time-to-live expiry.
    pub fn advance(&mut self, now_ms: u64) {
        if self.ship.active {
            if self.ship.boosting {
                let (sin, cos) = f32::from(self.ship.angle).to_radians().sin_cos();
                self.ship.vx = SHIP_SPEED * cos;
                self.ship.vy = SHIP_SPEED * sin;
            } else {
                self.ship.vx = 0.0;
                self.ship.vy = 0.0;
            }
            self.ship.x = wrap(self.ship.x + self.ship.vx, SCREEN_WIDTH);
            self.ship.y = wrap(self.ship.y + self.ship.vy, SCREEN_HEIGHT);
        }

        for bullet in &mut self.bullets {
            if !bullet.active {
                continue;
            }
            if now_ms.saturating_sub(bullet.spawned_ms) > BULLET_TTL_MS {
                bullet.active = false;
                continue;
            }
            bullet.x = wrap(bullet.x + bullet.vx, SCREEN_WIDTH);
            bullet.y = wrap(bullet.y + bullet.vy, SCREEN_HEIGHT);
        }

        for asteroid in &mut self.asteroids {
            if !asteroid.active {
                continue;
            }
            asteroid.x = teleport(asteroid.x + asteroid.vx, SCREEN_WIDTH);
            asteroid.y = teleport(asteroid.y + asteroid.vy, SCREEN_HEIGHT);
        }
    }

    pub fn active_bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter().filter(|bullet| bullet.active)
    }

    pub fn active_asteroids(&self) -> impl Iterator<Item = &Asteroid> {
        self.asteroids.iter().filter(|asteroid| asteroid.active)
    }

    pub fn active_bullet_count(&self) -> usize {
        self.active_bullets().count()
    }

    pub fn active_asteroid_count(&self) -> usize {
        self.active_asteroids().count()
    }

    pub(crate) fn free_asteroid_slot(&self) -> Option<usize> {
        self.asteroids.iter().position(|asteroid| !asteroid.active)
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn wrap(value: f32, extent: f32) -> f32 {
    if value < 0.0 {
        value + extent
    } else if value >= extent {
        value - extent
    } else {
        value
    }
}

#[inline]
fn teleport(value: f32, extent: f32) -> f32 {
    if value < -ASTEROID_EDGE_MARGIN {
        extent + ASTEROID_EDGE_MARGIN
    } else if value > extent + ASTEROID_EDGE_MARGIN {
        -ASTEROID_EDGE_MARGIN
    } else {
        value
    }
}
