//! Per-state scene drawing. Deliberately thin: sprites that fail to load
//! are skipped, and all animation timing derives from the engine's
//! state-entry clock so there are no timers here.

use starfighter_engine::{Engine, GameState};

use crate::display::{color, Display};
use crate::sprites::SpriteCache;

const MENU_BLINK_MS: u64 = 500;

/// Sprite placement is by center point, matching the collision geometry.
#[inline]
fn center_x(x: f32, width: u16) -> i32 {
    x as i32 - i32::from(width / 2)
}

#[inline]
fn center_y(y: f32, height: u16) -> i32 {
    y as i32 - i32::from(height / 2)
}

fn blit_centered(display: &mut dyn Display, cache: &mut SpriteCache, name: &str, x: f32, y: f32) {
    if let Some(sprite) = cache.load(name) {
        display.draw_sprite(
            center_x(x, sprite.width),
            center_y(y, sprite.height),
            sprite,
        );
    }
}

pub fn render(
    display: &mut dyn Display,
    cache: &mut SpriteCache,
    engine: &Engine,
    animation_frame: u32,
    now_ms: u64,
) {
    display.clear();

    match engine.state() {
        GameState::Logo => {
            blit_centered(display, cache, "/spr_logo.bin", 64.0, 80.0);
        }
        GameState::Menu => {
            blit_centered(display, cache, "/spr_bg_menu.bin", 64.0, 80.0);
            // Blink cadence derived from time-in-state, not a timer.
            if (engine.state_elapsed(now_ms) / MENU_BLINK_MS) % 2 == 0 {
                display.draw_text(20, 120, "PRESS TO START", color::YELLOW);
            }
            if engine.high_score() > 0 {
                display.draw_text(30, 140, &format!("BEST {}", engine.high_score()), color::WHITE);
            }
        }
        GameState::Play => {
            blit_centered(display, cache, "/spr_bg_main.bin", 64.0, 80.0);

            let store = engine.store();
            let ship = store.ship();
            if ship.active {
                let sprite = if ship.boosting && animation_frame % 2 == 0 {
                    "/spr_ship_boost.bin"
                } else {
                    "/spr_ship.bin"
                };
                blit_centered(display, cache, sprite, ship.x, ship.y);
            }

            for bullet in store.active_bullets() {
                blit_centered(display, cache, "/spr_bullet.bin", bullet.x, bullet.y);
            }
            for asteroid in store.active_asteroids() {
                let sprite = if asteroid.comet {
                    "/spr_comet.bin"
                } else {
                    "/spr_asteroid.bin"
                };
                blit_centered(display, cache, sprite, asteroid.x, asteroid.y);
            }

            display.draw_text(2, 2, &format!("SCORE {}", engine.score()), color::GREEN);
        }
        GameState::GameOver => {
            display.draw_text(34, 60, "GAME OVER", color::RED);
            display.draw_text(30, 80, &format!("SCORE {}", engine.score()), color::WHITE);
            display.draw_text(30, 95, &format!("BEST {}", engine.high_score()), color::WHITE);
            display.draw_text(16, 140, "PRESS TO RESTART", color::YELLOW);
        }
    }

    display.present();
}
