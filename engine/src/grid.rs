//! Broad-phase spatial partitioning: the play-field is bucketed into
//! fixed 32x32 cells and exact collision tests only run for entities in
//! the same or adjacent cells.

use crate::constants::{GRID_CELL_SIZE, GRID_COLS, GRID_ROWS, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Packed cell index `row * GRID_COLS + col`. Off-screen coordinates
/// (asteroids inside the margin band) clamp to the nearest edge cell.
#[inline]
pub fn cell_index(x: f32, y: f32) -> u8 {
    let col = ((x.clamp(0.0, SCREEN_WIDTH - 1.0) / GRID_CELL_SIZE) as i32).min(GRID_COLS - 1);
    let row = ((y.clamp(0.0, SCREEN_HEIGHT - 1.0) / GRID_CELL_SIZE) as i32).min(GRID_ROWS - 1);
    (row * GRID_COLS + col) as u8
}

/// True when the two cells are the same or touch (including diagonals).
/// Cell size exceeds the largest possible radius sum, so adjacency can
/// never prune a real overlap.
#[inline]
pub fn cells_adjacent(a: u8, b: u8) -> bool {
    let (a_col, a_row) = (i32::from(a) % GRID_COLS, i32::from(a) / GRID_COLS);
    let (b_col, b_row) = (i32::from(b) % GRID_COLS, i32::from(b) / GRID_COLS);
    (a_col - b_col).abs() <= 1 && (a_row - b_row).abs() <= 1
}
