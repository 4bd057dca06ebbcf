//! Inkball - a grid-based marble puzzle engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board, balls, collisions, level state machine)
//! - `config`: Data-driven level list and score tables (JSON)
//!
//! Rendering, asset loading and raw input capture live outside this crate; they
//! feed [`sim::TickInput`] in and read [`sim::Snapshot`] out between ticks.

pub mod config;
pub mod sim;

pub use config::{ConfigError, GameConfig, LevelConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second). Level timers count in these frames.
    pub const FPS: u32 = 30;

    /// Grid dimensions
    pub const CELL_SIZE: f32 = 32.0;
    pub const BOARD_SIZE: usize = 18;
    /// Playfield edge length (square board)
    pub const BOARD_WIDTH: f32 = CELL_SIZE * BOARD_SIZE as f32;

    /// Half extent of a generic tile (wall, spawner)
    pub const TILE_HALF_SIZE: f32 = 16.0;
    /// Half extent of a hole; holes cover a 2x2 block of cells
    pub const HOLE_HALF_SIZE: f32 = 32.0;
    /// Restricted walls are inset this much on each side of their thin axis
    pub const RESTRICTED_WALL_INSET: f32 = 11.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    /// Per-axis speed of a freshly spawned ball (sign is random)
    pub const SPAWN_SPEED: f32 = 2.0;

    /// Holes pull balls within this distance of their center
    pub const ATTRACTION_RADIUS: f32 = 32.0;
    /// Scale of the attraction impulse (k)
    pub const ATTRACTION_STRENGTH: f32 = 0.01;

    /// A removal click must land closer than this to a line segment
    pub const LINE_REMOVAL_TOLERANCE: f32 = 5.0;
    /// Number of queued balls shown on the conveyor
    pub const QUEUE_PREVIEW_LEN: usize = 5;
}

/// Center of the grid cell at (row, col)
#[inline]
pub fn cell_center(row: usize, col: usize) -> Vec2 {
    use consts::CELL_SIZE;
    Vec2::new(
        col as f32 * CELL_SIZE + CELL_SIZE / 2.0,
        row as f32 * CELL_SIZE + CELL_SIZE / 2.0,
    )
}

/// Grid (row, col) containing a world position, or `None` off the board
#[inline]
pub fn grid_position(pos: Vec2) -> Option<(usize, usize)> {
    use consts::{BOARD_SIZE, CELL_SIZE};
    // Truncation toward zero, so -0.5 maps to row 0 like integer division
    let row = (pos.y / CELL_SIZE) as i64;
    let col = (pos.x / CELL_SIZE) as i64;
    let max = BOARD_SIZE as i64 - 1;
    if pos.x.is_nan() || pos.y.is_nan() || row < 0 || col < 0 || row > max || col > max {
        None
    } else {
        Some((row as usize, col as usize))
    }
}
