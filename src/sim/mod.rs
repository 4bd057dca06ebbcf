//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` is one frame
//! - Seeded RNG only
//! - Stable iteration order (balls and lines in insertion order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod board;
pub mod collision;
pub mod color;
pub mod context;
pub mod conveyor;
pub mod geometry;
pub mod layout;
pub mod lines;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallFate};
pub use board::{Board, Cell, Hole, HoleId, Neighbor, Orientation, RestrictedWall, Spawner, Wall};
pub use collision::{
    WallContact, attract_and_capture, resolve_restricted_wall, resolve_wall, wall_overlaps_ball,
};
pub use color::{Color, ColorError};
pub use context::{CaptureOutcome, ScoreTables, SimContext};
pub use conveyor::{Conveyor, SpawnQueue};
pub use geometry::{Aabb, distance_point_to_segment, reflect_velocity, reflection_normal};
pub use layout::{LayoutError, LayoutSource, LayoutWarning, ParsedLayout, load_layout, parse_layout};
pub use lines::{DrawnLine, LineCanvas};
pub use state::{CompletionWalk, GameEvent, GamePhase, GameState, Level, Snapshot};
pub use tick::{StrokeEvent, TickInput, tick};
