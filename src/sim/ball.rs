//! Ball entity: motion, edge bounces and per-tick neighborhood checks

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Neighbor};
use super::collision::{
    attract_and_capture, resolve_restricted_wall, resolve_wall, wall_overlaps_ball,
};
use super::color::Color;
use super::context::{CaptureOutcome, SimContext};
use super::geometry::{distance_point_to_segment, reflect_velocity, reflection_normal};
use crate::consts::*;
use crate::grid_position;

/// What happened to a ball during its adjacency pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallFate {
    Alive,
    /// Fell into a hole; remove it from play
    Captured(CaptureOutcome),
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// Draw scale hint (1.0 normally, shrinks toward 0 near a hole center)
    pub visual_scale: f32,
    /// Set by the first wall bounce of a tick; blocks further wall bounces
    #[serde(skip)]
    pub colliding: bool,
    /// Non-empty cells around the ball as of the last adjacency pass, nearest first
    #[serde(skip)]
    pub surroundings: Vec<Neighbor>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, color: Color) -> Self {
        Self {
            id,
            pos,
            vel,
            color,
            visual_scale: 1.0,
            colliding: false,
            surroundings: Vec::with_capacity(5),
        }
    }

    /// New ball with each velocity component independently +/- `SPAWN_SPEED`
    pub fn spawn(id: u32, pos: Vec2, color: Color, rng: &mut impl Rng) -> Self {
        let mut component = || {
            if rng.random_bool(0.5) {
                SPAWN_SPEED
            } else {
                -SPAWN_SPEED
            }
        };
        let vel = Vec2::new(component(), component());
        Self::new(id, pos, vel, color)
    }

    /// Advance one tick and bounce off the playfield edges
    ///
    /// Each axis is handled on its own, so a corner hit flips both components.
    pub fn update(&mut self) {
        self.pos += self.vel;

        if self.pos.x - BALL_RADIUS < 0.0 {
            self.pos.x = BALL_RADIUS;
            self.vel.x = -self.vel.x;
        }
        if self.pos.x + BALL_RADIUS > BOARD_WIDTH {
            self.pos.x = BOARD_WIDTH - BALL_RADIUS;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y - BALL_RADIUS < 0.0 {
            self.pos.y = BALL_RADIUS;
            self.vel.y = -self.vel.y;
        }
        if self.pos.y + BALL_RADIUS > BOARD_WIDTH {
            self.pos.y = BOARD_WIDTH - BALL_RADIUS;
            self.vel.y = -self.vel.y;
        }
    }

    /// Recompute the surrounding cells and react to each, nearest first
    ///
    /// Walls bounce (at most one per tick), holes within the attraction radius
    /// pull and may capture. Dispatch stops once the ball is captured.
    pub fn resolve_adjacency(&mut self, board: &Board, ctx: &mut SimContext) -> BallFate {
        self.surroundings.clear();
        self.visual_scale = 1.0;
        if grid_position(self.pos).is_none() {
            return BallFate::Alive;
        }
        self.surroundings = board.neighbors(self.pos);

        let mut fate = BallFate::Alive;
        for i in 0..self.surroundings.len() {
            let Neighbor { row, col, .. } = self.surroundings[i];
            match board.cell(row, col) {
                Cell::Wall(wall) => {
                    if wall_overlaps_ball(&wall.bounds, self.pos) {
                        resolve_wall(self, &wall);
                    }
                }
                Cell::RestrictedWall(wall) => {
                    if wall_overlaps_ball(&wall.wall.bounds, self.pos) {
                        resolve_restricted_wall(self, &wall);
                    }
                }
                Cell::Hole(id) => {
                    let Some(hole) = board.hole(id) else {
                        continue;
                    };
                    let distance = self.pos.distance(hole.center);
                    if distance <= ATTRACTION_RADIUS {
                        self.visual_scale = distance / ATTRACTION_RADIUS;
                        if let Some(outcome) = attract_and_capture(self, hole, distance, ctx) {
                            fate = BallFate::Captured(outcome);
                            break;
                        }
                    }
                }
                Cell::Spawner(_) | Cell::Empty => {}
            }
        }

        self.colliding = false;
        fate
    }

    /// Bounce off a drawn segment if the ball's next position touches it
    ///
    /// Uses the predicted position (pos + vel) both for the hit test and the
    /// reflection axis. Returns true when the velocity was reflected.
    pub fn collide_with_segment(&mut self, a: Vec2, b: Vec2) -> bool {
        let future = self.pos + self.vel;
        if distance_point_to_segment(future, a, b) > BALL_RADIUS {
            return false;
        }
        let normal = reflection_normal(future, a, b);
        if normal.length() == 0.0 {
            return false;
        }
        self.vel = reflect_velocity(self.vel, normal.normalize());
        true
    }
}
