//! Collision response for walls and holes
//!
//! Walls are axis-aligned boxes: the ball is pushed out along the axis of
//! least penetration and that velocity component is flipped. Holes pull the
//! ball in and capture it once its center is close enough.

use glam::Vec2;

use super::ball::Ball;
use super::board::{Hole, RestrictedWall, Wall};
use super::context::{CaptureOutcome, SimContext};
use super::geometry::Aabb;
use crate::consts::*;

/// Result of a wall bounce
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    /// Unit normal of the face that was hit (pointing toward the ball)
    pub normal: Vec2,
    /// Distance the ball was pushed out
    pub penetration: f32,
}

/// Does the ball's bounding square overlap the wall box?
pub fn wall_overlaps_ball(bounds: &Aabb, ball_pos: Vec2) -> bool {
    let ball_box = Aabb::from_center(ball_pos, Vec2::splat(BALL_RADIUS));
    bounds.overlaps(&ball_box)
}

/// Push the ball out of `bounds` along the shallower axis and flip that velocity component
///
/// Returns `None` if the ball has already bounced off a wall this tick.
fn separate(ball: &mut Ball, bounds: &Aabb) -> Option<WallContact> {
    if ball.colliding {
        return None;
    }
    ball.colliding = true;

    // Penetration from each side
    let overlap_left = (ball.pos.x + BALL_RADIUS) - bounds.min.x;
    let overlap_right = bounds.max.x - (ball.pos.x - BALL_RADIUS);
    let overlap_top = (ball.pos.y + BALL_RADIUS) - bounds.min.y;
    let overlap_bottom = bounds.max.y - (ball.pos.y - BALL_RADIUS);

    let min_overlap_x = overlap_left.min(overlap_right);
    let min_overlap_y = overlap_top.min(overlap_bottom);

    let contact = if min_overlap_x < min_overlap_y {
        ball.vel.x = -ball.vel.x;
        if overlap_left < overlap_right {
            ball.pos.x -= overlap_left;
            WallContact {
                normal: Vec2::NEG_X,
                penetration: overlap_left,
            }
        } else {
            ball.pos.x += overlap_right;
            WallContact {
                normal: Vec2::X,
                penetration: overlap_right,
            }
        }
    } else {
        ball.vel.y = -ball.vel.y;
        if overlap_top < overlap_bottom {
            ball.pos.y -= overlap_top;
            WallContact {
                normal: Vec2::NEG_Y,
                penetration: overlap_top,
            }
        } else {
            ball.pos.y += overlap_bottom;
            WallContact {
                normal: Vec2::Y,
                penetration: overlap_bottom,
            }
        }
    };
    Some(contact)
}

/// Bounce off a plain wall; colored walls paint the ball
pub fn resolve_wall(ball: &mut Ball, wall: &Wall) -> Option<WallContact> {
    let contact = separate(ball, &wall.bounds)?;
    if !wall.color.is_neutral() {
        ball.color = wall.color;
    }
    Some(contact)
}

/// Bounce off a restricted wall unless the ball may pass; never recolors
pub fn resolve_restricted_wall(ball: &mut Ball, wall: &RestrictedWall) -> Option<WallContact> {
    if wall.lets_through(ball.color) {
        return None;
    }
    separate(ball, &wall.wall.bounds)
}

/// Pull a ball toward a hole and capture it if its center is close enough
///
/// `distance` is the ball-to-hole distance; callers only invoke this inside
/// the attraction radius. The pull is applied before the capture check.
pub fn attract_and_capture(
    ball: &mut Ball,
    hole: &Hole,
    distance: f32,
    ctx: &mut SimContext,
) -> Option<CaptureOutcome> {
    if distance != 0.0 {
        let pull = (hole.center - ball.pos) * (ATTRACTION_RADIUS / distance * ATTRACTION_STRENGTH);
        ball.vel += pull;
    }

    let offset = (ball.pos - hole.center).abs();
    if offset.x < BALL_RADIUS && offset.y < BALL_RADIUS {
        Some(ctx.capture(ball.color, hole.color))
    } else {
        None
    }
}
