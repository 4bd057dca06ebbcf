//! Segment distance, reflection and box geometry
//!
//! Shared by drawn-line hit testing, ball-vs-line reflection and wall
//! collision. Everything here is pure.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Closest point to `p` on segment [v, w]
#[inline]
fn closest_point_on_segment(p: Vec2, v: Vec2, w: Vec2) -> Vec2 {
    let line_vec = w - v;
    let len_sq = line_vec.length_squared();
    if len_sq == 0.0 {
        return v;
    }
    let t = ((p - v).dot(line_vec) / len_sq).clamp(0.0, 1.0);
    v + line_vec * t
}

/// Euclidean distance from `p` to the segment [v, w]
///
/// A degenerate segment (v == w) is treated as the single point v.
pub fn distance_point_to_segment(p: Vec2, v: Vec2, w: Vec2) -> f32 {
    p.distance(closest_point_on_segment(p, v, w))
}

/// Vector from the closest point on segment A-B to `point`, used as a reflection axis
///
/// The vector is not normalized and is zero when `point` lies on the segment.
/// Past an endpoint it points away from that endpoint. For a zero-length
/// segment this is simply `point - a`.
pub fn reflection_normal(point: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    if a == b {
        return point - a;
    }
    point - closest_point_on_segment(point, a, b)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, `normal` must be unit length.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Axis-aligned box given by its corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Shrink each side of the box by `inset` (per axis)
    pub fn inset(self, inset: Vec2) -> Self {
        Self {
            min: self.min + inset,
            max: self.max - inset,
        }
    }

    /// Closed-interval overlap test (touching counts)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        other.max.x >= self.min.x
            && other.min.x <= self.max.x
            && other.max.y >= self.min.y
            && other.min.y <= self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}
