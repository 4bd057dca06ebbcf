//! Player-drawn ink lines
//!
//! A stroke is built point by point while the player drags and committed on
//! release. A committed line reflects the first ball that touches it and is
//! consumed by the hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::geometry::distance_point_to_segment;
use crate::consts::LINE_REMOVAL_TOLERANCE;

/// A committed polyline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnLine {
    pub points: Vec<Vec2>,
}

impl DrawnLine {
    /// Consecutive point pairs
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Is any segment closer than `tolerance` to `point`?
    pub fn is_near(&self, point: Vec2, tolerance: f32) -> bool {
        self.segments()
            .any(|(a, b)| distance_point_to_segment(point, a, b) < tolerance)
    }
}

/// All committed lines plus the stroke in progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineCanvas {
    pub lines: Vec<DrawnLine>,
    stroke: Option<Vec<Vec2>>,
}

impl LineCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    /// Start a new stroke, discarding any unfinished one
    pub fn begin_stroke(&mut self, point: Vec2) {
        self.stroke = Some(vec![point]);
    }

    /// Append a point to the active stroke (ignored when not drawing)
    pub fn extend_stroke(&mut self, point: Vec2) {
        if let Some(stroke) = self.stroke.as_mut() {
            stroke.push(point);
        }
    }

    /// Commit the active stroke. Strokes with fewer than two points are dropped.
    pub fn end_stroke(&mut self) -> bool {
        match self.stroke.take() {
            Some(points) if points.len() >= 2 => {
                self.lines.push(DrawnLine { points });
                true
            }
            _ => false,
        }
    }

    /// Points of the stroke being drawn, if any
    pub fn current_stroke(&self) -> Option<&[Vec2]> {
        self.stroke.as_deref()
    }

    /// Remove the first line (in drawing order) passing near `point`
    pub fn remove_near(&mut self, point: Vec2) -> bool {
        match self
            .lines
            .iter()
            .position(|line| line.is_near(point, LINE_REMOVAL_TOLERANCE))
        {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }

    /// Reflect balls off lines and remove every line that was hit
    ///
    /// Each segment reflects at most one ball (the first in list order whose
    /// next position touches it). Returns the number of lines consumed.
    pub fn collide_balls(&mut self, balls: &mut [Ball]) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| {
            let mut hit = false;
            for (a, b) in line.segments() {
                if balls.iter_mut().any(|ball| ball.collide_with_segment(a, b)) {
                    hit = true;
                }
            }
            !hit
        });
        before - self.lines.len()
    }

    /// Drop all lines and any stroke in progress
    pub fn clear(&mut self) {
        self.lines.clear();
        self.stroke = None;
    }
}
