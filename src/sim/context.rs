//! Scoring context shared by every capture
//!
//! Holds the score tables, the level's modifiers and the mutable score and
//! spawn queue. Passed explicitly into collision code; there is no global
//! state.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::conveyor::SpawnQueue;

/// Base reward and penalty per ball color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreTables {
    pub increase: [u32; 5],
    pub decrease: [u32; 5],
}

impl ScoreTables {
    pub fn increase_for(&self, color: Color) -> u32 {
        self.increase[color.index()]
    }

    pub fn decrease_for(&self, color: Color) -> u32 {
        self.decrease[color.index()]
    }
}

/// What a capture did to the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureOutcome {
    /// Matching (or grey) hole
    Correct { gained: u32 },
    /// Wrong hole: score penalty and the ball goes back in the queue
    Wrong { lost: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimContext {
    pub tables: ScoreTables,
    pub increase_modifier: f32,
    pub decrease_modifier: f32,
    /// Current score (never negative)
    pub score: u32,
    pub queue: SpawnQueue,
}

/// floor(base * modifier), with negative products clamped to zero
#[inline]
fn scaled(base: u32, modifier: f32) -> u32 {
    (base as f32 * modifier).floor().max(0.0) as u32
}

impl SimContext {
    pub fn new(tables: ScoreTables) -> Self {
        Self {
            tables,
            increase_modifier: 1.0,
            decrease_modifier: 1.0,
            score: 0,
            queue: SpawnQueue::default(),
        }
    }

    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    /// Deduct points, flooring at zero
    pub fn deduct_score(&mut self, amount: u32) {
        self.score = self.score.saturating_sub(amount);
    }

    /// Score a ball of `ball_color` falling into a hole of `hole_color`
    pub fn capture(&mut self, ball_color: Color, hole_color: Color) -> CaptureOutcome {
        let correct =
            ball_color.is_neutral() || hole_color.is_neutral() || ball_color == hole_color;
        if correct {
            let gained = scaled(self.tables.increase_for(ball_color), self.increase_modifier);
            self.add_score(gained);
            log::debug!("{ball_color} ball captured by {hole_color} hole: +{gained}");
            CaptureOutcome::Correct { gained }
        } else {
            let lost = scaled(self.tables.decrease_for(ball_color), self.decrease_modifier);
            self.deduct_score(lost);
            self.queue.push_back(ball_color);
            log::debug!("{ball_color} ball captured by {hole_color} hole: -{lost}, requeued");
            CaptureOutcome::Wrong { lost }
        }
    }
}
