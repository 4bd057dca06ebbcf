//! Spawn queue and conveyor timing
//!
//! The queue holds colors still to enter play. Every `interval` the conveyor
//! pops the front color and drops a ball on a random spawner.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::board::Spawner;
use super::color::Color;
use crate::consts::{FPS, QUEUE_PREVIEW_LEN};

/// FIFO of pending ball colors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnQueue {
    colors: VecDeque<Color>,
}

impl SpawnQueue {
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
        }
    }

    pub fn push_back(&mut self, color: Color) {
        self.colors.push_back(color);
    }

    pub fn pop_front(&mut self) -> Option<Color> {
        self.colors.pop_front()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The next colors to spawn, as shown on the conveyor
    pub fn preview(&self) -> impl Iterator<Item = Color> + '_ {
        self.colors.iter().copied().take(QUEUE_PREVIEW_LEN)
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.colors.iter().copied()
    }
}

/// Spawn countdown, measured in frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conveyor {
    /// Frames until the next spawn
    pub spawn_frames: u32,
    /// Frames between spawns
    pub interval_frames: u32,
}

impl Conveyor {
    /// Start a level's conveyor. Intervals shorter than one frame spawn every frame.
    pub fn new(interval_secs: u32) -> Self {
        let interval_frames = interval_secs.saturating_mul(FPS).max(1);
        Self {
            spawn_frames: interval_frames,
            interval_frames,
        }
    }

    /// Advance the countdown by one frame
    pub fn countdown(&mut self) {
        self.spawn_frames = self.spawn_frames.saturating_sub(1);
    }

    pub fn is_due(&self) -> bool {
        self.spawn_frames == 0
    }

    pub fn rearm(&mut self) {
        self.spawn_frames = self.interval_frames;
    }

    /// Time to next spawn in seconds, truncated to tenths (HUD display)
    pub fn display_seconds(&self) -> f32 {
        let tenths = self.spawn_frames / (FPS / 10);
        tenths as f32 / 10.0
    }

    /// If due, re-arm and spawn the front queued color on a random spawner
    ///
    /// Without spawners the color stays queued.
    pub fn spawn_if_due(
        &mut self,
        queue: &mut SpawnQueue,
        spawners: &[Spawner],
        rng: &mut impl Rng,
        id: u32,
    ) -> Option<Ball> {
        if !self.is_due() {
            return None;
        }
        self.rearm();
        if queue.is_empty() {
            return None;
        }
        if spawners.is_empty() {
            log::warn!("{} balls queued but the level has no spawners", queue.len());
            return None;
        }
        let color = queue.pop_front()?;
        let spawner = spawners[rng.random_range(0..spawners.len())];
        Some(Ball::spawn(id, spawner.center, color, rng))
    }
}
