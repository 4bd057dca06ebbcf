//! Session state and level lifecycle
//!
//! Everything the renderer reads between ticks lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::board::Board;
use super::color::Color;
use super::context::{CaptureOutcome, ScoreTables, SimContext};
use super::conveyor::{Conveyor, SpawnQueue};
use super::layout::{LayoutSource, LayoutWarning, load_layout};
use super::lines::{DrawnLine, LineCanvas};
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Balls moving, timers counting down
    Running,
    /// Frozen; lines can still be drawn
    Paused,
    /// Level cleared; the next tick advances or ends the game
    LevelComplete,
    /// Remaining time is converted into score
    LevelCompletionAnimation,
    /// Timer ran out. The surrounding layer decides what happens next.
    LevelTimeUp,
    /// Last level done; waiting for a restart
    GameEnded,
}

/// One level's parameters, with colors already validated
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub layout: LayoutSource,
    /// Time limit in seconds; `None` runs the level without a limit
    pub time_secs: Option<u32>,
    /// Seconds between conveyor spawns
    pub spawn_interval_secs: u32,
    pub increase_modifier: f32,
    pub decrease_modifier: f32,
    /// Initial queue, front first
    pub balls: Vec<Color>,
}

/// Things that happened during a tick, for sound/UI hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: usize },
    BallSpawned { id: u32, color: Color },
    BallCaptured { id: u32, color: Color, outcome: CaptureOutcome },
    LinesConsumed { count: usize },
    TimeUp,
    LevelCompleted { level: usize },
    GameEnded { score: u32 },
    /// The level layout could not be read; the board was left empty
    LayoutFailed { level: usize, message: String },
}

/// Two highlight tiles circling the board edge after a level is cleared
///
/// The lead tile walks the perimeter clockwise; the second mirrors it through
/// the board center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionWalk {
    pub row: i32,
    pub col: i32,
    dir_row: i32,
    dir_col: i32,
    /// Animation advances on every other tick; true on the ticks that move
    pub step_pending: bool,
}

impl Default for CompletionWalk {
    fn default() -> Self {
        Self {
            row: 1,
            col: 0,
            dir_row: -1,
            dir_col: 0,
            step_pending: true,
        }
    }
}

impl CompletionWalk {
    /// Move the lead tile one cell, turning at the corners
    pub fn advance(&mut self) {
        let last = BOARD_SIZE as i32 - 1;
        self.row += self.dir_row;
        self.col += self.dir_col;
        match (self.row, self.col) {
            (0, 0) => (self.dir_row, self.dir_col) = (0, 1),
            (0, c) if c == last => (self.dir_row, self.dir_col) = (1, 0),
            (r, c) if r == last && c == last => (self.dir_row, self.dir_col) = (0, -1),
            (r, 0) if r == last => (self.dir_row, self.dir_col) = (-1, 0),
            _ => {}
        }
    }

    /// (row, col) of both highlighted tiles
    pub fn tiles(&self) -> [(i32, i32); 2] {
        let last = BOARD_SIZE as i32 - 1;
        [(self.row, self.col), (last - self.row, last - self.col)]
    }
}

/// What a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    /// 1-based level number
    pub level: usize,
    pub score: u32,
    /// Seconds left on the level timer
    pub level_time: u32,
    /// False for levels that never time out
    pub time_limited: bool,
    /// Seconds until the next spawn, in tenths
    pub spawn_countdown: f32,
    pub queue_preview: Vec<Color>,
    pub balls: Vec<Ball>,
    pub lines: Vec<DrawnLine>,
    pub current_stroke: Option<Vec<Vec2>>,
    /// Highlight tiles while the completion animation plays
    pub completion_tiles: Option<[(i32, i32); 2]>,
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub levels: Vec<Level>,
    /// Current level (0-based)
    pub level_index: usize,
    pub phase: GamePhase,
    /// Score at the start of the current level; restarts fall back to it
    pub previous_score: u32,
    /// Score tables, modifiers, live score and spawn queue
    pub ctx: SimContext,
    /// Frames left on the level timer
    pub level_frames: u32,
    /// Seconds left on the level timer (also the completion-animation budget)
    pub level_time: u32,
    /// False when the level has no time limit; its timer stays at zero
    pub time_limited: bool,
    pub conveyor: Conveyor,
    pub board: Board,
    pub balls: Vec<Ball>,
    pub canvas: LineCanvas,
    pub walk: CompletionWalk,
    /// Non-fatal problems found in the current layout
    pub layout_warnings: Vec<LayoutWarning>,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(super) rng: Pcg32,
    pub(super) next_id: u32,
}

impl GameState {
    /// Create a session and load the first level
    pub fn new(levels: Vec<Level>, tables: ScoreTables, seed: u64) -> Self {
        let mut state = Self {
            seed,
            levels,
            level_index: 0,
            phase: GamePhase::Running,
            previous_score: 0,
            ctx: SimContext::new(tables),
            level_frames: 0,
            level_time: 0,
            time_limited: false,
            conveyor: Conveyor::default(),
            board: Board::empty(),
            balls: Vec::new(),
            canvas: LineCanvas::new(),
            walk: CompletionWalk::default(),
            layout_warnings: Vec::new(),
            events: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        if state.levels.is_empty() {
            log::warn!("No levels configured; session starts ended");
            state.phase = GamePhase::GameEnded;
        } else {
            state.load_level();
        }
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn score(&self) -> u32 {
        self.ctx.score
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.levels.get(self.level_index)
    }

    /// Up to five upcoming colors
    pub fn queue_preview(&self) -> Vec<Color> {
        self.ctx.queue.preview().collect()
    }

    /// Seconds until the next conveyor spawn (tenths resolution)
    pub fn spawn_countdown_seconds(&self) -> f32 {
        self.conveyor.display_seconds()
    }

    /// (Re)load the current level: board, balls, timers and queue
    ///
    /// Keeps the score and drawn lines; callers clear lines where needed.
    pub fn load_level(&mut self) {
        let Some(level) = self.levels.get(self.level_index).cloned() else {
            return;
        };

        self.balls.clear();
        self.layout_warnings.clear();
        match load_layout(&level.layout) {
            Ok(parsed) => {
                self.board = parsed.board;
                self.layout_warnings = parsed.warnings;
                for (pos, color) in parsed.balls {
                    let id = self.next_entity_id();
                    let ball = Ball::spawn(id, pos, color, &mut self.rng);
                    self.balls.push(ball);
                }
            }
            Err(err) => {
                log::error!("Level {}: {err}", self.level_index + 1);
                self.board = Board::empty();
                self.events.push(GameEvent::LayoutFailed {
                    level: self.level_index,
                    message: err.to_string(),
                });
            }
        }

        let time_secs = level.time_secs.unwrap_or(0);
        self.time_limited = level.time_secs.is_some();
        self.level_time = time_secs;
        self.level_frames = time_secs.saturating_mul(FPS);
        self.conveyor = Conveyor::new(level.spawn_interval_secs);
        self.ctx.increase_modifier = level.increase_modifier;
        self.ctx.decrease_modifier = level.decrease_modifier;
        self.ctx.queue = SpawnQueue::new(level.balls.iter().copied());
        self.walk = CompletionWalk::default();
        self.phase = GamePhase::Running;

        log::info!(
            "Level {} loaded: {} balls on board, {} queued, {:?}s limit, {} spawners",
            self.level_index + 1,
            self.balls.len(),
            self.ctx.queue.len(),
            level.time_secs,
            self.board.spawners().len()
        );
        self.events.push(GameEvent::LevelStarted {
            level: self.level_index,
        });
    }

    /// Running <-> Paused; other phases are unaffected
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => other,
        };
    }

    /// Reload the current level with the score it started with
    ///
    /// After the game has ended this starts over from level 1 with zero score.
    /// Ignored while the completion animation plays.
    pub fn restart(&mut self) {
        if self.phase == GamePhase::LevelCompletionAnimation {
            return;
        }
        if self.phase == GamePhase::GameEnded {
            self.level_index = 0;
            self.ctx.score = 0;
            self.previous_score = 0;
        }
        self.canvas.clear();
        self.ctx.score = self.previous_score;
        log::info!("Restarting level {}", self.level_index + 1);
        self.load_level();
    }

    /// Move to the next level, or end the game after the last one
    pub fn advance_level(&mut self) {
        if self.level_index + 1 < self.levels.len() {
            self.level_index += 1;
            self.previous_score = self.ctx.score;
            self.canvas.clear();
            self.load_level();
        } else {
            log::info!("Game ended with score {}", self.ctx.score);
            self.phase = GamePhase::GameEnded;
            self.events.push(GameEvent::GameEnded {
                score: self.ctx.score,
            });
        }
    }

    /// One step of the completion animation: walk the tiles, trade a second for a point
    pub fn completion_step(&mut self) {
        self.walk.advance();
        self.level_time = self.level_time.saturating_sub(1);
        self.ctx.add_score(1);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            level: self.level_index + 1,
            score: self.ctx.score,
            level_time: self.level_time,
            time_limited: self.time_limited,
            spawn_countdown: self.spawn_countdown_seconds(),
            queue_preview: self.queue_preview(),
            balls: self.balls.clone(),
            lines: self.canvas.lines.clone(),
            current_stroke: self.canvas.current_stroke().map(<[Vec2]>::to_vec),
            completion_tiles: (self.phase == GamePhase::LevelCompletionAnimation)
                .then(|| self.walk.tiles()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn tables() -> ScoreTables {
        ScoreTables {
            increase: [70, 50, 50, 50, 100],
            decrease: [0, 25, 25, 25, 100],
        }
    }

    pub(crate) fn level(layout: &str, time_secs: u32, balls: &[Color]) -> Level {
        Level {
            layout: LayoutSource::Inline(layout.to_string()),
            time_secs: Some(time_secs),
            spawn_interval_secs: 1,
            increase_modifier: 1.0,
            decrease_modifier: 1.0,
            balls: balls.to_vec(),
        }
    }

    #[test]
    fn test_new_loads_first_level() {
        let state = GameState::new(
            vec![level("B1 S", 120, &[Color::Blue, Color::Green])],
            tables(),
            1,
        );
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].color, Color::Orange);
        assert_eq!(state.level_time, 120);
        assert_eq!(state.level_frames, 120 * FPS);
        assert_eq!(state.queue_preview(), vec![Color::Blue, Color::Green]);
        assert_eq!(state.board.spawners().len(), 1);
        assert_eq!(state.events, vec![GameEvent::LevelStarted { level: 0 }]);
    }

    #[test]
    fn test_huge_time_limit_saturates() {
        let state = GameState::new(vec![level("", u32::MAX, &[])], tables(), 1);
        assert_eq!(state.level_frames, u32::MAX);
        assert_eq!(state.level_time, u32::MAX);
        assert!(state.time_limited);
    }

    #[test]
    fn test_untimed_level_loads_with_zero_timer() {
        let mut lvl = level("", 0, &[Color::Blue]);
        lvl.time_secs = None;
        let state = GameState::new(vec![lvl], tables(), 1);
        assert!(!state.time_limited);
        assert_eq!(state.level_frames, 0);
        assert_eq!(state.level_time, 0);
        assert!(!state.snapshot().time_limited);
    }

    #[test]
    fn test_no_levels_starts_ended() {
        let state = GameState::new(Vec::new(), tables(), 1);
        assert_eq!(state.phase, GamePhase::GameEnded);
    }

    #[test]
    fn test_unreadable_layout_leaves_empty_board() {
        let mut lvl = level("", 10, &[Color::Blue]);
        lvl.layout = LayoutSource::File("/no/such/inkball/layout.txt".into());
        let state = GameState::new(vec![lvl], tables(), 1);
        assert_eq!(state.board, Board::empty());
        assert!(state.balls.is_empty());
        assert_eq!(state.phase, GamePhase::Running);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::LayoutFailed { level: 0, .. }))
        );
    }

    #[test]
    fn test_completion_steps_convert_time_to_score() {
        let mut state = GameState::new(vec![level("", 100, &[])], tables(), 1);
        state.ctx.score = 0;
        for i in 0..100 {
            state.completion_step();
            assert_eq!(state.level_time, 100 - (i + 1));
            assert_eq!(state.score(), i + 1);
        }
        assert_eq!(state.level_time, 0);
        assert_eq!(state.score(), 100);
    }

    #[test]
    fn test_walk_turns_at_corners() {
        let mut walk = CompletionWalk::default();
        walk.advance();
        assert_eq!(walk.tiles(), [(0, 0), (17, 17)]);
        for _ in 0..17 {
            walk.advance();
        }
        assert_eq!((walk.row, walk.col), (0, 17));
        walk.advance();
        assert_eq!((walk.row, walk.col), (1, 17));
        // Full lap returns to the start corner
        for _ in 0..(17 * 4 - 18) {
            walk.advance();
        }
        assert_eq!((walk.row, walk.col), (0, 0));
    }

    #[test]
    fn test_restart_restores_level_score() {
        let mut state = GameState::new(vec![level("S", 60, &[Color::Blue])], tables(), 1);
        state.previous_score = 30;
        state.ctx.score = 80;
        state.canvas.begin_stroke(Vec2::ZERO);
        state.canvas.extend_stroke(Vec2::ONE);
        state.canvas.end_stroke();
        state.phase = GamePhase::LevelTimeUp;

        state.restart();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score(), 30);
        assert!(state.canvas.lines.is_empty());
        assert_eq!(state.ctx.queue.len(), 1);
    }

    #[test]
    fn test_restart_after_game_end_resets_everything() {
        let mut state = GameState::new(
            vec![level("", 60, &[]), level("", 60, &[])],
            tables(),
            1,
        );
        state.level_index = 1;
        state.previous_score = 30;
        state.ctx.score = 50;
        state.phase = GamePhase::GameEnded;

        state.restart();
        assert_eq!(state.level_index, 0);
        assert_eq!(state.score(), 0);
        assert_eq!(state.previous_score, 0);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_restart_ignored_during_animation() {
        let mut state = GameState::new(vec![level("", 60, &[])], tables(), 1);
        state.phase = GamePhase::LevelCompletionAnimation;
        state.ctx.score = 40;
        state.restart();
        assert_eq!(state.phase, GamePhase::LevelCompletionAnimation);
        assert_eq!(state.score(), 40);
    }

    #[test]
    fn test_toggle_pause_only_between_running_and_paused() {
        let mut state = GameState::new(vec![level("", 60, &[])], tables(), 1);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Running);
        state.phase = GamePhase::LevelTimeUp;
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::LevelTimeUp);
    }

    #[test]
    fn test_advance_level_carries_score() {
        let mut state = GameState::new(
            vec![level("", 60, &[]), level("S", 90, &[Color::Yellow])],
            tables(),
            1,
        );
        state.ctx.score = 120;
        state.canvas.begin_stroke(Vec2::ZERO);
        state.canvas.extend_stroke(Vec2::ONE);
        state.canvas.end_stroke();

        state.advance_level();
        assert_eq!(state.level_index, 1);
        assert_eq!(state.previous_score, 120);
        assert_eq!(state.score(), 120);
        assert_eq!(state.level_time, 90);
        assert!(state.canvas.lines.is_empty());

        state.advance_level();
        assert_eq!(state.phase, GamePhase::GameEnded);
        assert_eq!(state.score(), 120);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(vec![level("B2", 10, &[Color::Green])], tables(), 5);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"RUNNING\""));
        assert!(json.contains("\"blue\""));
        assert!(json.contains("\"green\""));
    }
}
