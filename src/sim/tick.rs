//! Fixed timestep simulation tick
//!
//! One call advances the session by one frame (1/FPS seconds). Player input
//! for the frame is applied first, then the current phase is stepped.

use glam::Vec2;

use super::ball::BallFate;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Pointer events for line drawing, in arrival order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeEvent {
    /// Button pressed: start a stroke at this point
    Start(Vec2),
    /// Drag: extend the stroke
    Move(Vec2),
    /// Button released: commit the stroke
    End,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
    /// Restart the level (or the whole game once it has ended)
    pub restart: bool,
    /// Drawing events since the last tick
    pub strokes: Vec<StrokeEvent>,
    /// Erase the line passing near this point
    pub remove_at: Option<Vec2>,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    apply_input(state, input);
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Running => tick_running(state),
        GamePhase::LevelCompletionAnimation => tick_completion_animation(state),
        GamePhase::LevelComplete => state.advance_level(),
        GamePhase::GameEnded => state.canvas.clear(),
        GamePhase::Paused | GamePhase::LevelTimeUp => {}
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let animating = state.phase == GamePhase::LevelCompletionAnimation;

    if input.pause && !animating {
        state.toggle_pause();
    }
    if input.restart && !animating {
        state.restart();
    }

    for event in &input.strokes {
        let can_draw = matches!(state.phase, GamePhase::Running | GamePhase::Paused);
        match *event {
            StrokeEvent::Start(point) if can_draw => state.canvas.begin_stroke(point),
            StrokeEvent::Move(point) if can_draw => state.canvas.extend_stroke(point),
            StrokeEvent::End => {
                state.canvas.end_stroke();
            }
            _ => {}
        }
    }

    if let Some(point) = input.remove_at {
        if state.canvas.remove_near(point) {
            log::debug!("Removed line near ({:.0}, {:.0})", point.x, point.y);
        }
    }
}

fn tick_running(state: &mut GameState) {
    // Nothing left to play: cash in the remaining time
    if state.balls.is_empty() && state.ctx.queue.is_empty() {
        log::info!(
            "Level {} cleared with {}s left",
            state.level_index + 1,
            state.level_time
        );
        state.walk = Default::default();
        state.phase = GamePhase::LevelCompletionAnimation;
        return;
    }

    // Timers. Untimed levels only run the conveyor clock.
    if state.time_limited {
        state.level_frames = state.level_frames.saturating_sub(1);
        state.level_time = state.level_frames / FPS;
    }
    state.conveyor.countdown();
    if state.time_limited && state.level_frames == 0 {
        log::info!("Level {} timed out", state.level_index + 1);
        state.phase = GamePhase::LevelTimeUp;
        state.events.push(GameEvent::TimeUp);
    }

    // Balls: board interaction, then movement. Captured balls leave play.
    let board = &state.board;
    let ctx = &mut state.ctx;
    let events = &mut state.events;
    state.balls.retain_mut(|ball| {
        let fate = ball.resolve_adjacency(board, ctx);
        ball.update();
        match fate {
            BallFate::Alive => true,
            BallFate::Captured(outcome) => {
                events.push(GameEvent::BallCaptured {
                    id: ball.id,
                    color: ball.color,
                    outcome,
                });
                false
            }
        }
    });

    // Conveyor
    let id = state.next_id;
    if let Some(ball) = state.conveyor.spawn_if_due(
        &mut state.ctx.queue,
        state.board.spawners(),
        &mut state.rng,
        id,
    ) {
        state.next_id += 1;
        log::debug!("Spawned {} ball {} at {:?}", ball.color, ball.id, ball.pos);
        state.events.push(GameEvent::BallSpawned {
            id: ball.id,
            color: ball.color,
        });
        state.balls.push(ball);
    }

    // Ink lines
    if state.phase == GamePhase::Running {
        let count = state.canvas.collide_balls(&mut state.balls);
        if count > 0 {
            state.events.push(GameEvent::LinesConsumed { count });
        }
    }
}

fn tick_completion_animation(state: &mut GameState) {
    if state.level_time == 0 {
        log::info!(
            "Level {} complete, score {}",
            state.level_index + 1,
            state.ctx.score
        );
        state.phase = GamePhase::LevelComplete;
        state.events.push(GameEvent::LevelCompleted {
            level: state.level_index,
        });
        return;
    }

    if state.walk.step_pending {
        state.completion_step();
    }
    state.walk.step_pending = !state.walk.step_pending;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::Ball;
    use crate::sim::color::Color;
    use crate::sim::context::CaptureOutcome;
    use crate::sim::state::tests::{level, tables};

    fn run(state: &mut GameState, ticks: usize) {
        let input = TickInput::default();
        for _ in 0..ticks {
            tick(state, &input);
        }
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let levels = vec![level("B1 B2 B3 B4\nW  X3   S", 60, &[Color::Blue, Color::Green])];
        let mut state1 = GameState::new(levels.clone(), tables(), 99999);
        let mut state2 = GameState::new(levels, tables(), 99999);

        run(&mut state1, 300);
        run(&mut state2, 300);

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.balls.len(), state2.balls.len());
        for (a, b) in state1.balls.iter().zip(&state2.balls) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.vel, b.vel);
            assert_eq!(a.color, b.color);
        }
        assert_eq!(state1.score(), state2.score());
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(vec![level("B1", 60, &[])], tables(), 12345);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);

        let pos = state.balls[0].pos;
        let frames = state.level_frames;
        run(&mut state, 10);
        assert_eq!(state.balls[0].pos, pos);
        assert_eq!(state.level_frames, frames);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Running);
        assert_ne!(state.balls[0].pos, pos);
    }

    #[test]
    fn test_time_up() {
        // Queued color with no spawners keeps the level alive
        let mut state = GameState::new(vec![level("", 1, &[Color::Blue])], tables(), 1);
        run(&mut state, (FPS - 1) as usize);
        assert_eq!(state.phase, GamePhase::Running);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::LevelTimeUp);
        assert_eq!(state.level_time, 0);
        assert_eq!(state.events, vec![GameEvent::TimeUp]);

        run(&mut state, 5);
        assert_eq!(state.phase, GamePhase::LevelTimeUp);
        assert_eq!(state.ctx.queue.len(), 1);
    }

    #[test]
    fn test_untimed_level_never_times_up() {
        let json = r#"{"levels": [
            {"layout": "unused.txt", "time": -1, "spawn_interval": 2, "balls": ["blue"]}
        ]}"#;
        let mut levels = crate::GameConfig::from_json_str(json)
            .unwrap()
            .into_levels(std::path::Path::new("."))
            .unwrap();
        assert_eq!(levels[0].time_secs, None);
        levels[0].layout = crate::sim::LayoutSource::Inline(String::new());

        let mut state = GameState::new(levels, tables(), 1);
        run(&mut state, 10 * FPS as usize);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.level_time, 0);
        assert!(!state.events.contains(&GameEvent::TimeUp));

        // Clearing it leaves no time to cash in
        state.ctx.queue = Default::default();
        run(&mut state, 2);
        assert_eq!(state.phase, GamePhase::LevelComplete);
    }

    #[test]
    fn test_conveyor_spawns_each_interval() {
        let mut state = GameState::new(
            vec![level("S", 60, &[Color::Blue, Color::Green])],
            tables(),
            3,
        );
        run(&mut state, (FPS - 1) as usize);
        assert!(state.balls.is_empty());

        tick(&mut state, &TickInput::default());
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].color, Color::Blue);
        assert_eq!(state.balls[0].pos, crate::cell_center(0, 0));
        assert!(matches!(
            state.events.as_slice(),
            [GameEvent::BallSpawned {
                color: Color::Blue,
                ..
            }]
        ));
        assert_eq!(state.queue_preview(), vec![Color::Green]);
    }

    #[test]
    fn test_wrong_hole_requeues_and_penalizes() {
        let mut state = GameState::new(vec![level("", 60, &[])], tables(), 1);
        let (hole_id, _) = state.board.place_hole(0, 0, Color::Blue);
        let center = state.board.hole(hole_id).map(|h| h.center).unwrap();
        let id = state.next_entity_id();
        state
            .balls
            .push(Ball::new(id, center, Vec2::ZERO, Color::Orange));
        state.ctx.score = 100;

        tick(&mut state, &TickInput::default());
        assert!(state.balls.is_empty());
        assert_eq!(state.score(), 75);
        assert_eq!(state.queue_preview(), vec![Color::Orange]);
        assert!(state.events.contains(&GameEvent::BallCaptured {
            id,
            color: Color::Orange,
            outcome: CaptureOutcome::Wrong { lost: 25 },
        }));
        // Ball is back in the queue, so the level is not complete
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_completion_animation_through_ticks() {
        let mut state = GameState::new(vec![level("", 2, &[])], tables(), 1);
        run(&mut state, 1);
        assert_eq!(state.phase, GamePhase::LevelCompletionAnimation);
        assert_eq!(state.level_time, 2);

        // One step every other tick
        run(&mut state, 1);
        assert_eq!((state.level_time, state.score()), (1, 1));
        run(&mut state, 1);
        assert_eq!((state.level_time, state.score()), (1, 1));
        run(&mut state, 1);
        assert_eq!((state.level_time, state.score()), (0, 2));
        assert_eq!(state.phase, GamePhase::LevelCompletionAnimation);

        run(&mut state, 1);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.events, vec![GameEvent::LevelCompleted { level: 0 }]);

        // Single level: the next tick ends the game
        run(&mut state, 1);
        assert_eq!(state.phase, GamePhase::GameEnded);
        assert_eq!(state.score(), 2);
    }

    #[test]
    fn test_completion_animation_long_level() {
        let mut state = GameState::new(vec![level("", 100, &[])], tables(), 1);
        run(&mut state, 1);
        run(&mut state, 200);
        assert_eq!(state.level_time, 0);
        assert_eq!(state.score(), 100);
    }

    #[test]
    fn test_animation_ignores_pause_and_restart() {
        let mut state = GameState::new(vec![level("", 10, &[])], tables(), 1);
        run(&mut state, 1);
        let input = TickInput {
            pause: true,
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::LevelCompletionAnimation);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_level_complete_advances() {
        let mut state = GameState::new(
            vec![level("", 1, &[]), level("B3", 45, &[Color::Green])],
            tables(),
            1,
        );
        // Clear, one animation step, complete, advance
        run(&mut state, 4);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.previous_score, 1);
        assert_eq!(state.level_time, 45);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_strokes_only_while_playable() {
        let mut state = GameState::new(vec![level("", 60, &[Color::Blue])], tables(), 1);
        let draw = TickInput {
            strokes: vec![
                StrokeEvent::Start(Vec2::new(100.0, 100.0)),
                StrokeEvent::Move(Vec2::new(150.0, 100.0)),
                StrokeEvent::End,
            ],
            ..Default::default()
        };
        tick(&mut state, &draw);
        assert_eq!(state.canvas.lines.len(), 1);

        state.phase = GamePhase::LevelTimeUp;
        tick(&mut state, &draw);
        assert_eq!(state.canvas.lines.len(), 1);

        // Erasing works in any phase
        let erase = TickInput {
            remove_at: Some(Vec2::new(120.0, 101.0)),
            ..Default::default()
        };
        tick(&mut state, &erase);
        assert!(state.canvas.lines.is_empty());
    }

    #[test]
    fn test_stroke_spans_ticks() {
        let mut state = GameState::new(vec![level("", 60, &[Color::Blue])], tables(), 1);
        let start = TickInput {
            strokes: vec![StrokeEvent::Start(Vec2::new(10.0, 10.0))],
            ..Default::default()
        };
        let drag = TickInput {
            strokes: vec![StrokeEvent::Move(Vec2::new(20.0, 10.0))],
            ..Default::default()
        };
        let release = TickInput {
            strokes: vec![StrokeEvent::End],
            ..Default::default()
        };
        tick(&mut state, &start);
        tick(&mut state, &drag);
        assert!(state.canvas.lines.is_empty());
        assert_eq!(state.snapshot().current_stroke.map(|s| s.len()), Some(2));
        tick(&mut state, &release);
        assert_eq!(state.canvas.lines.len(), 1);
    }

    #[test]
    fn test_line_bounces_ball_and_is_consumed() {
        let mut state = GameState::new(vec![level("", 60, &[])], tables(), 1);
        let id = state.next_entity_id();
        state.balls.push(Ball::new(
            id,
            Vec2::new(100.0, 100.0),
            Vec2::new(2.0, 0.0),
            Color::Grey,
        ));
        let draw = TickInput {
            strokes: vec![
                StrokeEvent::Start(Vec2::new(114.0, 50.0)),
                StrokeEvent::Move(Vec2::new(114.0, 150.0)),
                StrokeEvent::End,
            ],
            ..Default::default()
        };
        tick(&mut state, &draw);
        assert!(state.canvas.lines.is_empty());
        assert!(state.balls[0].vel.x < 0.0);
        assert!(state.events.contains(&GameEvent::LinesConsumed { count: 1 }));
    }

    #[test]
    fn test_game_ended_clears_lines_and_restart_resets() {
        let mut state = GameState::new(vec![level("", 60, &[Color::Blue])], tables(), 1);
        let draw = TickInput {
            strokes: vec![
                StrokeEvent::Start(Vec2::new(10.0, 10.0)),
                StrokeEvent::Move(Vec2::new(90.0, 10.0)),
                StrokeEvent::End,
            ],
            ..Default::default()
        };
        tick(&mut state, &draw);
        state.phase = GamePhase::GameEnded;
        state.ctx.score = 300;
        tick(&mut state, &TickInput::default());
        assert!(state.canvas.lines.is_empty());

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.level_index, 0);
    }
}
