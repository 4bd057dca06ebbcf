//! Headless driver
//!
//! Usage: `inkball <config.json> [ticks] [seed]`
//!
//! Runs the configured levels without input, logs a status line every
//! simulated second and prints the final snapshot as JSON.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::path::{Path, PathBuf};

    use inkball::GameConfig;
    use inkball::consts::FPS;
    use inkball::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(config_path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: inkball <config.json> [ticks] [seed]");
        std::process::exit(2);
    };
    let ticks: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 30 * u64::from(FPS),
    };
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0),
    };

    let config = GameConfig::load(&config_path)?;
    let tables = config.score_tables()?;
    let base_dir = config_path.parent().unwrap_or(Path::new("."));
    let levels = config.into_levels(base_dir)?;

    log::info!("Inkball starting with seed {seed}");
    let mut state = GameState::new(levels, tables, seed);
    let input = TickInput::default();

    for _ in 0..ticks {
        tick(&mut state, &input);

        for event in &state.events {
            match event {
                GameEvent::LayoutFailed { level, message } => {
                    log::warn!("Level {} layout unusable: {message}", level + 1)
                }
                other => log::debug!("{other:?}"),
            }
        }

        if state.time_ticks % u64::from(FPS) == 0 {
            log::info!(
                "t={}s level {} {:?}: score {}, {}s left, {} balls, next spawn {:.1}s, queue {:?}",
                state.time_ticks / u64::from(FPS),
                state.level_index + 1,
                state.phase,
                state.score(),
                state.level_time,
                state.balls.len(),
                state.spawn_countdown_seconds(),
                state.queue_preview()
            );
        }

        // Nothing more happens without player input
        if matches!(state.phase, GamePhase::LevelTimeUp | GamePhase::GameEnded) {
            log::info!("Stopped after {} ticks in {:?}", state.time_ticks, state.phase);
            break;
        }
    }

    println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
