//! Level list and score tables
//!
//! Loaded from a JSON file. Color names are validated when the config is
//! turned into engine [`Level`]s and [`ScoreTables`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sim::{Color, ColorError, Level, LayoutSource, ScoreTables};

/// Errors from loading or validating a config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{context}: {source}")]
    Color {
        context: String,
        #[source]
        source: ColorError,
    },
    #[error("config defines no levels")]
    NoLevels,
}

fn default_modifier() -> f32 {
    1.0
}

/// One entry of the `levels` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Layout file, relative to the config file's directory
    pub layout: String,
    /// Time limit in seconds; negative or missing means no limit
    #[serde(default)]
    pub time: Option<i32>,
    /// Seconds between conveyor spawns
    pub spawn_interval: u32,
    #[serde(default = "default_modifier")]
    pub score_increase_from_hole_capture_modifier: f32,
    #[serde(default = "default_modifier")]
    pub score_decrease_from_wrong_hole_modifier: f32,
    /// Queued ball colors by name, front first
    #[serde(default)]
    pub balls: Vec<String>,
}

/// Whole-game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub levels: Vec<LevelConfig>,
    /// Points for a correct capture, by color name
    pub score_increase_from_hole_capture: HashMap<String, u32>,
    /// Penalty for a wrong capture, by color name
    pub score_decrease_from_wrong_hole: HashMap<String, u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let table = |values: [u32; 5]| -> HashMap<String, u32> {
            Color::ALL
                .iter()
                .zip(values)
                .map(|(color, v)| (color.name().to_string(), v))
                .collect()
        };
        Self {
            levels: Vec::new(),
            score_increase_from_hole_capture: table([70, 50, 50, 50, 100]),
            score_decrease_from_wrong_hole: table([0, 25, 25, 25, 100]),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded {} levels from {}", config.levels.len(), path.display());
        Ok(config)
    }

    /// Validate both score tables
    ///
    /// Unknown color names are errors. Colors missing from a table score 0.
    pub fn score_tables(&self) -> Result<ScoreTables, ConfigError> {
        Ok(ScoreTables {
            increase: table_from_map(
                "score_increase_from_hole_capture",
                &self.score_increase_from_hole_capture,
            )?,
            decrease: table_from_map(
                "score_decrease_from_wrong_hole",
                &self.score_decrease_from_wrong_hole,
            )?,
        })
    }

    /// Build engine levels, resolving layout paths against `base_dir`
    pub fn into_levels(self, base_dir: &Path) -> Result<Vec<Level>, ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        self.levels
            .into_iter()
            .enumerate()
            .map(|(i, level)| {
                let balls = level
                    .balls
                    .iter()
                    .map(|name| {
                        name.parse::<Color>().map_err(|source| ConfigError::Color {
                            context: format!("level {} balls", i + 1),
                            source,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Level {
                    layout: LayoutSource::File(base_dir.join(&level.layout)),
                    time_secs: level.time.and_then(|t| u32::try_from(t).ok()),
                    spawn_interval_secs: level.spawn_interval,
                    increase_modifier: level.score_increase_from_hole_capture_modifier,
                    decrease_modifier: level.score_decrease_from_wrong_hole_modifier,
                    balls,
                })
            })
            .collect()
    }
}

fn table_from_map(name: &str, map: &HashMap<String, u32>) -> Result<[u32; 5], ConfigError> {
    let mut table = [0; 5];
    let mut seen = [false; 5];
    for (key, &value) in map {
        let color = key.parse::<Color>().map_err(|source| ConfigError::Color {
            context: name.to_string(),
            source,
        })?;
        table[color.index()] = value;
        seen[color.index()] = true;
    }
    for color in Color::ALL {
        if !seen[color.index()] {
            log::warn!("{name} has no entry for {color}; it scores 0");
        }
    }
    Ok(table)
}
