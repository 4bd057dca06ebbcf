//! Level layout parsing
//!
//! A layout is up to 18 text rows. Each character addresses the column with
//! the same index; two-character tiles (`V`, `Z`, `H`, `B` + color digit)
//! consume the following column too.
//!
//! | chars | tile |
//! |-------|------|
//! | `X`   | grey wall |
//! | `1`-`4` | colored wall |
//! | `V<d>` | vertical restricted wall |
//! | `Z<d>` | horizontal restricted wall |
//! | `H<d>` | hole (top-left cell of a 2x2 block) |
//! | `B<d>` | ball placed on this cell |
//! | `S`   | spawner |
//!
//! Anything else is an empty cell. Rows and columns past 18 are ignored.

use std::path::PathBuf;

use glam::Vec2;

use super::board::{Board, Orientation};
use super::color::{Color, ColorError};
use crate::cell_center;
use crate::consts::BOARD_SIZE;

/// Fatal layout problems: the source could not be read at all
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("failed to read layout {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Recoverable layout problems; the offending tile is left empty
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutWarning {
    #[error("row {row}, column {col}: '{marker}' has no color code")]
    MissingColorCode { row: usize, col: usize, marker: char },
    #[error("row {row}, column {col}: '{marker}' has invalid color code: {error}")]
    InvalidColorCode {
        row: usize,
        col: usize,
        marker: char,
        error: ColorError,
    },
    #[error("row {row}, column {col}: hole footprint extends past the board")]
    HoleClipped { row: usize, col: usize },
}

/// Where a level's layout text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSource {
    Inline(String),
    File(PathBuf),
}

impl LayoutSource {
    pub fn read(&self) -> Result<String, LayoutError> {
        match self {
            LayoutSource::Inline(text) => Ok(text.clone()),
            LayoutSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

/// Result of a successful parse, possibly with warnings
#[derive(Debug, Clone, Default)]
pub struct ParsedLayout {
    pub board: Board,
    /// Balls pre-placed on the board (center, color)
    pub balls: Vec<(Vec2, Color)>,
    pub warnings: Vec<LayoutWarning>,
}

/// Read and parse a layout
pub fn load_layout(source: &LayoutSource) -> Result<ParsedLayout, LayoutError> {
    let text = source.read()?;
    Ok(parse_layout(&text))
}

/// Parse layout text. Never fails; problems are reported as warnings.
pub fn parse_layout(text: &str) -> ParsedLayout {
    let mut parsed = ParsedLayout::default();
    for (row, line) in text.lines().take(BOARD_SIZE).enumerate() {
        let chars: Vec<char> = line.chars().collect();
        parse_row(&mut parsed, row, &chars);
    }
    parsed
}

fn parse_row(parsed: &mut ParsedLayout, row: usize, chars: &[char]) {
    let mut col = 0;
    while col < BOARD_SIZE && col < chars.len() {
        let marker = chars[col];
        match marker {
            'X' => {
                parsed.board.place_wall(row, col, Color::Grey);
            }
            '1'..='4' => {
                if let Ok(color) = Color::from_digit(marker) {
                    parsed.board.place_wall(row, col, color);
                }
            }
            'V' | 'H' | 'B' => {
                if let Some(color) = color_code(parsed, row, col, marker, chars.get(col + 1)) {
                    match marker {
                        'V' => {
                            parsed.board.place_restricted_wall(
                                row,
                                col,
                                color,
                                Orientation::Vertical,
                            );
                        }
                        'H' => {
                            let (_, placed) = parsed.board.place_hole(row, col, color);
                            if placed < 4 {
                                log::warn!("Hole at row {row}, column {col} is clipped by the board edge");
                                parsed.warnings.push(LayoutWarning::HoleClipped { row, col });
                            }
                        }
                        _ => parsed.balls.push((cell_center(row, col), color)),
                    }
                }
                // The color digit occupies the next column
                if col + 1 < chars.len() {
                    col += 1;
                }
            }
            'Z' => {
                // The color normally follows directly; otherwise take the next
                // digit further along the row without consuming anything.
                let adjacent = chars.get(col + 1).is_some_and(|c| c.is_ascii_digit());
                let code = if adjacent {
                    chars.get(col + 1)
                } else {
                    chars[col + 1..].iter().find(|c| c.is_ascii_digit())
                };
                if let Some(color) = color_code(parsed, row, col, marker, code) {
                    parsed.board.place_restricted_wall(
                        row,
                        col,
                        color,
                        Orientation::Horizontal,
                    );
                }
                if adjacent {
                    col += 1;
                }
            }
            'S' => {
                parsed.board.place_spawner(row, col);
            }
            // Spaces and unknown characters leave the cell as is
            _ => {}
        }
        col += 1;
    }
}

/// Decode the color digit of a two-character tile, recording a warning on failure
fn color_code(
    parsed: &mut ParsedLayout,
    row: usize,
    col: usize,
    marker: char,
    code: Option<&char>,
) -> Option<Color> {
    let Some(&code) = code else {
        log::warn!("Layout row {row}, column {col}: '{marker}' has no color code");
        parsed
            .warnings
            .push(LayoutWarning::MissingColorCode { row, col, marker });
        return None;
    };
    match Color::from_digit(code) {
        Ok(color) => Some(color),
        Err(error) => {
            log::warn!("Layout row {row}, column {col}: '{marker}{code}' is not a valid tile");
            parsed.warnings.push(LayoutWarning::InvalidColorCode {
                row,
                col,
                marker,
                error,
            });
            None
        }
    }
}
