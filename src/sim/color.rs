//! Ball, wall and hole colors
//!
//! Grey (ordinal 0) is the neutral wildcard: it matches every hole and passes
//! every restricted wall.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Invalid color lookups. These indicate a malformed level or score table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("Invalid color name: {0}")]
    UnknownName(String),
    #[error("Invalid color value: {0}")]
    OutOfRange(u32),
}

/// The five colors a ball, wall or hole can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Grey = 0,
    Orange = 1,
    Blue = 2,
    Green = 3,
    Yellow = 4,
}

impl Color {
    /// All colors in ordinal order
    pub const ALL: [Color; 5] = [
        Color::Grey,
        Color::Orange,
        Color::Blue,
        Color::Green,
        Color::Yellow,
    ];

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(value: u32) -> Result<Self, ColorError> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(ColorError::OutOfRange(value))
    }

    /// Parse a layout color code (a single ASCII digit)
    pub fn from_digit(c: char) -> Result<Self, ColorError> {
        match c.to_digit(10) {
            Some(d) => Self::from_ordinal(d),
            None => Err(ColorError::UnknownName(c.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Grey => "grey",
            Color::Orange => "orange",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }

    /// Case-insensitive name lookup
    pub fn from_name(name: &str) -> Result<Self, ColorError> {
        let lower = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or_else(|| ColorError::UnknownName(name.to_string()))
    }

    pub fn is_neutral(self) -> bool {
        self == Color::Grey
    }

    /// Index into per-color tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
