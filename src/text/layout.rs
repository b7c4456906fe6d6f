//! Line placement for the text block.
//!
//! Lines are never wrapped. Each line is placed horizontally by the justify
//! mode within the bounds and advanced vertically by a fixed line step, so
//! long lines may run past the right edge (or the left edge when centered or
//! right-justified).

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::canvas::Rect;
use crate::error::PlacardError;

/// Horizontal alignment of every line in the text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

impl Justify {
    /// X position of a line of `line_width` pixels inside `bounds`.
    pub fn line_x(self, bounds: Rect, line_width: usize) -> i32 {
        let slack = bounds.width as i64 - line_width as i64;
        let offset = match self {
            Justify::Left => 0,
            Justify::Center => slack / 2,
            Justify::Right => slack,
        };
        (bounds.x as i64 + offset).clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

impl fmt::Display for Justify {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Justify::Left => "left",
            Justify::Center => "center",
            Justify::Right => "right",
        })
    }
}

impl FromStr for Justify {
    type Err = PlacardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Justify::Left),
            "center" | "centre" => Ok(Justify::Center),
            "right" => Ok(Justify::Right),
            other => Err(PlacardError::invalid_argument(format!(
                "unknown justify '{}' (expected left, center or right)",
                other
            ))),
        }
    }
}

/// Where one line of the text block lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    /// Index into the text item's lines.
    pub index: usize,
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
}

fn line_y(top: i32, index: usize, line_step: i32) -> i32 {
    let offset = (index as i64).saturating_mul(line_step as i64);
    (top as i64).saturating_add(offset).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Place lines of the given measured sizes inside `bounds`.
///
/// Line `i` starts at `bounds.y + i * line_step`, saturating at the `i32`
/// range so very tall steps push lines off the canvas instead of wrapping.
pub fn place_lines(
    sizes: &[(usize, usize)],
    bounds: Rect,
    justify: Justify,
    line_step: i32,
) -> Vec<LineLayout> {
    sizes
        .iter()
        .enumerate()
        .map(|(index, &(width, height))| LineLayout {
            index,
            x: justify.line_x(bounds, width),
            y: line_y(bounds.y, index, line_step),
            width,
            height,
        })
        .collect()
}
