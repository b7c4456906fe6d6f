//! # Canvas Configuration
//!
//! The defaults a canvas starts with and returns to on `clear()`.
//!
//! ## Defaults
//!
//! | Property | Value |
//! |----------|-------|
//! | Size | 800 x 600 px |
//! | Text margin | 20 px |
//! | Background color | white |
//! | Gradient overlay | white (enabled) |
//! | Text style | built-in font, 24 px, black, left, 1.0 |

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{PlacardError, Result};
use crate::text::TextStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Gap between the canvas edge and the text block, in pixels
    pub margin: u32,

    /// Solid fill under everything, and the "New" background
    pub background_color: Rgb,

    /// Gradient tint color; `None` starts with the overlay disabled
    pub gradient_color: Option<Rgb>,

    /// Text style restored by "New"
    pub text_style: TextStyle,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margin: 20,
            background_color: Rgb::WHITE,
            gradient_color: Some(Rgb::WHITE),
            text_style: TextStyle::default(),
        }
    }
}

impl CanvasConfig {
    /// Default configuration at a custom size.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PlacardError::invalid_argument(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.margin > i32::MAX as u32 {
            return Err(PlacardError::invalid_argument(format!(
                "margin must be at most {}, got {}",
                i32::MAX,
                self.margin
            )));
        }
        self.text_style.validate()
    }
}
