//! # Colors
//!
//! Opaque 8-bit RGB colors used for backgrounds, gradients, and text.
//!
//! ```
//! use placard::color::Rgb;
//!
//! let sky: Rgb = "#87ceeb".parse().unwrap();
//! assert_eq!(sky.to_string(), "#87ceeb");
//! assert_eq!("blue".parse::<Rgb>().unwrap(), Rgb::BLUE);
//! ```

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::PlacardError;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);
    pub const LIGHT_GRAY: Rgb = Rgb::new(192, 192, 192);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// As a fully opaque RGBA pixel.
    #[inline]
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    /// Drop the alpha channel of a pixel.
    #[inline]
    pub fn from_rgba(px: Rgba<u8>) -> Self {
        Self::new(px[0], px[1], px[2])
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "gray" | "grey" => Self::GRAY,
            "lightgray" | "light_gray" | "lightgrey" => Self::LIGHT_GRAY,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            _ => return None,
        };
        Some(color)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = PlacardError;

    /// Accepts `#rrggbb`, `rrggbb`, or a named color (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(color) = Self::named(&lower) {
            return Ok(color);
        }

        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PlacardError::invalid_argument(format!(
                "'{}' is not a color (expected #rrggbb or a color name)",
                s
            )));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| PlacardError::invalid_argument(format!("bad color '{}': {}", s, e)))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#102030".parse::<Rgb>().unwrap(), Rgb::new(0x10, 0x20, 0x30));
        assert_eq!("A0B0C0".parse::<Rgb>().unwrap(), Rgb::new(0xa0, 0xb0, 0xc0));
    }

    #[test]
    fn test_parse_named() {
        assert_eq!("White".parse::<Rgb>().unwrap(), Rgb::WHITE);
        assert_eq!("grey".parse::<Rgb>().unwrap(), Rgb::GRAY);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "#12345".parse::<Rgb>(),
            Err(PlacardError::InvalidArgument(_))
        ));
        assert!("mauve".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let c = Rgb::new(1, 2, 255);
        assert_eq!(c.to_string(), "#0102ff");
        assert_eq!(c.to_string().parse::<Rgb>().unwrap(), c);
    }
}
