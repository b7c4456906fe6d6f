//! # Text Item
//!
//! A multiline text block with one uniform style.
//!
//! Text is split on explicit line breaks only; there is no wrapping and no
//! per-character formatting. The canvas decides the bounds, the text item
//! decides where each line goes inside them.
//!
//! ## Example
//!
//! ```
//! use placard::text::{Justify, TextItem};
//!
//! let mut item = TextItem::new();
//! item.set_text("Big bugs have little bugs\nUpon their backs to bite 'em");
//! item.set_font_size(36).unwrap();
//! item.set_justify(Justify::Center);
//!
//! assert_eq!(item.lines().len(), 2);
//! assert!(item.set_font_size(0).is_err());
//! assert_eq!(item.style().font_size, 36);
//! ```

pub mod font;
pub mod layout;

pub use font::{FontBook, FontFace, LineMask};
pub use layout::{Justify, LineLayout};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Bitmap;
use crate::canvas::Rect;
use crate::color::Rgb;
use crate::error::{PlacardError, Result};
use crate::shader::over;

/// Style applied uniformly to the whole text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_family: String,
    /// Font size in points; one point renders as one pixel.
    pub font_size: u32,
    pub color: Rgb,
    pub justify: Justify,
    pub line_height_multiplier: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: FontBook::BUILTIN.to_string(),
            font_size: 24,
            color: Rgb::BLACK,
            justify: Justify::Left,
            line_height_multiplier: 1.0,
        }
    }
}

impl TextStyle {
    /// Check every field, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        check_family(&self.font_family)?;
        check_font_size(self.font_size as i64)?;
        check_multiplier(self.line_height_multiplier)?;
        Ok(())
    }

    /// Vertical distance between consecutive line tops, in pixels.
    pub fn line_step(&self) -> i32 {
        (self.font_size as f32 * self.line_height_multiplier).round() as i32
    }
}

fn check_family(family: &str) -> Result<()> {
    if family.trim().is_empty() {
        return Err(PlacardError::invalid_argument("font family must not be empty"));
    }
    Ok(())
}

/// Largest accepted font size, in points.
pub const MAX_FONT_SIZE: u32 = 2048;

fn check_font_size(size: i64) -> Result<u32> {
    if size <= 0 || size > MAX_FONT_SIZE as i64 {
        return Err(PlacardError::invalid_argument(format!(
            "font size must be between 1 and {}, got {}",
            MAX_FONT_SIZE, size
        )));
    }
    Ok(size as u32)
}

fn check_multiplier(multiplier: f32) -> Result<()> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(PlacardError::invalid_argument(format!(
            "line height multiplier must be positive, got {}",
            multiplier
        )));
    }
    Ok(())
}

/// Split raw input into lines on `\n`, `\r\n`, or `\r`.
///
/// Trailing empty lines are dropped, so the empty string yields no lines.
fn split_lines(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = normalized.split('\n').map(str::to_string).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// The canvas text block: ordered lines plus one style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextItem {
    style: TextStyle,
    lines: Vec<String>,
}

impl TextItem {
    /// An empty text item with the default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty text item with a custom default style.
    pub fn with_style(style: TextStyle) -> Result<Self> {
        style.validate()?;
        Ok(Self {
            style,
            lines: Vec::new(),
        })
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        debug!(lines = self.lines.len(), "text replaced");
    }

    /// The lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Replace the whole style. Invalid styles are rejected unchanged.
    pub fn set_style(&mut self, style: TextStyle) -> Result<()> {
        style.validate()?;
        self.style = style;
        Ok(())
    }

    pub fn set_font_family(&mut self, family: &str) -> Result<()> {
        check_family(family)?;
        self.style.font_family = family.trim().to_string();
        Ok(())
    }

    pub fn set_font_size(&mut self, size: i32) -> Result<()> {
        self.style.font_size = check_font_size(size as i64)?;
        Ok(())
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.style.color = color;
    }

    pub fn set_justify(&mut self, justify: Justify) {
        self.style.justify = justify;
    }

    pub fn set_line_height_multiplier(&mut self, multiplier: f32) -> Result<()> {
        check_multiplier(multiplier)?;
        self.style.line_height_multiplier = multiplier;
        Ok(())
    }

    /// Restore `style` and drop all text.
    pub(crate) fn reset_to(&mut self, style: TextStyle) {
        self.style = style;
        self.lines.clear();
    }

    /// Restore the default style and drop all text.
    pub fn reset(&mut self) {
        self.reset_to(TextStyle::default());
    }

    fn line_sizes(&self, face: &FontFace) -> Vec<(usize, usize)> {
        self.lines
            .iter()
            .map(|line| face.measure_line(line, self.style.font_size))
            .collect()
    }

    /// Where each line would be drawn inside `bounds`.
    pub fn layout(&self, bounds: Rect, fonts: &FontBook) -> Vec<LineLayout> {
        let sizes = self.line_sizes(fonts.face(&self.style.font_family));
        layout::place_lines(&sizes, bounds, self.style.justify, self.style.line_step())
    }

    /// Paint every line onto `surface`, clipped to the surface.
    ///
    /// Only the part of each line that lands on the surface is rasterised.
    pub fn draw_into(&self, surface: &mut Bitmap, bounds: Rect, fonts: &FontBook) {
        if self.lines.is_empty() {
            return;
        }

        let face = fonts.face(&self.style.font_family);
        let sizes = self.line_sizes(face);
        let step = self.style.line_step();
        let placed = layout::place_lines(&sizes, bounds, self.style.justify, step);

        let (sw, sh) = (surface.width() as i64, surface.height() as i64);
        for (text, line) in self.lines.iter().zip(&placed) {
            let (x0, y0) = (line.x as i64, line.y as i64);
            if y0 >= sh || y0 + line.height as i64 <= 0 {
                continue;
            }
            let first = (-x0).clamp(0, line.width as i64) as usize;
            let last = (sw - x0).clamp(0, line.width as i64) as usize;
            if first >= last {
                continue;
            }

            let mask = face.render_span(text, self.style.font_size, first..last);
            for my in 0..mask.height {
                let py = y0 + my as i64;
                if py < 0 || py >= sh {
                    continue;
                }
                for mx in 0..mask.width {
                    let px = x0 + (first + mx) as i64;
                    let coverage = mask.coverage(mx, my);
                    if coverage <= 0.0 || px < 0 || px >= sw {
                        continue;
                    }
                    let dst = surface.get_pixel_mut(px as u32, py as u32);
                    *dst = over(*dst, self.style.color, coverage);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(""), Vec::<String>::new());
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\nb\rc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("a\n\nb\n\n"), vec!["a", "", "b"]);
        assert_eq!(split_lines("   indented"), vec!["   indented"]);
    }

    #[test]
    fn test_set_text_round_trip() {
        let mut item = TextItem::new();
        item.set_text("one\ntwo");
        assert_eq!(item.text(), "one\ntwo");
        item.set_text("");
        assert!(item.is_empty());
    }

    #[test]
    fn test_invalid_font_size_keeps_prior() {
        let mut item = TextItem::new();
        item.set_font_size(40).unwrap();
        for bad in [0, -5, i32::MIN] {
            let err = item.set_font_size(bad).unwrap_err();
            assert!(matches!(err, PlacardError::InvalidArgument(_)));
            assert_eq!(item.style().font_size, 40);
        }
    }

    #[test]
    fn test_font_size_upper_limit() {
        let mut item = TextItem::new();
        item.set_font_size(MAX_FONT_SIZE as i32).unwrap();
        for bad in [MAX_FONT_SIZE as i32 + 1, i32::MAX] {
            let err = item.set_font_size(bad).unwrap_err();
            assert!(matches!(err, PlacardError::InvalidArgument(_)));
        }
        assert_eq!(item.style().font_size, MAX_FONT_SIZE);
    }

    #[test]
    fn test_largest_font_on_small_surface() {
        let mut surface = Bitmap::from_pixel(40, 30, Rgb::WHITE.to_rgba());
        let mut item = TextItem::new();
        item.set_text(&"W".repeat(5_000));
        item.set_font_size(MAX_FONT_SIZE as i32).unwrap();
        item.set_justify(Justify::Center);
        item.draw_into(&mut surface, Rect::new(0, 0, 40, 30), &FontBook::new());
        assert_eq!(surface.dimensions(), (40, 30));
    }

    #[test]
    fn test_huge_multiplier_places_lines_offscreen() {
        let mut surface = Bitmap::from_pixel(60, 40, Rgb::WHITE.to_rgba());
        let mut item = TextItem::new();
        item.set_text("a\nb\nc\nd");
        item.set_line_height_multiplier(1.0e9).unwrap();
        item.set_color(Rgb::BLACK);
        item.draw_into(&mut surface, Rect::new(2, 2, 56, 36), &FontBook::new());

        let placed = item.layout(Rect::new(2, 2, 56, 36), &FontBook::new());
        assert_eq!(placed[0].y, 2);
        assert!(placed[1..].iter().all(|l| l.y == i32::MAX));
        // Only the first line is visible
        assert!(surface.pixels().any(|p| *p == Rgb::BLACK.to_rgba()));
    }

    #[test]
    fn test_invalid_multiplier_keeps_prior() {
        let mut item = TextItem::new();
        item.set_line_height_multiplier(1.5).unwrap();
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(item.set_line_height_multiplier(bad).is_err());
        }
        assert_eq!(item.style().line_height_multiplier, 1.5);
    }

    #[test]
    fn test_set_style_validates() {
        let mut item = TextItem::new();
        let bad = TextStyle {
            font_size: 0,
            ..TextStyle::default()
        };
        assert!(item.set_style(bad).is_err());
        assert_eq!(item.style(), &TextStyle::default());
    }

    #[test]
    fn test_line_step() {
        let style = TextStyle {
            font_size: 36,
            line_height_multiplier: 1.5,
            ..TextStyle::default()
        };
        assert_eq!(style.line_step(), 54);
    }

    #[test]
    fn test_layout_uses_step_and_justify() {
        let mut item = TextItem::new();
        item.set_text("ab\nabcd");
        item.set_font_size(24).unwrap();
        item.set_line_height_multiplier(2.0).unwrap();
        item.set_justify(Justify::Right);

        let bounds = Rect::new(20, 20, 200, 200);
        let placed = item.layout(bounds, &FontBook::new());
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].y, 20);
        assert_eq!(placed[1].y, 68);
        // 12px cells at 24px
        assert_eq!(placed[0].x, 20 + 200 - 24);
        assert_eq!(placed[1].x, 20 + 200 - 48);
    }

    #[test]
    fn test_draw_into_paints_only_text_color() {
        let mut surface = Bitmap::from_pixel(120, 60, Rgb::WHITE.to_rgba());
        let mut item = TextItem::new();
        item.set_text("Hi");
        item.set_color(Rgb::BLUE);
        item.draw_into(&mut surface, Rect::new(4, 4, 112, 52), &FontBook::new());

        let inked = surface.pixels().filter(|p| **p == Rgb::BLUE.to_rgba()).count();
        let other = surface
            .pixels()
            .filter(|p| **p != Rgb::BLUE.to_rgba() && **p != Rgb::WHITE.to_rgba())
            .count();
        assert!(inked > 0);
        assert_eq!(other, 0);
    }

    #[test]
    fn test_draw_into_clips_offscreen() {
        let mut surface = Bitmap::from_pixel(10, 10, Rgb::WHITE.to_rgba());
        let mut item = TextItem::new();
        item.set_text("clipped line that is far too long");
        item.draw_into(&mut surface, Rect::new(-50, -5, 10, 10), &FontBook::new());
        assert_eq!(surface.dimensions(), (10, 10));
    }
}
