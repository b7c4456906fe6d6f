//! Font faces and line rasterisation.
//!
//! Two kinds of face are supported:
//!
//! - The built-in Spleen bitmap family, scaled nearest-neighbour to the
//!   requested pixel height. Coverage is exactly 0.0 or 1.0.
//! - TrueType/OpenType faces loaded at runtime through ab_glyph, which
//!   produce anti-aliased coverage.
//!
//! Either way a line of text becomes a [`LineMask`]: a coverage buffer the
//! text layer composites in the configured color.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::path::Path;

use ab_glyph::{Font, FontArc, GlyphId, ScaleFont};
use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};
use tracing::{debug, warn};

use crate::error::{PlacardError, Result};

/// Rasterised coverage for one line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMask {
    pub width: usize,
    pub height: usize,
    /// Coverage values: 0.0 = untouched, 1.0 = fully inked.
    pub data: Vec<f32>,
}

impl LineMask {
    fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    #[inline]
    pub fn coverage(&self, x: usize, y: usize) -> f32 {
        self.data.get(y * self.width + x).copied().unwrap_or(0.0)
    }
}

/// Spleen sources, smallest first: (psf2 data, cell width, cell height).
const SPLEEN_SOURCES: [(&[u8], usize, usize); 3] = [
    (FONT_6X12, 6, 12),
    (FONT_8X16, 8, 16),
    (FONT_12X24, 12, 24),
];

/// A renderable font face.
#[derive(Clone)]
pub enum FontFace {
    /// Built-in Spleen bitmap font.
    Bitmap,
    /// A TrueType/OpenType face.
    TrueType(FontArc),
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFace::Bitmap => f.write_str("FontFace::Bitmap"),
            FontFace::TrueType(_) => f.write_str("FontFace::TrueType(..)"),
        }
    }
}

impl FontFace {
    /// Parse TrueType/OpenType font data.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        FontArc::try_from_vec(data)
            .map(FontFace::TrueType)
            .map_err(|e| PlacardError::InvalidFont(e.to_string()))
    }

    /// Width and height in pixels of a line, without rasterising it.
    pub fn measure_line(&self, text: &str, pixel_height: u32) -> (usize, usize) {
        let pixel_height = pixel_height.max(1);
        match self {
            FontFace::Bitmap => {
                let cell = bitmap_cell(pixel_height as usize);
                (cell.width * text.chars().count(), cell.height)
            }
            FontFace::TrueType(font) => {
                let (_, width) = ttf_glyphs(font, text, pixel_height as f32);
                (width, ttf_height(font, pixel_height as f32))
            }
        }
    }

    /// Rasterise a single line at the given pixel height.
    ///
    /// An empty line produces a zero-width mask.
    pub fn render_line(&self, text: &str, pixel_height: u32) -> LineMask {
        self.render_span(text, pixel_height, 0..usize::MAX)
    }

    /// Rasterise only the columns of a line that fall in `span`.
    ///
    /// Column 0 of the returned mask is column `span.start` of the full
    /// line. The mask is never wider than the line itself.
    pub fn render_span(&self, text: &str, pixel_height: u32, span: Range<usize>) -> LineMask {
        let pixel_height = pixel_height.max(1);
        match self {
            FontFace::Bitmap => render_bitmap_span(text, pixel_height as usize, span),
            FontFace::TrueType(font) => render_ttf_span(font, text, pixel_height as f32, span),
        }
    }
}

/// Pick the largest Spleen size that does not exceed the target height.
fn spleen_source(pixel_height: usize) -> (&'static [u8], usize, usize) {
    SPLEEN_SOURCES
        .iter()
        .rev()
        .find(|(_, _, h)| *h <= pixel_height)
        .copied()
        .unwrap_or(SPLEEN_SOURCES[0])
}

/// Source glyph data and the scaled cell size for one pixel height.
struct BitmapCell {
    data: &'static [u8],
    src_w: usize,
    src_h: usize,
    width: usize,
    height: usize,
}

fn bitmap_cell(pixel_height: usize) -> BitmapCell {
    let (data, src_w, src_h) = spleen_source(pixel_height);
    let width = ((pixel_height * src_w) as f32 / src_h as f32).round().max(1.0) as usize;
    BitmapCell {
        data,
        src_w,
        src_h,
        width,
        height: pixel_height,
    }
}

/// Clamp `span` to a line of `line_width` columns.
fn clamp_span(span: Range<usize>, line_width: usize) -> Range<usize> {
    let end = span.end.min(line_width);
    span.start.min(end)..end
}

fn render_bitmap_span(text: &str, pixel_height: usize, span: Range<usize>) -> LineMask {
    let cell = bitmap_cell(pixel_height);
    let (cell_w, cell_h) = (cell.width, cell.height);

    let chars: Vec<char> = text.chars().collect();
    let span = clamp_span(span, cell_w * chars.len());
    let mut mask = LineMask::blank(span.len(), cell_h);
    if span.is_empty() {
        return mask;
    }

    let mut spleen = match PSF2Font::new(cell.data) {
        Ok(font) => font,
        Err(_) => {
            warn!("spleen font data failed to parse; drawing empty line");
            return mask;
        }
    };

    let (src_w, src_h) = (cell.src_w, cell.src_h);
    let mut src_bitmap = vec![0u8; src_w * src_h];
    let mut scaled = vec![0u8; cell_w * cell_h];

    let first = span.start / cell_w;
    let last = span.end.div_ceil(cell_w).min(chars.len());
    for (i, &ch) in chars.iter().enumerate().take(last).skip(first) {
        if ch.is_whitespace() {
            continue;
        }

        src_bitmap.fill(0);
        let utf8 = ch.to_string();
        if let Some(glyph) = spleen.glyph_for_utf8(utf8.as_bytes()) {
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < src_h && col_x < src_w && on {
                        src_bitmap[row_y * src_w + col_x] = 1;
                    }
                }
            }
        } else {
            draw_box(&mut src_bitmap, src_w, src_h);
        }

        scale_bitmap(&src_bitmap, (src_w, src_h), &mut scaled, (cell_w, cell_h));

        let x0 = i * cell_w;
        for y in 0..cell_h {
            for x in 0..cell_w {
                let col = x0 + x;
                if scaled[y * cell_w + x] != 0 && span.contains(&col) {
                    mask.data[y * mask.width + col - span.start] = 1.0;
                }
            }
        }
    }

    mask
}

/// Scale a bitmap from src dimensions to dst dimensions using nearest neighbor.
fn scale_bitmap(
    src: &[u8],
    (src_w, src_h): (usize, usize),
    dst: &mut [u8],
    (dst_w, dst_h): (usize, usize),
) {
    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx * src_w / dst_w;
            let sy = dy * src_h / dst_h;
            let src_idx = sy * src_w + sx;
            let dst_idx = dy * dst_w + dx;
            if src_idx < src.len() && dst_idx < dst.len() {
                dst[dst_idx] = src[src_idx];
            }
        }
    }
}

/// Draw a box outline for characters the font does not cover.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}

/// Glyph ids with their caret positions, and the total advance in pixels.
fn ttf_glyphs(font: &FontArc, text: &str, pixel_height: f32) -> (Vec<(GlyphId, f32)>, usize) {
    let scaled = font.as_scaled(pixel_height);

    let mut glyphs = Vec::new();
    let mut caret_x = 0.0f32;
    let mut previous = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret_x += scaled.kern(prev, glyph_id);
        }
        glyphs.push((glyph_id, caret_x));
        caret_x += scaled.h_advance(glyph_id);
        previous = Some(glyph_id);
    }

    (glyphs, caret_x.ceil().max(0.0) as usize)
}

fn ttf_height(font: &FontArc, pixel_height: f32) -> usize {
    let scaled = font.as_scaled(pixel_height);
    ((scaled.ascent() - scaled.descent()).ceil() as usize).max(1)
}

fn render_ttf_span(font: &FontArc, text: &str, pixel_height: f32, span: Range<usize>) -> LineMask {
    let (glyphs, line_width) = ttf_glyphs(font, text, pixel_height);
    let height = ttf_height(font, pixel_height);
    let ascent = font.as_scaled(pixel_height).ascent();

    let span = clamp_span(span, line_width);
    let mut mask = LineMask::blank(span.len(), height);
    if span.is_empty() {
        return mask;
    }
    let (left, right) = (span.start as f32, span.end as f32);

    for &(glyph_id, glyph_x) in &glyphs {
        let position = ab_glyph::point(glyph_x, ascent);
        let glyph = glyph_id.with_scale_and_position(pixel_height, position);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            if bounds.max.x < left || bounds.min.x >= right {
                continue;
            }
            outlined.draw(|px, py, coverage| {
                let x = px as i64 + bounds.min.x as i64 - span.start as i64;
                let y = py as i64 + bounds.min.y as i64;

                if x >= 0 && x < mask.width as i64 && y >= 0 && y < height as i64 {
                    let idx = y as usize * mask.width + x as usize;
                    mask.data[idx] = (mask.data[idx] + coverage).min(1.0);
                }
            });
        }
    }

    mask
}

/// Registry of font families available to the text layer.
///
/// Family names are case-insensitive. The built-in bitmap family is always
/// present under [`FontBook::BUILTIN`] and the aliases `monospaced` and
/// `default`.
#[derive(Debug, Clone)]
pub struct FontBook {
    faces: BTreeMap<String, FontFace>,
    fallback: FontFace,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Name of the built-in bitmap family.
    pub const BUILTIN: &'static str = "spleen";

    pub fn new() -> Self {
        let mut faces = BTreeMap::new();
        for name in [Self::BUILTIN, "monospaced", "default"] {
            faces.insert(name.to_string(), FontFace::Bitmap);
        }
        Self {
            faces,
            fallback: FontFace::Bitmap,
        }
    }

    /// Register a TrueType/OpenType face from raw bytes.
    pub fn register_bytes(&mut self, family: &str, data: Vec<u8>) -> Result<()> {
        let key = normalize(family)?;
        let face = FontFace::from_bytes(data)?;
        debug!(family = %key, "registered font face");
        self.faces.insert(key, face);
        Ok(())
    }

    /// Register a TrueType/OpenType face from a font file.
    pub fn register_file(&mut self, family: &str, path: impl AsRef<Path>) -> Result<()> {
        let data = std::fs::read(path.as_ref())?;
        self.register_bytes(family, data)
    }

    pub fn contains(&self, family: &str) -> bool {
        self.faces.contains_key(&family.trim().to_lowercase())
    }

    /// Registered family names, sorted.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.keys().map(String::as_str)
    }

    /// Look up a face, falling back to the built-in family for unknown names.
    pub fn face(&self, family: &str) -> &FontFace {
        let key = family.trim().to_lowercase();
        self.faces.get(&key).unwrap_or_else(|| {
            warn!(family = %family, "unknown font family, using built-in face");
            &self.fallback
        })
    }
}

fn normalize(family: &str) -> Result<String> {
    let key = family.trim().to_lowercase();
    if key.is_empty() {
        return Err(PlacardError::invalid_argument("font family name is empty"));
    }
    Ok(key)
}
