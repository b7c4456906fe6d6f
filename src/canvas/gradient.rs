//! # Gradient Overlay
//!
//! A top-to-bottom tint: the top row is untouched, the bottom row is mixed
//! with the gradient color at [`MAX_ALPHA`], and rows in between follow a
//! linear ramp.
//!
//! ```text
//! y = 0          ░ base color (alpha 0)
//!   ...          ▒ linear ramp
//! y = height-1   ▓ base ⨉ gradient at MAX_ALPHA
//! ```

use image::Rgba;
use rayon::prelude::*;

use crate::Bitmap;
use crate::color::Rgb;
use crate::shader::{mix, over};

/// Tint strength at the bottom row.
pub const MAX_ALPHA: f32 = 0.5;

/// Tint `base` toward `gradient` for a row at `vertical_fraction` of the height.
///
/// `0.0` (top) returns `base`; `1.0` (bottom) mixes at [`MAX_ALPHA`].
#[inline]
pub fn blend(base: Rgb, gradient: Rgb, vertical_fraction: f32) -> Rgb {
    mix(base, gradient, vertical_fraction.clamp(0.0, 1.0) * MAX_ALPHA)
}

/// Vertical fraction for a row: 0 at the top, 1 at the bottom.
#[inline]
pub fn row_fraction(y: u32, height: u32) -> f32 {
    if height <= 1 {
        0.0
    } else {
        y as f32 / (height - 1) as f32
    }
}

/// Apply the overlay to a whole bitmap in place.
///
/// Rows are processed in parallel; each row depends only on its own index.
pub fn apply(bitmap: &mut Bitmap, gradient: Rgb) {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let stride = width as usize * 4;

    bitmap
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let alpha = row_fraction(y as u32, height) * MAX_ALPHA;
            if alpha <= 0.0 {
                return;
            }
            for px in row.chunks_exact_mut(4) {
                let out = over(Rgba([px[0], px[1], px[2], 255]), gradient, alpha);
                px.copy_from_slice(&out.0);
            }
        });
}
