//! Background image fitting.
//!
//! The fit policy is fixed: the image is stretched to exactly fill the
//! canvas, ignoring aspect ratio. The background color still shows through
//! wherever the image is transparent.

use image::imageops::{self, FilterType};

use crate::Bitmap;

/// Stretch `image` to `width` x `height`.
///
/// Returns `None` for an image with a zero dimension.
pub fn fit_stretch(image: &Bitmap, width: u32, height: u32) -> Option<Bitmap> {
    if image.width() == 0 || image.height() == 0 || width == 0 || height == 0 {
        return None;
    }
    if image.dimensions() == (width, height) {
        return Some(image.clone());
    }
    Some(imageops::resize(image, width, height, FilterType::Triangle))
}
