//! HEIC/HEIF decoding through libheif (enabled with the `heif` feature).

use image::{DynamicImage, RgbImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

use crate::error::{PlacardError, Result};

/// Sniff the ISO-BMFF `ftyp` box for a HEIF-family brand.
pub fn is_heif(data: &[u8]) -> bool {
    if data.len() < 12 || &data[4..8] != b"ftyp" {
        return false;
    }
    matches!(
        &data[8..12],
        b"heic"
            | b"heix"
            | b"hevc"
            | b"hevx"
            | b"heim"
            | b"heis"
            | b"hevm"
            | b"hevs"
            | b"mif1"
            | b"msf1"
    )
}

/// Decode the primary image of a HEIF container.
pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    let invalid = |what: &str, e: &dyn std::fmt::Display| {
        PlacardError::InvalidImage(format!("{}: {}", what, e))
    };

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(data).map_err(|e| invalid("failed to read HEIF", &e))?;
    let handle = ctx
        .primary_image_handle()
        .map_err(|e| invalid("no primary image", &e))?;
    let image = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|e| invalid("failed to decode HEIF", &e))?;

    let planes = image.planes();
    let interleaved = planes
        .interleaved
        .ok_or_else(|| PlacardError::InvalidImage("no interleaved RGB plane in HEIF".to_string()))?;

    let (width, height) = (image.width(), image.height());
    let stride = interleaved.stride;
    let data = interleaved.data;

    let mut rgb = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let offset = y as usize * stride + x as usize * 3;
            if offset + 2 < data.len() {
                rgb.put_pixel(x, y, image::Rgb([data[offset], data[offset + 1], data[offset + 2]]));
            }
        }
    }

    Ok(DynamicImage::ImageRgb8(rgb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_heif_brands() {
        let mut header = vec![0, 0, 0, 24];
        header.extend_from_slice(b"ftypheic");
        assert!(is_heif(&header));

        let mut png_like = vec![0x89, b'P', b'N', b'G'];
        png_like.extend_from_slice(b"\r\n\x1a\n0000");
        assert!(!is_heif(&png_like));
        assert!(!is_heif(b"short"));
    }
}
