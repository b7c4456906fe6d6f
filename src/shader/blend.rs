//! Blending and interpolation functions.

use image::Rgba;

use crate::color::Rgb;

/// Linear interpolation between two values.
///
/// Returns `a` when `t=0`, `b` when `t=1`, and linear blend in between.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate one 8-bit channel, rounding to the nearest value.
///
/// `t` is clamped to [0, 1]; `t=0` returns `a` and `t=1` returns `b` exactly.
#[inline]
pub fn mix_channel(a: u8, b: u8, t: f32) -> u8 {
    let t = t.clamp(0.0, 1.0);
    lerp(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8
}

/// Interpolate two colors channel by channel.
#[inline]
pub fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    Rgb::new(
        mix_channel(a.r, b.r, t),
        mix_channel(a.g, b.g, t),
        mix_channel(a.b, b.b, t),
    )
}

/// Source-over compositing of `src` at coverage `alpha` onto an opaque pixel.
///
/// The destination stays opaque. Full coverage replaces the pixel with `src`.
#[inline]
pub fn over(dst: Rgba<u8>, src: Rgb, alpha: f32) -> Rgba<u8> {
    let blended = mix(Rgb::from_rgba(dst), src, alpha);
    Rgba([blended.r, blended.g, blended.b, 255])
}

/// Source-over compositing of a straight-alpha RGBA pixel onto an opaque pixel.
#[inline]
pub fn over_rgba(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => dst,
        255 => Rgba([src[0], src[1], src[2], 255]),
        a => over(dst, Rgb::from_rgba(src), a as f32 / 255.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 10.0, 0.0) - 0.0).abs() < 1e-6);
        assert!((lerp(0.0, 10.0, 1.0) - 10.0).abs() < 1e-6);
        assert!((lerp(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_mix_channel_endpoints_exact() {
        for (a, b) in [(0u8, 255u8), (17, 200), (255, 3)] {
            assert_eq!(mix_channel(a, b, 0.0), a);
            assert_eq!(mix_channel(a, b, 1.0), b);
        }
        // Out-of-range t is clamped
        assert_eq!(mix_channel(10, 20, 4.0), 20);
        assert_eq!(mix_channel(10, 20, -1.0), 10);
    }

    #[test]
    fn test_mix_midpoint() {
        assert_eq!(mix(Rgb::BLACK, Rgb::WHITE, 0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_over_full_and_zero_coverage() {
        let dst = Rgba([10, 20, 30, 255]);
        assert_eq!(over(dst, Rgb::RED, 1.0), Rgba([255, 0, 0, 255]));
        assert_eq!(over(dst, Rgb::RED, 0.0), dst);
    }

    #[test]
    fn test_over_rgba_respects_alpha() {
        let dst = Rgba([0, 0, 0, 255]);
        assert_eq!(over_rgba(dst, Rgba([200, 200, 200, 0])), dst);
        assert_eq!(over_rgba(dst, Rgba([200, 100, 50, 255])), Rgba([200, 100, 50, 255]));
        let half = over_rgba(dst, Rgba([255, 255, 255, 128]));
        assert_eq!(half, Rgba([128, 128, 128, 255]));
    }
}
