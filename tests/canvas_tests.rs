//! # Canvas Behaviour Tests
//!
//! End-to-end checks of the compositor through the public API: layer order,
//! state resets, argument validation, icon stacking, and file export.

use std::fs;
use std::sync::Arc;

use image::Rgba;
use placard::{
    Bitmap, CanvasConfig, CanvasSurface, ExportFormat, Justify, PlacardError, Rgb, export_bitmap,
    import_bitmap,
};
use pretty_assertions::assert_eq;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn canvas(width: u32, height: u32) -> CanvasSurface {
    CanvasSurface::new(CanvasConfig::with_size(width, height)).unwrap()
}

fn solid_icon(width: u32, height: u32, color: Rgb) -> Arc<Bitmap> {
    Arc::new(Bitmap::from_pixel(width, height, color.to_rgba()))
}

/// A canvas with every layer populated.
fn busy_canvas() -> CanvasSurface {
    let mut canvas = canvas(160, 90);
    canvas.set_background_image(Some(Bitmap::from_fn(40, 30, |x, y| {
        Rgba([(x * 6) as u8, (y * 8) as u8, 90, 255])
    })));
    canvas.set_gradient_overlay_color(Some(Rgb::new(255, 200, 0)));
    canvas.add_icon(solid_icon(30, 30, Rgb::GREEN), 100, 40);
    let text = canvas.text_item_mut();
    text.set_text("Big bugs have little bugs\nUpon their backs");
    text.set_font_size(16).unwrap();
    text.set_color(Rgb::BLUE);
    canvas
}

// ============================================================================
// PAINT ORDER
// ============================================================================

#[test]
fn text_paints_over_icons_and_icons_over_gradient() {
    let mut canvas = canvas(200, 80);
    canvas.set_background_color(Rgb::BLACK);
    canvas.set_gradient_overlay_color(Some(Rgb::WHITE));
    // Opaque icon covering the whole text block
    canvas.add_icon(solid_icon(200, 80, Rgb::RED), 0, 0);

    let without_text = canvas.render();
    assert!(
        without_text.pixels().all(|p| *p == Rgb::RED.to_rgba()),
        "icon must cover the gradient"
    );

    let text = canvas.text_item_mut();
    text.set_text("HELLO\nWORLD");
    text.set_font_size(24).unwrap();
    text.set_color(Rgb::BLUE);
    let with_text = canvas.render();

    let mut text_pixels = 0;
    for (before, after) in without_text.pixels().zip(with_text.pixels()) {
        if before != after {
            assert_eq!(*after, Rgb::BLUE.to_rgba());
            text_pixels += 1;
        }
    }
    assert!(text_pixels > 0, "text must be visible above the icon");
}

#[test]
fn gradient_paints_over_background_image() {
    let mut canvas = canvas(20, 11);
    canvas.set_background_image(Some(Bitmap::from_pixel(5, 5, Rgba([0, 0, 0, 255]))));
    canvas.set_background_color(Rgb::RED);
    canvas.set_gradient_overlay_color(Some(Rgb::WHITE));

    let frame = canvas.render();
    assert_eq!(*frame.get_pixel(10, 0), Rgba([0, 0, 0, 255]));
    let bottom = frame.get_pixel(10, 10);
    assert!((127..=129).contains(&bottom[0]));
    assert_eq!(bottom[0], bottom[1]);
    assert_eq!(bottom[1], bottom[2]);
}

#[test]
fn empty_text_leaves_canvas_unchanged() {
    let mut canvas = busy_canvas();
    canvas.text_item_mut().set_text("");
    let empty = canvas.render();

    let mut reference = busy_canvas();
    reference.text_item_mut().set_text("");
    reference.text_item_mut().set_justify(Justify::Right);
    assert_eq!(empty, reference.render());

    // No text at all is the same picture as an empty string
    let mut none = busy_canvas();
    none.text_item_mut().set_text("\n\n");
    assert_eq!(none.render(), empty);
}

// ============================================================================
// STATE RESETS AND VALIDATION
// ============================================================================

#[test]
fn clear_matches_fresh_canvas() {
    let config = CanvasConfig::with_size(160, 90);
    let fresh = CanvasSurface::new(config.clone()).unwrap().render();

    let mut canvas = busy_canvas();
    canvas.set_background_color(Rgb::GREEN);
    canvas.set_gradient_overlay_color(None);
    canvas.clear();

    assert!(canvas.text_item().is_empty());
    assert!(canvas.icons().is_empty());
    assert!(canvas.background_image().is_none());
    assert_eq!(canvas.background_color(), config.background_color);
    assert_eq!(canvas.gradient_overlay_color(), config.gradient_color);
    assert_eq!(canvas.text_item().style(), &config.text_style);
    assert_eq!(canvas.copy_image(), fresh);
}

#[test]
fn invalid_font_size_has_no_side_effects() {
    let mut canvas = busy_canvas();
    let before = canvas.render();
    let style = canvas.text_item().style().clone();

    for size in [0, -5] {
        let err = canvas.text_item_mut().set_font_size(size).unwrap_err();
        assert!(matches!(err, PlacardError::InvalidArgument(_)));
    }
    assert!(canvas.text_item_mut().set_line_height_multiplier(0.0).is_err());
    assert!(canvas.text_item_mut().set_line_height_multiplier(f32::NAN).is_err());

    assert_eq!(canvas.text_item().style(), &style);
    assert_eq!(canvas.render(), before);
}

#[test]
fn extreme_accepted_values_still_render() {
    let mut canvas = canvas(80, 60);
    let text = canvas.text_item_mut();
    text.set_text("a\nb\nc");
    text.set_line_height_multiplier(1.0e9).unwrap();
    let tall = canvas.render();
    assert_eq!(tall.dimensions(), (80, 60));

    let text = canvas.text_item_mut();
    text.set_line_height_multiplier(1.0).unwrap();
    assert!(text.set_font_size(i32::MAX).is_err());
    text.set_font_size(placard::text::MAX_FONT_SIZE as i32).unwrap();
    text.set_text(&"ab".repeat(2_000));
    assert_eq!(canvas.render().dimensions(), (80, 60));

    let config: CanvasConfig = serde_json::from_str(r#"{"margin": 3000000000}"#).unwrap();
    assert!(matches!(CanvasSurface::new(config), Err(PlacardError::InvalidArgument(_))));

    let mut config = CanvasConfig::with_size(80, 60);
    config.margin = i32::MAX as u32;
    let mut wide_margin = CanvasSurface::new(config).unwrap();
    wide_margin.text_item_mut().set_text("hidden");
    let plain = CanvasSurface::new(CanvasConfig::with_size(80, 60)).unwrap();
    assert_eq!(wide_margin.render(), plain.render());
}

// ============================================================================
// ICON STACKING
// ============================================================================

#[test]
fn bring_to_front_changes_the_visible_icon() {
    let mut canvas = canvas(60, 60);
    canvas.set_gradient_overlay_color(None);
    let a = canvas.add_icon(solid_icon(20, 20, Rgb::RED), 5, 5);
    let b = canvas.add_icon(solid_icon(20, 20, Rgb::GREEN), 10, 10);
    let c = canvas.add_icon(solid_icon(20, 20, Rgb::BLUE), 15, 15);

    // All three overlap at (18, 18); the last added is on top
    assert_eq!(*canvas.render().get_pixel(18, 18), Rgb::BLUE.to_rgba());
    assert_eq!(canvas.icon_at(18, 18), Some(c));

    canvas.bring_to_front(a).unwrap();
    assert_eq!(*canvas.render().get_pixel(18, 18), Rgb::RED.to_rgba());
    assert_eq!(canvas.icon_at(18, 18), Some(a));
    let order: Vec<_> = canvas.icons().iter().map(|icon| icon.id()).collect();
    assert_eq!(order, vec![b, c, a]);

    // Where A is absent, C still covers B
    assert_eq!(*canvas.render().get_pixel(30, 30), Rgb::BLUE.to_rgba());
    assert_eq!(*canvas.render().get_pixel(6, 6), Rgb::RED.to_rgba());
}

#[test]
fn unknown_icon_is_rejected_without_change() {
    let mut canvas = canvas(30, 30);
    let id = canvas.add_icon(solid_icon(4, 4, Rgb::RED), 1, 1);
    canvas.remove_icon(id).unwrap();
    let before = canvas.render();

    assert!(matches!(canvas.bring_to_front(id), Err(PlacardError::InvalidArgument(_))));
    assert!(canvas.move_icon(id, 3, 3).is_err());
    assert_eq!(canvas.render(), before);
}

// ============================================================================
// EXPORT
// ============================================================================

#[test]
fn png_export_round_trips_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("busy.png");

    let mut canvas = busy_canvas();
    let image = canvas.copy_image();
    assert_eq!(export_bitmap(&image, &path).unwrap(), ExportFormat::Png);
    assert_eq!(import_bitmap(&path).unwrap(), image);
}

#[test]
fn export_extension_decides_format_or_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let image = busy_canvas().render();

    for name in ["out.bmp", "out.gif", "out"] {
        let path = dir.path().join(name);
        let err = export_bitmap(&image, &path).unwrap_err();
        assert!(matches!(err, PlacardError::UnsupportedFormat(_)), "{}", name);
        assert!(!path.exists(), "{}", name);
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    for (name, format) in [
        ("out.png", ExportFormat::Png),
        ("out.jpeg", ExportFormat::Jpeg),
        ("OUT.JPG", ExportFormat::Jpeg),
    ] {
        let path = dir.path().join(name);
        assert_eq!(export_bitmap(&image, &path).unwrap(), format);
        assert_eq!(import_bitmap(&path).unwrap().dimensions(), image.dimensions());
    }
}

#[test]
fn snapshot_tracks_mutations() {
    let mut canvas = busy_canvas();
    let first = canvas.snapshot().clone();
    assert!(!canvas.is_dirty());

    canvas.set_background_color(Rgb::RED);
    canvas.set_background_image(None);
    assert!(canvas.is_dirty());
    let second = canvas.snapshot().clone();
    assert_ne!(second, first);
    assert_eq!(second, canvas.render());
}
