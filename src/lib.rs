//! # Placard - Text-over-Image Compositor
//!
//! Placard composes short multiline text over a background picture and
//! writes the result as PNG or JPEG. It provides:
//!
//! - **Canvas**: background color or stretched image, gradient tint, icons, text
//! - **Text**: one uniform style per block, left/center/right justification
//! - **Icons**: placeable bitmaps with an explicit z-order
//! - **Export**: extension-driven PNG/JPEG writing with atomic replacement
//!
//! ## Quick Start
//!
//! ```no_run
//! use placard::{
//!     canvas::{CanvasConfig, CanvasSurface},
//!     color::Rgb,
//!     io::export_bitmap,
//!     text::Justify,
//! };
//!
//! let mut canvas = CanvasSurface::new(CanvasConfig::default())?;
//! canvas.set_background_color(Rgb::BLACK);
//!
//! let text = canvas.text_item_mut();
//! text.set_text("Big bugs have little bugs\nUpon their backs to bite 'em");
//! text.set_font_size(36)?;
//! text.set_color(Rgb::WHITE);
//! text.set_justify(Justify::Center);
//!
//! export_bitmap(&canvas.copy_image(), "placard.png")?;
//!
//! # Ok::<(), placard::PlacardError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`canvas`] | Surface state and the compositing pipeline |
//! | [`text`] | Text item, fonts, and line layout |
//! | [`icons`] | Icon overlay set |
//! | [`io`] | PNG/JPEG export and image import |
//! | [`resources`] | Bundled backgrounds and icons by name |
//! | [`studio`] | Editor actions behind dialog callbacks |
//! | [`prefs`] | Persisted dialog directory |
//! | [`shader`] | Color blending helpers |
//! | [`error`] | Error types |

pub mod canvas;
pub mod color;
pub mod error;
pub mod icons;
pub mod io;
pub mod logging;
pub mod prefs;
pub mod resources;
pub mod shader;
pub mod studio;
pub mod text;

/// An RGBA raster, 8 bits per channel.
pub type Bitmap = image::RgbaImage;

// Re-exports for convenience
pub use canvas::{CanvasConfig, CanvasSurface};
pub use color::Rgb;
pub use error::PlacardError;
pub use icons::{IconId, IconOverlaySet};
pub use io::{ExportFormat, export_bitmap, import_bitmap};
pub use text::{Justify, TextItem, TextStyle};
