//! # Canvas Surface
//!
//! The compositing engine. A [`CanvasSurface`] owns the background state, the
//! text block, and the icon set, and flattens them into one opaque bitmap.
//!
//! ## Paint Order
//!
//! ```text
//! 1. background color fill
//! 2. background image, stretched to the canvas
//! 3. gradient overlay (if enabled)
//! 4. icons, bottom to top
//! 5. text block, inset by the margin
//! ```
//!
//! Text always ends up above icons, icons above the gradient, and the gradient
//! above the background. The order does not depend on state.
//!
//! ## Rendering Model
//!
//! Every mutation marks the surface dirty. [`CanvasSurface::snapshot`]
//! re-renders only when dirty; [`CanvasSurface::render`] always composes from
//! scratch and is a pure function of the current state.
//!
//! ```
//! use placard::canvas::{CanvasConfig, CanvasSurface};
//! use placard::color::Rgb;
//!
//! let mut canvas = CanvasSurface::new(CanvasConfig::with_size(200, 100)).unwrap();
//! canvas.set_background_color(Rgb::BLACK);
//! canvas.set_gradient_overlay_color(None);
//! canvas.text_item_mut().set_text("hello");
//!
//! let frame = canvas.render();
//! assert_eq!(frame.dimensions(), (200, 100));
//! assert_eq!(*frame.get_pixel(199, 99), Rgb::BLACK.to_rgba());
//! ```

mod background;
mod config;
pub mod gradient;
mod rect;

pub use background::fit_stretch;
pub use config::CanvasConfig;
pub use rect::Rect;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::Bitmap;
use crate::color::Rgb;
use crate::error::{PlacardError, Result};
use crate::icons::{IconId, IconOverlaySet};
use crate::shader::over_rgba;
use crate::text::{FontBook, TextItem};

/// The compositing surface: background, gradient, icons, and text.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    config: CanvasConfig,
    width: u32,
    height: u32,
    background_color: Rgb,
    background_image: Option<Bitmap>,
    /// `background_image` stretched to the current canvas size.
    fitted_background: Option<Bitmap>,
    gradient_color: Option<Rgb>,
    text: TextItem,
    icons: IconOverlaySet,
    fonts: FontBook,
    snapshot: Option<Bitmap>,
    dirty: bool,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::from_valid_config(CanvasConfig::default())
    }
}

impl CanvasSurface {
    /// Create a surface in the configuration's default state.
    pub fn new(config: CanvasConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: CanvasConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            background_color: config.background_color,
            background_image: None,
            fitted_background: None,
            gradient_color: config.gradient_color,
            text: TextItem::with_style(config.text_style.clone()).unwrap_or_default(),
            icons: IconOverlaySet::new(),
            fonts: FontBook::new(),
            snapshot: None,
            dirty: true,
            config,
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when state changed since the last [`snapshot`](Self::snapshot).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ------------------------------------------------------------------
    // Background
    // ------------------------------------------------------------------

    /// Replace the background image; `None` reveals the background color.
    ///
    /// The image is stretched to fill the canvas. A zero-sized image is
    /// treated as absent.
    pub fn set_background_image(&mut self, image: Option<Bitmap>) {
        let image = image.filter(|img| {
            let empty = img.width() == 0 || img.height() == 0;
            if empty {
                warn!("ignoring empty background image");
            }
            !empty
        });
        self.fitted_background = image
            .as_ref()
            .and_then(|img| fit_stretch(img, self.width, self.height));
        debug!(present = image.is_some(), "background image set");
        self.background_image = image;
        self.mark_dirty();
    }

    pub fn background_image(&self) -> Option<&Bitmap> {
        self.background_image.as_ref()
    }

    /// Set the solid fill. An installed background image stays on top of it.
    pub fn set_background_color(&mut self, color: Rgb) {
        debug!(%color, "background color set");
        self.background_color = color;
        self.mark_dirty();
    }

    pub fn background_color(&self) -> Rgb {
        self.background_color
    }

    /// Enable the gradient overlay with `color`, or disable it with `None`.
    pub fn set_gradient_overlay_color(&mut self, color: Option<Rgb>) {
        debug!(color = ?color, "gradient overlay set");
        self.gradient_color = color;
        self.mark_dirty();
    }

    pub fn gradient_overlay_color(&self) -> Option<Rgb> {
        self.gradient_color
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    pub fn text_item(&self) -> &TextItem {
        &self.text
    }

    /// Mutable access to the text block; marks the surface dirty.
    pub fn text_item_mut(&mut self) -> &mut TextItem {
        self.mark_dirty();
        &mut self.text
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Mutable access to the font registry; marks the surface dirty.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        self.mark_dirty();
        &mut self.fonts
    }

    /// The rectangle the text block is laid out in.
    pub fn text_bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height).inset(self.config.margin)
    }

    // ------------------------------------------------------------------
    // Icons
    // ------------------------------------------------------------------

    pub fn icons(&self) -> &IconOverlaySet {
        &self.icons
    }

    pub fn add_icon(&mut self, image: Arc<Bitmap>, x: i32, y: i32) -> IconId {
        self.mark_dirty();
        self.icons.add(image, x, y)
    }

    pub fn remove_icon(&mut self, id: IconId) -> Result<()> {
        self.icons.remove(id)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn move_icon(&mut self, id: IconId, dx: i32, dy: i32) -> Result<()> {
        self.icons.move_by(id, dx, dy)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn resize_icon(&mut self, id: IconId, width: i32, height: i32) -> Result<()> {
        self.icons.resize(id, width, height)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn bring_to_front(&mut self, id: IconId) -> Result<()> {
        self.icons.bring_to_front(id)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn send_to_back(&mut self, id: IconId) -> Result<()> {
        self.icons.send_to_back(id)?;
        self.mark_dirty();
        Ok(())
    }

    /// Topmost icon under a canvas point, for pointer interactions.
    pub fn icon_at(&self, x: i32, y: i32) -> Option<IconId> {
        self.icons.hit_test(x, y)
    }

    // ------------------------------------------------------------------
    // Whole-canvas operations
    // ------------------------------------------------------------------

    /// Return to the configured default state ("New").
    ///
    /// Registered fonts are kept.
    pub fn clear(&mut self) {
        self.background_image = None;
        self.fitted_background = None;
        self.background_color = self.config.background_color;
        self.gradient_color = self.config.gradient_color;
        self.text.reset_to(self.config.text_style.clone());
        self.icons.clear();
        debug!("canvas cleared");
        self.mark_dirty();
    }

    /// Change the canvas size. Text and icon state is kept.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        if width <= 0 || height <= 0 {
            return Err(PlacardError::invalid_argument(format!(
                "canvas size must be positive, got {}x{}",
                width, height
            )));
        }
        self.width = width as u32;
        self.height = height as u32;
        self.fitted_background = self
            .background_image
            .as_ref()
            .and_then(|img| fit_stretch(img, self.width, self.height));
        debug!(width, height, "canvas resized");
        self.mark_dirty();
        Ok(())
    }

    /// Compose every layer into a fresh bitmap.
    pub fn render(&self) -> Bitmap {
        let fill = self.background_color.to_rgba();
        let mut frame = Bitmap::from_pixel(self.width, self.height, fill);

        if let Some(background) = &self.fitted_background {
            for (dst, src) in frame.pixels_mut().zip(background.pixels()) {
                *dst = over_rgba(*dst, *src);
            }
        }

        if let Some(color) = self.gradient_color {
            gradient::apply(&mut frame, color);
        }

        self.icons.draw_into(&mut frame);
        self.text.draw_into(&mut frame, self.text_bounds(), &self.fonts);

        debug!(
            width = self.width,
            height = self.height,
            icons = self.icons.len(),
            lines = self.text.lines().len(),
            "canvas rendered"
        );
        frame
    }

    /// The current composition, re-rendered only if the state changed.
    pub fn snapshot(&mut self) -> &Bitmap {
        if self.dirty {
            self.snapshot = None;
            self.dirty = false;
        }
        let frame = match self.snapshot.take() {
            Some(frame) => frame,
            None => self.render(),
        };
        self.snapshot.insert(frame)
    }

    /// An independent copy of the current composition, for export.
    pub fn copy_image(&mut self) -> Bitmap {
        self.snapshot().clone()
    }
}
