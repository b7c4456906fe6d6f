//! # Icon Overlay Set
//!
//! Small images placed on the canvas. Each placement is an [`IconInstance`]
//! with its own position and size; the pixel data is shared, so adding the
//! same icon many times does not copy the image.
//!
//! Sequence order is paint order: the last entry is drawn on top. Z-order is
//! the index in that sequence, so it is always dense (0..len) and reordering
//! can never leave gaps or duplicates.
//!
//! ```
//! use std::sync::Arc;
//! use placard::Bitmap;
//! use placard::icons::IconOverlaySet;
//!
//! let image = Arc::new(Bitmap::new(16, 16));
//! let mut icons = IconOverlaySet::new();
//! let a = icons.add(image.clone(), 0, 0);
//! let b = icons.add(image, 8, 8);
//!
//! assert_eq!(icons.hit_test(10, 10), Some(b));
//! icons.bring_to_front(a).unwrap();
//! assert_eq!(icons.hit_test(10, 10), Some(a));
//! ```

use std::fmt;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use tracing::debug;

use crate::Bitmap;
use crate::canvas::Rect;
use crate::error::{PlacardError, Result};
use crate::shader::over_rgba;

/// Identity of a placed icon. Never reused within one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IconId(u64);

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "icon#{}", self.0)
    }
}

/// One placement of an icon image.
#[derive(Debug, Clone)]
pub struct IconInstance {
    id: IconId,
    image: Arc<Bitmap>,
    /// Top-left corner in canvas pixels; may be off-canvas.
    pub x: i32,
    pub y: i32,
    width: u32,
    height: u32,
}

impl IconInstance {
    pub fn id(&self) -> IconId {
        self.id
    }

    pub fn image(&self) -> &Arc<Bitmap> {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Paint this icon onto `surface`, scaled to its instance size.
    ///
    /// Scaling uses nearest-neighbour sampling so icon pixels stay crisp.
    pub fn draw_into(&self, surface: &mut Bitmap) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let scaled;
        let source: &Bitmap = if self.image.dimensions() == (self.width, self.height) {
            &*self.image
        } else {
            scaled = imageops::resize(&*self.image, self.width, self.height, FilterType::Nearest);
            &scaled
        };

        let (sw, sh) = (surface.width() as i64, surface.height() as i64);
        for (ix, iy, px) in source.enumerate_pixels() {
            let cx = self.x as i64 + ix as i64;
            let cy = self.y as i64 + iy as i64;
            if cx < 0 || cy < 0 || cx >= sw || cy >= sh {
                continue;
            }
            let dst = surface.get_pixel_mut(cx as u32, cy as u32);
            *dst = over_rgba(*dst, *px);
        }
    }
}

fn check_size(width: i32, height: i32) -> Result<(u32, u32)> {
    if width <= 0 || height <= 0 {
        return Err(PlacardError::invalid_argument(format!(
            "icon size must be positive, got {}x{}",
            width, height
        )));
    }
    Ok((width as u32, height as u32))
}

/// The ordered collection of icons on a canvas.
#[derive(Debug, Clone, Default)]
pub struct IconOverlaySet {
    icons: Vec<IconInstance>,
    next_id: u64,
}

impl IconOverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an icon at its natural size on top of all others.
    pub fn add(&mut self, image: Arc<Bitmap>, x: i32, y: i32) -> IconId {
        let (width, height) = image.dimensions();
        let id = IconId(self.next_id);
        self.next_id += 1;
        self.icons.push(IconInstance {
            id,
            image,
            x,
            y,
            width,
            height,
        });
        debug!(%id, x, y, width, height, "icon added");
        id
    }

    /// Place an icon at an explicit size on top of all others.
    pub fn add_sized(
        &mut self,
        image: Arc<Bitmap>,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<IconId> {
        let (width, height) = check_size(width, height)?;
        let id = self.add(image, x, y);
        let icon = self.get_mut(id)?;
        icon.width = width;
        icon.height = height;
        Ok(id)
    }

    fn index_of(&self, id: IconId) -> Result<usize> {
        self.icons
            .iter()
            .position(|icon| icon.id == id)
            .ok_or_else(|| PlacardError::invalid_argument(format!("no {} on the canvas", id)))
    }

    fn get_mut(&mut self, id: IconId) -> Result<&mut IconInstance> {
        let index = self.index_of(id)?;
        Ok(&mut self.icons[index])
    }

    pub fn get(&self, id: IconId) -> Option<&IconInstance> {
        self.icons.iter().find(|icon| icon.id == id)
    }

    pub fn remove(&mut self, id: IconId) -> Result<IconInstance> {
        let index = self.index_of(id)?;
        debug!(%id, "icon removed");
        Ok(self.icons.remove(index))
    }

    /// Shift an icon by a relative offset.
    pub fn move_by(&mut self, id: IconId, dx: i32, dy: i32) -> Result<()> {
        let icon = self.get_mut(id)?;
        icon.x = icon.x.saturating_add(dx);
        icon.y = icon.y.saturating_add(dy);
        Ok(())
    }

    pub fn move_to(&mut self, id: IconId, x: i32, y: i32) -> Result<()> {
        let icon = self.get_mut(id)?;
        icon.x = x;
        icon.y = y;
        Ok(())
    }

    /// Change an icon's size, keeping its top-left corner fixed.
    pub fn resize(&mut self, id: IconId, width: i32, height: i32) -> Result<()> {
        let (width, height) = check_size(width, height)?;
        let icon = self.get_mut(id)?;
        icon.width = width;
        icon.height = height;
        Ok(())
    }

    pub fn bring_to_front(&mut self, id: IconId) -> Result<()> {
        let index = self.index_of(id)?;
        let icon = self.icons.remove(index);
        self.icons.push(icon);
        Ok(())
    }

    pub fn send_to_back(&mut self, id: IconId) -> Result<()> {
        let index = self.index_of(id)?;
        let icon = self.icons.remove(index);
        self.icons.insert(0, icon);
        Ok(())
    }

    /// Paint position of an icon: 0 is the bottom, `len() - 1` the top.
    pub fn z_order(&self, id: IconId) -> Option<usize> {
        self.icons.iter().position(|icon| icon.id == id)
    }

    /// Topmost icon whose bounds contain the point.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<IconId> {
        self.icons
            .iter()
            .rev()
            .find(|icon| icon.bounds().contains(x, y))
            .map(|icon| icon.id)
    }

    /// Icons in paint order, bottom first.
    pub fn iter(&self) -> impl Iterator<Item = &IconInstance> {
        self.icons.iter()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Remove every icon. Ids already handed out stay retired.
    pub fn clear(&mut self) {
        self.icons.clear();
    }

    /// Paint every icon in ascending z-order.
    pub fn draw_into(&self, surface: &mut Bitmap) {
        for icon in &self.icons {
            icon.draw_into(surface);
        }
    }
}
