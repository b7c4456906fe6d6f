//! # Resource Table
//!
//! Bundled backgrounds, thumbnails, and icons, looked up by logical name.
//!
//! Each name maps to a loader function, so callers never build file paths and
//! the storage layout can change without touching the canvas code. Names are
//! case-insensitive.
//!
//! ## Directory Layout
//!
//! [`ResourceTable::from_directory`] expects:
//!
//! ```text
//! <dir>/images/<name>.jpeg            background
//! <dir>/images/<name>_thumbnail.jpeg  menu/toolbar thumbnail
//! <dir>/icons/<name>.png              placeable icon
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::Rgba;
use tracing::{debug, warn};

use crate::Bitmap;
use crate::color::Rgb;
use crate::error::{PlacardError, Result};
use crate::io::import_bitmap;

/// Produces a bitmap on demand.
pub type Loader = Box<dyn Fn() -> Result<Bitmap> + Send + Sync>;

/// Background names shipped with the application.
pub const BUILTIN_BACKGROUNDS: [&str; 6] =
    ["cats", "mandelbrot", "earthrise", "sunset", "cloud", "eagle_nebula"];

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn file_loader(path: PathBuf) -> Loader {
    Box::new(move || import_bitmap(&path))
}

/// Name → loader tables for each resource kind.
#[derive(Default)]
pub struct ResourceTable {
    backgrounds: BTreeMap<String, Loader>,
    thumbnails: BTreeMap<String, Loader>,
    icons: BTreeMap<String, Loader>,
    /// Decoded icons, shared by every placement.
    icon_cache: HashMap<String, Arc<Bitmap>>,
}

impl fmt::Debug for ResourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceTable")
            .field("backgrounds", &self.backgrounds.keys().collect::<Vec<_>>())
            .field("thumbnails", &self.thumbnails.keys().collect::<Vec<_>>())
            .field("icons", &self.icons.keys().collect::<Vec<_>>())
            .field("cached_icons", &self.icon_cache.len())
            .finish()
    }
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the built-in backgrounds and every icon found under `dir`.
    ///
    /// Missing files are not an error here; they fail when loaded.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut table = Self::new();

        let images = dir.join("images");
        for name in BUILTIN_BACKGROUNDS {
            table.register_background(name, file_loader(images.join(format!("{}.jpeg", name))));
            let thumbnail = images.join(format!("{}_thumbnail.jpeg", name));
            table.register_thumbnail(name, file_loader(thumbnail));
        }

        let icons = dir.join("icons");
        match std::fs::read_dir(&icons) {
            Ok(entries) => {
                for entry in entries {
                    let path = entry?.path();
                    let is_png = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
                    let stem = path.file_stem().and_then(|s| s.to_str()).map(str::to_string);
                    if let (true, Some(stem)) = (is_png, stem) {
                        table.register_icon(&stem, file_loader(path));
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(dir = %icons.display(), "no icon directory");
            }
            Err(e) => return Err(e.into()),
        }

        debug!(
            dir = %dir.display(),
            backgrounds = table.backgrounds.len(),
            icons = table.icons.len(),
            "resource table loaded"
        );
        Ok(table)
    }

    pub fn register_background(&mut self, name: &str, loader: Loader) {
        self.backgrounds.insert(key(name), loader);
    }

    pub fn register_thumbnail(&mut self, name: &str, loader: Loader) {
        self.thumbnails.insert(key(name), loader);
    }

    /// Register an icon; replaces any cached decode under the same name.
    pub fn register_icon(&mut self, name: &str, loader: Loader) {
        let name = key(name);
        self.icon_cache.remove(&name);
        self.icons.insert(name, loader);
    }

    pub fn has_background(&self, name: &str) -> bool {
        self.backgrounds.contains_key(&key(name))
    }

    pub fn background_names(&self) -> impl Iterator<Item = &str> {
        self.backgrounds.keys().map(String::as_str)
    }

    pub fn icon_names(&self) -> impl Iterator<Item = &str> {
        self.icons.keys().map(String::as_str)
    }

    fn load(table: &BTreeMap<String, Loader>, kind: &str, name: &str) -> Result<Bitmap> {
        let loader = table
            .get(&key(name))
            .ok_or_else(|| PlacardError::invalid_argument(format!("unknown {} '{}'", kind, name)))?;
        loader()
    }

    /// Load a background image by name.
    pub fn background(&self, name: &str) -> Result<Bitmap> {
        Self::load(&self.backgrounds, "background", name)
    }

    pub fn thumbnail(&self, name: &str) -> Result<Bitmap> {
        Self::load(&self.thumbnails, "thumbnail", name)
    }

    /// Load an icon by name, decoding it only the first time.
    pub fn icon(&mut self, name: &str) -> Result<Arc<Bitmap>> {
        let name = key(name);
        if let Some(cached) = self.icon_cache.get(&name) {
            return Ok(Arc::clone(cached));
        }
        let image = Arc::new(Self::load(&self.icons, "icon", &name)?);
        self.icon_cache.insert(name, Arc::clone(&image));
        Ok(image)
    }
}

/// The 32x32 "Color..." thumbnail: red, green, and blue bars on gray.
pub fn color_swatch_thumbnail() -> Bitmap {
    let mut swatch = Bitmap::from_pixel(32, 32, Rgb::GRAY.to_rgba());
    let bars = [(2u32, Rgb::RED), (11, Rgb::GREEN), (20, Rgb::BLUE)];
    for (x0, color) in bars {
        for y in 2..30 {
            for x in x0..x0 + 9 {
                swatch.put_pixel(x, y, Rgba([color.r, color.g, color.b, 255]));
            }
        }
    }
    swatch
}
