//! # Studio Actions
//!
//! The menu and toolbar commands of the editor, independent of any windowing
//! toolkit. File choosers and the color picker are reached through the
//! [`Dialogs`] trait; the shell implements it with real dialogs, tests with a
//! script.
//!
//! Every action either completes or returns an error with the canvas left in
//! its last good state. The shell shows the error message to the user.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::canvas::CanvasSurface;
use crate::color::Rgb;
use crate::error::Result;
use crate::icons::IconId;
use crate::io::{export_bitmap, import_bitmap};
use crate::prefs::Preferences;
use crate::resources::ResourceTable;
use crate::text::Justify;

/// File name offered by "Save Image...".
pub const DEFAULT_OUTPUT_NAME: &str = "Output.jpeg";

/// Tint used while the gradient overlay is switched on.
pub const GRADIENT_COLOR: Rgb = Rgb::WHITE;

/// Text shown when the application starts.
pub const DEMO_TEXT: &str = "Big bugs have little bugs
      Upon their backs to bite 'em,
And little bugs have littler bugs,
      And so it goes, ad infinitum.";

/// Background shown when the application starts.
pub const DEMO_BACKGROUND: &str = "cloud";

/// External dialog collaborators. `None` means the user cancelled.
pub trait Dialogs {
    fn choose_input_file(&mut self, title: &str, start_dir: Option<&Path>) -> Option<PathBuf>;

    fn choose_output_file(
        &mut self,
        title: &str,
        default_name: &str,
        start_dir: Option<&Path>,
    ) -> Option<PathBuf>;

    fn pick_color(&mut self, title: &str, initial: Rgb) -> Option<Rgb>;
}

/// One entry of the Background menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundSource {
    /// A bundled image, by resource name.
    Named(String),
    /// An image file chosen by the user ("Custom...").
    Custom,
    /// A solid color chosen by the user ("Color...").
    Color,
}

impl BackgroundSource {
    /// Menu order: bundled images, then "Custom...", then "Color...".
    pub fn menu(resources: &ResourceTable) -> Vec<BackgroundSource> {
        resources
            .background_names()
            .map(|name| BackgroundSource::Named(name.to_string()))
            .chain([BackgroundSource::Custom, BackgroundSource::Color])
            .collect()
    }
}

impl fmt::Display for BackgroundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundSource::Named(name) => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => write!(f, "{}{}", first.to_uppercase(), chars.as_str()),
                    None => Ok(()),
                }
            }
            BackgroundSource::Custom => f.write_str("Custom..."),
            BackgroundSource::Color => f.write_str("Color..."),
        }
    }
}

/// The editor's action layer: a canvas plus the collaborators actions need.
pub struct Studio<D: Dialogs> {
    canvas: CanvasSurface,
    resources: ResourceTable,
    dialogs: D,
    prefs: Preferences,
    prefs_path: Option<PathBuf>,
}

impl<D: Dialogs> Studio<D> {
    pub fn new(canvas: CanvasSurface, resources: ResourceTable, dialogs: D) -> Self {
        Self {
            canvas,
            resources,
            dialogs,
            prefs: Preferences::initial(),
            prefs_path: None,
        }
    }

    /// Use `prefs`, saving changes to `path` when given.
    pub fn with_preferences(mut self, prefs: Preferences, path: Option<PathBuf>) -> Self {
        self.prefs = prefs;
        self.prefs_path = path;
        self
    }

    pub fn canvas(&self) -> &CanvasSurface {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasSurface {
        &mut self.canvas
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceTable {
        &mut self.resources
    }

    pub fn dialogs_mut(&mut self) -> &mut D {
        &mut self.dialogs
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn gradient_enabled(&self) -> bool {
        self.canvas.gradient_overlay_color().is_some()
    }

    /// Startup content: the verse in large blue type over the cloud picture.
    ///
    /// A missing bundled background is logged and the color fill is kept.
    pub fn load_demo_content(&mut self) -> Result<()> {
        let text = self.canvas.text_item_mut();
        text.set_text(DEMO_TEXT);
        text.set_line_height_multiplier(1.5)?;
        text.set_font_size(36)?;
        text.set_color(Rgb::BLUE);
        text.set_justify(Justify::Left);

        match self.resources.background(DEMO_BACKGROUND) {
            Ok(image) => self.canvas.set_background_image(Some(image)),
            Err(e) => warn!(error = %e, "demo background unavailable"),
        }
        Ok(())
    }

    /// "New": default canvas, gradient back on, default text style.
    pub fn new_picture(&mut self) {
        self.canvas.clear();
        self.canvas.set_gradient_overlay_color(Some(GRADIENT_COLOR));
        info!("new picture");
    }

    /// The "Gradient Overlay" checkbox.
    pub fn set_gradient_enabled(&mut self, enabled: bool) {
        self.canvas
            .set_gradient_overlay_color(enabled.then_some(GRADIENT_COLOR));
    }

    /// Apply a Background menu entry.
    ///
    /// Returns `Ok(false)` when the user cancelled a dialog.
    pub fn choose_background(&mut self, source: &BackgroundSource) -> Result<bool> {
        match source {
            BackgroundSource::Named(name) => {
                let image = self.resources.background(name)?;
                self.canvas.set_background_image(Some(image));
            }
            BackgroundSource::Custom => {
                let start = self.prefs.default_directory.clone();
                let Some(path) = self
                    .dialogs
                    .choose_input_file("Select custom Background Image", start.as_deref())
                else {
                    return Ok(false);
                };
                self.remember(&path);
                let image = import_bitmap(&path)?;
                self.canvas.set_background_image(Some(image));
            }
            BackgroundSource::Color => {
                let initial = self.canvas.background_color();
                let title = "Select Color for Background";
                let Some(color) = self.dialogs.pick_color(title, initial) else {
                    return Ok(false);
                };
                self.canvas.set_background_color(color);
                self.canvas.set_background_image(None);
            }
        }
        debug!(%source, "background chosen");
        Ok(true)
    }

    /// "Save Image...": export the canvas to a user-chosen file.
    ///
    /// Returns the written path, or `None` when the user cancelled.
    pub fn save_image(&mut self) -> Result<Option<PathBuf>> {
        let start = self.prefs.default_directory.clone();
        let Some(path) = self
            .dialogs
            .choose_output_file("Select Output File", DEFAULT_OUTPUT_NAME, start.as_deref())
        else {
            return Ok(None);
        };
        self.remember(&path);
        let image = self.canvas.copy_image();
        export_bitmap(&image, &path)?;
        Ok(Some(path))
    }

    /// Place a bundled icon on the canvas.
    pub fn add_icon(&mut self, name: &str, x: i32, y: i32) -> Result<IconId> {
        let image = self.resources.icon(name)?;
        Ok(self.canvas.add_icon(image, x, y))
    }

    fn remember(&mut self, file: &Path) {
        self.prefs.remember_file(file);
        if let Some(path) = &self.prefs_path
            && let Err(e) = self.prefs.save(path)
        {
            warn!(error = %e, "could not save preferences");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bitmap;
    use crate::canvas::CanvasConfig;
    use crate::error::PlacardError;
    use crate::io::export_bitmap;
    use image::Rgba;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Scripted {
        inputs: VecDeque<Option<PathBuf>>,
        outputs: VecDeque<Option<PathBuf>>,
        colors: VecDeque<Option<Rgb>>,
        titles: Vec<String>,
    }

    impl Dialogs for Scripted {
        fn choose_input_file(&mut self, title: &str, _start_dir: Option<&Path>) -> Option<PathBuf> {
            self.titles.push(title.to_string());
            self.inputs.pop_front().flatten()
        }

        fn choose_output_file(
            &mut self,
            title: &str,
            default_name: &str,
            _start_dir: Option<&Path>,
        ) -> Option<PathBuf> {
            self.titles.push(format!("{} [{}]", title, default_name));
            self.outputs.pop_front().flatten()
        }

        fn pick_color(&mut self, title: &str, _initial: Rgb) -> Option<Rgb> {
            self.titles.push(title.to_string());
            self.colors.pop_front().flatten()
        }
    }

    fn studio() -> Studio<Scripted> {
        let mut resources = ResourceTable::new();
        resources.register_background(
            "cloud",
            Box::new(|| Ok(Bitmap::from_pixel(4, 4, Rgba([50, 60, 70, 255])))),
        );
        resources.register_icon(
            "dot",
            Box::new(|| Ok(Bitmap::from_pixel(2, 2, Rgba([255, 0, 0, 255])))),
        );
        let canvas = CanvasSurface::new(CanvasConfig::with_size(64, 48)).unwrap();
        Studio::new(canvas, resources, Scripted::default())
            .with_preferences(Preferences::default(), None)
    }

    #[test]
    fn test_demo_content() {
        let mut s = studio();
        s.load_demo_content().unwrap();
        let text = s.canvas().text_item();
        assert_eq!(text.lines().len(), 4);
        assert_eq!(text.style().font_size, 36);
        assert_eq!(text.style().color, Rgb::BLUE);
        assert!(s.canvas().background_image().is_some());
    }

    #[test]
    fn test_new_picture_resets() {
        let mut s = studio();
        s.load_demo_content().unwrap();
        s.set_gradient_enabled(false);
        s.add_icon("dot", 1, 1).unwrap();
        s.new_picture();
        assert!(s.canvas().text_item().is_empty());
        assert!(s.canvas().icons().is_empty());
        assert!(s.canvas().background_image().is_none());
        assert!(s.gradient_enabled());
    }

    #[test]
    fn test_color_background_clears_image() {
        let mut s = studio();
        s.choose_background(&BackgroundSource::Named("cloud".into())).unwrap();
        s.dialogs_mut().colors.push_back(Some(Rgb::GREEN));
        assert!(s.choose_background(&BackgroundSource::Color).unwrap());
        assert!(s.canvas().background_image().is_none());
        assert_eq!(s.canvas().background_color(), Rgb::GREEN);
    }

    #[test]
    fn test_cancelled_dialogs_change_nothing() {
        let mut s = studio();
        s.choose_background(&BackgroundSource::Named("cloud".into())).unwrap();
        s.dialogs_mut().colors.push_back(None);
        s.dialogs_mut().inputs.push_back(None);
        s.dialogs_mut().outputs.push_back(None);
        assert!(!s.choose_background(&BackgroundSource::Color).unwrap());
        assert!(!s.choose_background(&BackgroundSource::Custom).unwrap());
        assert_eq!(s.save_image().unwrap(), None);
        assert!(s.canvas().background_image().is_some());
    }

    #[test]
    fn test_custom_background_bad_file_keeps_prior() {
        let dir = tempfile::tempdir().unwrap();
        let junk = dir.path().join("junk.png");
        std::fs::write(&junk, b"junk").unwrap();

        let mut s = studio();
        s.choose_background(&BackgroundSource::Named("cloud".into())).unwrap();
        let before = s.canvas().render();
        s.dialogs_mut().inputs.push_back(Some(junk));
        let err = s.choose_background(&BackgroundSource::Custom).unwrap_err();
        assert!(matches!(err, PlacardError::InvalidImage(_)));
        assert_eq!(s.canvas().render(), before);
    }

    #[test]
    fn test_custom_background_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bg.png");
        export_bitmap(&Bitmap::from_pixel(64, 48, Rgba([1, 2, 3, 255])), &file).unwrap();

        let mut s = studio();
        s.dialogs_mut().inputs.push_back(Some(file));
        assert!(s.choose_background(&BackgroundSource::Custom).unwrap());
        assert_eq!(s.canvas().background_image().unwrap().dimensions(), (64, 48));
        assert_eq!(s.preferences().default_directory.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_save_image_and_bad_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = studio();

        s.dialogs_mut().outputs.push_back(Some(dir.path().join("out.gif")));
        assert!(matches!(s.save_image(), Err(PlacardError::UnsupportedFormat(_))));
        assert!(!dir.path().join("out.gif").exists());

        let good = dir.path().join("out.png");
        s.dialogs_mut().outputs.push_back(Some(good.clone()));
        assert_eq!(s.save_image().unwrap(), Some(good.clone()));
        assert!(good.exists());
        assert!(s.dialogs_mut().titles.iter().any(|t| t.contains(DEFAULT_OUTPUT_NAME)));
    }

    #[test]
    fn test_dialog_directory_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let prefs_path = dir.path().join("config").join("prefs.json");
        let out = dir.path().join("out.png");

        let mut s = studio().with_preferences(Preferences::default(), Some(prefs_path.clone()));
        s.dialogs_mut().outputs.push_back(Some(out));
        s.save_image().unwrap();

        let saved = Preferences::load(&prefs_path).unwrap();
        assert_eq!(saved.default_directory.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_unknown_icon() {
        let mut s = studio();
        assert!(s.add_icon("nope", 0, 0).is_err());
        assert!(s.canvas().icons().is_empty());
    }

    #[test]
    fn test_menu_labels() {
        let s = studio();
        let labels: Vec<String> = BackgroundSource::menu(s.resources())
            .iter()
            .map(|b| b.to_string())
            .collect();
        assert_eq!(labels, vec!["Cloud", "Custom...", "Color..."]);
    }
}
