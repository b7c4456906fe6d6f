//! # Placard CLI
//!
//! Command-line front end for composing text over a picture.
//!
//! ## Usage
//!
//! ```bash
//! # List bundled backgrounds and icons
//! placard list --resources ./resources
//!
//! # The startup demo, saved as JPEG
//! placard render --demo --out demo.jpeg
//!
//! # White centered text over a custom photo, no gradient
//! placard render --background-file beach.png --no-gradient \
//!     --text "Wish you were here" --text-color white --justify center \
//!     --font-size 48 --out card.png
//!
//! # Two icons, the second scaled to 64x64
//! placard render --text hi --icon star@10,10 --icon logo.png@100,40:64x64 --out out.png
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use placard::{
    CanvasConfig, CanvasSurface, Justify, PlacardError, Rgb,
    error::Result,
    import_bitmap, logging,
    prefs::Preferences,
    resources::ResourceTable,
    studio::{BackgroundSource, Dialogs, Studio},
};

/// Placard - compose text over an image
#[derive(Parser, Debug)]
#[command(name = "placard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose a picture and write it as PNG or JPEG
    Render(RenderArgs),

    /// List bundled backgrounds and icons
    List {
        /// Resource directory (contains images/ and icons/)
        #[arg(long, value_name = "DIR", default_value = "resources")]
        resources: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output file; the extension picks the format (.png, .jpg, .jpeg)
    #[arg(long, short, value_name = "FILE")]
    out: PathBuf,

    /// Canvas width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value = "600")]
    height: u32,

    /// Bundled background by name (see `placard list`)
    #[arg(long, value_name = "NAME", conflicts_with = "background_file")]
    background: Option<String>,

    /// Background image file
    #[arg(long, value_name = "PATH")]
    background_file: Option<PathBuf>,

    /// Background fill color (name or #rrggbb)
    #[arg(long, value_name = "COLOR")]
    color: Option<Rgb>,

    /// Disable the gradient overlay
    #[arg(long)]
    no_gradient: bool,

    /// Gradient tint color
    #[arg(long, value_name = "COLOR", default_value = "white")]
    gradient_color: Rgb,

    /// Text to draw; use \n for line breaks
    #[arg(long, conflicts_with_all = ["text_file", "demo"])]
    text: Option<String>,

    /// Read the text from a file
    #[arg(long, value_name = "PATH", conflicts_with = "demo")]
    text_file: Option<PathBuf>,

    /// Start from the demo verse and background
    #[arg(long)]
    demo: bool,

    /// Font family
    #[arg(long, value_name = "NAME")]
    font: Option<String>,

    /// TrueType/OpenType file, registered under --font (or "custom")
    #[arg(long, value_name = "PATH")]
    font_file: Option<PathBuf>,

    /// Font size in points
    #[arg(long, allow_negative_numbers = true)]
    font_size: Option<i32>,

    /// Text color (name or #rrggbb)
    #[arg(long, value_name = "COLOR")]
    text_color: Option<Rgb>,

    /// Line justification: left, center, right
    #[arg(long)]
    justify: Option<Justify>,

    /// Line height as a multiple of the font size
    #[arg(long, value_name = "X")]
    line_height: Option<f32>,

    /// Icon placement NAME_OR_PATH@X,Y[:WxH] (repeatable)
    #[arg(long, value_name = "SPEC")]
    icon: Vec<IconSpec>,

    /// Resource directory (contains images/ and icons/)
    #[arg(long, value_name = "DIR", default_value = "resources")]
    resources: PathBuf,

    /// Debug logging (RUST_LOG is honoured)
    #[arg(long, short)]
    verbose: bool,
}

/// Where an icon comes from and where it goes.
#[derive(Debug, Clone, PartialEq)]
struct IconSpec {
    source: String,
    x: i32,
    y: i32,
    size: Option<(i32, i32)>,
}

impl FromStr for IconSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bad = || format!("invalid icon '{}', expected NAME_OR_PATH@X,Y[:WxH]", s);

        let (source, placement) = s.rsplit_once('@').ok_or_else(bad)?;
        if source.is_empty() {
            return Err(bad());
        }
        let (position, size) = match placement.split_once(':') {
            Some((position, size)) => (position, Some(size)),
            None => (placement, None),
        };

        let (x, y) = position.split_once(',').ok_or_else(bad)?;
        let x = x.trim().parse().map_err(|_| bad())?;
        let y = y.trim().parse().map_err(|_| bad())?;

        let size = match size {
            Some(size) => {
                let (w, h) = size.split_once(['x', 'X']).ok_or_else(bad)?;
                Some((w.trim().parse().map_err(|_| bad())?, h.trim().parse().map_err(|_| bad())?))
            }
            None => None,
        };

        Ok(IconSpec {
            source: source.to_string(),
            x,
            y,
            size,
        })
    }
}

/// Answers the studio's dialogs from command-line arguments.
#[derive(Debug, Default)]
struct ArgDialogs {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl Dialogs for ArgDialogs {
    fn choose_input_file(&mut self, _title: &str, _start_dir: Option<&Path>) -> Option<PathBuf> {
        self.input.take()
    }

    fn choose_output_file(
        &mut self,
        _title: &str,
        _default_name: &str,
        _start_dir: Option<&Path>,
    ) -> Option<PathBuf> {
        self.output.take()
    }

    fn pick_color(&mut self, _title: &str, _initial: Rgb) -> Option<Rgb> {
        None
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => {
            logging::init(args.verbose);
            render(args)
        }
        Commands::List { resources } => {
            logging::init(false);
            list(&resources)
        }
    }
}

fn list(dir: &Path) -> Result<()> {
    let table = ResourceTable::from_directory(dir)?;

    println!("Available backgrounds:");
    for name in table.background_names() {
        println!("  {}", name);
    }
    println!("\nAvailable icons:");
    for name in table.icon_names() {
        println!("  {}", name);
    }
    Ok(())
}

fn render(args: RenderArgs) -> Result<()> {
    let resources = ResourceTable::from_directory(&args.resources)?;

    let mut config = CanvasConfig::with_size(args.width, args.height);
    config.gradient_color = (!args.no_gradient).then_some(args.gradient_color);
    let canvas = CanvasSurface::new(config)?;

    let dialogs = ArgDialogs {
        input: args.background_file.clone(),
        output: Some(args.out.clone()),
    };
    let mut studio = Studio::new(canvas, resources, dialogs)
        .with_preferences(Preferences::load_or_initial(), Preferences::default_path());

    if args.demo {
        studio.load_demo_content()?;
    }

    if let Some(path) = &args.font_file {
        let family = args.font.as_deref().unwrap_or("custom");
        studio.canvas_mut().fonts_mut().register_file(family, path)?;
    }
    apply_text(&args, studio.canvas_mut())?;

    if let Some(color) = args.color {
        studio.canvas_mut().set_background_color(color);
    }
    if let Some(name) = &args.background {
        studio.choose_background(&BackgroundSource::Named(name.clone()))?;
    } else if args.background_file.is_some() {
        studio.choose_background(&BackgroundSource::Custom)?;
    }

    for placement in &args.icon {
        place_icon(&mut studio, placement)?;
    }

    match studio.save_image()? {
        Some(path) => println!("Saved {}", path.display()),
        None => return Err(PlacardError::InvalidArgument("no output file".to_string())),
    }
    Ok(())
}

fn apply_text(args: &RenderArgs, canvas: &mut CanvasSurface) -> Result<()> {
    let text = canvas.text_item_mut();

    if let Some(body) = &args.text {
        text.set_text(&body.replace("\\n", "\n"));
    } else if let Some(path) = &args.text_file {
        text.set_text(&std::fs::read_to_string(path)?);
    }

    match (&args.font, &args.font_file) {
        (Some(family), _) => text.set_font_family(family)?,
        (None, Some(_)) => text.set_font_family("custom")?,
        (None, None) => {}
    }
    if let Some(size) = args.font_size {
        text.set_font_size(size)?;
    }
    if let Some(color) = args.text_color {
        text.set_color(color);
    }
    if let Some(justify) = args.justify {
        text.set_justify(justify);
    }
    if let Some(multiplier) = args.line_height {
        text.set_line_height_multiplier(multiplier)?;
    }
    Ok(())
}

fn place_icon<D: Dialogs>(studio: &mut Studio<D>, placement: &IconSpec) -> Result<()> {
    let path = Path::new(&placement.source);
    let id = if path.is_file() {
        let image = Arc::new(import_bitmap(path)?);
        studio.canvas_mut().add_icon(image, placement.x, placement.y)
    } else {
        studio.add_icon(&placement.source, placement.x, placement.y)?
    };

    if let Some((width, height)) = placement.size {
        studio.canvas_mut().resize_icon(id, width, height)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_icon_spec_parsing() {
        assert_eq!(
            "star@10,-4".parse::<IconSpec>().unwrap(),
            IconSpec {
                source: "star".to_string(),
                x: 10,
                y: -4,
                size: None
            }
        );
        assert_eq!(
            "me@home/logo.png@1,2:64x32".parse::<IconSpec>().unwrap(),
            IconSpec {
                source: "me@home/logo.png".to_string(),
                x: 1,
                y: 2,
                size: Some((64, 32))
            }
        );
    }

    #[test]
    fn test_icon_spec_rejects_garbage() {
        for bad in ["star", "@1,2", "star@1", "star@a,b", "star@1,2:64", "star@1,2:ax3"] {
            assert!(bad.parse::<IconSpec>().is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "placard",
            "render",
            "--out",
            "x.png",
            "--text-color",
            "#ff0000",
            "--justify",
            "right",
            "--icon",
            "star@1,2",
            "--icon",
            "moon@3,4",
        ])
        .unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.text_color, Some(Rgb::RED));
        assert_eq!(args.justify, Some(Justify::Right));
        assert_eq!(args.icon.len(), 2);
        assert_eq!(args.gradient_color, Rgb::WHITE);
    }

    #[test]
    fn test_cli_text_conflicts_with_demo() {
        let args = ["placard", "render", "--out", "x.png", "--text", "a", "--demo"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
