//! # Export / Import
//!
//! Converts composed bitmaps to and from raster files.
//!
//! ## Format Mapping
//!
//! | Extension | Format | Notes |
//! |-----------|--------|-------|
//! | `.png` | PNG | Lossless, keeps alpha |
//! | `.jpg`, `.jpeg` | JPEG | Lossy, alpha dropped |
//!
//! Any other extension is rejected before anything touches the filesystem.
//! Exports are written to a temporary file next to the target and renamed
//! into place, so a failed export never leaves a partial file behind.

#[cfg(feature = "heif")]
mod heif;

use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageError};
use tracing::{debug, info};

use crate::Bitmap;
use crate::error::{PlacardError, Result};

/// JPEG encoder quality (1-100).
pub const JPEG_QUALITY: u8 = 90;

/// Raster formats the exporter can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    /// Pick the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            _ => Err(PlacardError::UnsupportedFormat(format!(
                "{}: the output file extension must be .png or .jpeg",
                path.display()
            ))),
        }
    }

    pub fn is_lossless(self) -> bool {
        matches!(self, ExportFormat::Png)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
        })
    }
}

fn encode_error(e: ImageError) -> PlacardError {
    match e {
        ImageError::IoError(io) => PlacardError::Io(io),
        other => PlacardError::Io(std::io::Error::other(format!("encode failed: {}", other))),
    }
}

/// Encode `bitmap` in `format` to any writer.
pub fn encode<W: Write>(bitmap: &Bitmap, format: ExportFormat, writer: W) -> Result<()> {
    let (width, height) = bitmap.dimensions();
    match format {
        ExportFormat::Png => PngEncoder::new(writer)
            .write_image(bitmap.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(encode_error),
        ExportFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(bitmap.clone()).to_rgb8();
            JpegEncoder::new_with_quality(writer, JPEG_QUALITY)
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(encode_error)
        }
    }
}

/// Write `bitmap` to `path`, choosing the format from the extension.
///
/// Unsupported extensions fail with `UnsupportedFormat` and create nothing.
/// On any later failure the previous file at `path` (if any) is unchanged.
pub fn export_bitmap(bitmap: &Bitmap, path: impl AsRef<Path>) -> Result<ExportFormat> {
    let path = path.as_ref();
    let format = ExportFormat::from_path(path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".placard-")
        .suffix(".tmp")
        .tempfile_in(dir)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        encode(bitmap, format, &mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file().set_permissions(fs::Permissions::from_mode(0o644))?;
    }

    tmp.persist(path).map_err(|e| PlacardError::Io(e.error))?;

    info!(
        path = %path.display(),
        %format,
        width = bitmap.width(),
        height = bitmap.height(),
        "exported image"
    );
    Ok(format)
}

/// Read and decode a raster file.
///
/// A missing or unreadable file fails with `Io`; content that does not decode
/// as an image (including an empty file) fails with `InvalidImage`.
pub fn import_bitmap(path: impl AsRef<Path>) -> Result<Bitmap> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let bitmap = import_bitmap_from_memory(&bytes).map_err(|e| match e {
        PlacardError::InvalidImage(msg) => {
            PlacardError::InvalidImage(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;
    info!(
        path = %path.display(),
        width = bitmap.width(),
        height = bitmap.height(),
        "imported image"
    );
    Ok(bitmap)
}

/// Decode raster bytes in any format the image crate recognises.
pub fn import_bitmap_from_memory(bytes: &[u8]) -> Result<Bitmap> {
    if bytes.is_empty() {
        return Err(PlacardError::InvalidImage("file is empty".to_string()));
    }

    #[cfg(feature = "heif")]
    if heif::is_heif(bytes) {
        debug!("decoding HEIF data");
        return heif::decode(bytes).map(|img| img.to_rgba8());
    }

    let image =
        image::load_from_memory(bytes).map_err(|e| PlacardError::InvalidImage(e.to_string()))?;
    debug!(width = image.width(), height = image.height(), "decoded image");
    Ok(image.to_rgba8())
}
