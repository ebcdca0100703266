use image::codecs::bmp::BmpEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tga::TgaEncoder;
use image::codecs::tiff::TiffEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

use crate::error::Result;

// ============================================================================
// SAVE FORMATS
// ============================================================================

/// File stem used for exports that have no source name to derive one from.
pub const DEFAULT_EXPORT_STEM: &str = "pixel-art";

/// Output formats for exported bitmaps. All of them keep the alpha channel,
/// so `Empty` cells stay transparent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SaveFormat {
    #[default]
    Png,
    Bmp,
    Tga,
    Tiff,
}

impl SaveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Png => "png",
            SaveFormat::Bmp => "bmp",
            SaveFormat::Tga => "tga",
            SaveFormat::Tiff => "tiff",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(SaveFormat::Png),
            "bmp" => Some(SaveFormat::Bmp),
            "tga" => Some(SaveFormat::Tga),
            "tif" | "tiff" => Some(SaveFormat::Tiff),
            _ => None,
        }
    }

    /// Infer from a file path's extension, defaulting to PNG.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .unwrap_or_default()
    }

    pub fn all() -> &'static [SaveFormat] {
        &[SaveFormat::Png, SaveFormat::Bmp, SaveFormat::Tga, SaveFormat::Tiff]
    }
}

// ============================================================================
// DECODING
// ============================================================================

/// Decode an image file to straight RGBA.
pub fn load_source_image(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}

/// Decode an in-memory image (any format the `image` crate recognises).
pub fn decode_source_image(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

// ============================================================================
// ENCODING
// ============================================================================

/// Encode and write an image to a file.
pub fn encode_and_write(image: &RgbaImage, path: &Path, format: SaveFormat) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode_into(image, &mut writer, format)?;
    Ok(())
}

/// Encode to an in-memory byte vector (e.g. for offering a download).
pub fn encode_to_vec(image: &RgbaImage, format: SaveFormat) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    encode_into(image, &mut cursor, format)?;
    Ok(cursor.into_inner())
}

fn encode_into<W: std::io::Write + std::io::Seek>(
    image: &RgbaImage,
    writer: &mut W,
    format: SaveFormat,
) -> Result<()> {
    let (w, h) = image.dimensions();
    match format {
        SaveFormat::Png => {
            PngEncoder::new(writer).write_image(image.as_raw(), w, h, ColorType::Rgba8)?;
        }
        SaveFormat::Bmp => {
            BmpEncoder::new(writer).write_image(image.as_raw(), w, h, ColorType::Rgba8)?;
        }
        SaveFormat::Tga => {
            TgaEncoder::new(writer).write_image(image.as_raw(), w, h, ColorType::Rgba8)?;
        }
        SaveFormat::Tiff => {
            TiffEncoder::new(writer).write_image(image.as_raw(), w, h, ColorType::Rgba8)?;
        }
    }
    Ok(())
}
