// ============================================================================
// RASTERIZE — source image → fixed-size grid (fit-inside, centered, point sampled)
// ============================================================================

use image::{DynamicImage, GenericImageView, RgbaImage};

use crate::canvas::PixelBuffer;
use crate::color::CellColor;
use crate::error::{EditorError, Result};

/// A decoded image the rasterizer can sample.
///
/// `sample` returns straight RGBA bytes and is only called with
/// `x < width()` and `y < height()`.
pub trait SourceImage {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn sample(&self, x: u32, y: u32) -> [u8; 4];
}

impl SourceImage for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn sample(&self, x: u32, y: u32) -> [u8; 4] {
        self.get_pixel(x, y).0
    }
}

impl SourceImage for DynamicImage {
    fn width(&self) -> u32 {
        GenericImageView::width(self)
    }

    fn height(&self) -> u32 {
        GenericImageView::height(self)
    }

    fn sample(&self, x: u32, y: u32) -> [u8; 4] {
        self.get_pixel(x, y).0
    }
}

/// Placement of a `src_w × src_h` image scaled uniformly to fit inside a
/// `cols × rows` grid and centered on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageFit {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    src_w: u32,
    src_h: u32,
}

impl ImageFit {
    pub fn new(src_w: u32, src_h: u32, rows: usize, cols: usize) -> Result<Self> {
        if src_w == 0 || src_h == 0 {
            return Err(EditorError::InvalidImage(format!(
                "source image has zero area ({}x{})",
                src_w, src_h
            )));
        }
        if rows == 0 || cols == 0 {
            return Err(EditorError::InvalidDimension { rows, cols });
        }
        let scale = (cols as f64 / src_w as f64).min(rows as f64 / src_h as f64);
        Ok(Self {
            scale,
            offset_x: (cols as f64 - src_w as f64 * scale) / 2.0,
            offset_y: (rows as f64 - src_h as f64 * scale) / 2.0,
            src_w,
            src_h,
        })
    }

    /// Scaled footprint size in cells.
    pub fn drawn_size(&self) -> (f64, f64) {
        (self.src_w as f64 * self.scale, self.src_h as f64 * self.scale)
    }

    /// Source pixel under the center of grid cell `(col, row)`, or `None`
    /// when the cell lies outside the scaled footprint.
    pub fn source_pixel(&self, col: usize, row: usize) -> Option<(u32, u32)> {
        let (drawn_w, drawn_h) = self.drawn_size();
        let cx = col as f64 + 0.5 - self.offset_x;
        let cy = row as f64 + 0.5 - self.offset_y;
        if cx < 0.0 || cy < 0.0 || cx >= drawn_w || cy >= drawn_h {
            return None;
        }
        let inv_scale = 1.0 / self.scale;
        let sx = ((cx * inv_scale).floor() as u32).min(self.src_w - 1);
        let sy = ((cy * inv_scale).floor() as u32).min(self.src_h - 1);
        Some((sx, sy))
    }
}

/// Rasterize `source` into a new `grid_size × grid_size` buffer.
pub fn rasterize<S: SourceImage + ?Sized>(source: &S, grid_size: usize) -> Result<PixelBuffer> {
    rasterize_to(source, grid_size, grid_size)
}

/// Rasterize `source` into a new `rows × cols` buffer.
///
/// Cells outside the centered footprint stay `Empty`, and so do cells whose
/// sampled pixel has zero alpha.
pub fn rasterize_to<S: SourceImage + ?Sized>(
    source: &S,
    rows: usize,
    cols: usize,
) -> Result<PixelBuffer> {
    let fit = ImageFit::new(source.width(), source.height(), rows, cols)?;
    let mut buffer = PixelBuffer::new(rows, cols)?;

    for row in 0..rows {
        for col in 0..cols {
            if let Some((sx, sy)) = fit.source_pixel(col, row) {
                let [r, g, b, a] = source.sample(sx, sy);
                buffer.set(row, col, CellColor::rgba(r, g, b, a))?;
            }
        }
    }

    Ok(buffer)
}
