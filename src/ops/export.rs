// ============================================================================
// EXPORT — grid → scaled RGBA bitmap (one solid block per cell)
// ============================================================================

use image::RgbaImage;
use rayon::prelude::*;

use crate::canvas::PixelBuffer;
use crate::error::{EditorError, Result};

/// Upscaling factor used when the caller does not pick one.
pub const DEFAULT_EXPORT_SCALE: u32 = 20;

/// Largest exported width or height in pixels (1 GiB of RGBA at most).
pub const MAX_EXPORT_SIDE: u32 = 16_384;

/// Paint every cell of `buffer` as a `scale × scale` block.
///
/// The result is `(cols * scale) × (rows * scale)` straight RGBA with a row
/// stride of `width * 4` bytes. `Empty` cells are written as fully transparent
/// pixels. Pure: the buffer is only read.
///
/// Fails with `InvalidDimension` for a zero scale or when either side would
/// exceed [`MAX_EXPORT_SIDE`].
pub fn export_bitmap(buffer: &PixelBuffer, scale: u32) -> Result<RgbaImage> {
    let (rows, cols) = buffer.dimensions();
    let too_big = || EditorError::InvalidDimension { rows, cols };
    if scale == 0 {
        return Err(too_big());
    }

    let side = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|n| n.checked_mul(scale))
            .filter(|&px| px <= MAX_EXPORT_SIDE)
            .ok_or_else(too_big)
    };
    let width = side(cols)?;
    let height = side(rows)?;

    let mut out = RgbaImage::new(width, height);
    let row_bytes = width as usize * 4;
    let scale = scale as usize;

    out.par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let cells = &buffer.cells()[(y / scale) * cols..(y / scale + 1) * cols];
            for (col, cell) in cells.iter().enumerate() {
                let px = cell.to_pixel().0;
                let start = col * scale * 4;
                for block in dst_row[start..start + scale * 4].chunks_exact_mut(4) {
                    block.copy_from_slice(&px);
                }
            }
        });

    Ok(out)
}

/// Bytes per output row.
pub fn row_stride(bitmap: &RgbaImage) -> usize {
    bitmap.width() as usize * 4
}
