use crate::color::CellColor;
use crate::error::{EditorError, Result};

// ============================================================================
// PIXEL BUFFER — rows × cols grid of cell colors, flat row-major storage
// ============================================================================

/// The editable grid.
///
/// Storage is a single `Vec` of `rows * cols` cells, so every row has the same
/// length and no cell is ever left uninitialized. `Clone` is a deep copy: a
/// cloned buffer shares nothing with its source, which is what history
/// snapshots rely on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    rows: usize,
    cols: usize,
    cells: Vec<CellColor>,
}

impl PixelBuffer {
    // ---- construction -------------------------------------------------------

    /// Create a grid with every cell `Empty`.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::new_filled(rows, cols, CellColor::Empty)
    }

    pub fn new_filled(rows: usize, cols: usize, color: CellColor) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .filter(|&n| rows > 0 && cols > 0 && n > 0)
            .ok_or(EditorError::InvalidDimension { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![color; len],
        })
    }

    /// Build from nested rows. Every row must have the same non-zero length.
    pub fn from_rows(rows: Vec<Vec<CellColor>>) -> Result<Self> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        if row_count == 0 || cols == 0 || rows.iter().any(|r| r.len() != cols) {
            return Err(EditorError::InvalidDimension { rows: row_count, cols });
        }
        Ok(Self {
            rows: row_count,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    // ---- access -------------------------------------------------------------

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[CellColor] {
        &self.cells
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[CellColor]> {
        self.cells.chunks_exact(self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<CellColor> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx])
    }

    /// Overwrite one cell in place. Does not touch history.
    pub fn set(&mut self, row: usize, col: usize, color: CellColor) -> Result<()> {
        let idx = self.index(row, col)?;
        self.cells[idx] = color;
        Ok(())
    }

    pub fn fill(&mut self, color: CellColor) {
        self.cells.fill(color);
    }

    /// True when every cell is `Empty`.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(EditorError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }
}
