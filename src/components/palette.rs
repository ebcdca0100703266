use std::collections::HashSet;

use crate::canvas::PixelBuffer;
use crate::color::CellColor;

/// Distinct non-empty colors present in a buffer, in order of first
/// appearance (row-major scan).
///
/// Always recomputed from scratch: grids are at most a few thousand cells.
#[derive(Default, Debug, Clone)]
pub struct PaletteTracker {
    colors: Vec<CellColor>,
}

impl PaletteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        let mut tracker = Self::new();
        tracker.recompute(buffer);
        tracker
    }

    pub fn recompute(&mut self, buffer: &PixelBuffer) {
        let mut seen = HashSet::new();
        self.colors.clear();
        for &cell in buffer.cells() {
            if !cell.is_empty() && seen.insert(cell) {
                self.colors.push(cell);
            }
        }
    }

    pub fn colors(&self) -> &[CellColor] {
        &self.colors
    }

    /// Canonical hex strings for display.
    pub fn hex_codes(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_buffer_has_no_colors() {
        let buf = PixelBuffer::new(5, 5).unwrap();
        assert!(PaletteTracker::from_buffer(&buf).is_empty());
    }

    #[test]
    fn same_color_twice_is_listed_once() {
        let red = CellColor::opaque(255, 0, 0);
        let mut buf = PixelBuffer::new(5, 5).unwrap();
        buf.set(0, 0, red).unwrap();
        let mut tracker = PaletteTracker::from_buffer(&buf);
        assert_eq!(tracker.hex_codes(), vec!["#ff0000".to_string()]);

        buf.set(4, 4, "rgba(255, 0, 0, 1)".parse().unwrap()).unwrap();
        tracker.recompute(&buf);
        assert_eq!(tracker.colors(), &[red]);
    }

    #[test]
    fn order_follows_first_occurrence() {
        let blue = CellColor::opaque(0, 0, 255);
        let green = CellColor::opaque(0, 255, 0);
        let mut buf = PixelBuffer::new(2, 2).unwrap();
        buf.set(1, 1, green).unwrap();
        buf.set(0, 1, blue).unwrap();
        buf.set(1, 0, green).unwrap();
        let tracker = PaletteTracker::from_buffer(&buf);
        assert_eq!(tracker.colors(), &[blue, green]);
    }

    #[test]
    fn recompute_drops_erased_colors() {
        let mut buf = PixelBuffer::new(2, 2).unwrap();
        buf.set(0, 0, CellColor::BLACK).unwrap();
        let mut tracker = PaletteTracker::from_buffer(&buf);
        assert_eq!(tracker.len(), 1);
        buf.set(0, 0, CellColor::Empty).unwrap();
        tracker.recompute(&buf);
        assert!(tracker.is_empty());
    }
}
