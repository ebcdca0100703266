use crate::canvas::PixelBuffer;
use crate::color::CellColor;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Draw,
    Erase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Drawing,
}

// ============================================================================
// GESTURE CONTROLLER — pointer-down … pointer-up is one undo unit
// ============================================================================

/// Applies cell edits to the live buffer during a stroke.
///
/// Edits go straight into the buffer with no history traffic; the owner
/// commits once when [`GestureController::pointer_up`] reports that the
/// stroke touched at least one cell.
#[derive(Clone, Debug)]
pub struct GestureController {
    pub active_tool: Tool,
    pub active_color: CellColor,
    state: GestureState,
    last_cell: Option<(usize, usize)>,
    touched: usize,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(CellColor::BLACK)
    }
}

impl GestureController {
    pub fn new(active_color: CellColor) -> Self {
        Self {
            active_tool: Tool::Draw,
            active_color,
            state: GestureState::Idle,
            last_cell: None,
            touched: 0,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == GestureState::Drawing
    }

    /// Number of cell edits applied during the current stroke.
    pub fn touched_cells(&self) -> usize {
        self.touched
    }

    /// Color written by the active tool (`Empty` for the eraser).
    pub fn paint_color(&self) -> CellColor {
        match self.active_tool {
            Tool::Draw => self.active_color,
            Tool::Erase => CellColor::Empty,
        }
    }

    /// Start a stroke (or continue the current one) and edit `(row, col)`.
    /// An out-of-range cell is reported and leaves the state unchanged.
    pub fn pointer_down(&mut self, buffer: &mut PixelBuffer, row: usize, col: usize) -> Result<()> {
        buffer.set(row, col, self.paint_color())?;
        if self.state == GestureState::Idle {
            self.touched = 0;
        }
        self.state = GestureState::Drawing;
        self.last_cell = Some((row, col));
        self.touched += 1;
        Ok(())
    }

    /// Edit `(row, col)` if a stroke is active and the pointer entered a new cell.
    pub fn pointer_move(&mut self, buffer: &mut PixelBuffer, row: usize, col: usize) -> Result<()> {
        if self.state != GestureState::Drawing || self.last_cell == Some((row, col)) {
            return Ok(());
        }
        buffer.set(row, col, self.paint_color())?;
        self.last_cell = Some((row, col));
        self.touched += 1;
        Ok(())
    }

    /// End the stroke. Returns `true` when the caller should commit.
    pub fn pointer_up(&mut self) -> bool {
        let commit = self.state == GestureState::Drawing && self.touched > 0;
        self.cancel();
        commit
    }

    /// Pointer left the grid: same contract as releasing it.
    pub fn pointer_leave(&mut self) -> bool {
        self.pointer_up()
    }

    /// Drop the stroke without asking for a commit.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
        self.last_cell = None;
        self.touched = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;

    #[test]
    fn stroke_edits_cells_and_requests_one_commit() {
        let red = CellColor::opaque(255, 0, 0);
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        let mut gesture = GestureController::new(red);

        gesture.pointer_down(&mut buf, 0, 0).unwrap();
        gesture.pointer_move(&mut buf, 0, 1).unwrap();
        gesture.pointer_move(&mut buf, 1, 1).unwrap();
        assert!(gesture.is_drawing());
        assert_eq!(gesture.touched_cells(), 3);
        assert_eq!(buf.get(1, 1).unwrap(), red);

        assert!(gesture.pointer_up());
        assert_eq!(gesture.state(), GestureState::Idle);
        assert!(!gesture.pointer_up());
    }

    #[test]
    fn move_without_press_does_nothing() {
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        let mut gesture = GestureController::default();
        gesture.pointer_move(&mut buf, 2, 2).unwrap();
        assert!(buf.is_blank());
        assert!(!gesture.pointer_leave());
    }

    #[test]
    fn repeated_move_over_same_cell_counts_once() {
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        let mut gesture = GestureController::default();
        gesture.pointer_down(&mut buf, 1, 1).unwrap();
        gesture.pointer_move(&mut buf, 1, 1).unwrap();
        gesture.pointer_move(&mut buf, 1, 1).unwrap();
        assert_eq!(gesture.touched_cells(), 1);
    }

    #[test]
    fn erase_writes_empty() {
        let mut buf = PixelBuffer::new_filled(2, 2, CellColor::WHITE).unwrap();
        let mut gesture = GestureController::default();
        gesture.active_tool = Tool::Erase;
        gesture.pointer_down(&mut buf, 0, 1).unwrap();
        assert_eq!(buf.get(0, 1).unwrap(), CellColor::Empty);
        assert_eq!(buf.get(0, 0).unwrap(), CellColor::WHITE);
    }

    #[test]
    fn out_of_bounds_press_stays_idle() {
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        let mut gesture = GestureController::default();
        let err = gesture.pointer_down(&mut buf, 4, 0).unwrap_err();
        assert!(matches!(err, EditorError::OutOfBounds { .. }));
        assert!(!gesture.is_drawing());
        assert!(!gesture.pointer_up());
    }
}
