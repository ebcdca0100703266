// ============================================================================
// EDITOR — the single grid engine every view drives
// ============================================================================

use image::RgbaImage;
use uuid::Uuid;

use crate::canvas::PixelBuffer;
use crate::color::CellColor;
use crate::components::history::HistoryManager;
use crate::components::palette::PaletteTracker;
use crate::components::tools::{GestureController, Tool};
use crate::error::{EditorError, Result};
use crate::ops::export::export_bitmap;
use crate::ops::rasterize::{SourceImage, rasterize};
use crate::settings::EditorSettings;
use crate::{log_err, log_info, log_warn};

/// Handle for an image import started with [`Editor::begin_import`].
///
/// Captures the grid size current when the import began; the result is
/// applied at that size or discarded if the grid was resized meanwhile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportTicket {
    pub id: Uuid,
    pub grid_size: usize,
    generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Rasterized and committed as one history entry.
    Applied,
    /// The grid was resized after the ticket was issued; nothing changed.
    Discarded,
}

pub struct Editor {
    pub id: Uuid,
    grid_size: usize,
    /// Bumped on every grid-size change; stale import tickets compare against it.
    generation: u64,
    buffer: PixelBuffer,
    history: HistoryManager,
    palette: PaletteTracker,
    gesture: GestureController,
    settings: EditorSettings,
}

impl Editor {
    /// Fails with `InvalidDimension` when `settings` do not describe a usable
    /// grid-size range; see [`EditorSettings::validate`].
    pub fn new(settings: EditorSettings) -> Result<Self> {
        settings.validate()?;
        let grid_size = settings.default_grid_size;
        let buffer = PixelBuffer::new(grid_size, grid_size)?;
        Ok(Self {
            id: Uuid::new_v4(),
            grid_size,
            generation: 0,
            history: HistoryManager::with_limit(&buffer, settings.max_undo_steps),
            palette: PaletteTracker::from_buffer(&buffer),
            gesture: GestureController::new(settings.default_color),
            buffer,
            settings,
        })
    }

    // ---- state queries ------------------------------------------------------

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// The live buffer (includes edits of a stroke still in progress).
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn palette(&self) -> &[CellColor] {
        self.palette.colors()
    }

    pub fn palette_hex(&self) -> Vec<String> {
        self.palette.hex_codes()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn tool(&self) -> Tool {
        self.gesture.active_tool
    }

    pub fn color(&self) -> CellColor {
        self.gesture.active_color
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_drawing()
    }

    // ---- grid size ----------------------------------------------------------

    /// Reinitialize to an all-`Empty` `size × size` grid with a one-entry
    /// history. Requesting the current size changes nothing.
    pub fn set_grid_size(&mut self, size: usize) -> Result<()> {
        if size < self.settings.min_grid_size || size > self.settings.max_grid_size {
            return Err(EditorError::InvalidDimension { rows: size, cols: size });
        }
        if size == self.grid_size {
            return Ok(());
        }
        let buffer = PixelBuffer::new(size, size)?;
        self.gesture.cancel();
        self.history.reset(&buffer);
        self.buffer = buffer;
        self.grid_size = size;
        self.generation += 1;
        self.palette.recompute(&self.buffer);
        log_info!("Grid resized to {}x{} (history cleared)", size, size);
        Ok(())
    }

    // ---- drawing ------------------------------------------------------------

    pub fn set_tool(&mut self, tool: Tool) {
        self.gesture.active_tool = tool;
    }

    pub fn set_color(&mut self, color: CellColor) {
        self.gesture.active_color = color;
    }

    pub fn pointer_down(&mut self, row: usize, col: usize) -> Result<()> {
        self.gesture.pointer_down(&mut self.buffer, row, col)
    }

    pub fn pointer_move(&mut self, row: usize, col: usize) -> Result<()> {
        self.gesture.pointer_move(&mut self.buffer, row, col)
    }

    /// Finish the stroke; commits when it touched any cell.
    pub fn pointer_up(&mut self) {
        if self.gesture.pointer_up() {
            self.commit();
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.gesture.pointer_leave() {
            self.commit();
        }
    }

    // ---- history ------------------------------------------------------------

    /// Returns `false` when already at the oldest state.
    pub fn undo(&mut self) -> bool {
        self.pointer_up();
        match self.history.undo() {
            Some(buffer) => {
                self.buffer = buffer;
                self.palette.recompute(&self.buffer);
                true
            }
            None => false,
        }
    }

    /// Returns `false` when already at the newest state.
    pub fn redo(&mut self) -> bool {
        self.pointer_up();
        match self.history.redo() {
            Some(buffer) => {
                self.buffer = buffer;
                self.palette.recompute(&self.buffer);
                true
            }
            None => false,
        }
    }

    /// Blank every cell as a single undoable step.
    pub fn clear(&mut self) {
        self.pointer_up();
        self.buffer.fill(CellColor::Empty);
        self.commit();
        log_info!("Grid cleared");
    }

    fn commit(&mut self) {
        self.history.commit(&self.buffer);
        self.palette.recompute(&self.buffer);
    }

    // ---- import -------------------------------------------------------------

    /// Start an import at the current grid size. Decode the image, then hand
    /// it to [`Editor::complete_import`] with this ticket.
    pub fn begin_import(&self) -> ImportTicket {
        ImportTicket {
            id: Uuid::new_v4(),
            grid_size: self.grid_size,
            generation: self.generation,
        }
    }

    /// Rasterize `source` at the ticket's grid size and commit it.
    ///
    /// On error the buffer and history are left untouched.
    pub fn complete_import<S: SourceImage + ?Sized>(
        &mut self,
        ticket: ImportTicket,
        source: &S,
    ) -> Result<ImportOutcome> {
        // Any resize bumps the generation, so a matching generation also
        // means `ticket.grid_size` is still the live size.
        if ticket.generation != self.generation {
            log_warn!(
                "Import {} discarded: grid was {old}x{old} when it began, resized since (now {new}x{new})",
                ticket.id,
                old = ticket.grid_size,
                new = self.grid_size
            );
            return Ok(ImportOutcome::Discarded);
        }

        let buffer = rasterize(source, ticket.grid_size).inspect_err(|e| {
            log_err!("Import {} failed: {}", ticket.id, e);
        })?;

        self.pointer_up();
        self.buffer = buffer;
        self.commit();
        log_info!(
            "Imported {}x{} image into {}x{} grid ({} colors)",
            source.width(),
            source.height(),
            ticket.grid_size,
            ticket.grid_size,
            self.palette.len()
        );
        Ok(ImportOutcome::Applied)
    }

    /// Import an already-decoded image at the current grid size.
    pub fn import<S: SourceImage + ?Sized>(&mut self, source: &S) -> Result<ImportOutcome> {
        let ticket = self.begin_import();
        self.complete_import(ticket, source)
    }

    // ---- export -------------------------------------------------------------

    pub fn export(&self, scale: u32) -> Result<RgbaImage> {
        let bitmap = export_bitmap(&self.buffer, scale)?;
        log_info!(
            "Exported {}x{} grid at scale {} ({}x{} px)",
            self.buffer.cols(),
            self.buffer.rows(),
            scale,
            bitmap.width(),
            bitmap.height()
        );
        Ok(bitmap)
    }

    /// Export at the configured scale.
    pub fn export_default(&self) -> Result<RgbaImage> {
        self.export(self.settings.export_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn editor() -> Editor {
        Editor::new(EditorSettings::default()).unwrap()
    }

    fn red() -> CellColor {
        CellColor::opaque(255, 0, 0)
    }

    fn stroke(editor: &mut Editor, cells: &[(usize, usize)]) {
        let (first, rest) = cells.split_first().unwrap();
        editor.pointer_down(first.0, first.1).unwrap();
        for &(r, c) in rest {
            editor.pointer_move(r, c).unwrap();
        }
        editor.pointer_up();
    }

    #[test]
    fn starts_blank_at_default_size() {
        let editor = editor();
        assert_eq!(editor.grid_size(), 16);
        assert!(editor.buffer().is_blank());
        assert_eq!(editor.history().len(), 1);
        assert!(editor.palette().is_empty());
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
    }

    #[test]
    fn whole_stroke_is_one_undo_step() {
        let mut editor = editor();
        editor.set_color(red());
        stroke(&mut editor, &[(0, 0), (0, 1), (0, 2), (1, 2)]);
        assert_eq!(editor.history().len(), 2);
        assert_eq!(editor.palette_hex(), vec!["#ff0000".to_string()]);

        assert!(editor.undo());
        assert!(editor.buffer().is_blank());
        assert!(editor.palette().is_empty());
        assert!(!editor.undo());
    }

    #[test]
    fn moves_do_not_commit_until_release() {
        let mut editor = editor();
        editor.pointer_down(2, 2).unwrap();
        editor.pointer_move(2, 3).unwrap();
        assert_eq!(editor.history().len(), 1);
        assert_eq!(editor.buffer().get(2, 3).unwrap(), CellColor::BLACK);
        editor.pointer_leave();
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn erase_stroke_restores_empty() {
        let mut editor = editor();
        stroke(&mut editor, &[(3, 3)]);
        editor.set_tool(Tool::Erase);
        stroke(&mut editor, &[(3, 3)]);
        assert!(editor.buffer().is_blank());
        assert_eq!(editor.history().len(), 3);
    }

    #[test]
    fn resize_discards_history() {
        let mut editor = editor();
        stroke(&mut editor, &[(0, 0)]);
        editor.set_grid_size(32).unwrap();
        assert_eq!(editor.buffer().dimensions(), (32, 32));
        assert!(editor.buffer().is_blank());
        assert_eq!(editor.history().len(), 1);
        assert!(editor.palette().is_empty());
    }

    #[test]
    fn resize_outside_range_is_rejected() {
        let mut editor = editor();
        assert!(matches!(
            editor.set_grid_size(7),
            Err(EditorError::InvalidDimension { .. })
        ));
        assert!(editor.set_grid_size(101).is_err());
        assert_eq!(editor.grid_size(), 16);
    }

    #[test]
    fn same_size_request_keeps_history() {
        let mut editor = editor();
        stroke(&mut editor, &[(0, 0)]);
        editor.set_grid_size(16).unwrap();
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn clear_is_undoable() {
        let mut editor = editor();
        stroke(&mut editor, &[(1, 1)]);
        editor.clear();
        assert!(editor.buffer().is_blank());
        assert_eq!(editor.history().len(), 3);
        assert!(editor.undo());
        assert_eq!(editor.buffer().get(1, 1).unwrap(), CellColor::BLACK);
    }

    #[test]
    fn import_commits_one_entry() {
        let mut editor = editor();
        editor.set_grid_size(20).unwrap();
        let src = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]));
        assert_eq!(editor.import(&src).unwrap(), ImportOutcome::Applied);
        assert_eq!(editor.history().len(), 2);
        assert!(editor.buffer().cells().iter().all(|c| !c.is_empty()));
        assert_eq!(editor.palette_hex(), vec!["#0000ff".to_string()]);
    }

    #[test]
    fn stale_import_is_discarded() {
        let mut editor = editor();
        let ticket = editor.begin_import();
        editor.set_grid_size(24).unwrap();
        let src = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        assert_eq!(
            editor.complete_import(ticket, &src).unwrap(),
            ImportOutcome::Discarded
        );
        assert!(editor.buffer().is_blank());
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn import_is_discarded_after_resize_round_trip() {
        let mut editor = editor();
        let ticket = editor.begin_import();
        editor.set_grid_size(24).unwrap();
        editor.set_grid_size(16).unwrap();
        assert_eq!(editor.grid_size(), ticket.grid_size);

        let src = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        assert_eq!(
            editor.complete_import(ticket, &src).unwrap(),
            ImportOutcome::Discarded
        );
        assert!(editor.buffer().is_blank());
        assert_eq!(editor.history().len(), 1);

        // A fresh ticket at the restored size goes through.
        let ticket = editor.begin_import();
        assert_eq!(
            editor.complete_import(ticket, &src).unwrap(),
            ImportOutcome::Applied
        );
    }

    #[test]
    fn out_of_range_default_size_is_rejected() {
        let settings = EditorSettings {
            default_grid_size: 500,
            ..EditorSettings::default()
        };
        assert!(matches!(
            Editor::new(settings),
            Err(EditorError::InvalidDimension { rows: 500, cols: 500 })
        ));

        let inverted = EditorSettings {
            min_grid_size: 50,
            max_grid_size: 10,
            default_grid_size: 20,
            ..EditorSettings::default()
        };
        assert!(Editor::new(inverted).is_err());

        let zero_min = EditorSettings {
            min_grid_size: 0,
            default_grid_size: 0,
            ..EditorSettings::default()
        };
        assert!(Editor::new(zero_min).is_err());
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let mut editor = editor();
        stroke(&mut editor, &[(0, 0)]);
        let before = editor.buffer().clone();
        let src = RgbaImage::new(0, 0);
        assert!(matches!(editor.import(&src), Err(EditorError::InvalidImage(_))));
        assert_eq!(editor.buffer(), &before);
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn import_during_stroke_commits_stroke_first() {
        let mut editor = editor();
        editor.pointer_down(0, 0).unwrap();
        let src = RgbaImage::from_pixel(16, 16, Rgba([9, 9, 9, 255]));
        editor.import(&src).unwrap();
        assert!(!editor.is_drawing());
        assert_eq!(editor.history().len(), 3);
        assert!(editor.undo());
        assert_eq!(editor.buffer().get(0, 0).unwrap(), CellColor::BLACK);
    }

    #[test]
    fn export_reads_live_buffer() {
        let mut editor = editor();
        editor.set_grid_size(8).unwrap();
        stroke(&mut editor, &[(0, 0)]);
        let img = editor.export(2).unwrap();
        assert_eq!(img.dimensions(), (16, 16));
        assert_eq!(*img.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(2, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(editor.export_default().unwrap().dimensions(), (160, 160));
    }
}
