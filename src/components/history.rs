use crate::canvas::PixelBuffer;

// ============================================================================
// HISTORY MANAGER — linear snapshot log with a movable cursor
// ============================================================================

/// Undo/redo history made of whole-grid snapshots.
///
/// `snapshots[cursor]` always equals the buffer currently shown. Committing
/// while the cursor is behind the newest entry prunes the redo branch, so the
/// history stays linear.
pub struct HistoryManager {
    snapshots: Vec<PixelBuffer>,
    cursor: usize,
    /// Maximum number of entries kept (0 = unlimited).
    max_history_size: usize,
}

impl HistoryManager {
    pub fn new(initial: &PixelBuffer) -> Self {
        Self::with_limit(initial, 0)
    }

    pub fn with_limit(initial: &PixelBuffer, max_history_size: usize) -> Self {
        Self {
            snapshots: vec![initial.clone()],
            cursor: 0,
            max_history_size,
        }
    }

    /// Discard every entry and start over from `initial`.
    pub fn reset(&mut self, initial: &PixelBuffer) {
        self.snapshots.clear();
        self.snapshots.push(initial.clone());
        self.cursor = 0;
    }

    /// Append a copy of `buffer` after the cursor, dropping any redo entries.
    pub fn commit(&mut self, buffer: &PixelBuffer) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(buffer.clone());
        self.prune();
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one entry. `None` when already at the oldest state.
    pub fn undo(&mut self) -> Option<PixelBuffer> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.snapshots[self.cursor].clone())
    }

    /// Step forward one entry. `None` when already at the newest state.
    pub fn redo(&mut self) -> Option<PixelBuffer> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.snapshots[self.cursor].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> &PixelBuffer {
        &self.snapshots[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    pub fn redo_count(&self) -> usize {
        self.snapshots.len() - 1 - self.cursor
    }

    /// Drop the oldest entries to stay within `max_history_size`.
    fn prune(&mut self) {
        if self.max_history_size == 0 || self.snapshots.len() <= self.max_history_size {
            return;
        }
        let excess = self.snapshots.len() - self.max_history_size;
        self.snapshots.drain(..excess);
    }
}
