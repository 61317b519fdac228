//! Generic history management for undo/redo
//!
//! Provides a reusable history stack for any cloneable type

/// Generic history tracker for undo/redo operations
pub struct History<T> {
    /// Undo stack
    undo: Vec<T>,
    /// Redo stack
    redo: Vec<T>,
    /// Maximum history size
    max_size: usize,
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::with_max_size(100)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_size,
        }
    }

    /// Save checkpoint for undo
    pub fn checkpoint(&mut self, item: T) {
        self.undo.push(item);
        self.redo.clear(); // Clear redo on new edit

        // Limit history size
        if self.undo.len() > self.max_size {
            self.undo.remove(0);
        }
    }

    /// Undo last operation
    pub fn undo(&mut self, current: T) -> Option<T> {
        if let Some(previous) = self.undo.pop() {
            self.redo.push(current);
            Some(previous)
        } else {
            None
        }
    }

    /// Redo last undone operation
    pub fn redo(&mut self, current: T) -> Option<T> {
        if let Some(next) = self.redo.pop() {
            self.undo.push(current);
            Some(next)
        } else {
            None
        }
    }

    /// Clear history
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Check if undo available
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo available
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Get current undo stack depth
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
