//! Editor facade
//!
//! Wires the document, highlighter, viewport, gutter, runner, and output
//! view together and enforces the unsaved-changes protocol. The window
//! shell above this only draws frames and forwards decisions.

use crate::coordinates::{DocPos, Viewport};
use crate::document::{Buffer, Document, Edit, EditDelta};
use crate::gutter::{Gutter, GutterLayout};
use crate::history::History;
use crate::io::{self, FileError};
use crate::runner::{RunEvent, RunnerError, ScriptRunner};
use crate::syntax::Highlighter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// The user's answer to the unsaved-changes prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveChoice {
    /// Save, then proceed
    Save,
    /// Proceed without saving
    Discard,
    /// Abort the triggering action entirely
    Cancel,
}

/// Outcome of an action gated on the unsaved-changes prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Started,
    Cancelled,
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    File(#[from] FileError),
    #[error("the document has no file path yet")]
    NoPath,
    #[error(transparent)]
    Runner(#[from] RunnerError),
}

/// Kind of an output view entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Stdout,
    Stderr,
    /// Run lifecycle notices, shown dimmed
    Notice,
}

#[derive(Clone, Debug)]
pub struct OutputEntry {
    pub kind: OutputKind,
    pub text: String,
}

/// Read-only, append-only log fed by the runner
#[derive(Default)]
pub struct OutputView {
    entries: Vec<OutputEntry>,
}

impl OutputView {
    pub fn entries(&self) -> &[OutputEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn append(&mut self, kind: OutputKind, text: String) {
        self.entries.push(OutputEntry { kind, text });
    }
}

/// Undo/redo unit: buffer snapshot plus cursor and dirty flag
#[derive(Clone)]
struct EditorSnapshot {
    buffer: Arc<Buffer>,
    cursor: DocPos,
    modified: bool,
}

const FONT_STEP: f32 = 2.0;
const FONT_MIN: f32 = 6.0;
const FONT_MAX: f32 = 72.0;

/// The editor: one document, its highlight state, and its run bridge
pub struct Editor {
    doc: Document,
    highlighter: Highlighter,
    pub viewport: Viewport,
    pub gutter: Gutter,
    runner: ScriptRunner,
    output: OutputView,
    history: History<EditorSnapshot>,
    cursor: DocPos,
    path: Option<PathBuf>,
    modified: bool,
    read_only: bool,
}

impl Editor {
    /// Empty, untitled document
    pub fn new() -> Self {
        Self::from_text("", None)
    }

    fn from_text(text: &str, path: Option<PathBuf>) -> Self {
        let doc = Document::from_str(text);
        let mut highlighter = Highlighter::new_python();
        highlighter.rebuild(&doc.read());
        Self {
            doc,
            highlighter,
            viewport: Viewport::new(800.0, 600.0),
            gutter: Gutter::default(),
            runner: ScriptRunner::new(),
            output: OutputView::default(),
            history: History::new(),
            cursor: DocPos::default(),
            path,
            modified: false,
            read_only: false,
        }
    }

    // === Accessors ===

    pub fn buffer(&self) -> Arc<Buffer> {
        self.doc.read()
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn output(&self) -> &OutputView {
        &self.output
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_running(&self) -> bool {
        self.runner.is_running()
    }

    pub fn cursor(&self) -> DocPos {
        self.cursor
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Window title fragment: file name or Untitled, with a dirty marker
    pub fn display_name(&self) -> String {
        let name = self
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Untitled.py".to_string());
        if self.modified {
            format!("{name}*")
        } else {
            name
        }
    }

    // === Editing ===

    /// Apply one edit: document, highlight state, cursor, history
    pub fn edit(&mut self, edit: Edit) -> EditDelta {
        if self.read_only {
            return EditDelta {
                first_line: 0,
                removed: 0,
                inserted: 0,
            };
        }
        self.history.checkpoint(self.snapshot());

        let cursor_target = match &edit {
            Edit::Insert { pos, text } => pos + text.len(),
            Edit::Delete { range } => range.start,
            Edit::Replace { range, text } => range.start + text.len(),
        };

        let delta = self.doc.edit(edit);
        let buffer = self.doc.read();
        let recomputed = self.highlighter.apply_edit(&buffer, &delta);
        debug!(
            first_line = delta.first_line,
            recomputed, "rehighlighted after edit"
        );

        let (line, column) = buffer.locate(cursor_target);
        self.set_cursor(DocPos {
            line: line as u32,
            column: column as u32,
        });
        self.modified = true;
        delta
    }

    /// Insert text at the cursor
    pub fn insert_at_cursor(&mut self, text: &str) -> EditDelta {
        let buffer = self.doc.read();
        let pos = buffer.line_start(self.cursor.line as usize) + self.cursor.column as usize;
        self.edit(Edit::Insert {
            pos,
            text: text.to_string(),
        })
    }

    /// Move the cursor, clamped to the document, scrolling it into view
    pub fn set_cursor(&mut self, pos: DocPos) {
        let buffer = self.doc.read();
        let line = (pos.line as usize).min(buffer.line_count() - 1);
        let column = (pos.column as usize).min(buffer.line(line).len());
        self.cursor = DocPos {
            line: line as u32,
            column: column as u32,
        };
        let layout = self.viewport.doc_to_layout(self.cursor, buffer.line(line));
        self.viewport.ensure_visible(layout);
    }

    fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            buffer: self.doc.read(),
            cursor: self.cursor,
            modified: self.modified,
        }
    }

    fn restore(&mut self, snapshot: EditorSnapshot) {
        self.doc.restore(&snapshot.buffer);
        self.highlighter.rebuild(&self.doc.read());
        self.cursor = snapshot.cursor;
        self.modified = snapshot.modified;
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.snapshot()) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.snapshot()) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    // === Gutter ===

    /// Gutter layout for the current frame
    pub fn gutter_layout(&self) -> GutterLayout {
        let buffer = self.doc.read();
        self.gutter.layout(
            &self.viewport,
            buffer.line_count() as u32,
            self.cursor.line,
            self.read_only,
        )
    }

    // === Font stepping ===

    pub fn increase_font_size(&mut self) {
        let size = (self.viewport.metrics.font_size + FONT_STEP).min(FONT_MAX);
        self.viewport.metrics.set_font_size(size);
    }

    pub fn decrease_font_size(&mut self) {
        let size = (self.viewport.metrics.font_size - FONT_STEP).max(FONT_MIN);
        self.viewport.metrics.set_font_size(size);
    }

    // === File operations ===

    /// Resolve an unsaved-changes prompt. Returns false when the caller
    /// must abort the triggering action.
    fn resolve_unsaved(&mut self, choice: SaveChoice) -> Result<bool, EditorError> {
        if !self.modified {
            return Ok(true);
        }
        match choice {
            SaveChoice::Save => {
                self.save()?;
                Ok(true)
            }
            SaveChoice::Discard => Ok(true),
            SaveChoice::Cancel => Ok(false),
        }
    }

    /// Replace with an empty untitled document
    pub fn new_file(&mut self, choice: SaveChoice) -> Result<bool, EditorError> {
        if !self.resolve_unsaved(choice)? {
            return Ok(false);
        }
        self.doc.replace_all("");
        self.highlighter.rebuild(&self.doc.read());
        self.history.clear();
        self.cursor = DocPos::default();
        self.path = None;
        self.modified = false;
        Ok(true)
    }

    /// Open a file, replacing the current document
    pub fn open(&mut self, path: &Path, choice: SaveChoice) -> Result<bool, EditorError> {
        if !self.resolve_unsaved(choice)? {
            return Ok(false);
        }
        let text = io::load(path)?;
        self.doc.replace_all(&text);
        self.highlighter.rebuild(&self.doc.read());
        self.history.clear();
        self.cursor = DocPos::default();
        self.viewport.scroll = Default::default();
        self.path = Some(path.to_path_buf());
        self.modified = false;
        info!(path = %path.display(), "opened");
        Ok(true)
    }

    /// Save to the current path
    pub fn save(&mut self) -> Result<(), EditorError> {
        let path = self.path.clone().ok_or(EditorError::NoPath)?;
        io::save(&path, &self.doc.read().text())?;
        self.modified = false;
        Ok(())
    }

    /// Save under a new path
    pub fn save_as(&mut self, path: &Path) -> Result<(), EditorError> {
        self.path = Some(path.to_path_buf());
        self.save()
    }

    /// Resolve the unsaved-changes prompt for closing the window.
    /// Returns false when the close must be aborted.
    pub fn close(&mut self, choice: SaveChoice) -> Result<bool, EditorError> {
        self.resolve_unsaved(choice)
    }

    // === Running ===

    /// Run the saved file through an interpreter
    ///
    /// With unsaved changes the caller passes the user's three-way
    /// decision; `Cancel` aborts with no side effects. Only one run may
    /// be outstanding.
    pub fn run_script(
        &mut self,
        interpreter: &Path,
        choice: SaveChoice,
    ) -> Result<RunStatus, EditorError> {
        if self.runner.is_running() {
            return Err(RunnerError::Busy.into());
        }
        if self.modified || self.path.is_none() {
            match choice {
                SaveChoice::Cancel => return Ok(RunStatus::Cancelled),
                SaveChoice::Save => self.save()?,
                SaveChoice::Discard => {}
            }
        }
        let path = self.path.clone().ok_or(EditorError::NoPath)?;

        self.output.clear();
        self.output.append(
            OutputKind::Notice,
            format!("--- Running {} ---", path.display()),
        );
        self.runner.run(interpreter, &path)?;
        Ok(RunStatus::Started)
    }

    fn apply_run_event(&mut self, event: RunEvent) -> bool {
        match event {
            RunEvent::Stdout(text) => self.output.append(OutputKind::Stdout, text),
            RunEvent::Stderr(text) => self.output.append(OutputKind::Stderr, text),
            RunEvent::Finished { success } => {
                self.output.append(
                    OutputKind::Notice,
                    format!(
                        "--- Execution Finished{} ---",
                        if success { "" } else { " (with errors)" }
                    ),
                );
                return true;
            }
        }
        false
    }

    /// Marshal pending run output into the output view
    ///
    /// Called from the UI thread; returns true when the run finished.
    pub fn pump_output(&mut self) -> bool {
        let mut finished = false;
        for event in self.runner.try_events() {
            finished |= self.apply_run_event(event);
        }
        finished
    }

    /// Block for the next run event, for shells without an event loop
    pub fn wait_output(&mut self, timeout: std::time::Duration) -> bool {
        match self.runner.recv_timeout(timeout) {
            Some(event) => self.apply_run_event(event),
            None => false,
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
