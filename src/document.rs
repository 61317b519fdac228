//! Line-based document with RCU snapshots
//!
//! Readers get immutable `Arc<Buffer>` snapshots (lock-free); each edit
//! installs a new snapshot. Lines are `Arc<str>`, so a snapshot clone is a
//! pointer-copy per line and untouched lines are shared between versions.

use arc_swap::ArcSwap;
use memchr::memchr_iter;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Edit operations, byte-offset addressed over the whole document text
///
/// Offsets must lie on char boundaries (cursor positions and rule matches
/// always do).
#[derive(Clone, Debug)]
pub enum Edit {
    Insert { pos: usize, text: String },
    Delete { range: Range<usize> },
    Replace { range: Range<usize>, text: String },
}

/// Which line window an edit touched, for incremental rehighlighting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditDelta {
    /// First affected line index
    pub first_line: usize,
    /// Lines removed from the old buffer (>= 1, the touched window)
    pub removed: usize,
    /// Lines the window became (>= 1)
    pub inserted: usize,
}

/// Immutable snapshot of the line sequence
///
/// Lines are stored without their trailing `\n`; `text()` joins them back
/// so that load -> snapshot -> save round-trips byte-identically.
#[derive(Clone)]
pub struct Buffer {
    lines: Vec<Arc<str>>,
    version: u64,
}

impl Buffer {
    /// Build a snapshot from raw text
    pub fn from_str(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut lines = Vec::with_capacity(bytecount::count(bytes, b'\n') + 1);
        let mut start = 0;
        for nl in memchr_iter(b'\n', bytes) {
            lines.push(Arc::from(&text[start..nl]));
            start = nl + 1;
        }
        lines.push(Arc::from(&text[start..]));
        Self { lines, version: 0 }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of lines (always >= 1; an empty document is one empty line)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of one line, without its newline
    pub fn line(&self, index: usize) -> &str {
        &self.lines[index]
    }

    /// Total text length in bytes, newlines included
    pub fn len_bytes(&self) -> usize {
        let content: usize = self.lines.iter().map(|l| l.len()).sum();
        content + self.lines.len() - 1
    }

    /// Full document text
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.len_bytes());
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line);
        }
        out
    }

    /// Byte offset of the start of a line
    pub fn line_start(&self, index: usize) -> usize {
        self.lines[..index].iter().map(|l| l.len() + 1).sum()
    }

    /// Map a document byte offset to (line, byte-in-line)
    ///
    /// A line's terminating newline maps to (line, line_len). Offsets past
    /// the end clamp to the end of the last line.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let mut pos = 0;
        for (i, line) in self.lines.iter().enumerate() {
            let end = pos + line.len();
            if offset <= end {
                return (i, offset - pos);
            }
            pos = end + 1;
        }
        let last = self.lines.len() - 1;
        (last, self.lines[last].len())
    }

    /// Apply one edit, producing the next snapshot and the touched window
    fn apply(&self, edit: &Edit, next_version: u64) -> (Buffer, EditDelta) {
        let (range, text) = match edit {
            Edit::Insert { pos, text } => (*pos..*pos, text.as_str()),
            Edit::Delete { range } => (range.clone(), ""),
            Edit::Replace { range, text } => (range.clone(), text.as_str()),
        };
        let (first, col_start) = self.locate(range.start);
        let (last, col_end) = self.locate(range.end.max(range.start));

        // Merge the touched window into one string, splice the new lines in
        let prefix = &self.lines[first][..col_start];
        let suffix = &self.lines[last][col_end..];
        let mut merged = String::with_capacity(prefix.len() + text.len() + suffix.len());
        merged.push_str(prefix);
        merged.push_str(text);
        merged.push_str(suffix);

        let window = Buffer::from_str(&merged).lines;
        let inserted = window.len();

        let mut lines = self.lines.clone();
        lines.splice(first..=last, window);

        (
            Buffer {
                lines,
                version: next_version,
            },
            EditDelta {
                first_line: first,
                removed: last - first + 1,
                inserted,
            },
        )
    }
}

/// The document - readers get immutable snapshots, edits swap in new ones
pub struct Document {
    /// Current immutable snapshot for readers (lock-free)
    snapshot: ArcSwap<Buffer>,
    /// Monotonic version counter
    version: AtomicU64,
}

impl Document {
    /// Create empty document
    pub fn new() -> Self {
        Self::from_str("")
    }

    /// Create document from text
    pub fn from_str(text: &str) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Buffer::from_str(text)),
            version: AtomicU64::new(0),
        }
    }

    /// Get current immutable snapshot (lock-free)
    pub fn read(&self) -> Arc<Buffer> {
        self.snapshot.load_full()
    }

    /// Apply an edit and publish the next snapshot
    pub fn edit(&self, edit: Edit) -> EditDelta {
        let current = self.snapshot.load();
        let next_version = self.version.fetch_add(1, Ordering::Relaxed) + 1;
        let (next, delta) = current.apply(&edit, next_version);
        self.snapshot.store(Arc::new(next));
        delta
    }

    /// Replace the whole content (open, undo/redo restore)
    pub fn replace_all(&self, text: &str) {
        let next_version = self.version.fetch_add(1, Ordering::Relaxed) + 1;
        let mut buffer = Buffer::from_str(text);
        buffer.version = next_version;
        self.snapshot.store(Arc::new(buffer));
    }

    /// Restore a previously captured snapshot (undo/redo)
    pub fn restore(&self, buffer: &Buffer) {
        let next_version = self.version.fetch_add(1, Ordering::Relaxed) + 1;
        let mut restored = buffer.clone();
        restored.version = next_version;
        self.snapshot.store(Arc::new(restored));
    }

    /// Get current version
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Relaxed)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
