//! Python syntax highlighting: ordered rule overlay plus the
//! triple-quoted-string state machine
//!
//! Each line is highlighted independently given one piece of carried-over
//! state: whether the previous line ended inside an unterminated
//! triple-quoted string, and with which delimiter. The incremental driver
//! propagates that state forward only until it stops changing.

use crate::document::{Buffer, EditDelta};
use crate::style::{StyleBuffer, StyleSpan, StyleTag};
use lazy_static::lazy_static;
use memchr::memmem;
use regex::Regex;
use std::sync::Arc;

const SINGLE_DELIM: &[u8] = b"'''";
const DOUBLE_DELIM: &[u8] = b"\"\"\"";

/// Multi-line string scanner state carried from one line to the next
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CarryState {
    /// Not inside a multi-line string
    Clean = 0,
    /// Inside an unterminated `'''...'''`
    InSingleQuoted = 1,
    /// Inside an unterminated `"""..."""`
    InDoubleQuoted = 2,
}

impl CarryState {
    fn delimiter(self) -> Option<&'static [u8]> {
        match self {
            CarryState::Clean => None,
            CarryState::InSingleQuoted => Some(SINGLE_DELIM),
            CarryState::InDoubleQuoted => Some(DOUBLE_DELIM),
        }
    }
}

const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "False", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "None",
    "nonlocal", "not", "or", "pass", "raise", "return", "True", "try", "while", "with", "yield",
];

const BUILTINS: &[&str] = &[
    "abs", "all", "any", "ascii", "bin", "bool", "bytearray", "bytes", "callable", "chr",
    "classmethod", "compile", "complex", "delattr", "dict", "dir", "divmod", "enumerate", "eval",
    "exec", "filter", "float", "format", "frozenset", "getattr", "globals", "hasattr", "hash",
    "help", "hex", "id", "input", "int", "isinstance", "issubclass", "iter", "len", "list",
    "locals", "map", "max", "memoryview", "min", "next", "object", "oct", "open", "ord", "pow",
    "print", "property", "range", "repr", "reversed", "round", "set", "setattr", "slice",
    "sorted", "staticmethod", "str", "sum", "super", "tuple", "type", "vars", "zip",
];

/// One highlighting rule: a pattern, the capture group that carries the
/// span (0 = whole match), and the tag it paints
struct HighlightRule {
    pattern: Regex,
    group: usize,
    tag: StyleTag,
}

/// Ordered rule table, fixed at construction
///
/// Registration order is load-bearing: overlapping matches resolve by
/// whichever rule painted last.
pub struct RuleSet {
    rules: Vec<HighlightRule>,
}

impl RuleSet {
    /// Rule table for Python source
    ///
    /// The identifier-after-`def`/`class` and identifier-before-paren
    /// rules use capture groups instead of lookaround, which this engine
    /// does not support; the produced spans are identical.
    pub fn python() -> Self {
        let mut set = Self { rules: Vec::new() };
        set.add(&format!(r"\b(?:{})\b", KEYWORDS.join("|")), 0, StyleTag::Keyword);
        set.add(&format!(r"\b(?:{})\b", BUILTINS.join("|")), 0, StyleTag::Builtin);
        set.add(r"\bself\b", 0, StyleTag::SelfParam);
        set.add(r#"".*?""#, 0, StyleTag::String);
        set.add(r"'.*?'", 0, StyleTag::String);
        set.add(r"#[^\n]*", 0, StyleTag::Comment);
        set.add(r"\b[0-9]+\.?[0-9]*\b", 0, StyleTag::Number);
        set.add(r"\b([A-Za-z0-9_]+)\(", 1, StyleTag::Call);
        set.add(r"class\s([A-Za-z0-9_]+)", 1, StyleTag::ClassName);
        set.add(r"def\s([A-Za-z0-9_]+)", 1, StyleTag::FunctionName);
        set
    }

    fn add(&mut self, pattern: &str, group: usize, tag: StyleTag) {
        self.rules.push(HighlightRule {
            pattern: Regex::new(pattern).expect("invalid built-in highlight pattern"),
            group,
            tag,
        });
    }

    /// Highlight one line given its incoming carry-state
    ///
    /// Pure and total: always yields a (possibly empty) span set and the
    /// outgoing state for the next line.
    pub fn highlight_line(&self, text: &str, incoming: CarryState) -> (Vec<StyleSpan>, CarryState) {
        let mut buf = StyleBuffer::new(text.len());

        // Single-line rules first, in registration order
        for rule in &self.rules {
            if rule.group == 0 {
                for m in rule.pattern.find_iter(text) {
                    buf.paint(m.range(), rule.tag);
                }
            } else {
                for caps in rule.pattern.captures_iter(text) {
                    if let Some(m) = caps.get(rule.group) {
                        buf.paint(m.range(), rule.tag);
                    }
                }
            }
        }

        // Multi-line strings overlay (and override) the rule spans
        let outgoing = scan_triple_quoted(text, incoming, &mut buf);
        (buf.spans(), outgoing)
    }
}

/// Triple-quoted string state machine for one line
///
/// Paints the string regions into `buf` and returns the outgoing state.
fn scan_triple_quoted(text: &str, incoming: CarryState, buf: &mut StyleBuffer) -> CarryState {
    let bytes = text.as_bytes();
    let mut pos = 0;

    // Continue a string carried over from the previous line
    if let Some(delim) = incoming.delimiter() {
        match memmem::find(bytes, delim) {
            None => {
                // Does not close here: the whole line is string
                buf.paint(0..bytes.len(), StyleTag::String);
                return incoming;
            }
            Some(end) => {
                buf.paint(0..end + 3, StyleTag::String);
                pos = end + 3;
            }
        }
    }

    // Scan the rest of the line for newly opening strings; a single line
    // may open and close several independent ones
    loop {
        let single = memmem::find(&bytes[pos..], SINGLE_DELIM).map(|i| i + pos);
        let double = memmem::find(&bytes[pos..], DOUBLE_DELIM).map(|i| i + pos);

        let (start, delim, state) = match (single, double) {
            (None, None) => break,
            (Some(s), None) => (s, SINGLE_DELIM, CarryState::InSingleQuoted),
            (None, Some(d)) => (d, DOUBLE_DELIM, CarryState::InDoubleQuoted),
            (Some(s), Some(d)) if s < d => (s, SINGLE_DELIM, CarryState::InSingleQuoted),
            (Some(_), Some(d)) => (d, DOUBLE_DELIM, CarryState::InDoubleQuoted),
        };

        // Closing delimiter must not overlap the opener
        match memmem::find(&bytes[start + 3..], delim) {
            None => {
                buf.paint(start..bytes.len(), StyleTag::String);
                return state;
            }
            Some(off) => {
                let end = start + 3 + off + 3;
                buf.paint(start..end, StyleTag::String);
                pos = end;
            }
        }
    }

    CarryState::Clean
}

lazy_static! {
    static ref PYTHON_RULES: RuleSet = RuleSet::python();
}

/// Cached highlight result for one line
#[derive(Clone)]
struct LineHighlight {
    carry_in: CarryState,
    carry_out: CarryState,
    spans: Arc<[StyleSpan]>,
}

impl LineHighlight {
    fn placeholder() -> Self {
        Self {
            carry_in: CarryState::Clean,
            carry_out: CarryState::Clean,
            spans: Arc::from([]),
        }
    }
}

/// Incremental highlighter: per-line carry-state table plus cached spans
///
/// Invariant: `lines[i + 1].carry_in == lines[i].carry_out` and
/// `lines[0].carry_in == Clean`, restored after every edit by bounded
/// forward propagation.
pub struct Highlighter {
    rules: &'static RuleSet,
    lines: Vec<LineHighlight>,
}

impl Highlighter {
    /// Create a highlighter for Python source
    pub fn new_python() -> Self {
        Self {
            rules: &PYTHON_RULES,
            lines: Vec::new(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Cached spans for a line (empty if out of range)
    pub fn spans(&self, line: usize) -> &[StyleSpan] {
        self.lines.get(line).map(|l| &*l.spans).unwrap_or(&[])
    }

    pub fn carry_in(&self, line: usize) -> CarryState {
        self.lines
            .get(line)
            .map(|l| l.carry_in)
            .unwrap_or(CarryState::Clean)
    }

    pub fn carry_out(&self, line: usize) -> CarryState {
        self.lines
            .get(line)
            .map(|l| l.carry_out)
            .unwrap_or(CarryState::Clean)
    }

    /// Recompute every line from scratch (document load, undo/redo)
    pub fn rebuild(&mut self, buffer: &Buffer) {
        self.lines.clear();
        self.lines.reserve(buffer.line_count());
        let mut carry = CarryState::Clean;
        for i in 0..buffer.line_count() {
            let (spans, out) = self.rules.highlight_line(buffer.line(i), carry);
            self.lines.push(LineHighlight {
                carry_in: carry,
                carry_out: out,
                spans: spans.into(),
            });
            carry = out;
        }
    }

    /// Update after an edit: recompute the edited window, then propagate
    /// forward until a line's incoming state is unchanged (fixed point)
    /// or the document ends. Returns the number of lines recomputed.
    pub fn apply_edit(&mut self, buffer: &Buffer, delta: &EditDelta) -> usize {
        let first = delta.first_line;
        let window_end = (first + delta.removed).min(self.lines.len());
        if first > self.lines.len() {
            // Table out of sync with the buffer; start over
            self.rebuild(buffer);
            return self.lines.len();
        }
        self.lines.splice(
            first..window_end,
            (0..delta.inserted).map(|_| LineHighlight::placeholder()),
        );
        if self.lines.len() != buffer.line_count() {
            // Table drifted from the buffer (e.g. never built); start over
            self.rebuild(buffer);
            return self.lines.len();
        }

        let mut carry = if first == 0 {
            CarryState::Clean
        } else {
            self.lines[first - 1].carry_out
        };
        let mut recomputed = 0;
        let mut i = first;

        // Edited lines always recompute
        while i < first + delta.inserted {
            carry = self.recompute_line(buffer, i, carry);
            recomputed += 1;
            i += 1;
        }

        // Downstream lines only while their incoming state actually changes
        while i < self.lines.len() && self.lines[i].carry_in != carry {
            carry = self.recompute_line(buffer, i, carry);
            recomputed += 1;
            i += 1;
        }

        recomputed
    }

    fn recompute_line(&mut self, buffer: &Buffer, line: usize, carry_in: CarryState) -> CarryState {
        let (spans, carry_out) = self.rules.highlight_line(buffer.line(line), carry_in);
        self.lines[line] = LineHighlight {
            carry_in,
            carry_out,
            spans: spans.into(),
        };
        carry_out
    }

    /// Verify the carry-state chain (test support)
    pub fn chain_is_consistent(&self) -> bool {
        let mut carry = CarryState::Clean;
        for line in &self.lines {
            if line.carry_in != carry {
                return false;
            }
            carry = line.carry_out;
        }
        true
    }
}
