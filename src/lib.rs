//! pyrite - a Python source editor core
//!
//! Line buffer, incremental syntax highlighting, line-number gutter,
//! and a one-shot interpreter bridge. The window shell lives elsewhere.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod coordinates; // Coordinate system abstraction
pub mod document;
pub mod editor;
pub mod gutter;
pub mod history;
pub mod io;
pub mod render;
pub mod runner;
pub mod style;
pub mod syntax;
pub mod theme;

// Re-export core types
pub use document::{Buffer, Document, Edit, EditDelta};
pub use editor::{Editor, EditorError, OutputKind, RunStatus, SaveChoice};
pub use gutter::{Gutter, GutterLayout};
pub use history::History;
pub use runner::{RunEvent, RunnerError, ScriptRunner};
pub use style::{StyleBuffer, StyleSpan, StyleTag};
pub use syntax::{CarryState, Highlighter, RuleSet};
pub use theme::{Theme, Themes};
