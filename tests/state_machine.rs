//! Property tests for the highlight state machine and incremental driver

use proptest::prelude::*;
use pyrite::{CarryState, Document, Edit, Highlighter};

/// ASCII soup biased toward the characters the state machine cares about
const LINE_CHARS: &str = "[ a-z0-9'\"#=():\\n]{0,120}";

proptest! {
    /// Lines without triple quotes never enter multi-line mode
    #[test]
    fn no_spurious_multiline_entry(text in "[ a-z0-9#=():\\n]{0,120}") {
        let doc = Document::from_str(&text);
        let mut hl = Highlighter::new_python();
        hl.rebuild(&doc.read());
        for i in 0..doc.read().line_count() {
            prop_assert_eq!(hl.carry_out(i), CarryState::Clean);
        }
    }

    /// The carry-state chain holds after a full rebuild
    #[test]
    fn chain_invariant_after_rebuild(text in LINE_CHARS) {
        let doc = Document::from_str(&text);
        let mut hl = Highlighter::new_python();
        hl.rebuild(&doc.read());
        prop_assert!(hl.chain_is_consistent());
        prop_assert_eq!(hl.carry_in(0), CarryState::Clean);
    }

    /// Recomputing an unchanged document changes nothing
    #[test]
    fn rebuild_is_idempotent(text in LINE_CHARS) {
        let doc = Document::from_str(&text);
        let buffer = doc.read();

        let mut first = Highlighter::new_python();
        first.rebuild(&buffer);
        let mut second = Highlighter::new_python();
        second.rebuild(&buffer);

        for i in 0..buffer.line_count() {
            prop_assert_eq!(first.spans(i), second.spans(i));
            prop_assert_eq!(first.carry_out(i), second.carry_out(i));
        }
    }

    /// Incremental recomputation converges to exactly the full result
    #[test]
    fn incremental_matches_full_rebuild(
        text in LINE_CHARS,
        edits in prop::collection::vec((any::<u16>(), "[ a-z'\"#=()\\n]{0,12}"), 1..6),
    ) {
        let doc = Document::from_str(&text);
        let mut incremental = Highlighter::new_python();
        incremental.rebuild(&doc.read());

        for (raw_pos, insert) in edits {
            let len = doc.read().text().len();
            let pos = raw_pos as usize % (len + 1);
            let delta = doc.edit(Edit::Insert { pos, text: insert });
            incremental.apply_edit(&doc.read(), &delta);
        }

        let buffer = doc.read();
        let mut full = Highlighter::new_python();
        full.rebuild(&buffer);

        prop_assert!(incremental.chain_is_consistent());
        prop_assert_eq!(incremental.line_count(), buffer.line_count());
        for i in 0..buffer.line_count() {
            prop_assert_eq!(incremental.spans(i), full.spans(i), "line {}", i);
            prop_assert_eq!(incremental.carry_out(i), full.carry_out(i), "line {}", i);
        }
    }

    /// Deletions propagate the same way insertions do
    #[test]
    fn incremental_matches_full_after_deletes(
        text in "[ a-z'\"#=()\\n]{1,120}",
        cuts in prop::collection::vec((any::<u16>(), 1u8..8), 1..4),
    ) {
        let doc = Document::from_str(&text);
        let mut incremental = Highlighter::new_python();
        incremental.rebuild(&doc.read());

        for (raw_pos, raw_len) in cuts {
            let len = doc.read().text().len();
            if len == 0 {
                break;
            }
            let start = raw_pos as usize % len;
            let end = (start + raw_len as usize).min(len);
            let delta = doc.edit(Edit::Delete { range: start..end });
            incremental.apply_edit(&doc.read(), &delta);
        }

        let buffer = doc.read();
        let mut full = Highlighter::new_python();
        full.rebuild(&buffer);

        prop_assert!(incremental.chain_is_consistent());
        for i in 0..buffer.line_count() {
            prop_assert_eq!(incremental.spans(i), full.spans(i), "line {}", i);
            prop_assert_eq!(incremental.carry_out(i), full.carry_out(i), "line {}", i);
        }
    }
}
