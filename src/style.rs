//! Style tags and the per-line overlay buffer
//!
//! Highlighting is an ordered sequence of style writes over one slot per
//! byte; whatever wrote a slot last wins. Spans are only materialized at
//! the end by coalescing runs of equal tags.

use std::ops::Range;

/// Token classes the highlighter can produce
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleTag {
    Keyword,
    Builtin,
    SelfParam,
    String,
    Comment,
    Number,
    /// Identifier immediately followed by `(`
    Call,
    /// Identifier following `class `
    ClassName,
    /// Identifier following `def `
    FunctionName,
}

/// A styled region of one line, in byte offsets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleSpan {
    pub start: usize,
    pub len: usize,
    pub tag: StyleTag,
}

impl StyleSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// One style slot per byte of a line
///
/// Rule passes paint ranges in registration order; overlapping writes
/// overwrite. Slots between multi-byte code point boundaries are painted
/// together because every producer emits ranges on char boundaries.
pub struct StyleBuffer {
    slots: Vec<Option<StyleTag>>,
}

impl StyleBuffer {
    /// Create an unstyled buffer for a line of `len` bytes
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Paint a byte range with a tag, overwriting previous writes
    pub fn paint(&mut self, range: Range<usize>, tag: StyleTag) {
        let end = range.end.min(self.slots.len());
        for slot in &mut self.slots[range.start.min(end)..end] {
            *slot = Some(tag);
        }
    }

    /// Tag at a byte offset, if any
    pub fn tag_at(&self, offset: usize) -> Option<StyleTag> {
        self.slots.get(offset).copied().flatten()
    }

    /// Coalesce slot runs into spans
    pub fn spans(&self) -> Vec<StyleSpan> {
        let mut spans = Vec::new();
        let mut current: Option<StyleSpan> = None;

        for (i, slot) in self.slots.iter().enumerate() {
            match (slot, &mut current) {
                (Some(tag), Some(span)) if span.tag == *tag => span.len += 1,
                (Some(tag), _) => {
                    if let Some(span) = current.take() {
                        spans.push(span);
                    }
                    current = Some(StyleSpan {
                        start: i,
                        len: 1,
                        tag: *tag,
                    });
                }
                (None, _) => {
                    if let Some(span) = current.take() {
                        spans.push(span);
                    }
                }
            }
        }

        if let Some(span) = current {
            spans.push(span);
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_and_coalesce() {
        let mut buf = StyleBuffer::new(10);
        buf.paint(0..3, StyleTag::Keyword);
        buf.paint(5..8, StyleTag::Number);

        let spans = buf.spans();
        assert_eq!(
            spans,
            vec![
                StyleSpan {
                    start: 0,
                    len: 3,
                    tag: StyleTag::Keyword
                },
                StyleSpan {
                    start: 5,
                    len: 3,
                    tag: StyleTag::Number
                },
            ]
        );
    }

    #[test]
    fn test_last_write_wins() {
        let mut buf = StyleBuffer::new(6);
        buf.paint(0..6, StyleTag::String);
        buf.paint(2..4, StyleTag::Comment);

        let spans = buf.spans();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].tag, StyleTag::String);
        assert_eq!(spans[1].tag, StyleTag::Comment);
        assert_eq!(spans[1].range(), 2..4);
        assert_eq!(spans[2].tag, StyleTag::String);
        assert_eq!(spans[2].range(), 4..6);
    }

    #[test]
    fn test_adjacent_equal_tags_merge() {
        let mut buf = StyleBuffer::new(4);
        buf.paint(0..2, StyleTag::String);
        buf.paint(2..4, StyleTag::String);
        assert_eq!(
            buf.spans(),
            vec![StyleSpan {
                start: 0,
                len: 4,
                tag: StyleTag::String
            }]
        );
    }

    #[test]
    fn test_out_of_range_paint_is_clamped() {
        let mut buf = StyleBuffer::new(3);
        buf.paint(1..10, StyleTag::Comment);
        assert_eq!(
            buf.spans(),
            vec![StyleSpan {
                start: 1,
                len: 2,
                tag: StyleTag::Comment
            }]
        );
    }

    #[test]
    fn test_empty_line() {
        let buf = StyleBuffer::new(0);
        assert!(buf.spans().is_empty());
    }
}
