//! Frame building
//!
//! Flattens one frame into ordered paint ops: chrome rects first, then
//! gutter labels, then styled text runs for the visible lines. A shell
//! replays the ops with whatever drawing API it has.

use crate::coordinates::{ViewPos, ViewRect};
use crate::editor::Editor;
use crate::style::{StyleSpan, StyleTag};
use crate::theme::Theme;
use std::ops::Range;

/// One drawing command, in view space
#[derive(Clone, Debug)]
pub enum PaintOp {
    /// Filled rectangle
    Rect { rect: ViewRect, color: u32 },
    /// Text run at a position
    Text {
        pos: ViewPos,
        text: String,
        color: u32,
        bold: bool,
        italic: bool,
    },
}

/// All paint ops for one frame, in z-order
pub struct Frame {
    pub ops: Vec<PaintOp>,
}

/// Split a line into styled and unstyled segments, in order
fn segments(len: usize, spans: &[StyleSpan]) -> Vec<(Range<usize>, Option<StyleTag>)> {
    let mut out = Vec::new();
    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            out.push((cursor..span.start, None));
        }
        out.push((span.range(), Some(span.tag)));
        cursor = span.start + span.len;
    }
    if cursor < len {
        out.push((cursor..len, None));
    }
    out
}

/// Build the frame for the editor's current state
pub fn build_frame(editor: &Editor, theme: &Theme) -> Frame {
    let viewport = &editor.viewport;
    let metrics = &viewport.metrics;
    let buffer = editor.buffer();
    let gutter = editor.gutter_layout();

    let mut ops = Vec::new();

    // Chrome: editor background, cursor-line band, gutter strip
    ops.push(PaintOp::Rect {
        rect: ViewRect {
            x: 0.0,
            y: 0.0,
            width: viewport.logical_size.width,
            height: viewport.logical_size.height,
        },
        color: theme.chrome.background,
    });
    if let Some(band) = gutter.current_line {
        ops.push(PaintOp::Rect {
            rect: band,
            color: theme.chrome.current_line,
        });
    }
    ops.push(PaintOp::Rect {
        rect: gutter.background,
        color: theme.chrome.gutter_background,
    });
    for label in &gutter.labels {
        ops.push(PaintOp::Text {
            pos: label.pos,
            text: label.text.clone(),
            color: theme.chrome.gutter_foreground,
            bold: false,
            italic: false,
        });
    }

    // Visible text, one run per style segment
    let visible = viewport.visible_lines();
    for line in visible.start..visible.end.min(buffer.line_count() as u32) {
        let text = buffer.line(line as usize);
        let y = line as f32 * metrics.line_height - viewport.scroll.y;
        let spans = editor.highlighter().spans(line as usize);

        for (range, tag) in segments(text.len(), spans) {
            let run = &text[range.clone()];
            if run.is_empty() {
                continue;
            }
            let column = metrics.byte_to_column(text, range.start);
            let (color, bold, italic) = match tag {
                Some(tag) => {
                    let style = theme.token(tag);
                    (style.color, style.bold, style.italic)
                }
                None => (theme.chrome.foreground, false, false),
            };
            ops.push(PaintOp::Text {
                pos: ViewPos {
                    x: gutter.width + metrics.column_to_x(column) - viewport.scroll.x,
                    y,
                },
                text: run.to_string(),
                color,
                bold,
                italic,
            });
        }
    }

    Frame { ops }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Themes;

    #[test]
    fn test_segments_cover_gaps() {
        let spans = vec![
            StyleSpan {
                start: 2,
                len: 3,
                tag: StyleTag::Number,
            },
            StyleSpan {
                start: 7,
                len: 1,
                tag: StyleTag::Comment,
            },
        ];
        let segs = segments(10, &spans);
        assert_eq!(segs.len(), 5);
        assert_eq!(segs[0], (0..2, None));
        assert_eq!(segs[1], (2..5, Some(StyleTag::Number)));
        assert_eq!(segs[4], (8..10, None));
    }

    #[test]
    fn test_frame_z_order_and_styles() {
        let mut editor = Editor::new();
        editor.insert_at_cursor("x = 1  # note");
        let theme = Themes::dark();
        let frame = build_frame(&editor, &theme);

        // Background first
        assert!(matches!(
            frame.ops[0],
            PaintOp::Rect { color, .. } if color == theme.chrome.background
        ));

        // Gutter shows "1"
        assert!(frame.ops.iter().any(|op| matches!(
            op,
            PaintOp::Text { text, color, .. }
                if text == "1" && *color == theme.chrome.gutter_foreground
        )));

        // The number literal is painted in the number color
        assert!(frame.ops.iter().any(|op| matches!(
            op,
            PaintOp::Text { text, color, .. }
                if text == "1" && *color == theme.token(StyleTag::Number).color
        )));

        // Comment run, italic
        assert!(frame.ops.iter().any(|op| matches!(
            op,
            PaintOp::Text { text, italic, .. } if text == "# note" && *italic
        )));
    }

    #[test]
    fn test_current_line_band_in_frame() {
        let mut editor = Editor::new();
        editor.insert_at_cursor("a\nb");
        let theme = Themes::dark();
        let frame = build_frame(&editor, &theme);
        assert!(frame.ops.iter().any(|op| matches!(
            op,
            PaintOp::Rect { color, .. } if *color == theme.chrome.current_line
        )));
    }
}
