//! Line-number gutter layout
//!
//! Pure geometry: maps the viewport's visible line range to right-aligned
//! numeric labels in a reserved left margin, plus the full-width highlight
//! band behind the cursor line. The caller re-invokes `layout` on scroll,
//! resize, line-count change, and cursor movement.

use crate::coordinates::{TextMetrics, ViewPos, ViewRect, Viewport};

/// One line-number label, positioned in view space
#[derive(Clone, Debug, PartialEq)]
pub struct GutterLabel {
    /// Line index (0-based)
    pub line: u32,
    /// Display text (1-based number)
    pub text: String,
    /// Top-left of the label in view space
    pub pos: ViewPos,
}

/// Everything needed to paint the gutter for one frame
#[derive(Clone, Debug)]
pub struct GutterLayout {
    /// Reserved margin width in logical pixels
    pub width: f32,
    /// Gutter background rect
    pub background: ViewRect,
    /// Labels for the visible lines
    pub labels: Vec<GutterLabel>,
    /// Full-width band behind the cursor line; None when read-only
    pub current_line: Option<ViewRect>,
}

/// Gutter configuration
#[derive(Clone, Copy, Debug)]
pub struct Gutter {
    /// Fixed padding added to the digit columns
    pub padding: f32,
    /// Gap between the last digit and the text area
    pub right_inset: f32,
}

impl Default for Gutter {
    fn default() -> Self {
        Self {
            padding: 10.0,
            right_inset: 5.0,
        }
    }
}

impl Gutter {
    /// Decimal digits needed for the largest line number
    pub fn digits_for(line_count: u32) -> u32 {
        let mut digits = 1;
        let mut count = line_count.max(1);
        while count >= 10 {
            count /= 10;
            digits += 1;
        }
        digits
    }

    /// Margin width: fixed padding plus one advance per digit
    ///
    /// Recomputed whenever the total line count changes, so growing from
    /// 9 to 10 lines widens the gutter by one digit.
    pub fn width(&self, metrics: &TextMetrics, line_count: u32) -> f32 {
        self.padding + metrics.advance_width * Self::digits_for(line_count) as f32
    }

    /// Lay out the gutter for the current viewport
    pub fn layout(
        &self,
        viewport: &Viewport,
        line_count: u32,
        cursor_line: u32,
        read_only: bool,
    ) -> GutterLayout {
        let metrics = &viewport.metrics;
        let width = self.width(metrics, line_count);
        let view_height = viewport.logical_size.height;

        let background = ViewRect {
            x: 0.0,
            y: 0.0,
            width,
            height: view_height,
        };

        let mut labels = Vec::new();
        let visible = viewport.visible_lines();
        for line in visible.start..visible.end.min(line_count) {
            let y = line as f32 * metrics.line_height - viewport.scroll.y;
            if y + metrics.line_height <= 0.0 || y >= view_height {
                continue;
            }
            let text = (line + 1).to_string();
            let text_width = text.len() as f32 * metrics.advance_width;
            labels.push(GutterLabel {
                line,
                text,
                pos: ViewPos {
                    x: width - self.right_inset - text_width,
                    y,
                },
            });
        }

        // Highlight band behind the cursor line, across the text area
        let current_line = (!read_only && cursor_line < line_count).then(|| ViewRect {
            x: width,
            y: cursor_line as f32 * metrics.line_height - viewport.scroll.y,
            width: (viewport.logical_size.width - width).max(0.0),
            height: metrics.line_height,
        });

        GutterLayout {
            width,
            background,
            labels,
            current_line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_count() {
        assert_eq!(Gutter::digits_for(0), 1); // empty documents still show "1"
        assert_eq!(Gutter::digits_for(1), 1);
        assert_eq!(Gutter::digits_for(9), 1);
        assert_eq!(Gutter::digits_for(10), 2);
        assert_eq!(Gutter::digits_for(99), 2);
        assert_eq!(Gutter::digits_for(100), 3);
        assert_eq!(Gutter::digits_for(1000), 4);
    }

    #[test]
    fn test_width_grows_at_ten_lines() {
        let gutter = Gutter::default();
        let metrics = TextMetrics::new(14.0);

        let nine = gutter.width(&metrics, 9);
        let ten = gutter.width(&metrics, 10);
        assert!((ten - nine - metrics.advance_width).abs() < 1e-3);
        assert_eq!(nine, gutter.padding + metrics.advance_width);
        assert_eq!(ten, gutter.padding + 2.0 * metrics.advance_width);
    }

    #[test]
    fn test_labels_are_one_based_and_right_aligned() {
        let gutter = Gutter::default();
        let viewport = Viewport::new(800.0, 600.0);
        let layout = gutter.layout(&viewport, 12, 0, false);

        assert_eq!(layout.labels[0].text, "1");
        assert_eq!(layout.labels[9].text, "10");
        // Shorter numbers start further right
        assert!(layout.labels[0].pos.x > layout.labels[9].pos.x);
        // Right edges line up
        let metrics = &viewport.metrics;
        let right = |l: &GutterLabel| l.pos.x + l.text.len() as f32 * metrics.advance_width;
        assert!((right(&layout.labels[0]) - right(&layout.labels[9])).abs() < 1e-3);
        assert!((right(&layout.labels[0]) - (layout.width - gutter.right_inset)).abs() < 1e-3);
    }

    #[test]
    fn test_labels_follow_scroll() {
        let gutter = Gutter::default();
        let mut viewport = Viewport::new(800.0, 600.0);
        viewport.scroll.y = 20.0 * viewport.metrics.line_height;

        let layout = gutter.layout(&viewport, 100, 25, false);
        assert_eq!(layout.labels[0].line, 20);
        assert_eq!(layout.labels[0].text, "21");
        assert_eq!(layout.labels[0].pos.y, 0.0);
    }

    #[test]
    fn test_labels_stop_at_line_count() {
        let gutter = Gutter::default();
        let viewport = Viewport::new(800.0, 600.0);
        let layout = gutter.layout(&viewport, 3, 0, false);
        assert_eq!(layout.labels.len(), 3);
        assert_eq!(layout.labels.last().map(|l| l.text.as_str()), Some("3"));
    }

    #[test]
    fn test_current_line_band() {
        let gutter = Gutter::default();
        let viewport = Viewport::new(800.0, 600.0);

        let layout = gutter.layout(&viewport, 10, 4, false);
        let band = layout.current_line.expect("band when editable");
        assert_eq!(band.y, 4.0 * viewport.metrics.line_height);
        assert_eq!(band.x, layout.width);
        assert_eq!(band.width, 800.0 - layout.width);
        assert_eq!(band.height, viewport.metrics.line_height);

        // Disabled for read-only views
        let layout = gutter.layout(&viewport, 10, 4, true);
        assert!(layout.current_line.is_none());
    }
}
