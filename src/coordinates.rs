//! Coordinate system transformation hub - THE single source of truth
//!
//! Three distinct coordinate spaces with explicit transformations:
//! 1. Document space: lines and byte columns (what the editor manipulates)
//! 2. Layout space: logical pixels, pre-scroll (where content lives)
//! 3. View space: logical pixels, post-scroll (what's visible)

// === Document Space ===

/// Position in document (text/editing operations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocPos {
    /// Line number (0-indexed)
    pub line: u32,
    /// Byte offset within the line
    pub column: u32,
}

// === Layout Space (pre-scroll) ===

/// Position in layout space - where things are before scrolling
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutPos {
    pub x: f32,
    pub y: f32,
}

/// Size in layout space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSize {
    pub width: f32,
    pub height: f32,
}

/// Rectangle in layout space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

// === View Space (post-scroll) ===

/// Position in view space - layout minus scroll offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPos {
    pub x: f32,
    pub y: f32,
}

/// Rectangle in view space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

// === Text Metrics (single source of truth) ===

/// All text measurement configuration in one place
///
/// Monospace approximation: every advance derives from the font size, so
/// changing the size re-derives line height and glyph advances together.
#[derive(Clone)]
pub struct TextMetrics {
    /// Base font size in logical pixels
    pub font_size: f32,
    /// Line height in logical pixels
    pub line_height: f32,
    /// Advance of one monospace cell in logical pixels
    pub advance_width: f32,
    /// Number of spaces per tab
    pub tab_stops: u32,
}

impl TextMetrics {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            line_height: font_size * 1.4, // Standard line height multiplier
            advance_width: font_size * 0.6, // Approximate for monospace
            tab_stops: 4,
        }
    }

    /// Change the font size, re-deriving the dependent metrics
    pub fn set_font_size(&mut self, font_size: f32) {
        *self = Self {
            tab_stops: self.tab_stops,
            ..Self::new(font_size)
        };
    }

    /// Get tab width in logical pixels
    pub fn tab_width(&self) -> f32 {
        self.advance_width * self.tab_stops as f32
    }

    /// Calculate visual column for a byte position in a line
    pub fn byte_to_column(&self, line_text: &str, byte_in_line: usize) -> u32 {
        let mut column = 0;
        let mut byte_pos = 0;

        for ch in line_text.chars() {
            if byte_pos >= byte_in_line {
                break;
            }
            if ch == '\t' {
                // Tab advances to next tab stop
                column = ((column / self.tab_stops) + 1) * self.tab_stops;
            } else {
                column += 1;
            }
            byte_pos += ch.len_utf8();
        }
        column
    }

    /// Calculate x position for a visual column
    pub fn column_to_x(&self, column: u32) -> f32 {
        column as f32 * self.advance_width
    }
}

// === THE Viewport - Central transformation hub ===

/// Manages scroll state and the layout <-> view transformations
#[derive(Clone)]
pub struct Viewport {
    // === Scroll state ===
    /// Current scroll position in layout space
    pub scroll: LayoutPos,

    // === Window dimensions ===
    /// Logical size (DPI-independent)
    pub logical_size: LayoutSize,

    // === Text metrics ===
    pub metrics: TextMetrics,
}

impl Viewport {
    /// Create new viewport with default metrics
    pub fn new(logical_width: f32, logical_height: f32) -> Self {
        Self {
            scroll: LayoutPos { x: 0.0, y: 0.0 },
            logical_size: LayoutSize {
                width: logical_width,
                height: logical_height,
            },
            metrics: TextMetrics::new(14.0), // Default 14pt font
        }
    }

    /// Update viewport on window resize
    pub fn resize(&mut self, logical_width: f32, logical_height: f32) {
        self.logical_size = LayoutSize {
            width: logical_width,
            height: logical_height,
        };
    }

    // === Transformations ===

    /// Document position to layout position
    pub fn doc_to_layout(&self, pos: DocPos, line_text: &str) -> LayoutPos {
        let column = self.metrics.byte_to_column(line_text, pos.column as usize);
        LayoutPos {
            x: self.metrics.column_to_x(column),
            y: pos.line as f32 * self.metrics.line_height,
        }
    }

    /// Layout position to view position (apply scroll)
    pub fn layout_to_view(&self, pos: LayoutPos) -> ViewPos {
        ViewPos {
            x: pos.x - self.scroll.x,
            y: pos.y - self.scroll.y,
        }
    }

    /// View position to layout position (unapply scroll)
    pub fn view_to_layout(&self, pos: ViewPos) -> LayoutPos {
        LayoutPos {
            x: pos.x + self.scroll.x,
            y: pos.y + self.scroll.y,
        }
    }

    /// Transform layout rectangle to view rectangle
    pub fn layout_rect_to_view(&self, rect: LayoutRect) -> ViewRect {
        ViewRect {
            x: rect.x - self.scroll.x,
            y: rect.y - self.scroll.y,
            width: rect.width,
            height: rect.height,
        }
    }

    /// Check if layout rectangle is visible in view
    pub fn is_visible(&self, rect: LayoutRect) -> bool {
        let view_rect = self.layout_rect_to_view(rect);
        view_rect.x < self.logical_size.width
            && view_rect.x + view_rect.width > 0.0
            && view_rect.y < self.logical_size.height
            && view_rect.y + view_rect.height > 0.0
    }

    // === Scrolling ===

    /// Scroll to make a layout position visible
    pub fn ensure_visible(&mut self, pos: LayoutPos) {
        // Horizontal scrolling
        if pos.x < self.scroll.x {
            self.scroll.x = pos.x;
        } else if pos.x > self.scroll.x + self.logical_size.width {
            self.scroll.x = pos.x - self.logical_size.width + 50.0; // Leave some margin
        }

        // Vertical scrolling
        if pos.y < self.scroll.y {
            self.scroll.y = pos.y;
        } else if pos.y + self.metrics.line_height > self.scroll.y + self.logical_size.height {
            self.scroll.y = pos.y + self.metrics.line_height - self.logical_size.height;
        }
    }

    /// Get visible line range
    pub fn visible_lines(&self) -> std::ops::Range<u32> {
        let first_line = (self.scroll.y / self.metrics.line_height) as u32;
        let last_line =
            ((self.scroll.y + self.logical_size.height) / self.metrics.line_height) as u32 + 1;
        first_line..last_line
    }
}

// === Convenience Implementations ===

impl LayoutRect {
    pub fn contains(&self, pos: LayoutPos) -> bool {
        pos.x >= self.x
            && pos.x <= self.x + self.width
            && pos.y >= self.y
            && pos.y <= self.y + self.height
    }
}

impl ViewRect {
    pub fn contains(&self, pos: ViewPos) -> bool {
        pos.x >= self.x
            && pos.x <= self.x + self.width
            && pos.y >= self.y
            && pos.y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_transformations() {
        let viewport = Viewport::new(800.0, 600.0);

        let doc_pos = DocPos { line: 5, column: 10 };
        let layout_pos = viewport.doc_to_layout(doc_pos, "0123456789abcdef");
        assert_eq!(layout_pos.x, 10.0 * viewport.metrics.advance_width);
        assert_eq!(layout_pos.y, 5.0 * viewport.metrics.line_height);

        let view_pos = viewport.layout_to_view(layout_pos);
        assert_eq!(view_pos.x, layout_pos.x); // No scroll initially
        assert_eq!(view_pos.y, layout_pos.y);
    }

    #[test]
    fn test_scrolling() {
        let mut viewport = Viewport::new(800.0, 600.0);
        viewport.scroll = LayoutPos { x: 100.0, y: 200.0 };

        let layout_pos = LayoutPos { x: 150.0, y: 250.0 };
        let view_pos = viewport.layout_to_view(layout_pos);

        assert_eq!(view_pos.x, 50.0); // 150 - 100 scroll
        assert_eq!(view_pos.y, 50.0); // 250 - 200 scroll
    }

    #[test]
    fn test_visibility_check() {
        let mut viewport = Viewport::new(800.0, 600.0);
        viewport.scroll = LayoutPos { x: 100.0, y: 100.0 };

        // Visible rectangle
        let visible_rect = LayoutRect {
            x: 150.0,
            y: 150.0,
            width: 100.0,
            height: 100.0,
        };
        assert!(viewport.is_visible(visible_rect));

        // Off-screen rectangle
        let offscreen_rect = LayoutRect {
            x: 0.0,
            y: 0.0,
            width: 50.0,
            height: 50.0,
        };
        assert!(!viewport.is_visible(offscreen_rect));
    }

    #[test]
    fn test_visible_lines_follow_scroll() {
        let mut viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.visible_lines().start, 0);

        viewport.scroll.y = 10.0 * viewport.metrics.line_height;
        let range = viewport.visible_lines();
        assert_eq!(range.start, 10);
        assert!(range.end > range.start);
    }

    #[test]
    fn test_tab_handling() {
        let metrics = TextMetrics::new(14.0);

        // Tab should advance to next tab stop
        assert_eq!(metrics.byte_to_column("hello\tworld", 6), 8); // After tab
        assert_eq!(metrics.byte_to_column("\t\t", 0), 0); // Start
        assert_eq!(metrics.byte_to_column("\t\t", 1), 4); // After first tab
        assert_eq!(metrics.byte_to_column("\t\t", 2), 8); // After second tab
    }

    #[test]
    fn test_font_size_rederives_metrics() {
        let mut metrics = TextMetrics::new(14.0);
        let old_line_height = metrics.line_height;
        metrics.set_font_size(16.0);
        assert_eq!(metrics.font_size, 16.0);
        assert!(metrics.line_height > old_line_height);
        assert_eq!(metrics.advance_width, 16.0 * 0.6);
    }
}
