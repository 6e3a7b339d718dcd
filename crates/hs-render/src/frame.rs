#![forbid(unsafe_code)]

//! Frame = cell grid + metadata for a render pass.
//!
//! The `Frame` is the render target that `Model::view()` writes to. It
//! bundles a grid of grapheme cells with the cursor position and the
//! clickable regions registered by widgets.
//!
//! ```
//! use hs_render::frame::Frame;
//!
//! let mut frame = Frame::new(20, 2);
//! frame.print(0, 0, "Hi", 20);
//! frame.set_cursor(Some((2, 0)));
//! assert_eq!(frame.row_text(0), "Hi");
//! ```

use hs_core::geometry::Rect;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Identifier for a clickable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HitId(pub u32);

impl HitId {
    /// Create a new hit ID from a raw value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Opaque payload attached to a hit region (e.g. a row's record id).
pub type HitData = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HitEntry {
    rect: Rect,
    id: HitId,
    data: HitData,
}

/// A cell holds one grapheme. Wide graphemes occupy their leading cell and
/// leave empty continuation cells behind them.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cell {
    Blank,
    Grapheme(String),
    Continuation,
}

/// A render target.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u16,
    height: u16,
    rows: Vec<Vec<Cell>>,
    cursor_position: Option<(u16, u16)>,
    hits: Vec<HitEntry>,
}

impl Frame {
    /// Create a blank frame.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::Blank; width as usize]; height as usize],
            cursor_position: None,
            hits: Vec::new(),
        }
    }

    /// Frame width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Frame height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full frame area.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Draw `text` starting at `(x, y)`, stopping before `max_x` (exclusive)
    /// or the frame edge.
    ///
    /// Returns the column after the last drawn grapheme. Zero-width graphemes
    /// and control characters are skipped; a grapheme that would straddle
    /// the limit is not drawn.
    pub fn print(&mut self, mut x: u16, y: u16, text: &str, max_x: u16) -> u16 {
        let max_x = max_x.min(self.width);
        let Some(row) = self.rows.get_mut(y as usize) else {
            return x;
        };
        for grapheme in text.graphemes(true) {
            if x >= max_x {
                break;
            }
            if grapheme.chars().any(char::is_control) {
                continue;
            }
            let w = UnicodeWidthStr::width(grapheme);
            if w == 0 {
                continue;
            }
            if x as usize + w > max_x as usize {
                break;
            }
            row[x as usize] = Cell::Grapheme(grapheme.to_string());
            for offset in 1..w {
                row[x as usize + offset] = Cell::Continuation;
            }
            x += w as u16;
        }
        x
    }

    /// Fill `width` cells of row `y` starting at `x` with `ch`.
    pub fn fill(&mut self, x: u16, y: u16, width: u16, ch: char) {
        let mut buf = [0u8; 4];
        let s: &str = ch.encode_utf8(&mut buf);
        let end = x.saturating_add(width);
        let mut col = x;
        while col < end {
            let next = self.print(col, y, s, end);
            if next == col {
                break;
            }
            col = next;
        }
    }

    /// Set the cursor position, or hide it with `None`.
    #[inline]
    pub fn set_cursor(&mut self, position: Option<(u16, u16)>) {
        self.cursor_position = position;
    }

    /// Cursor position requested by the view, if any.
    #[inline]
    pub const fn cursor_position(&self) -> Option<(u16, u16)> {
        self.cursor_position
    }

    /// Register a clickable region.
    ///
    /// The rect is clipped to the frame. Returns `false` if nothing of it is
    /// visible.
    pub fn register_hit(&mut self, rect: Rect, id: HitId, data: HitData) -> bool {
        let clipped = rect.intersection(&self.area());
        if clipped.is_empty() {
            return false;
        }
        self.hits.push(HitEntry {
            rect: clipped,
            id,
            data,
        });
        true
    }

    /// Find the region under `(x, y)`. Later registrations win.
    #[must_use]
    pub fn hit_test(&self, x: u16, y: u16) -> Option<(HitId, HitData)> {
        self.hits
            .iter()
            .rev()
            .find(|hit| hit.rect.contains(x, y))
            .map(|hit| (hit.id, hit.data))
    }

    /// Number of registered hit regions.
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }

    /// Text of row `y` with trailing blanks trimmed.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        let Some(row) = self.rows.get(y as usize) else {
            return String::new();
        };
        let mut out = String::with_capacity(row.len());
        for cell in row {
            match cell {
                Cell::Blank => out.push(' '),
                Cell::Grapheme(g) => out.push_str(g),
                Cell::Continuation => {}
            }
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// All rows as trimmed strings.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.height).map(|y| self.row_text(y)).collect()
    }

    /// Row `y` padded to the full frame width.
    pub(crate) fn padded_row(&self, y: u16) -> String {
        let text = self.row_text(y);
        let pad = (self.width as usize).saturating_sub(crate::display_width(&text));
        let mut out = text;
        out.extend(std::iter::repeat_n(' ', pad));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_clips_at_max_x() {
        let mut frame = Frame::new(10, 1);
        let end = frame.print(0, 0, "Hello world", 5);
        assert_eq!(end, 5);
        assert_eq!(frame.row_text(0), "Hello");
    }

    #[test]
    fn print_out_of_bounds_row_is_noop() {
        let mut frame = Frame::new(4, 1);
        assert_eq!(frame.print(1, 3, "x", 4), 1);
        assert_eq!(frame.lines(), vec![String::new()]);
    }

    #[test]
    fn wide_grapheme_does_not_straddle_edge() {
        let mut frame = Frame::new(3, 1);
        let end = frame.print(0, 0, "a界b", 3);
        assert_eq!(end, 3);
        assert_eq!(frame.row_text(0), "a界");

        let mut narrow = Frame::new(2, 1);
        assert_eq!(narrow.print(1, 0, "界", 2), 1);
        assert_eq!(narrow.row_text(0), "");
    }

    #[test]
    fn control_characters_are_skipped() {
        let mut frame = Frame::new(10, 1);
        frame.print(0, 0, "a\tb\x1b", 10);
        assert_eq!(frame.row_text(0), "ab");
    }

    #[test]
    fn fill_draws_rule() {
        let mut frame = Frame::new(6, 1);
        frame.fill(1, 0, 3, '─');
        assert_eq!(frame.row_text(0), " ───");
    }

    #[test]
    fn hit_test_prefers_latest_and_clips() {
        let mut frame = Frame::new(10, 3);
        assert!(frame.register_hit(Rect::new(0, 0, 10, 3), HitId::new(1), 0));
        assert!(frame.register_hit(Rect::new(2, 1, 3, 1), HitId::new(2), 42));
        assert!(!frame.register_hit(Rect::new(20, 20, 3, 1), HitId::new(3), 0));

        assert_eq!(frame.hit_test(3, 1), Some((HitId::new(2), 42)));
        assert_eq!(frame.hit_test(0, 0), Some((HitId::new(1), 0)));
        assert_eq!(frame.hit_test(11, 0), None);
        assert_eq!(frame.hit_count(), 2);
    }

    #[test]
    fn padded_row_fills_width() {
        let mut frame = Frame::new(5, 1);
        frame.print(0, 0, "ab", 5);
        assert_eq!(frame.padded_row(0), "ab   ");
    }
}
