#![forbid(unsafe_code)]

//! Text input widget.
//!
//! A single-line text input with cursor movement, word deletion, paste and
//! horizontal scrolling. Grapheme-cluster aware for correct Unicode handling.

use hs_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
use hs_core::geometry::Rect;
use hs_render::frame::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::Widget;
use crate::focus::Focusable;

/// A single-line text input widget.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    /// Text value.
    value: String,
    /// Cursor position (grapheme index).
    cursor: usize,
    /// Placeholder shown while the value is empty.
    placeholder: String,
    /// Whether the input is focused (controls cursor output and key handling).
    focused: bool,
}

impl TextInput {
    /// Create a new empty text input.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Builder methods ---

    /// Set the text value (builder). The cursor moves to the end.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.grapheme_count();
        self
    }

    /// Set the placeholder text (builder).
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set focus state (builder).
    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    // --- Value access ---

    /// Get the current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the value, clamping the cursor to the valid range.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.cursor.min(self.grapheme_count());
    }

    /// Clear all text.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Get the cursor position (grapheme index).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get the cursor screen position relative to a render area.
    ///
    /// Useful for `Frame::set_cursor()`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let cursor_visual = self.cursor_visual_pos();
        let rel_x = cursor_visual.saturating_sub(self.scroll_for(area.width as usize));
        let x = area
            .x
            .saturating_add(rel_x as u16)
            .min(area.right().saturating_sub(1));
        (x, area.y)
    }

    // --- Event handling ---

    /// Handle a terminal event.
    ///
    /// Unfocused inputs ignore everything. Returns `true` if the state changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if !self.focused {
            return false;
        }
        match event {
            Event::Key(key)
                if key.kind == KeyEventKind::Press || key.kind == KeyEventKind::Repeat =>
            {
                self.handle_key(key)
            }
            Event::Paste(paste) => {
                let text: String = paste.text.chars().filter(|c| !c.is_control()).collect();
                if text.is_empty() {
                    return false;
                }
                self.insert_str(&text);
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);

        match key.code {
            KeyCode::Char(c) if !ctrl => {
                self.insert_str(c.encode_utf8(&mut [0; 4]));
                true
            }
            // Ctrl+U: clear to start of line
            KeyCode::Char('u') if ctrl => {
                let end = self.grapheme_byte_offset(self.cursor);
                self.value.drain(..end);
                self.cursor = 0;
                true
            }
            KeyCode::Backspace => {
                if ctrl {
                    self.delete_word_back();
                } else {
                    self.delete_char_back();
                }
                true
            }
            KeyCode::Delete => {
                self.delete_char_forward();
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.grapheme_count());
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.grapheme_count();
                true
            }
            _ => false,
        }
    }

    // --- Editing operations ---

    fn insert_str(&mut self, text: &str) {
        let byte_offset = self.grapheme_byte_offset(self.cursor);
        let before = self.grapheme_count();
        self.value.insert_str(byte_offset, text);
        // Combining marks can merge into an existing cluster.
        let added = self.grapheme_count().saturating_sub(before);
        self.cursor += added;
    }

    fn delete_char_back(&mut self) {
        if self.cursor > 0 {
            let byte_start = self.grapheme_byte_offset(self.cursor - 1);
            let byte_end = self.grapheme_byte_offset(self.cursor);
            self.value.drain(byte_start..byte_end);
            self.cursor -= 1;
        }
    }

    fn delete_char_forward(&mut self) {
        if self.cursor < self.grapheme_count() {
            let byte_start = self.grapheme_byte_offset(self.cursor);
            let byte_end = self.grapheme_byte_offset(self.cursor + 1);
            self.value.drain(byte_start..byte_end);
        }
    }

    fn delete_word_back(&mut self) {
        let graphemes: Vec<&str> = self.value.graphemes(true).collect();
        let mut pos = self.cursor;
        while pos > 0 && graphemes[pos - 1].chars().all(char::is_whitespace) {
            pos -= 1;
        }
        while pos > 0 && !graphemes[pos - 1].chars().all(char::is_whitespace) {
            pos -= 1;
        }
        if pos < self.cursor {
            let byte_start = self.grapheme_byte_offset(pos);
            let byte_end = self.grapheme_byte_offset(self.cursor);
            self.value.drain(byte_start..byte_end);
            self.cursor = pos;
        }
    }

    // --- Internal helpers ---

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn grapheme_byte_offset(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn cursor_visual_pos(&self) -> usize {
        self.value
            .graphemes(true)
            .take(self.cursor)
            .map(UnicodeWidthStr::width)
            .sum()
    }

    /// Leftmost visible column, keeping the cursor inside the viewport.
    fn scroll_for(&self, viewport_width: usize) -> usize {
        let cursor_visual = self.cursor_visual_pos();
        if viewport_width == 0 || cursor_visual < viewport_width {
            0
        } else {
            cursor_visual + 1 - viewport_width
        }
    }
}

impl Focusable for TextInput {
    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

impl Widget for TextInput {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "TextInput",
            x = area.x,
            y = area.y,
            w = area.width
        )
        .entered();

        if area.is_empty() {
            return;
        }

        if self.value.is_empty() {
            frame.print(area.x, area.y, &self.placeholder, area.right());
        } else {
            let scroll = self.scroll_for(area.width as usize);
            let mut skipped = 0usize;
            let visible: String = self
                .value
                .graphemes(true)
                .skip_while(|g| {
                    let w = UnicodeWidthStr::width(*g);
                    if skipped + w <= scroll {
                        skipped += w;
                        true
                    } else {
                        false
                    }
                })
                .collect();
            frame.print(area.x, area.y, &visible, area.right());
        }

        if self.focused {
            frame.set_cursor(Some(self.cursor_position(area)));
        }
    }
}
