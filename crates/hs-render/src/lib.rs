#![forbid(unsafe_code)]

//! Render kernel: frames, hit regions, and terminal presentation.

pub mod frame;
pub mod presenter;

use unicode_width::UnicodeWidthStr;

/// Display width of a string in terminal cells.
#[inline]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}
