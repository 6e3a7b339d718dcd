#![forbid(unsafe_code)]

//! Widgets for Hacker Stories: a focusable text input, a list with a
//! per-row action button, and the focus controller that ties input focus
//! to the view lifecycle.

pub mod focus;
pub mod input;
pub mod list;

pub use focus::{FocusController, Focusable};
pub use input::TextInput;
pub use list::{List, ListHit, ListItem, ListState};

use hs_core::geometry::Rect;
use hs_render::frame::Frame;

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a `Frame` within a given `Rect`.
pub trait Widget {
    /// Render the widget into the frame at the given area.
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// A `StatefulWidget` is a widget that renders based on mutable state.
pub trait StatefulWidget {
    type State;

    /// Render the widget into the frame with mutable state.
    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State);
}

/// A horizontal rule across `area`'s first row.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rule;

impl Widget for Rule {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if !area.is_empty() {
            frame.fill(area.x, area.y, area.width, '─');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_spans_area_width() {
        let mut frame = Frame::new(6, 2);
        Rule.render(Rect::new(1, 1, 4, 1), &mut frame);
        assert_eq!(frame.row_text(0), "");
        assert_eq!(frame.row_text(1), " ────");
    }
}
