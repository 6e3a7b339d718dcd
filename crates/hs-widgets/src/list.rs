#![forbid(unsafe_code)]

//! List widget with a per-row action button.
//!
//! Each row shows the selection marker, the item text and, when an action
//! label is set, a clickable label flush with the right edge:
//!
//! ```text
//! > React   Jordan Walke   3   4     [Dismiss]
//!   Redux   Dan Abramov    2   5     [Dismiss]
//! ```
//!
//! Geometry is computed by one function shared by rendering and
//! [`List::hit`], so a click maps back to exactly what was drawn.

use hs_core::geometry::Rect;
use hs_render::display_width;
use hs_render::frame::{Frame, HitData, HitId};

use crate::{StatefulWidget, Widget};

/// A single list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    content: String,
    data: HitData,
}

impl ListItem {
    /// Create a row with caller-defined payload (e.g. the record id).
    pub fn new(content: impl Into<String>, data: HitData) -> Self {
        Self {
            content: content.into(),
            data,
        }
    }

    /// Row text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Payload carried into hit results.
    pub fn data(&self) -> HitData {
        self.data
    }
}

/// What a position in the list area refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListHit {
    /// The row body of the item at `index`.
    Row { index: usize, data: HitData },
    /// The action label of the item at `index`.
    Action { index: usize, data: HitData },
}

/// A list of single-line items.
#[derive(Debug, Clone, Default)]
pub struct List<'a> {
    items: Vec<ListItem>,
    highlight_symbol: &'a str,
    action_label: Option<&'a str>,
    hit_id: Option<HitId>,
    action_hit_id: Option<HitId>,
}

/// Mutable state for a [`List`] tracking selection and scroll offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListState {
    /// Index of the currently selected item, if any.
    pub selected: Option<usize>,
    /// Scroll offset (first visible item index).
    pub offset: usize,
}

impl ListState {
    /// Set the selected item index, or `None` to deselect.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
        if index.is_none() {
            self.offset = 0;
        }
    }

    /// Return the currently selected item index.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Move selection to the next item.
    ///
    /// If nothing is selected, selects the first item. Clamps to the last item.
    pub fn select_next(&mut self, item_count: usize) {
        if item_count == 0 {
            return;
        }
        let next = match self.selected {
            Some(i) => (i + 1).min(item_count - 1),
            None => 0,
        };
        self.selected = Some(next);
    }

    /// Move selection to the previous item.
    ///
    /// If nothing is selected, selects the first item. Clamps to 0.
    pub fn select_previous(&mut self, item_count: usize) {
        if item_count == 0 {
            return;
        }
        let prev = match self.selected {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.selected = Some(prev);
    }

    /// Keep the selection inside `0..item_count`.
    ///
    /// An empty list drops the selection; otherwise an out-of-range
    /// selection moves to the last item.
    pub fn clamp(&mut self, item_count: usize) {
        if item_count == 0 {
            self.select(None);
            return;
        }
        if let Some(selected) = self.selected
            && selected >= item_count
        {
            self.selected = Some(item_count - 1);
        }
        self.offset = self.offset.min(item_count - 1);
    }

    /// Adjust `offset` so the selection is visible in a viewport of
    /// `height` rows.
    pub fn scroll_into_view(&mut self, height: usize, item_count: usize) {
        self.offset = self.effective_offset(height, item_count);
    }

    fn effective_offset(&self, height: usize, item_count: usize) -> usize {
        if item_count == 0 || height == 0 {
            return 0;
        }
        let mut offset = self.offset.min(item_count - 1);
        if let Some(selected) = self.selected.map(|s| s.min(item_count - 1)) {
            if selected >= offset + height {
                offset = selected + 1 - height;
            } else if selected < offset {
                offset = selected;
            }
        }
        offset
    }
}

/// Screen geometry of one visible row.
#[derive(Debug, Clone, Copy)]
struct RowLayout {
    index: usize,
    row: Rect,
    content_right: u16,
    action: Option<Rect>,
}

impl<'a> List<'a> {
    /// Create a list from rows.
    pub fn new(items: impl IntoIterator<Item = ListItem>) -> Self {
        Self {
            items: items.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Marker drawn before the selected row.
    pub fn highlight_symbol(mut self, symbol: &'a str) -> Self {
        self.highlight_symbol = symbol;
        self
    }

    /// Label of the per-row action button.
    pub fn action_label(mut self, label: &'a str) -> Self {
        self.action_label = Some(label);
        self
    }

    /// Register each row body as a hit region with this id.
    pub fn hit_id(mut self, id: HitId) -> Self {
        self.hit_id = Some(id);
        self
    }

    /// Register each action label as a hit region with this id.
    pub fn action_hit_id(mut self, id: HitId) -> Self {
        self.action_hit_id = Some(id);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolve a screen position against the layout `render` would produce
    /// for the same `area` and `state`.
    pub fn hit(&self, area: Rect, state: &ListState, x: u16, y: u16) -> Option<ListHit> {
        let offset = state.effective_offset(area.height as usize, self.items.len());
        self.layout(area, offset)
            .find(|row| row.row.contains(x, y))
            .map(|row| {
                let data = self.items[row.index].data;
                match row.action {
                    Some(action) if action.contains(x, y) => ListHit::Action {
                        index: row.index,
                        data,
                    },
                    _ => ListHit::Row {
                        index: row.index,
                        data,
                    },
                }
            })
    }

    fn layout(&self, area: Rect, offset: usize) -> impl Iterator<Item = RowLayout> + '_ {
        let action_width = self.action_label.map_or(0, |l| display_width(l) as u16);
        self.items
            .iter()
            .enumerate()
            .skip(offset)
            .take(area.height as usize)
            .map(move |(index, _)| {
                let y = area.y + (index - offset) as u16;
                let row = Rect::new(area.x, y, area.width, 1);
                let action = (action_width > 0 && action_width < area.width).then(|| {
                    Rect::new(area.right() - action_width, y, action_width, 1)
                });
                let content_right = match action {
                    Some(a) => a.x.saturating_sub(1),
                    None => area.right(),
                };
                RowLayout {
                    index,
                    row,
                    content_right,
                    action,
                }
            })
    }
}

impl StatefulWidget for List<'_> {
    type State = ListState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "List",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        if self.items.is_empty() {
            state.select(None);
            return;
        }
        state.clamp(self.items.len());
        state.scroll_into_view(area.height as usize, self.items.len());

        let marker_width = display_width(self.highlight_symbol) as u16;
        for row in self.layout(area, state.offset) {
            let item = &self.items[row.index];
            let y = row.row.y;
            let mut x = area.x;

            if marker_width > 0 {
                if state.selected == Some(row.index) {
                    frame.print(x, y, self.highlight_symbol, row.content_right);
                }
                x = x.saturating_add(marker_width + 1);
            }
            frame.print(x, y, &item.content, row.content_right);

            if let Some(id) = self.hit_id {
                frame.register_hit(row.row, id, item.data);
            }
            if let (Some(action), Some(label)) = (row.action, self.action_label) {
                frame.print(action.x, y, label, action.right());
                if let Some(id) = self.action_hit_id {
                    frame.register_hit(action, id, item.data);
                }
            }
        }
    }
}

impl Widget for List<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let mut state = ListState::default();
        StatefulWidget::render(self, area, frame, &mut state);
    }
}
