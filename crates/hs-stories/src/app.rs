#![forbid(unsafe_code)]

//! The stories browser model.
//!
//! [`StoriesApp`] owns the persisted search term and the story collection.
//! Everything on screen is derived from those two values: the visible list
//! is recomputed from `items.filter(search)` on every render and is never
//! cached.
//!
//! Screen layout (rows):
//!
//! ```text
//! 0  My Hacker Stories
//! 1
//! 2  Search: React
//! 3  ────────────────────────────
//! 4  > React  Jordan Walke  3  4   [Dismiss]
//! …
//! h-1 1 of 2 stories · Tab focus · Enter dismiss · Esc quit
//! ```

use std::sync::Arc;

use hs_core::event::{Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use hs_core::geometry::Rect;
use hs_render::display_width;
use hs_render::frame::{Frame, HitId};
use hs_runtime::{Cmd, Model, PersistedState, ValueStore};
use hs_widgets::{
    FocusController, Focusable, List, ListHit, ListItem, ListState, Rule, StatefulWidget,
    TextInput, Widget,
};
use tracing::{debug, info};
use unicode_segmentation::UnicodeSegmentation;

use crate::collection::ItemCollection;
use crate::record::{Record, StoryId};
use crate::seed::{DEFAULT_SEARCH_TERM, SEARCH_KEY};

pub const HEADING: &str = "My Hacker Stories";
pub const SEARCH_LABEL: &str = "Search: ";
pub const DISMISS_LABEL: &str = "[Dismiss]";
const HIGHLIGHT: &str = ">";

/// Hit id of a story row.
pub const ROW_HIT: HitId = HitId::new(1);
/// Hit id of a row's dismiss button.
pub const DISMISS_HIT: HitId = HitId::new(2);
/// Hit id of the search input.
pub const SEARCH_HIT: HitId = HitId::new(3);

/// Startup options.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Term used when the store has no saved search.
    pub default_search: String,
    /// Whether the search input asks for focus when mounted.
    pub focus_search: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_search: DEFAULT_SEARCH_TERM.to_string(),
            focus_search: true,
        }
    }
}

/// Which part of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Search,
    List,
}

/// Messages handled by [`StoriesApp`].
#[derive(Debug, Clone)]
pub enum Msg {
    /// Raw terminal input.
    Event(Event),
    /// Replace the search term.
    SearchInput(String),
    /// Remove a story.
    Dismiss(StoryId),
    Quit,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Self::Event(event)
    }
}

/// Screen regions, computed identically for drawing and for mouse input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub heading: Rect,
    pub label: Rect,
    pub input: Rect,
    pub rule: Rect,
    pub list: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(width: u16, height: u16) -> Self {
        let row = |y: u16| {
            if y < height {
                Rect::new(0, y, width, 1)
            } else {
                Rect::new(0, height, width, 0)
            }
        };
        let label_width = (display_width(SEARCH_LABEL) as u16).min(width);
        let search_row = row(2);
        let list_top = 4.min(height);
        let status_y = height.saturating_sub(1).max(list_top);
        Self {
            heading: row(0),
            label: Rect::new(0, search_row.y, label_width, search_row.height),
            input: Rect::new(
                label_width,
                search_row.y,
                width - label_width,
                search_row.height,
            ),
            rule: row(3),
            list: Rect::new(0, list_top, width, status_y - list_top),
            status: row(status_y),
        }
    }
}

/// The stories browser.
pub struct StoriesApp {
    search: PersistedState<String>,
    items: ItemCollection,
    input: TextInput,
    list_state: ListState,
    focus: FocusController,
    wants_focus: bool,
    size: (u16, u16),
}

impl StoriesApp {
    /// Create the app, seeding the search term from `store`.
    pub fn new(store: Arc<ValueStore>, items: ItemCollection, config: AppConfig) -> Self {
        let search = PersistedState::new(store, SEARCH_KEY, config.default_search);
        info!(
            term = %search.get(),
            restored = search.is_restored(),
            stories = items.len(),
            "stories app created"
        );
        let input = TextInput::new()
            .with_value(search.get().clone())
            .with_placeholder("type to filter stories");
        let mut app = Self {
            search,
            items,
            input,
            list_state: ListState::default(),
            focus: FocusController::new(config.focus_search),
            wants_focus: config.focus_search,
            size: (80, 24),
        };
        app.list_state.select_next(app.visible_len());
        app
    }

    // --- State transitions ---

    /// Store a new search term and re-clamp the selection.
    pub fn on_search_input(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.input.value() != text {
            self.input = self.input.clone().with_value(text.clone());
        }
        debug!(term = %text, "search input");
        self.search.set(text);
        self.sync_selection();
    }

    /// Drop a story from the collection.
    pub fn on_dismiss(&mut self, id: StoryId) {
        let before = self.items.len();
        self.items = self.items.remove(id);
        debug!(%id, removed = before != self.items.len(), "dismiss");
        self.sync_selection();
    }

    // --- Queries ---

    /// Stories currently on screen: `items.filter(search)`.
    pub fn visible(&self) -> Vec<&Record> {
        self.items.filter(self.search.get())
    }

    pub fn search_term(&self) -> &str {
        self.search.get()
    }

    pub fn items(&self) -> &ItemCollection {
        &self.items
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn focus_controller(&self) -> &FocusController {
        &self.focus
    }

    pub fn pane(&self) -> Pane {
        if self.input.is_focused() {
            Pane::Search
        } else {
            Pane::List
        }
    }

    /// Index into [`visible`](Self::visible) of the selected row.
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn layout(&self) -> AppLayout {
        AppLayout::compute(self.size.0, self.size.1)
    }

    // --- Input ---

    fn visible_len(&self) -> usize {
        self.visible().len()
    }

    fn sync_selection(&mut self) {
        let len = self.visible_len();
        self.list_state.clamp(len);
        if self.list_state.selected().is_none() {
            self.list_state.select_next(len);
        }
        let height = self.layout().list.height as usize;
        self.list_state.scroll_into_view(height, len);
    }

    fn set_wants_focus(&mut self, wants: bool) {
        self.wants_focus = wants;
        if !wants {
            self.input.blur();
        }
        self.focus.update(wants, Some(&mut self.input));
    }

    fn selected_id(&self) -> Option<StoryId> {
        let index = self.list_state.selected()?;
        self.visible().get(index).map(|r| r.id)
    }

    fn handle_event(&mut self, event: Event) -> Cmd<Msg> {
        match event {
            Event::Key(key) if key.is_press() => self.handle_key(key),
            Event::Key(_) => Cmd::none(),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize { width, height } => {
                self.size = (width, height);
                self.sync_selection();
                Cmd::none()
            }
            Event::Paste(_) => {
                self.edit_search(&event);
                Cmd::none()
            }
            Event::Focus(_) => Cmd::none(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        if key.code == KeyCode::Escape || (key.ctrl() && key.is_char('c')) {
            return Cmd::quit();
        }
        match (key.code, self.pane()) {
            (KeyCode::Tab | KeyCode::BackTab, pane) => {
                self.set_wants_focus(pane == Pane::List);
            }
            (KeyCode::Up, _) => {
                self.list_state.select_previous(self.visible_len());
                self.sync_selection();
            }
            (KeyCode::Down, _) => {
                self.list_state.select_next(self.visible_len());
                self.sync_selection();
            }
            (KeyCode::Enter | KeyCode::Delete, Pane::List) => {
                if let Some(id) = self.selected_id() {
                    return Cmd::msg(Msg::Dismiss(id));
                }
            }
            (_, Pane::Search) => self.edit_search(&Event::Key(key)),
            _ => {}
        }
        Cmd::none()
    }

    fn edit_search(&mut self, event: &Event) {
        let before = self.input.value().to_string();
        if self.input.handle_event(event) && self.input.value() != before {
            let value = self.input.value().to_string();
            self.on_search_input(value);
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Cmd<Msg> {
        let (x, y) = mouse.position();
        let layout = self.layout();
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.list_state.select_previous(self.visible_len());
                self.sync_selection();
            }
            MouseEventKind::ScrollDown => {
                self.list_state.select_next(self.visible_len());
                self.sync_selection();
            }
            _ if mouse.is_left_click() => {
                if layout.input.contains(x, y) || layout.label.contains(x, y) {
                    self.set_wants_focus(true);
                    return Cmd::none();
                }
                match self.story_list().hit(layout.list, &self.list_state, x, y) {
                    Some(ListHit::Action { data, .. }) => {
                        return Cmd::msg(Msg::Dismiss(StoryId(data)));
                    }
                    Some(ListHit::Row { index, .. }) => {
                        self.list_state.select(Some(index));
                        self.set_wants_focus(false);
                    }
                    None => {}
                }
            }
            _ => {}
        }
        Cmd::none()
    }

    // --- Rendering ---

    fn story_list(&self) -> List<'static> {
        let width = self.layout().list.width;
        let content_width = usize::from(width)
            .saturating_sub(display_width(HIGHLIGHT) + 1)
            .saturating_sub(display_width(DISMISS_LABEL) + 1);
        List::new(
            self.visible()
                .into_iter()
                .map(|r| ListItem::new(format_row(r, content_width), r.id.get())),
        )
        .highlight_symbol(HIGHLIGHT)
        .action_label(DISMISS_LABEL)
        .hit_id(ROW_HIT)
        .action_hit_id(DISMISS_HIT)
    }

    fn status_line(&self) -> String {
        format!(
            "{} of {} stories · Tab focus · Enter dismiss · Esc quit",
            self.visible_len(),
            self.items.len()
        )
    }
}

impl Model for StoriesApp {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        // The input exists now; deliver the initial focus request.
        self.focus.mount(Some(&mut self.input));
        self.sync_selection();
        Cmd::none()
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        let cmd = match msg {
            Msg::Event(event) => self.handle_event(event),
            Msg::SearchInput(text) => {
                self.on_search_input(text);
                Cmd::none()
            }
            Msg::Dismiss(id) => {
                self.on_dismiss(id);
                Cmd::none()
            }
            Msg::Quit => Cmd::quit(),
        };
        // Re-render with an unchanged flag never takes focus back.
        self.focus.update(self.wants_focus, Some(&mut self.input));
        cmd
    }

    fn view(&self, frame: &mut Frame) {
        let layout = AppLayout::compute(frame.width(), frame.height());

        frame.print(layout.heading.x, layout.heading.y, HEADING, layout.heading.right());
        frame.print(layout.label.x, layout.label.y, SEARCH_LABEL, layout.label.right());
        self.input.render(layout.input, frame);
        frame.register_hit(layout.input, SEARCH_HIT, 0);
        Rule.render(layout.rule, frame);

        if self.visible().is_empty() {
            let text = format!("No stories match \"{}\"", self.search.get());
            frame.print(layout.list.x, layout.list.y, &text, layout.list.right());
        } else {
            let mut state = self.list_state;
            StatefulWidget::render(&self.story_list(), layout.list, frame, &mut state);
        }

        frame.print(
            layout.status.x,
            layout.status.y,
            &self.status_line(),
            layout.status.right(),
        );
    }
}

/// One row's text: title, author, comments and points in fixed columns.
fn format_row(record: &Record, width: usize) -> String {
    let title_w = width * 4 / 10;
    let author_w = width * 3 / 10;
    let num_w = width.saturating_sub(title_w + author_w) / 2;
    let mut row = String::with_capacity(width);
    row.push_str(&fit(&record.title, title_w));
    row.push_str(&fit(&record.author, author_w));
    row.push_str(&fit(&record.comment_count.to_string(), num_w));
    row.push_str(&record.score.to_string());
    row
}

/// Truncate to `width - 1` cells and pad to `width`, leaving a gap.
fn fit(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for g in text.graphemes(true) {
        let w = display_width(g);
        if used + w > width - 1 {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}
