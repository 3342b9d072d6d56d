use ratatui::text::{Line, Text};

use crate::model::group::{Group, total_items};
use crate::tui::viewport::Viewport;

/// Renders a group name at the given width
pub type LabelRenderer = Box<dyn Fn(&str, u16) -> Text<'static>>;
/// Renders one item at the given width
pub type ItemRenderer<T> = Box<dyn Fn(&T, u16) -> Text<'static>>;

/// How each part of the list is drawn.
///
/// For every group with items: the header (if any), then each item through
/// `item` or, at the focused cursor, `selected`, then the footer (if any).
/// Groups without items are skipped entirely.
pub struct Renderers<T> {
    pub header: Option<LabelRenderer>,
    pub footer: Option<LabelRenderer>,
    pub item: ItemRenderer<T>,
    pub selected: ItemRenderer<T>,
}

/// A scrollable list of items split into named groups, with one cursor
/// running across all of them.
pub struct GroupedList<T> {
    groups: Vec<Group<T>>,
    total_items: usize,
    renderers: Renderers<T>,
    empty_message: String,

    focus: bool,
    /// Index into the concatenation of all groups' items
    cursor: usize,
    /// First rendered line of the selected item, while focused
    cursor_absolute: Option<usize>,
    /// Line count of the selected item's render
    selected_lines: usize,
    viewport: Viewport,
}

impl<T> GroupedList<T> {
    pub fn new(renderers: Renderers<T>) -> Self {
        let mut list = GroupedList {
            groups: Vec::new(),
            total_items: 0,
            renderers,
            empty_message: "Nothing here".to_string(),
            focus: false,
            cursor: 0,
            cursor_absolute: None,
            selected_lines: 0,
            viewport: Viewport::default(),
        };
        list.update_viewport();
        list
    }

    /// Text shown when there are no items at all
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self.update_viewport();
        self
    }

    /// Replace the contents. The cursor keeps its index, snapped to the new
    /// last item if the list shrank, and the window follows it.
    pub fn set_groups(&mut self, groups: Vec<Group<T>>) {
        self.total_items = total_items(&groups);
        self.groups = groups;
        self.cursor = self.cursor.min(self.total_items.saturating_sub(1));
        self.update_viewport();

        // End the window at the last content line rather than on blank space
        let max = self.viewport.max_y_offset();
        if self.viewport.y_offset() > max {
            self.viewport.set_y_offset(max as isize);
        }

        if let Some(abs) = self.cursor_absolute
            && !self.viewport.is_visible(abs)
        {
            let half = (self.viewport.height() / 2) as isize;
            self.viewport.set_y_offset(abs as isize - half);
        }
        self.ensure_cursor_visible();
    }

    pub fn move_up(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
        self.update_viewport();

        // Soft scrolling: the cursor moves freely until it nears the top
        if let Some(abs) = self.cursor_absolute {
            let threshold = self
                .viewport
                .total_line_count()
                .saturating_sub(self.viewport.height() as usize / 2);
            if abs < threshold {
                self.viewport.scroll_up(n);
            }
        }
        self.ensure_cursor_visible();
    }

    pub fn move_down(&mut self, n: usize) {
        self.cursor = (self.cursor + n).min(self.total_items.saturating_sub(1));
        self.update_viewport();

        if let Some(abs) = self.cursor_absolute
            && abs > self.viewport.height() as usize / 2
        {
            self.viewport.scroll_down(n);
        }
        self.ensure_cursor_visible();
    }

    pub fn focus(&mut self) -> &mut Self {
        self.focus = true;
        self.update_viewport();
        self.ensure_cursor_visible();
        self
    }

    pub fn blur(&mut self) -> &mut Self {
        self.focus = false;
        self.update_viewport();
        self
    }

    pub fn focused(&self) -> bool {
        self.focus
    }

    pub fn set_width(&mut self, width: u16) -> &mut Self {
        if self.viewport.width() != width {
            self.viewport.set_width(width);
            self.update_viewport();
        }
        self
    }

    pub fn set_height(&mut self, height: u16) -> &mut Self {
        if self.viewport.height() != height {
            self.viewport.set_height(height);
            self.update_viewport();
            self.ensure_cursor_visible();
        }
        self
    }

    /// The item under the cursor
    pub fn selected(&self) -> Option<&T> {
        let mut index = self.cursor;
        for group in &self.groups {
            if index < group.items.len() {
                return group.items.get(index);
            }
            index -= group.items.len();
        }
        None
    }

    /// The visible window of the rendered list
    pub fn view(&self) -> Text<'static> {
        self.viewport.visible()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_absolute(&self) -> Option<usize> {
        self.cursor_absolute
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn offset(&self) -> usize {
        self.viewport.y_offset()
    }

    pub fn total_lines(&self) -> usize {
        self.viewport.total_line_count()
    }

    pub fn groups(&self) -> &[Group<T>] {
        &self.groups
    }

    /// Scroll just enough that the selected item is inside the window
    fn ensure_cursor_visible(&mut self) {
        let height = self.viewport.height() as usize;
        let Some(abs) = self.cursor_absolute else {
            return;
        };
        if height == 0 {
            return;
        }
        let last = abs + self.selected_lines.max(1) - 1;
        let offset = self.viewport.y_offset();
        if last >= offset + height {
            self.viewport.set_y_offset((last + 1 - height) as isize);
        }
        if abs < self.viewport.y_offset() {
            self.viewport.set_y_offset(abs as isize);
        }
    }

    /// Re-render every line. Cheap enough for the list sizes a person keeps.
    fn update_viewport(&mut self) {
        let width = self.viewport.width();
        let mut lines: Vec<Line<'static>> = Vec::new();
        self.cursor_absolute = None;
        self.selected_lines = 0;

        if self.total_items == 0 {
            lines.push(Line::from(self.empty_message.clone()));
            self.viewport.set_content(Text::from(lines));
            return;
        }

        let mut index = 0;
        for group in self.groups.iter().filter(|g| !g.is_empty()) {
            if let Some(header) = &self.renderers.header {
                lines.extend(header(&group.name, width).lines);
            }
            for item in &group.items {
                if self.focus && index == self.cursor {
                    let rendered = (self.renderers.selected)(item, width);
                    self.cursor_absolute = Some(lines.len());
                    self.selected_lines = rendered.lines.len();
                    lines.extend(rendered.lines);
                } else {
                    lines.extend((self.renderers.item)(item, width).lines);
                }
                index += 1;
            }
            if let Some(footer) = &self.renderers.footer {
                lines.extend(footer(&group.name, width).lines);
            }
        }
        self.viewport.set_content(Text::from(lines));
    }
}
