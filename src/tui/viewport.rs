use ratatui::text::{Line, Text};

/// A vertically scrollable window over pre-rendered lines.
///
/// The offset is always clamped so the window never starts past the point
/// where the last content line sits at the bottom.
#[derive(Debug, Clone)]
pub struct Viewport {
    lines: Vec<Line<'static>>,
    width: u16,
    height: u16,
    y_offset: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(0, 20)
    }
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Viewport {
            lines: Vec::new(),
            width,
            height,
            y_offset: 0,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: u16) {
        self.height = height;
        self.set_y_offset(self.y_offset as isize);
    }

    pub fn set_content(&mut self, text: Text<'static>) {
        self.lines = text.lines;
        self.set_y_offset(self.y_offset as isize);
    }

    pub fn total_line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    /// Largest offset that leaves no blank space below the content
    pub fn max_y_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height as usize)
    }

    pub fn set_y_offset(&mut self, offset: isize) {
        let max = self.max_y_offset() as isize;
        self.y_offset = offset.clamp(0, max) as usize;
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.set_y_offset(self.y_offset as isize + n as isize);
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.set_y_offset(self.y_offset as isize - n as isize);
    }

    /// Whether content line `line` is inside the window
    pub fn is_visible(&self, line: usize) -> bool {
        line >= self.y_offset && line < self.y_offset + self.height as usize
    }

    /// The lines currently inside the window
    pub fn visible(&self) -> Text<'static> {
        let end = (self.y_offset + self.height as usize).min(self.lines.len());
        let start = self.y_offset.min(end);
        Text::from(self.lines[start..end].to_vec())
    }
}
