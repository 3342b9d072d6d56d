use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, truncate_to_width};

/// What the last action did; picks the mode block color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Navigate,
    Create,
    Edit,
    Delete,
}

/// Bottom row: mode block, a centered message that expires, and the
/// number of open tasks.
#[derive(Debug, Clone)]
pub struct StatusBar {
    mode: String,
    kind: ModeKind,
    message: String,
    message_color: Option<Color>,
    expires: Option<Instant>,
    open_tasks: usize,
}

impl StatusBar {
    pub fn new(mode: impl Into<String>) -> Self {
        StatusBar {
            mode: mode.into(),
            kind: ModeKind::Navigate,
            message: String::new(),
            message_color: None,
            expires: None,
            open_tasks: 0,
        }
    }

    pub fn set_mode(&mut self, mode: impl Into<String>, kind: ModeKind) {
        self.mode = mode.into();
        self.kind = kind;
    }

    /// Show `message` until `until`. `None` color means the theme's text color.
    pub fn set_message(
        &mut self,
        message: impl Into<String>,
        until: Instant,
        color: Option<Color>,
    ) {
        self.message = message.into();
        self.expires = Some(until);
        self.message_color = color;
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_open_tasks(&mut self, n: usize) {
        self.open_tasks = n;
    }

    /// Drop the message once its deadline has passed
    pub fn expire(&mut self, now: Instant) {
        if self.expires.is_some_and(|t| now >= t) {
            self.message.clear();
            self.expires = None;
            self.message_color = None;
        }
    }

    pub fn line(&self, theme: &Theme, width: u16) -> Line<'static> {
        let mode_bg = match self.kind {
            ModeKind::Navigate => theme.blue,
            ModeKind::Create => theme.green,
            ModeKind::Edit => theme.yellow,
            ModeKind::Delete => theme.red,
        };
        let mode = format!(" {} ", self.mode.to_uppercase());
        let stats = format!(" \u{2713} {} ", self.open_tasks);

        let middle = (width as usize).saturating_sub(display_width(&mode) + display_width(&stats));
        let text_width = display_width(&self.message).min(middle);
        let left_pad = (middle - text_width) / 2;
        let right_pad = middle - text_width - left_pad;
        let message = truncate_to_width(&self.message, middle);

        let panel = Style::default().bg(theme.panel);
        Line::from(vec![
            Span::styled(
                mode,
                Style::default()
                    .fg(theme.text_cursor)
                    .bg(mode_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ".repeat(left_pad), panel),
            Span::styled(message, panel.fg(self.message_color.unwrap_or(theme.text))),
            Span::styled(" ".repeat(right_pad), panel),
            Span::styled(stats, Style::default().fg(theme.text_cursor).bg(theme.blue)),
        ])
    }

    pub fn render(&self, theme: &Theme, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.line(theme, area.width)), area);
    }
}
