use ratatui::style::Color;
use tracing::warn;

use crate::model::project::ProjectStatus;
use crate::model::task::TaskStatus;
use crate::model::UiConfig;

/// Parsed color theme for the TUI. Defaults are Catppuccin Mocha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Background of list rows
    pub panel: Color,
    pub text: Color,
    /// Foreground on top of a colored (selected) row
    pub text_cursor: Color,
    pub text_faint: Color,
    pub red: Color,
    pub green: Color,
    pub yellow: Color,
    pub blue: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            panel: Color::Rgb(0x31, 0x32, 0x44),
            text: Color::Rgb(0xCD, 0xD6, 0xF4),
            text_cursor: Color::Rgb(0x11, 0x11, 0x1B),
            text_faint: Color::Rgb(0x6C, 0x70, 0x86),
            red: Color::Rgb(0xF3, 0x8B, 0xA8),
            green: Color::Rgb(0xA6, 0xE3, 0xA1),
            yellow: Color::Rgb(0xF9, 0xE2, 0xAF),
            blue: Color::Rgb(0x89, 0xB4, 0xFA),
        }
    }
}

/// Parse a hex color string like "#F38BA8" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "panel" => theme.panel = color,
                "text" => theme.text = color,
                "text_cursor" => theme.text_cursor = color,
                "text_faint" => theme.text_faint = color,
                "red" => theme.red = color,
                "green" => theme.green = color,
                "yellow" => theme.yellow = color,
                "blue" => theme.blue = color,
                other => warn!(key = %other, "unknown theme color"),
            }
        }

        theme
    }

    /// Accent color for a task status. `None` for statuses without one.
    pub fn task_color(&self, status: TaskStatus) -> Option<Color> {
        match status {
            TaskStatus::Todo => Some(self.text),
            TaskStatus::Doing => Some(self.green),
            TaskStatus::Blocked => Some(self.red),
            TaskStatus::Done => Some(self.blue),
            TaskStatus::Abandoned => Some(self.text_faint),
            TaskStatus::Other(_) => None,
        }
    }

    /// Accent color for a project status. `None` for unknown statuses.
    pub fn project_color(&self, status: &ProjectStatus) -> Option<Color> {
        match status {
            ProjectStatus::Active => Some(self.green),
            ProjectStatus::Backlog => Some(self.text),
            ProjectStatus::Blocked => Some(self.red),
            ProjectStatus::Archived => Some(self.blue),
            ProjectStatus::Abandoned => Some(self.text_faint),
            ProjectStatus::Other(_) => None,
        }
    }
}
