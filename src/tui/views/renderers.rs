use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Task, TaskStatus};
use crate::tui::grouped_list::{LabelRenderer, Renderers};
use crate::tui::theme::Theme;
use crate::util::dates::short_past_date;
use crate::util::unicode::{display_width, gap_between, truncate_to_width};

const PADDING: usize = 2;

pub fn checkbox(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "[ ]",
        TaskStatus::Doing => "[/]",
        TaskStatus::Blocked => "[b]",
        TaskStatus::Done => "[x]",
        TaskStatus::Abandoned => "[a]",
        // Reported once when the line is parsed
        TaskStatus::Other(_) => "[?]",
    }
}

fn project_glyph(status: &ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Active => "\u{25CF}",
        ProjectStatus::Backlog => "\u{25CB}",
        ProjectStatus::Blocked => "\u{25D0}",
        ProjectStatus::Archived => "\u{25A0}",
        ProjectStatus::Abandoned => "\u{2715}",
        ProjectStatus::Other(_) => "?",
    }
}

fn task_group_color(theme: &Theme, name: &str) -> Option<Color> {
    let status = [
        TaskStatus::Todo,
        TaskStatus::Doing,
        TaskStatus::Blocked,
        TaskStatus::Done,
        TaskStatus::Abandoned,
    ]
    .into_iter()
    .find(|s| s.name() == name)?;
    theme.task_color(status)
}

fn project_group_color(theme: &Theme, name: &str) -> Option<Color> {
    theme.project_color(&ProjectStatus::parse(name))
}

/// Uppercase label on the group's color, then a blank line
fn header(theme: Theme, color: fn(&Theme, &str) -> Option<Color>) -> LabelRenderer {
    Box::new(move |name: &str, _width: u16| {
        let bg = color(&theme, name).unwrap_or(theme.text);
        Text::from(vec![
            Line::from(Span::styled(
                format!("{pad}{}{pad}", name.to_uppercase(), pad = " ".repeat(PADDING)),
                Style::default()
                    .fg(theme.text_cursor)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ])
    })
}

fn footer() -> LabelRenderer {
    Box::new(|_: &str, _: u16| Text::from(vec![Line::default()]))
}

/// Row colors: the status accent as text on the panel, or inverted when selected
fn row_colors(theme: &Theme, accent: Option<Color>, selected: bool) -> (Color, Color) {
    let accent = accent.unwrap_or(theme.text);
    if selected {
        (accent, theme.text_cursor)
    } else {
        (theme.panel, accent)
    }
}

/// `left` then `right` pushed to the far edge, padded on both sides
fn row(
    left: String,
    right: Vec<Span<'static>>,
    width: u16,
    bg: Color,
    fg: Color,
) -> Text<'static> {
    let inner = (width as usize).saturating_sub(2 * PADDING);
    let right_text: String = right.iter().map(|s| s.content.as_ref()).collect();
    let gap = gap_between(&left, &right_text, inner);
    let pad = " ".repeat(PADDING);

    let base = Style::default().fg(fg).bg(bg);
    let mut spans = vec![Span::styled(format!("{pad}{left}{}", " ".repeat(gap)), base)];
    spans.extend(right.into_iter().map(|s| s.patch_style(Style::default().bg(bg))));
    spans.push(Span::styled(pad, base));
    Text::from(Line::from(spans))
}

/// Priority and, for work that slipped past `date`, the date it was due
fn task_right(
    theme: &Theme,
    task: &Task,
    date: NaiveDate,
    selected: bool,
    fg: Color,
) -> Vec<Span<'static>> {
    let mut parts: Vec<Span<'static>> = Vec::new();
    if let Some(p) = task.priority {
        parts.push(Span::styled(format!("p{p}"), Style::default().fg(fg)));
    }
    let overdue = match (task.due, task.scheduled) {
        (Some(due), _) => (due < date).then(|| (due, theme.red)),
        (None, Some(scheduled)) => (scheduled < date).then(|| (scheduled, theme.text)),
        (None, None) => None,
    };
    if let Some((day, color)) = overdue {
        if !parts.is_empty() {
            parts.push(Span::styled("  ", Style::default()));
        }
        let color = if selected { fg } else { color };
        parts.push(Span::styled(
            short_past_date(day, date),
            Style::default().fg(color),
        ));
    }
    parts
}

fn task_row(
    theme: &Theme,
    task: &Task,
    date: Option<NaiveDate>,
    width: u16,
    selected: bool,
) -> Text<'static> {
    let glyph = checkbox(task.status);
    let (bg, fg) = row_colors(theme, theme.task_color(task.status), selected);
    let right = date.map_or_else(Vec::new, |d| task_right(theme, task, d, selected, fg));
    let right_width: usize = right.iter().map(|s| display_width(&s.content)).sum();
    let marker = if task.every.is_some() { " \u{21BB}" } else { "" };

    let inner = (width as usize).saturating_sub(2 * PADDING);
    let taken = display_width(glyph)
        + 1
        + display_width(marker)
        + right_width
        + usize::from(right_width > 0);
    let name = truncate_to_width(&task.name, inner.saturating_sub(taken));
    row(format!("{glyph} {name}{marker}"), right, width, bg, fg)
}

/// Open-task rows with priority and overdue dates measured against the
/// shared agenda date
pub fn task_renderers(theme: &Theme, date: Rc<Cell<NaiveDate>>) -> Renderers<Task> {
    let (t1, t2) = (theme.clone(), theme.clone());
    let (d1, d2) = (Rc::clone(&date), date);
    Renderers {
        header: Some(header(theme.clone(), task_group_color)),
        footer: Some(footer()),
        item: Box::new(move |task: &Task, width: u16| {
            task_row(&t1, task, Some(d1.get()), width, false)
        }),
        selected: Box::new(move |task: &Task, width: u16| {
            task_row(&t2, task, Some(d2.get()), width, true)
        }),
    }
}

/// Finished-task rows: just the checkbox and name
pub fn completed_renderers(theme: &Theme) -> Renderers<Task> {
    let (t1, t2) = (theme.clone(), theme.clone());
    Renderers {
        header: Some(header(theme.clone(), task_group_color)),
        footer: Some(footer()),
        item: Box::new(move |task: &Task, width: u16| task_row(&t1, task, None, width, false)),
        selected: Box::new(move |task: &Task, width: u16| task_row(&t2, task, None, width, true)),
    }
}

fn project_row(theme: &Theme, project: &Project, width: u16, selected: bool) -> Text<'static> {
    let glyph = project_glyph(&project.status);
    let (bg, fg) = row_colors(theme, theme.project_color(&project.status), selected);
    let inner = (width as usize).saturating_sub(2 * PADDING);
    let name = truncate_to_width(&project.name, inner.saturating_sub(display_width(glyph) + 2));
    row(format!("{glyph}  {name}"), Vec::new(), width, bg, fg)
}

pub fn project_renderers(theme: &Theme) -> Renderers<Project> {
    let (t1, t2) = (theme.clone(), theme.clone());
    Renderers {
        header: Some(header(theme.clone(), project_group_color)),
        footer: Some(footer()),
        item: Box::new(move |p: &Project, width: u16| project_row(&t1, p, width, false)),
        selected: Box::new(move |p: &Project, width: u16| project_row(&t2, p, width, true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text(t: &Text<'static>) -> Vec<String> {
        t.lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn task_row_layout() {
        let theme = Theme::default();
        let mut task = Task::new("Pay rent", TaskStatus::Todo);
        task.priority = Some(1);
        task.due = Some(date(2024, 3, 1));
        task.every = Some("month".into());

        let rendered = task_row(&theme, &task, Some(date(2024, 3, 5)), 40, false);
        assert_eq!(
            text(&rendered),
            vec![format!("  [ ] Pay rent \u{21BB}{}p1  Mar 1st  ", " ".repeat(11))]
        );
        assert_eq!(display_width(&text(&rendered)[0]), 40);
    }

    #[test]
    fn future_dates_are_not_shown() {
        let theme = Theme::default();
        let mut task = Task::new("Later", TaskStatus::Doing);
        task.due = Some(date(2024, 3, 9));
        task.scheduled = Some(date(2024, 3, 1));
        let rendered = task_row(&theme, &task, Some(date(2024, 3, 5)), 20, true);
        assert_eq!(text(&rendered), vec![format!("  [/] Later{}", " ".repeat(9))]);
    }

    #[test]
    fn long_names_are_truncated() {
        let theme = Theme::default();
        let task = Task::new("A very long task name indeed", TaskStatus::Blocked);
        let rendered = task_row(&theme, &task, None, 20, false);
        assert_eq!(text(&rendered), vec!["  [b] A very long\u{2026}  "]);
    }

    #[test]
    fn selected_row_inverts_colors() {
        let theme = Theme::default();
        let task = Task::new("x", TaskStatus::Doing);
        let normal = task_row(&theme, &task, None, 10, false);
        let selected = task_row(&theme, &task, None, 10, true);
        assert_eq!(normal.lines[0].spans[0].style.bg, Some(theme.panel));
        assert_eq!(normal.lines[0].spans[0].style.fg, Some(theme.green));
        assert_eq!(selected.lines[0].spans[0].style.bg, Some(theme.green));
        assert_eq!(selected.lines[0].spans[0].style.fg, Some(theme.text_cursor));
    }

    #[test]
    fn unknown_status_renders_placeholder() {
        let theme = Theme::default();
        let task = Task::new("mystery", TaskStatus::Other('~'));
        let rendered = task_row(&theme, &task, None, 20, false);
        assert!(text(&rendered)[0].starts_with("  [?] mystery"));
        assert_eq!(rendered.lines[0].spans[0].style.fg, Some(theme.text));
    }

    #[test]
    fn headers_and_footers() {
        let renderers = task_renderers(&Theme::default(), Rc::new(Cell::new(date(2024, 1, 1))));
        let header = (renderers.header.as_ref().unwrap())("Doing", 30);
        assert_eq!(text(&header), vec!["  DOING  ", ""]);
        let footer = (renderers.footer.as_ref().unwrap())("Doing", 30);
        assert_eq!(text(&footer), vec![""]);
    }

    #[test]
    fn project_row_layout() {
        let project = Project {
            path: "garden.md".into(),
            name: "Garden".into(),
            status: ProjectStatus::Active,
        };
        let rendered = project_row(&Theme::default(), &project, 16, false);
        assert_eq!(text(&rendered), vec![format!("  \u{25CF}  Garden{}", " ".repeat(5))]);
    }
}
