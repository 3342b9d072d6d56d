use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::io::workspace::Workspace;
use crate::model::task::Task;
use crate::tui::cmd::Msg;
use crate::tui::context::{Env, Step, View};
use crate::tui::status_bar::{ModeKind, StatusBar};
use crate::util::dates::{RESCHEDULE_KEYS, humanize_date, reschedule_date};

use super::{report, title};

pub const NAME: &str = "Reschedule";

fn label(key: char) -> &'static str {
    match key {
        '0' => "Today",
        '1' => "Tomorrow",
        '2'..='6' => "Days from now",
        '7' => "In a week",
        'f' => "In two weeks",
        'm' => "Next month",
        'y' => "Next year",
        _ => "",
    }
}

/// Pick a new date for one task with a single key
pub struct RescheduleView {
    ws: Arc<Workspace>,
    task: Task,
    status: StatusBar,
}

impl RescheduleView {
    pub fn new(ws: Arc<Workspace>, task: Task) -> Self {
        let mut status = StatusBar::new(NAME);
        status.set_mode(NAME, ModeKind::Edit);
        status.set_open_tasks(ws.task_summary());
        RescheduleView { ws, task, status }
    }

    fn pick(&mut self, env: &Env, key: char) -> Step {
        let Some(date) = reschedule_date(key, env.today) else {
            return Step::stay();
        };
        match self.ws.reschedule(&self.task, date) {
            Ok(()) => Step::back(),
            Err(e) => {
                report(&mut self.status, env, Err(e));
                Step::stay()
            }
        }
    }

    fn option_lines(&self, env: &Env) -> Vec<Line<'static>> {
        let key_style = Style::default()
            .fg(env.theme.blue)
            .add_modifier(Modifier::BOLD);
        let text = Style::default().fg(env.theme.text);
        let faint = Style::default().fg(env.theme.text_faint);
        RESCHEDULE_KEYS
            .iter()
            .filter_map(|&key| {
                let date = reschedule_date(key, env.today)?;
                Some(Line::from(vec![
                    Span::styled(format!(" {key}  "), key_style),
                    Span::styled(format!("{:<14}", label(key)), text),
                    Span::styled(
                        format!("{} ({date})", humanize_date(date, env.today)),
                        faint,
                    ),
                ]))
            })
            .collect()
    }
}

impl View for RescheduleView {
    fn name(&self) -> &'static str {
        NAME
    }

    fn update(&mut self, env: &Env, msg: &Msg) -> Step {
        match msg {
            Msg::Key(key) => {
                if let KeyCode::Char(c) = key.code
                    && !key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return self.pick(env, c);
                }
            }
            Msg::Changed(_) => self.status.set_open_tasks(self.ws.task_summary()),
            Msg::Tick => self.status.expire(Instant::now()),
            _ => {}
        }
        Step::stay()
    }

    fn render(&mut self, env: &Env, frame: &mut Frame, area: Rect) {
        let [title_area, _, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);
        frame.render_widget(title(format!("Move \"{}\"", self.task.name), env), title_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(env.theme.text_faint));
        frame.render_widget(Paragraph::new(self.option_lines(env)).block(block), body);
        self.status.render(&env.theme, frame, status);
    }
}
