use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use tracing::debug;

use crate::io::workspace::Workspace;
use crate::model::task::{Task, TaskStatus};
use crate::parse::{format_task, parse_task_line, task_text};
use crate::tui::cmd::Msg;
use crate::tui::context::{Env, Step, View};
use crate::tui::keymap::Action;
use crate::tui::status_bar::{ModeKind, StatusBar};
use crate::tui::text_input::TextInput;

use super::{report, status_for, title};

pub const ADD: &str = "Add-Task";
pub const EDIT: &str = "Edit-Task";

/// Width of the field labels, padding included
const LABEL: usize = 8;

#[derive(Debug, Clone)]
enum Target {
    /// Append to this file
    Create(PathBuf),
    Update(Task),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Status,
    Text,
}

/// Form for a new task or an existing one: a status picker and the task text
pub struct TaskEditorView {
    ws: Arc<Workspace>,
    target: Target,
    task_status: TaskStatus,
    input: TextInput,
    field: Field,
    status: StatusBar,
}

impl TaskEditorView {
    /// A blank todo appended to `file`. `text` pre-fills the input, with the
    /// cursor placed at the start.
    pub fn add(ws: Arc<Workspace>, file: PathBuf, text: &str) -> Self {
        let mut input = TextInput::new(text);
        input.handle(&KeyEvent::from(KeyCode::Home));
        Self::build(ws, Target::Create(file), TaskStatus::Todo, input)
    }

    /// Edit `task` starting from its text as written in the file
    pub fn edit(ws: Arc<Workspace>, task: Task) -> Self {
        let text = task_text(&task.raw).unwrap_or(&task.name).to_string();
        let status = task.status;
        Self::build(ws, Target::Update(task), status, TextInput::new(text))
    }

    fn build(
        ws: Arc<Workspace>,
        target: Target,
        task_status: TaskStatus,
        input: TextInput,
    ) -> Self {
        let mut view = TaskEditorView {
            ws,
            target,
            task_status,
            input,
            field: Field::Text,
            status: StatusBar::new(""),
        };
        let (name, kind) = view.mode();
        view.status.set_mode(name, kind);
        view.status.set_open_tasks(view.ws.task_summary());
        view
    }

    fn mode(&self) -> (&'static str, ModeKind) {
        match self.target {
            Target::Create(_) => (ADD, ModeKind::Create),
            Target::Update(_) => (EDIT, ModeKind::Edit),
        }
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn task_status(&self) -> TaskStatus {
        self.task_status
    }

    /// The task as it would be written, if the text is not blank
    fn preview(&self) -> Option<Task> {
        let text = self.input.value().trim();
        if text.is_empty() {
            return None;
        }
        parse_task_line(&format_task(text, self.task_status))
    }

    fn submit(&mut self, env: &Env) -> Step {
        let text = self.input.value();
        let result = match &self.target {
            Target::Create(file) => self.ws.create_task(file, text, self.task_status),
            Target::Update(task) => self.ws.update_task(task, text, self.task_status),
        };
        match result {
            Ok(()) => {
                debug!(view = self.mode().0, "task saved");
                Step::back()
            }
            Err(e) => {
                report(&mut self.status, env, Err(e));
                Step::stay()
            }
        }
    }

    fn handle_key(&mut self, env: &Env, key: &KeyEvent) -> Step {
        if self.field == Field::Text && self.input.handle(key) {
            return Step::stay();
        }
        match env.action(key) {
            Some(Action::ToggleFocus) => {
                self.field = match self.field {
                    Field::Status => Field::Text,
                    Field::Text => Field::Status,
                };
            }
            Some(Action::Open) => return self.submit(env),
            Some(action) if self.field == Field::Status => {
                if let Some(next) = status_for(action) {
                    self.task_status = next;
                }
            }
            _ => {}
        }
        Step::stay()
    }

    fn label(&self, text: &'static str, field: Field, env: &Env) -> Span<'static> {
        let style = if self.field == field {
            Style::default()
                .fg(env.theme.blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(env.theme.text_faint)
        };
        Span::styled(format!("{text:<LABEL$}"), style)
    }

    fn form_lines(&self, env: &Env) -> Vec<Line<'static>> {
        let text = Style::default().fg(env.theme.text);
        let cursor = Style::default()
            .fg(env.theme.text_cursor)
            .bg(env.theme.text);
        let status_style = match env.theme.task_color(self.task_status) {
            Some(color) => text.fg(color),
            None => text,
        };

        let mut status_line = vec![self.label("Status", Field::Status, env)];
        status_line.push(Span::styled(
            format!(
                "[{}] {}",
                self.task_status.checkbox_char(),
                self.task_status
            ),
            status_style,
        ));
        let mut text_line = vec![self.label("Task", Field::Text, env)];
        let caret = (self.field == Field::Text).then_some(cursor);
        text_line.extend(self.input.spans(text, caret));

        let mut lines = vec![Line::from(status_line), Line::from(text_line), Line::default()];
        let faint = Style::default().fg(env.theme.text_faint);
        match self.preview() {
            Some(task) => {
                let mut fields = vec![format!("name: {}", task.name)];
                if let Some(p) = task.priority {
                    fields.push(format!("priority: {p}"));
                }
                if let Some(d) = task.due {
                    fields.push(format!("due: {d}"));
                }
                if let Some(d) = task.scheduled {
                    fields.push(format!("scheduled: {d}"));
                }
                if let Some(every) = &task.every {
                    fields.push(format!("every: {every}"));
                }
                lines.extend(fields.into_iter().map(|f| Line::styled(f, faint)));
            }
            None => lines.push(Line::styled("Task text is empty", faint)),
        }
        lines
    }
}

impl View for TaskEditorView {
    fn name(&self) -> &'static str {
        self.mode().0
    }

    fn update(&mut self, env: &Env, msg: &Msg) -> Step {
        match msg {
            Msg::Key(key) => return self.handle_key(env, key),
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
        let heading = match &self.target {
            Target::Create(file) => format!("New task in {}", file.display()),
            Target::Update(task) => format!("{}:{}", task.path.display(), task.line + 1),
        };
        frame.render_widget(title(heading, env), title_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(env.theme.text_faint))
            .title(Span::styled(
                format!(" {} ", self.mode().0),
                Style::default().fg(env.theme.text),
            ));
        frame.render_widget(Paragraph::new(self.form_lines(env)).block(block), body);
        self.status.render(&env.theme, frame, status);
    }

    fn takes_text(&self) -> bool {
        self.field == Field::Text
    }
}
