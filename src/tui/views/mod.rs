pub mod agenda;
pub mod project_add;
pub mod project_list;
pub mod project_tasks;
pub mod renderers;
pub mod reschedule;
pub mod task_editor;

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use tracing::warn;

use crate::io::workspace::{Workspace, WorkspaceError};
use crate::model::task::{Task, TaskStatus};
use crate::tui::cmd::Cmd;
use crate::tui::context::{Env, GlobalKeyHandler, ProgramContext, Step};
use crate::tui::grouped_list::GroupedList;
use crate::tui::keymap::Action;
use crate::tui::status_bar::{ModeKind, StatusBar};

pub use agenda::AgendaView;
pub use project_add::ProjectAddView;
pub use project_list::ProjectListView;
pub use project_tasks::ProjectTasksView;
pub use reschedule::RescheduleView;
pub use task_editor::TaskEditorView;

/// Status set by one of the mark actions
fn status_for(action: Action) -> Option<TaskStatus> {
    match action {
        Action::MarkTodo => Some(TaskStatus::Todo),
        Action::MarkDoing => Some(TaskStatus::Doing),
        Action::MarkBlocked => Some(TaskStatus::Blocked),
        Action::MarkDone => Some(TaskStatus::Done),
        Action::MarkAbandoned => Some(TaskStatus::Abandoned),
        _ => None,
    }
}

/// Run a mark or delete action against `task` and report the result in the
/// status bar. Returns false when `action` is not a task action.
fn apply_task_action(
    ws: &Workspace,
    env: &Env,
    status: &mut StatusBar,
    view: &str,
    task: &Task,
    action: Action,
) -> bool {
    let (kind, result) = if action == Action::Delete {
        (
            ModeKind::Delete,
            ws.delete_task(task)
                .map(|()| format!("Deleted \"{}\"", task.name)),
        )
    } else if let Some(next) = status_for(action) {
        (
            ModeKind::Edit,
            ws.update_status(task, next)
                .map(|()| format!("\"{}\" is now {}", task.name, next)),
        )
    } else {
        return false;
    };
    status.set_mode(view, kind);
    report(status, env, result);
    true
}

/// Open the editor or reschedule form for `task`, if `action` asks for one
fn task_form(ws: &Arc<Workspace>, task: Option<&Task>, action: Action) -> Step {
    let Some(task) = task.cloned() else {
        return Step::stay();
    };
    match action {
        Action::Edit => Step::navigate(Box::new(TaskEditorView::edit(Arc::clone(ws), task))),
        Action::Reschedule => Step::navigate(Box::new(RescheduleView::new(Arc::clone(ws), task))),
        _ => Step::stay(),
    }
}

fn report(status: &mut StatusBar, env: &Env, result: Result<String, WorkspaceError>) {
    let until = Instant::now() + env.message_ttl;
    match result {
        Ok(message) => status.set_message(message, until, None),
        Err(e) => {
            warn!(error = %e, "task update failed");
            status.set_message(e.to_string(), until, Some(env.theme.red));
        }
    }
}

/// Move focus from whichever list has it to the other one
fn toggle_focus<T, U>(a: &mut GroupedList<T>, b: &mut GroupedList<U>) {
    if a.focused() {
        a.blur();
        b.focus();
    } else {
        b.blur();
        a.focus();
    }
}

/// One bold centered line
fn title(text: String, env: &Env) -> Paragraph<'static> {
    Paragraph::new(Text::from(Line::from(Span::styled(
        text,
        Style::default()
            .fg(env.theme.text)
            .add_modifier(Modifier::BOLD),
    ))))
    .alignment(Alignment::Center)
}

fn render_list<T>(list: &mut GroupedList<T>, frame: &mut Frame, area: Rect) {
    list.set_width(area.width).set_height(area.height);
    frame.render_widget(Paragraph::new(list.view()), area);
}

/// Global handler: the projects key opens the project list from anywhere
pub fn open_projects_handler(ws: Arc<Workspace>) -> GlobalKeyHandler {
    Box::new(move |ctx: &mut ProgramContext, key: &KeyEvent| {
        if ctx.env().action(key) != Some(Action::Projects) {
            return None;
        }
        if ctx
            .active()
            .is_some_and(|v| v.name() == project_list::NAME)
        {
            return Some(Cmd::none());
        }
        let view = ProjectListView::new(Arc::clone(&ws), ctx.env());
        let (_, cmd) = ctx.navigate(Box::new(view));
        Some(cmd)
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::fs;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    use crate::io::workspace::Workspace;
    use crate::tui::cmd::Msg;
    use crate::tui::context::Env;
    use crate::tui::keymap::KeyMap;
    use crate::tui::theme::Theme;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A workspace on disk holding `files`, with today pinned to 2024-03-05
    pub fn workspace(files: &[(&str, &str)]) -> (TempDir, Arc<Workspace>) {
        let dir = TempDir::new().unwrap();
        for (name, text) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, text).unwrap();
        }
        let ws = Workspace::open(dir.path())
            .unwrap()
            .with_today(Some(date(2024, 3, 5)));
        (dir, Arc::new(ws))
    }

    pub fn env() -> Env {
        let mut env = Env::new(Theme::default(), KeyMap::default(), date(2024, 3, 5));
        env.width = 60;
        env.height = 20;
        env
    }

    pub fn key(c: char) -> Msg {
        Msg::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    pub fn code(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }
}
