use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::io::workspace::{Topic, Workspace};
use crate::model::project::Project;
use crate::model::task::Task;
use crate::ops::agenda::project_task_groups;
use crate::ops::query::Fetcher;
use crate::tui::cmd::Msg;
use crate::tui::context::{Env, Step, View};
use crate::tui::grouped_list::GroupedList;
use crate::tui::keymap::Action;
use crate::tui::status_bar::{ModeKind, StatusBar};

use super::renderers::task_renderers;
use super::{TaskEditorView, apply_task_action, render_list, task_form, title};

pub const NAME: &str = "Project";

fn areas(area: Rect) -> [Rect; 3] {
    let [title, _, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);
    [title, body, status]
}

/// Every task in one project document, by status
pub struct ProjectTasksView {
    ws: Arc<Workspace>,
    project: Project,
    list: GroupedList<Task>,
    status: StatusBar,
}

impl ProjectTasksView {
    pub fn new(ws: Arc<Workspace>, project: Project, env: &Env) -> Self {
        let date = Rc::new(Cell::new(env.today));
        let mut view = ProjectTasksView {
            ws,
            project,
            list: GroupedList::new(task_renderers(&env.theme, date))
                .with_empty_message("No tasks in this project"),
            status: StatusBar::new(NAME),
        };
        view.list.focus();
        view.resize(env.width, env.height);
        view.refresh();
        view
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    fn refresh(&mut self) {
        self.list
            .set_groups(project_task_groups(&self.ws, &self.project));
        self.status.set_open_tasks(self.ws.task_summary());
    }

    /// Pick up a renamed or re-statused project. A project that vanished
    /// keeps its last known details.
    fn refresh_project(&mut self) {
        let found = self
            .ws
            .list_projects(&Fetcher::File(self.project.path.clone()), &[], &[]);
        if let Some(project) = found.into_iter().next() {
            self.project = project;
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let [_, body, _] = areas(Rect::new(0, 0, width, height));
        self.list.set_width(body.width).set_height(body.height);
    }

    fn handle(&mut self, env: &Env, action: Action) -> Step {
        match action {
            Action::MoveUp => self.list.move_up(1),
            Action::MoveDown => self.list.move_down(1),
            Action::Add => {
                let file = self.project.path.clone();
                let view = TaskEditorView::add(Arc::clone(&self.ws), file, "");
                return Step::navigate(Box::new(view));
            }
            Action::Edit | Action::Reschedule => {
                return task_form(&self.ws, self.list.selected(), action);
            }
            other => {
                let Some(task) = self.list.selected().cloned() else {
                    return Step::stay();
                };
                if apply_task_action(&self.ws, env, &mut self.status, NAME, &task, other) {
                    self.refresh();
                }
                return Step::stay();
            }
        }
        self.status.set_mode(NAME, ModeKind::Navigate);
        Step::stay()
    }
}

impl View for ProjectTasksView {
    fn name(&self) -> &'static str {
        NAME
    }

    fn update(&mut self, env: &Env, msg: &Msg) -> Step {
        match msg {
            Msg::Key(key) => {
                if let Some(action) = env.action(key) {
                    return self.handle(env, action);
                }
            }
            Msg::Changed(Topic::Tasks) | Msg::NavigatedBack => self.refresh(),
            Msg::Changed(Topic::Projects) => self.refresh_project(),
            Msg::Resize { width, height } => self.resize(*width, *height),
            Msg::Tick => self.status.expire(Instant::now()),
            _ => {}
        }
        Step::stay()
    }

    fn render(&mut self, env: &Env, frame: &mut Frame, area: Rect) {
        let [title_area, body, status] = areas(area);
        let heading = format!("{} \u{b7} {}", self.project.name, self.project.status);
        frame.render_widget(title(heading, env), title_area);
        render_list(&mut self.list, frame, body);
        self.status.render(&env.theme, frame, status);
    }
}
