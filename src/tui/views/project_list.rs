use std::sync::Arc;
use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::io::workspace::{Topic, Workspace};
use crate::model::project::Project;
use crate::ops::agenda::project_groups;
use crate::tui::cmd::Msg;
use crate::tui::context::{Env, Step, View};
use crate::tui::grouped_list::GroupedList;
use crate::tui::keymap::Action;
use crate::tui::status_bar::StatusBar;

use super::renderers::project_renderers;
use super::{ProjectAddView, ProjectTasksView, render_list, title, toggle_focus};

pub const NAME: &str = "Projects";

/// Title row, a spacer, open and closed lists side by side, status bar
fn areas(area: Rect) -> [Rect; 4] {
    let [title, _, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);
    let [open, closed] =
        Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(body);
    [title, open, closed, status]
}

pub struct ProjectListView {
    ws: Arc<Workspace>,
    open: GroupedList<Project>,
    closed: GroupedList<Project>,
    status: StatusBar,
}

impl ProjectListView {
    pub fn new(ws: Arc<Workspace>, env: &Env) -> Self {
        let mut view = ProjectListView {
            ws,
            open: GroupedList::new(project_renderers(&env.theme))
                .with_empty_message("No open projects"),
            closed: GroupedList::new(project_renderers(&env.theme))
                .with_empty_message("No closed projects"),
            status: StatusBar::new(NAME),
        };
        view.open.focus();
        view.resize(env.width, env.height);
        view.refresh();
        view
    }

    fn refresh(&mut self) {
        let (open, closed) = project_groups(&self.ws);
        self.open.set_groups(open);
        self.closed.set_groups(closed);
        self.status.set_open_tasks(self.ws.task_summary());
    }

    fn resize(&mut self, width: u16, height: u16) {
        let [_, open, closed, _] = areas(Rect::new(0, 0, width, height));
        self.open.set_width(open.width).set_height(open.height);
        self.closed.set_width(closed.width).set_height(closed.height);
    }

    fn focused(&mut self) -> &mut GroupedList<Project> {
        if self.closed.focused() {
            &mut self.closed
        } else {
            &mut self.open
        }
    }

    fn handle(&mut self, env: &Env, action: Action) -> Step {
        match action {
            Action::MoveUp => self.focused().move_up(1),
            Action::MoveDown => self.focused().move_down(1),
            Action::ToggleFocus => toggle_focus(&mut self.open, &mut self.closed),
            Action::Open => {
                if let Some(project) = self.focused().selected().cloned() {
                    let view = ProjectTasksView::new(Arc::clone(&self.ws), project, env);
                    return Step::navigate(Box::new(view));
                }
            }
            Action::Add => {
                let view = ProjectAddView::new(Arc::clone(&self.ws));
                return Step::navigate(Box::new(view));
            }
            _ => {}
        }
        Step::stay()
    }
}

impl View for ProjectListView {
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
            Msg::Changed(Topic::Projects) | Msg::NavigatedBack => self.refresh(),
            Msg::Changed(Topic::Tasks) => self.status.set_open_tasks(self.ws.task_summary()),
            Msg::Resize { width, height } => self.resize(*width, *height),
            Msg::Tick => self.status.expire(Instant::now()),
            _ => {}
        }
        Step::stay()
    }

    fn render(&mut self, env: &Env, frame: &mut Frame, area: Rect) {
        let [title_area, open, closed, status] = areas(area);
        frame.render_widget(title(NAME.to_string(), env), title_area);
        render_list(&mut self.open, frame, open);
        render_list(&mut self.closed, frame, closed);
        self.status.render(&env.theme, frame, status);
    }
}
