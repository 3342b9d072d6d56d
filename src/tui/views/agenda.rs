use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::io::workspace::{Topic, Workspace};
use crate::model::task::Task;
use crate::ops::agenda::{agenda_groups, completed_groups};
use crate::tui::cmd::Msg;
use crate::tui::context::{Env, Step, View};
use crate::tui::grouped_list::GroupedList;
use crate::tui::keymap::Action;
use crate::tui::status_bar::{ModeKind, StatusBar};
use crate::util::dates::humanize_date;

use super::renderers::{completed_renderers, task_renderers};
use super::{TaskEditorView, apply_task_action, render_list, task_form, title, toggle_focus};

pub const NAME: &str = "Agenda";

/// Title row, a spacer, the open list over the completed list, status bar
fn areas(area: Rect) -> [Rect; 4] {
    let [title, _, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);
    let [main, completed] =
        Layout::vertical([Constraint::Ratio(3, 4), Constraint::Ratio(1, 4)]).areas(body);
    [title, main, completed, status]
}

/// Open work for one day, plus what got finished that day
pub struct AgendaView {
    ws: Arc<Workspace>,
    /// Shared with the task renderers so overdue dates follow the agenda day
    date: Rc<Cell<NaiveDate>>,
    main: GroupedList<Task>,
    completed: GroupedList<Task>,
    status: StatusBar,
}

impl AgendaView {
    pub fn new(ws: Arc<Workspace>, env: &Env) -> Self {
        let date = Rc::new(Cell::new(env.today));
        let mut view = AgendaView {
            ws,
            main: GroupedList::new(task_renderers(&env.theme, Rc::clone(&date)))
                .with_empty_message("Nothing on the agenda"),
            completed: GroupedList::new(completed_renderers(&env.theme))
                .with_empty_message("Nothing completed"),
            date,
            status: StatusBar::new(NAME),
        };
        view.main.focus();
        view.resize(env.width, env.height);
        view.refresh();
        view
    }

    pub fn date(&self) -> NaiveDate {
        self.date.get()
    }

    fn refresh(&mut self) {
        let date = self.date.get();
        self.main.set_groups(agenda_groups(&self.ws, date));
        self.completed.set_groups(completed_groups(&self.ws, date));
        self.status.set_open_tasks(self.ws.task_summary());
    }

    fn resize(&mut self, width: u16, height: u16) {
        let [_, main, completed, _] = areas(Rect::new(0, 0, width, height));
        self.main.set_width(main.width).set_height(main.height);
        self.completed
            .set_width(completed.width)
            .set_height(completed.height);
    }

    fn set_date(&mut self, date: Option<NaiveDate>) {
        if let Some(date) = date {
            self.date.set(date);
            self.refresh();
        }
    }

    fn focused(&mut self) -> &mut GroupedList<Task> {
        if self.completed.focused() {
            &mut self.completed
        } else {
            &mut self.main
        }
    }

    fn handle(&mut self, env: &Env, action: Action) -> Step {
        match action {
            Action::MoveUp => self.focused().move_up(1),
            Action::MoveDown => self.focused().move_down(1),
            Action::ToggleFocus => toggle_focus(&mut self.main, &mut self.completed),
            Action::NextDay => self.set_date(self.date.get().succ_opt()),
            Action::PrevDay => self.set_date(self.date.get().pred_opt()),
            Action::ResetDate => self.set_date(Some(env.today)),
            // New tasks are due on the day being viewed
            Action::Add => {
                let due = format!(" due:{}", self.date.get().format("%Y-%m-%d"));
                let view = TaskEditorView::add(Arc::clone(&self.ws), env.inbox.clone(), &due);
                return Step::navigate(Box::new(view));
            }
            Action::Edit | Action::Reschedule => {
                let ws = Arc::clone(&self.ws);
                return task_form(&ws, self.focused().selected(), action);
            }
            other => {
                let Some(task) = self.focused().selected().cloned() else {
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

impl View for AgendaView {
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
            Msg::Resize { width, height } => self.resize(*width, *height),
            Msg::Tick => self.status.expire(Instant::now()),
            _ => {}
        }
        Step::stay()
    }

    fn render(&mut self, env: &Env, frame: &mut Frame, area: Rect) {
        let [title_area, main, completed, status] = areas(area);
        let heading = format!(
            "\u{2190} {} \u{2192}",
            humanize_date(self.date.get(), env.today)
        );
        frame.render_widget(title(heading, env), title_area);
        render_list(&mut self.main, frame, main);
        render_list(&mut self.completed, frame, completed);
        self.status.render(&env.theme, frame, status);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::super::{reschedule, task_editor};
    use super::*;
    use crate::tui::context::{Outcome, ProgramContext, handle_back, handle_quit};
    use crate::tui::test_helpers::render_to_string;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;
    use std::fs;

    const TODAY_MD: &str = "\
# Today
- [/] Write report scheduled:2024-03-05 p:2
- [ ] Pay rent due:2024-03-01
- [ ] Plan trip due:2024-04-01
- [x] Ship release completed:2024-03-05
";

    fn names(list: &GroupedList<Task>) -> Vec<(String, Vec<String>)> {
        list.groups()
            .iter()
            .map(|g| (g.name.clone(), g.items.iter().map(|t| t.name.clone()).collect()))
            .collect()
    }

    fn group(name: &str, items: &[&str]) -> (String, Vec<String>) {
        (name.to_string(), items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn lists_open_and_completed_work_for_the_day() {
        let (_dir, ws) = workspace(&[("today.md", TODAY_MD)]);
        let view = AgendaView::new(ws, &env());

        assert_eq!(
            names(&view.main),
            vec![
                group("Doing", &["Write report"]),
                group("Todo", &["Pay rent"]),
                group("Blocked", &[]),
            ]
        );
        assert_eq!(
            names(&view.completed),
            vec![group("Done", &["Ship release"]), group("Abandoned", &[])]
        );
        assert!(view.main.focused());
        assert!(!view.completed.focused());
    }

    #[test]
    fn day_navigation() {
        let (_dir, ws) = workspace(&[("today.md", TODAY_MD)]);
        let env = env();
        let mut view = AgendaView::new(ws, &env);

        view.update(&env, &key('l'));
        assert_eq!(view.date(), date(2024, 3, 6));
        assert_eq!(view.completed.total_items(), 0);

        view.update(&env, &code(KeyCode::Left));
        view.update(&env, &key('h'));
        assert_eq!(view.date(), date(2024, 3, 4));
        // Write report is only scheduled for the 5th
        assert_eq!(view.main.total_items(), 1);

        view.update(&env, &key('r'));
        assert_eq!(view.date(), date(2024, 3, 5));
        assert_eq!(view.main.total_items(), 2);
    }

    #[test]
    fn marking_done_writes_the_file() {
        let (dir, ws) = workspace(&[("today.md", TODAY_MD)]);
        let env = env();
        let mut view = AgendaView::new(ws, &env);

        view.update(&env, &key('x'));

        let text = fs::read_to_string(dir.path().join("today.md")).unwrap();
        assert!(text.contains("- [x] Write report"));
        assert!(text.contains("completed:2024-03-05"));
        assert_eq!(view.main.total_items(), 1);
        assert_eq!(
            names(&view.completed)[0],
            group("Done", &["Ship release", "Write report"])
        );
        assert!(view.status.message().contains("Write report"));
    }

    #[test]
    fn actions_apply_to_the_focused_list() {
        let (dir, ws) = workspace(&[("today.md", TODAY_MD)]);
        let env = env();
        let mut view = AgendaView::new(ws, &env);

        view.update(&env, &code(KeyCode::Tab));
        assert!(view.completed.focused());
        view.update(&env, &key(' '));

        let text = fs::read_to_string(dir.path().join("today.md")).unwrap();
        assert!(text.contains("- [ ] Ship release"));
        assert!(!text.contains("completed:"));
        assert_eq!(view.completed.total_items(), 0);
    }

    #[test]
    fn delete_moves_on_to_the_next_task() {
        let (dir, ws) = workspace(&[("today.md", TODAY_MD)]);
        let env = env();
        let mut view = AgendaView::new(ws, &env);

        view.update(&env, &key('d'));

        let text = fs::read_to_string(dir.path().join("today.md")).unwrap();
        assert!(!text.contains("Write report"));
        assert_eq!(view.main.selected().map(|t| t.name.as_str()), Some("Pay rent"));
    }

    #[test]
    fn failed_write_shows_an_error() {
        let (dir, ws) = workspace(&[("today.md", TODAY_MD)]);
        let env = env();
        let mut view = AgendaView::new(ws, &env);
        fs::write(dir.path().join("today.md"), "# Rewritten\n").unwrap();

        view.update(&env, &key('x'));

        assert!(view.status.message().contains("changed on disk"));
        assert_eq!(
            fs::read_to_string(dir.path().join("today.md")).unwrap(),
            "# Rewritten\n"
        );
    }

    /// Route a message the way the event loop does
    fn send(ctx: &mut ProgramContext, msg: &Msg) {
        if let Outcome::Forward(_) = ctx.update(msg) {
            ctx.dispatch(msg);
        }
    }

    fn send_text(ctx: &mut ProgramContext, text: &str) {
        for c in text.chars() {
            send(ctx, &key(c));
        }
    }

    fn agenda_context(ws: &Arc<Workspace>) -> ProgramContext {
        ProgramContext::new(env(), |env| Box::new(AgendaView::new(Arc::clone(ws), env)))
            .with_key_handlers(vec![Box::new(handle_quit), Box::new(handle_back)])
    }

    fn screen(ctx: &mut ProgramContext) -> String {
        let (width, height) = (ctx.env().width, ctx.env().height);
        render_to_string(width, height, |frame, _| ctx.render(frame))
    }

    #[test]
    fn add_task_lands_in_the_inbox_due_on_the_agenda_day() {
        let (dir, ws) = workspace(&[("today.md", TODAY_MD)]);
        let mut ctx = agenda_context(&ws);

        send(&mut ctx, &key('l'));
        send(&mut ctx, &key('a'));
        assert_eq!(ctx.active().unwrap().name(), task_editor::ADD);

        // `q` is text while the editor has focus
        send_text(&mut ctx, "Quote for roof");
        send(&mut ctx, &code(KeyCode::Enter));

        assert_eq!(ctx.depth(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("README.md")).unwrap(),
            "- [ ] Quote for roof due:2024-03-06\n"
        );
        assert!(screen(&mut ctx).contains("Quote for roof"));
    }

    #[test]
    fn edit_changes_the_selected_task() {
        let (dir, ws) = workspace(&[("today.md", TODAY_MD)]);
        let mut ctx = agenda_context(&ws);

        send(&mut ctx, &key('e'));
        assert_eq!(ctx.active().unwrap().name(), task_editor::EDIT);
        send(&mut ctx, &code(KeyCode::Tab));
        send(&mut ctx, &key('b'));
        send(&mut ctx, &code(KeyCode::Tab));
        send_text(&mut ctx, " every:week");
        send(&mut ctx, &code(KeyCode::Enter));

        assert_eq!(ctx.depth(), 1);
        let text = fs::read_to_string(dir.path().join("today.md")).unwrap();
        assert!(text.contains("- [b] Write report scheduled:2024-03-05 p:2 every:week\n"));
        assert!(screen(&mut ctx).contains("[b] Write report"));
    }

    #[test]
    fn escape_leaves_the_editor_without_writing() {
        let (dir, ws) = workspace(&[("today.md", TODAY_MD)]);
        let mut ctx = agenda_context(&ws);

        send(&mut ctx, &key('a'));
        send_text(&mut ctx, "Never mind");
        send(&mut ctx, &code(KeyCode::Esc));

        assert_eq!(ctx.active().unwrap().name(), NAME);
        assert!(!dir.path().join("README.md").exists());
    }

    #[test]
    fn reschedule_moves_the_selected_task() {
        let (dir, ws) = workspace(&[("today.md", TODAY_MD)]);
        let mut ctx = agenda_context(&ws);

        send(&mut ctx, &key('j'));
        send(&mut ctx, &key('s'));
        assert_eq!(ctx.active().unwrap().name(), reschedule::NAME);
        send(&mut ctx, &key('1'));

        assert_eq!(ctx.depth(), 1);
        let text = fs::read_to_string(dir.path().join("today.md")).unwrap();
        assert!(text.contains("- [ ] Pay rent due:2024-03-06\n"));
        // Tomorrow is off today's agenda
        assert!(!screen(&mut ctx).contains("Pay rent"));
    }

    #[test]
    fn forms_need_a_selected_task() {
        let (_dir, ws) = workspace(&[]);
        let mut ctx = agenda_context(&ws);

        send(&mut ctx, &key('e'));
        send(&mut ctx, &key('s'));
        assert_eq!(ctx.depth(), 1);
    }

    #[test]
    fn renders_header_lists_and_status_bar() {
        let (_dir, ws) = workspace(&[("today.md", TODAY_MD)]);
        let env = env();
        let mut view = AgendaView::new(ws, &env);

        let out = render_to_string(env.width, env.height, |frame, area| {
            view.render(&env, frame, area)
        });
        assert!(out.contains("\u{2190} Today \u{2192}"));
        assert!(out.contains("DOING"));
        assert!(out.contains("[/] Write report"));
        assert!(out.contains("[ ] Pay rent"));
        assert!(out.contains("Mar 1st"));
        assert!(out.contains("[x] Ship release"));
        assert!(out.contains(" AGENDA "));
        assert!(out.contains("\u{2713} 3"));
    }
}
