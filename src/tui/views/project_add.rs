use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::io::workspace::Workspace;
use crate::tui::cmd::Msg;
use crate::tui::context::{Env, Step, View};
use crate::tui::keymap::Action;
use crate::tui::status_bar::{ModeKind, StatusBar};
use crate::tui::text_input::TextInput;

use super::{report, title};

pub const NAME: &str = "Add-Project";

/// Where a project named by `text` is stored, and its heading. A `.md` path
/// is used as given and named after its file stem; anything else is a name
/// stored as `<name>.md` at the root.
pub fn project_location(text: &str) -> Option<(PathBuf, String)> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let path = Path::new(text);
    if path.extension().is_some_and(|e| e == "md") {
        let name = path.file_stem()?.to_string_lossy().into_owned();
        return Some((path.to_path_buf(), name));
    }
    Some((PathBuf::from(format!("{text}.md")), text.to_string()))
}

/// Name a new project and create its document
pub struct ProjectAddView {
    ws: Arc<Workspace>,
    input: TextInput,
    status: StatusBar,
}

impl ProjectAddView {
    pub fn new(ws: Arc<Workspace>) -> Self {
        let mut status = StatusBar::new(NAME);
        status.set_mode(NAME, ModeKind::Create);
        status.set_open_tasks(ws.task_summary());
        ProjectAddView {
            ws,
            input: TextInput::default(),
            status,
        }
    }

    fn submit(&mut self, env: &Env) -> Step {
        let Some((path, name)) = project_location(self.input.value()) else {
            let until = Instant::now() + env.message_ttl;
            self.status
                .set_message("Project name is empty", until, Some(env.theme.red));
            return Step::stay();
        };
        match self.ws.create_project(&path, &name) {
            Ok(()) => Step::back(),
            Err(e) => {
                report(&mut self.status, env, Err(e));
                Step::stay()
            }
        }
    }
}

impl View for ProjectAddView {
    fn name(&self) -> &'static str {
        NAME
    }

    fn update(&mut self, env: &Env, msg: &Msg) -> Step {
        match msg {
            Msg::Key(key) => {
                if !self.input.handle(key) && env.action(key) == Some(Action::Open) {
                    return self.submit(env);
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
        frame.render_widget(title("New project".to_string(), env), title_area);

        let text = Style::default().fg(env.theme.text);
        let faint = Style::default().fg(env.theme.text_faint);
        let cursor = Style::default()
            .fg(env.theme.text_cursor)
            .bg(env.theme.text);
        let mut name_line = vec![Span::styled("Name    ", Style::default().fg(env.theme.blue))];
        name_line.extend(self.input.spans(text, Some(cursor)));
        let location = match project_location(self.input.value()) {
            Some((path, _)) => format!("Location  {}", path.display()),
            None => "Type a name or a path ending in .md".to_string(),
        };
        let lines = vec![
            Line::from(name_line),
            Line::default(),
            Line::styled(location, faint),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(faint)
            .title(Span::styled(format!(" {NAME} "), text));
        frame.render_widget(Paragraph::new(lines).block(block), body);
        self.status.render(&env.theme, frame, status);
    }

    fn takes_text(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::tui::test_helpers::render_to_string;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn typed(view: &mut ProjectAddView, env: &Env, text: &str) {
        for c in text.chars() {
            view.update(env, &key(c));
        }
    }

    #[test]
    fn names_and_paths() {
        assert_eq!(
            project_location(" Garden "),
            Some((PathBuf::from("Garden.md"), "Garden".to_string()))
        );
        assert_eq!(
            project_location("work/boat.md"),
            Some((PathBuf::from("work/boat.md"), "boat".to_string()))
        );
        assert_eq!(project_location("   "), None);
    }

    #[test]
    fn enter_creates_the_project() {
        let (dir, ws) = workspace(&[]);
        let env = env();
        let mut view = ProjectAddView::new(ws);
        typed(&mut view, &env, "Garden");

        let step = view.update(&env, &code(KeyCode::Enter));

        assert!(step.back);
        let text = fs::read_to_string(dir.path().join("Garden.md")).unwrap();
        assert!(text.contains("status = \"backlog\""));
        assert!(text.contains("# Garden"));
    }

    #[test]
    fn existing_file_is_not_overwritten() {
        let (dir, ws) = workspace(&[("Garden.md", "mine\n")]);
        let env = env();
        let mut view = ProjectAddView::new(ws);
        typed(&mut view, &env, "Garden");

        let step = view.update(&env, &code(KeyCode::Enter));

        assert!(!step.back);
        assert!(view.status.message().contains("already exists"));
        assert_eq!(fs::read_to_string(dir.path().join("Garden.md")).unwrap(), "mine\n");
    }

    #[test]
    fn empty_name_is_refused() {
        let (_dir, ws) = workspace(&[]);
        let env = env();
        let mut view = ProjectAddView::new(ws);

        assert!(!view.update(&env, &code(KeyCode::Enter)).back);
        assert_eq!(view.status.message(), "Project name is empty");
    }

    #[test]
    fn shows_where_the_project_goes() {
        let (_dir, ws) = workspace(&[]);
        let env = env();
        let mut view = ProjectAddView::new(ws);
        typed(&mut view, &env, "Boat");

        let out = render_to_string(env.width, env.height, |frame, area| {
            view.render(&env, frame, area)
        });
        assert!(out.contains("New project"));
        assert!(out.contains("Name    Boat"));
        assert!(out.contains("Location  Boat.md"));
        assert!(out.contains(" ADD-PROJECT "));
    }
}
