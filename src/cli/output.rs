use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::group::{Group, total_items};
use crate::model::project::Project;
use crate::model::task::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct AgendaJson<'a> {
    pub date: NaiveDate,
    pub open: &'a [Group<Task>],
    pub completed: &'a [Group<Task>],
}

#[derive(Serialize)]
pub struct ProjectsJson<'a> {
    pub open: &'a [Group<Project>],
    pub closed: &'a [Group<Project>],
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `[x] name` followed by whichever fields are set
pub fn format_task(task: &Task) -> String {
    let mut line = format!("[{}] {}", task.status.checkbox_char(), task.name);
    if let Some(p) = task.priority {
        let _ = write!(line, " p:{p}");
    }
    if let Some(d) = task.due {
        let _ = write!(line, " due:{d}");
    }
    if let Some(d) = task.scheduled {
        let _ = write!(line, " scheduled:{d}");
    }
    if let Some(every) = &task.every {
        let _ = write!(line, " every:{every}");
    }
    line
}

pub fn format_project(project: &Project) -> String {
    format!("{} ({})", project.name, project.path.display())
}

/// Non-empty groups as a heading with indented items. `None` when there is
/// nothing to show.
pub fn format_groups<T>(groups: &[Group<T>], item: impl Fn(&T) -> String) -> Option<String> {
    if total_items(groups) == 0 {
        return None;
    }
    let mut out = String::new();
    for group in groups.iter().filter(|g| !g.is_empty()) {
        let _ = writeln!(out, "{}", group.name);
        for it in &group.items {
            let _ = writeln!(out, "  {}", item(it));
        }
    }
    Some(out)
}
