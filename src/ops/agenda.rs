use chrono::NaiveDate;

use crate::io::workspace::Workspace;
use crate::model::group::Group;
use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Task, TaskStatus};
use crate::ops::query::{Fetcher, ProjectFilter, TaskFilter, TaskSorter, agenda_order};

/// Split a sorted listing into one group per status, in the given order.
/// Tasks whose status is not listed are dropped.
pub fn group_by_status(tasks: Vec<Task>, order: &[TaskStatus]) -> Vec<Group<Task>> {
    let mut groups: Vec<Group<Task>> = order.iter().map(|s| Group::empty(s.name())).collect();
    for task in tasks {
        if let Some(i) = order.iter().position(|s| *s == task.status) {
            groups[i].items.push(task);
        }
    }
    groups
}

/// Open work due or scheduled on or before `date`: Doing, Todo, Blocked,
/// each sorted by priority.
pub fn agenda_groups(ws: &Workspace, date: NaiveDate) -> Vec<Group<Task>> {
    let order = agenda_order();
    let tasks = ws.list_tasks(
        &Fetcher::All,
        &[TaskFilter::Status(order.clone()), TaskFilter::DueBy(date)],
        &[TaskSorter::Status(order.clone()), TaskSorter::Priority],
    );
    group_by_status(tasks, &order)
}

/// Work finished on `date`: Done then Abandoned, alphabetical
pub fn completed_groups(ws: &Workspace, date: NaiveDate) -> Vec<Group<Task>> {
    let order = [TaskStatus::Done, TaskStatus::Abandoned];
    let tasks = ws.list_tasks(
        &Fetcher::All,
        &[
            TaskFilter::Status(order.to_vec()),
            TaskFilter::CompletedBetween(date, date),
        ],
        &[TaskSorter::Alphabetical],
    );
    group_by_status(tasks, &order)
}

/// Every task in a project document, grouped by status
pub fn project_task_groups(ws: &Workspace, project: &Project) -> Vec<Group<Task>> {
    let order = [
        TaskStatus::Doing,
        TaskStatus::Todo,
        TaskStatus::Blocked,
        TaskStatus::Done,
        TaskStatus::Abandoned,
    ];
    let tasks = ws.list_tasks(
        &Fetcher::File(project.path.clone()),
        &[],
        &[TaskSorter::Priority, TaskSorter::Deadline, TaskSorter::Alphabetical],
    );
    group_by_status(tasks, &order)
}

fn project_status_groups(ws: &Workspace, order: &[ProjectStatus]) -> Vec<Group<Project>> {
    let projects = ws.list_projects(
        &Fetcher::All,
        &[ProjectFilter::Status(order.to_vec())],
        &[],
    );
    order
        .iter()
        .map(|status| {
            let items = projects
                .iter()
                .filter(|p| p.status == *status)
                .cloned()
                .collect();
            Group::new(status.name(), items)
        })
        .collect()
}

/// (open, closed) project groups: Active, Backlog, Blocked and
/// Archived, Abandoned
pub fn project_groups(ws: &Workspace) -> (Vec<Group<Project>>, Vec<Group<Project>>) {
    let open = project_status_groups(
        ws,
        &[
            ProjectStatus::Active,
            ProjectStatus::Backlog,
            ProjectStatus::Blocked,
        ],
    );
    let closed = project_status_groups(ws, &[ProjectStatus::Archived, ProjectStatus::Abandoned]);
    (open, closed)
}
