use std::cmp::Ordering;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::model::project::{Project, ProjectStatus};
use crate::model::task::{Task, TaskStatus};

/// Which documents a listing draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetcher {
    All,
    /// A single document, relative to the workspace root
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    /// Keep tasks whose status is in the set
    Status(Vec<TaskStatus>),
    /// Keep tasks due or scheduled on or before the date
    DueBy(NaiveDate),
    /// Keep tasks completed within the inclusive range
    CompletedBetween(NaiveDate, NaiveDate),
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::Status(set) => set.contains(&task.status),
            TaskFilter::DueBy(date) => task.deadline().is_some_and(|d| d <= *date),
            TaskFilter::CompletedBetween(from, to) => task
                .completed
                .is_some_and(|c| c >= *from && c <= *to),
        }
    }
}

/// Sort keys, applied in order: later sorters only break ties of earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSorter {
    /// Statuses in the given order; statuses not listed sort last
    Status(Vec<TaskStatus>),
    /// Most urgent first; tasks without a priority sort last
    Priority,
    Alphabetical,
    /// Earliest deadline first; tasks without one sort last
    Deadline,
}

/// The order the agenda shows open work in
pub fn agenda_order() -> Vec<TaskStatus> {
    vec![TaskStatus::Doing, TaskStatus::Todo, TaskStatus::Blocked]
}

impl TaskSorter {
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            TaskSorter::Status(order) => {
                let rank =
                    |s: TaskStatus| order.iter().position(|o| *o == s).unwrap_or(order.len());
                rank(a.status).cmp(&rank(b.status))
            }
            TaskSorter::Priority => none_last(a.priority, b.priority),
            TaskSorter::Alphabetical => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            TaskSorter::Deadline => none_last(a.deadline(), b.deadline()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectFilter {
    Status(Vec<ProjectStatus>),
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        match self {
            ProjectFilter::Status(set) => set.contains(&project.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSorter {
    Alphabetical,
}

impl ProjectSorter {
    pub fn compare(&self, a: &Project, b: &Project) -> Ordering {
        match self {
            ProjectSorter::Alphabetical => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

/// Filter then stable-sort a task listing
pub fn apply_task_query(
    mut tasks: Vec<Task>,
    filters: &[TaskFilter],
    sorters: &[TaskSorter],
) -> Vec<Task> {
    tasks.retain(|t| filters.iter().all(|f| f.matches(t)));
    tasks.sort_by(|a, b| {
        sorters
            .iter()
            .fold(Ordering::Equal, |acc, s| acc.then_with(|| s.compare(a, b)))
    });
    tasks
}

/// Filter then stable-sort a project listing. No sorters means alphabetical.
pub fn apply_project_query(
    mut projects: Vec<Project>,
    filters: &[ProjectFilter],
    sorters: &[ProjectSorter],
) -> Vec<Project> {
    projects.retain(|p| filters.iter().all(|f| f.matches(p)));
    let default = [ProjectSorter::Alphabetical];
    let sorters = if sorters.is_empty() { &default[..] } else { sorters };
    projects.sort_by(|a, b| {
        sorters
            .iter()
            .fold(Ordering::Equal, |acc, s| acc.then_with(|| s.compare(a, b)))
    });
    projects
}

fn none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
