use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

/// Task checkbox state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Doing,
    Blocked,
    Done,
    Abandoned,
    /// A checkbox character this program does not know about.
    /// Kept so the task still lists and round-trips.
    Other(char),
}

impl TaskStatus {
    /// The character used inside the checkbox `[ ]`
    pub fn checkbox_char(self) -> char {
        match self {
            TaskStatus::Todo => ' ',
            TaskStatus::Doing => '/',
            TaskStatus::Blocked => 'b',
            TaskStatus::Done => 'x',
            TaskStatus::Abandoned => 'a',
            TaskStatus::Other(c) => c,
        }
    }

    /// Parse a checkbox character into a state. Never fails: unrecognised
    /// characters become `Other`.
    pub fn from_checkbox_char(c: char) -> TaskStatus {
        match c {
            ' ' => TaskStatus::Todo,
            '/' => TaskStatus::Doing,
            'b' | 'B' => TaskStatus::Blocked,
            'x' | 'X' => TaskStatus::Done,
            'a' | 'A' => TaskStatus::Abandoned,
            other => TaskStatus::Other(other),
        }
    }

    /// Todo, Doing and Blocked tasks still need work
    pub fn is_open(self) -> bool {
        matches!(
            self,
            TaskStatus::Todo | TaskStatus::Doing | TaskStatus::Blocked
        )
    }

    /// Display name used for group headings
    pub fn name(self) -> &'static str {
        match self {
            TaskStatus::Todo => "Todo",
            TaskStatus::Doing => "Doing",
            TaskStatus::Blocked => "Blocked",
            TaskStatus::Done => "Done",
            TaskStatus::Abandoned => "Abandoned",
            TaskStatus::Other(_) => "Unknown",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A task parsed from a single markdown list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// File the task lives in, relative to the workspace root
    pub path: PathBuf,
    /// Zero-based line number within `path`
    pub line: usize,
    /// The source line exactly as read, used to detect concurrent edits
    #[serde(skip)]
    pub raw: String,
    pub name: String,
    pub status: TaskStatus,
    pub due: Option<NaiveDate>,
    pub scheduled: Option<NaiveDate>,
    pub completed: Option<NaiveDate>,
    /// Lower numbers are more urgent
    pub priority: Option<u32>,
    /// Recurrence text such as `day` or `week`
    pub every: Option<String>,
}

impl Task {
    /// Create a task with no fields set (no source position)
    pub fn new(name: impl Into<String>, status: TaskStatus) -> Self {
        Task {
            path: PathBuf::new(),
            line: 0,
            raw: String::new(),
            name: name.into(),
            status,
            due: None,
            scheduled: None,
            completed: None,
            priority: None,
            every: None,
        }
    }

    /// The earlier of the due and scheduled dates. Due wins ties since it is
    /// the harder deadline.
    pub fn deadline(&self) -> Option<NaiveDate> {
        match (self.due, self.scheduled) {
            (Some(d), Some(s)) => Some(d.min(s)),
            (d, s) => d.or(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_chars_round_trip() {
        for status in [
            TaskStatus::Todo,
            TaskStatus::Doing,
            TaskStatus::Blocked,
            TaskStatus::Done,
            TaskStatus::Abandoned,
        ] {
            assert_eq!(
                TaskStatus::from_checkbox_char(status.checkbox_char()),
                status
            );
        }
    }

    #[test]
    fn unknown_checkbox_char_is_preserved() {
        let status = TaskStatus::from_checkbox_char('?');
        assert_eq!(status, TaskStatus::Other('?'));
        assert_eq!(status.checkbox_char(), '?');
        assert!(!status.is_open());
    }

    #[test]
    fn deadline_prefers_earliest_date() {
        let mut task = Task::new("write report", TaskStatus::Todo);
        assert_eq!(task.deadline(), None);

        task.scheduled = NaiveDate::from_ymd_opt(2024, 3, 2);
        assert_eq!(task.deadline(), NaiveDate::from_ymd_opt(2024, 3, 2));

        task.due = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(task.deadline(), NaiveDate::from_ymd_opt(2024, 3, 1));
    }
}
