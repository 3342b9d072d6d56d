use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

use crate::model::task::{Task, TaskStatus};

/// `- [x] rest` or `* [x] rest`, any indentation. Group 1 is the indent,
/// group 2 the checkbox char, group 3 the text after the checkbox.
static TASK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*] \[(.)\](?: (.*))?$").unwrap());

/// Parse every task in a markdown document.
/// `path` is stored on each task as its source location.
pub fn parse_tasks(path: &Path, text: &str) -> Vec<Task> {
    let mut tasks = Vec::new();
    let mut in_fence = false;
    for (idx, line) in text.lines().enumerate() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(mut task) = parse_task_line(line) {
            task.path = path.to_path_buf();
            task.line = idx;
            tasks.push(task);
        }
    }
    tasks
}

/// Parse a single line. Returns `None` when the line is not a task.
pub fn parse_task_line(line: &str) -> Option<Task> {
    let caps = TASK_LINE.captures(line)?;
    let status_char = caps.get(2)?.as_str().chars().next()?;
    let rest = caps.get(3).map_or("", |m| m.as_str());

    let status = TaskStatus::from_checkbox_char(status_char);
    if let TaskStatus::Other(c) = status {
        warn!(status = %c, line, "unknown task status");
    }
    let mut task = Task::new(String::new(), status);
    task.raw = line.to_string();

    let mut name_words: Vec<&str> = Vec::new();
    for word in rest.split_whitespace() {
        if !apply_field(&mut task, word) {
            name_words.push(word);
        }
    }
    task.name = name_words.join(" ");
    Some(task)
}

/// Everything after the checkbox, as written
pub fn task_text(line: &str) -> Option<&str> {
    let caps = TASK_LINE.captures(line)?;
    Some(caps.get(3).map_or("", |m| m.as_str()))
}

/// Try to interpret `word` as a `key:value` field. Returns false if the word
/// is plain text (including fields whose value does not parse).
fn apply_field(task: &mut Task, word: &str) -> bool {
    let Some((key, value)) = word.split_once(':') else {
        return false;
    };
    if value.is_empty() {
        return false;
    }
    match key {
        "due" => parse_date(value).map(|d| task.due = Some(d)).is_some(),
        "scheduled" => parse_date(value).map(|d| task.scheduled = Some(d)).is_some(),
        "completed" => parse_date(value).map(|d| task.completed = Some(d)).is_some(),
        "p" | "priority" => value
            .parse::<u32>()
            .ok()
            .map(|p| task.priority = Some(p))
            .is_some(),
        "every" => {
            task.every = Some(value.to_string());
            true
        }
        _ => false,
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
