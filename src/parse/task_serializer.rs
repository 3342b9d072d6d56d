use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::model::task::TaskStatus;
use crate::parse::parse_date;

/// Indent, list marker and checkbox at the start of a task line
static TASK_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*[-*] )\[(.)\]").unwrap());

/// A `completed:` word together with the whitespace in front of it
static COMPLETED_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s+)completed:(\S+)").unwrap());

/// A `due:` or `scheduled:` word; group 1 is what precedes it
static DATE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)(due|scheduled):(\S+)").unwrap());

/// Rewrite a task line with a new status.
///
/// Only the checkbox and the `completed:` field change; spacing and every
/// other word stay as written. Moving into `Done` appends
/// `completed:<today>` unless a completed date is already present. Moving out
/// of `Done` strips any `completed:` field. Returns `None` if `line` is not a
/// task line.
pub fn rewrite_status(line: &str, status: TaskStatus, today: NaiveDate) -> Option<String> {
    let caps = TASK_PREFIX.captures(line)?;
    let prefix = caps.get(1)?.as_str();
    let rest = &line[caps.get(0)?.end()..];

    let mut out = format!("{}[{}]", prefix, status.checkbox_char());
    if status == TaskStatus::Done {
        out.push_str(rest);
        if !has_completed(rest) {
            out.push_str(&format!(" completed:{}", today.format("%Y-%m-%d")));
        }
    } else {
        out.push_str(&strip_completed(rest));
    }
    Some(out)
}

/// Replace everything after the checkbox with `text`, keeping the line's
/// indent and list marker, then apply the `completed:` rules of
/// [`rewrite_status`].
pub fn rewrite_task(
    line: &str,
    text: &str,
    status: TaskStatus,
    today: NaiveDate,
) -> Option<String> {
    let caps = TASK_PREFIX.captures(line)?;
    let prefix = caps.get(1)?.as_str();
    let fresh = format!("{}[{}] {}", prefix, status.checkbox_char(), text.trim());
    rewrite_status(&fresh, status, today)
}

/// Move a task to `date`: every `due:` and `scheduled:` date is replaced.
/// A task with neither gets `due:<date>` appended.
pub fn rewrite_dates(line: &str, date: NaiveDate) -> Option<String> {
    let caps = TASK_PREFIX.captures(line)?;
    let head = &line[..caps.get(0)?.end()];
    let rest = &line[head.len()..];

    let day = date.format("%Y-%m-%d").to_string();
    let mut replaced = false;
    let rest = DATE_FIELD.replace_all(rest, |c: &Captures| {
        if parse_date(&c[3]).is_none() {
            return c[0].to_string();
        }
        replaced = true;
        format!("{}{}:{day}", &c[1], &c[2])
    });
    let mut out = format!("{head}{rest}");
    if !replaced {
        out.push_str(&format!(" due:{day}"));
    }
    Some(out)
}

/// Format a brand-new task line
pub fn format_task(text: &str, status: TaskStatus) -> String {
    format!("- [{}] {}", status.checkbox_char(), text.trim())
}

fn has_completed(rest: &str) -> bool {
    COMPLETED_FIELD
        .captures_iter(rest)
        .any(|c| parse_date(&c[2]).is_some())
}

fn strip_completed(rest: &str) -> String {
    COMPLETED_FIELD
        .replace_all(rest, |c: &Captures| match parse_date(&c[2]) {
            Some(_) => String::new(),
            None => c[0].to_string(),
        })
        .into_owned()
}
