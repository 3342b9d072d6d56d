use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError, RwLock};

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::model::project::Project;
use crate::model::task::{Task, TaskStatus};
use crate::ops::query::{
    Fetcher, ProjectFilter, ProjectSorter, TaskFilter, TaskSorter, apply_project_query,
    apply_task_query,
};
use crate::parse::{
    format_task, parse_project, parse_tasks, rewrite_dates, rewrite_status, rewrite_task,
};

/// What kind of data a subscriber wants to hear about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Tasks,
    Projects,
}

/// Change marker sent to subscribers. Carries no payload: consumers re-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChanged;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("workspace root {path} is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} line {line} changed on disk")]
    Stale { path: PathBuf, line: usize },
    #[error("{path} is outside the workspace")]
    OutsideWorkspace { path: PathBuf },
    #[error("task text is empty")]
    EmptyTask,
    #[error("{path} already exists")]
    AlreadyExists { path: PathBuf },
    #[error("{path} is not a markdown file")]
    NotMarkdown { path: PathBuf },
}

/// Everything indexed from one markdown file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Document {
    tasks: Vec<Task>,
    project: Option<Project>,
}

/// An indexed directory of markdown notes.
///
/// Paths stored on tasks and projects are relative to the root. Reads are
/// served from the in-memory index; writes go to disk first, then the index
/// is refreshed and subscribers are told.
pub struct Workspace {
    root: PathBuf,
    today: Option<NaiveDate>,
    index: RwLock<BTreeMap<PathBuf, Document>>,
    subscribers: Mutex<Vec<(Topic, Sender<DataChanged>)>>,
}

impl Workspace {
    /// Load every `.md` file under `root`, skipping hidden directories.
    pub fn open(root: &Path) -> Result<Self, WorkspaceError> {
        if !root.is_dir() {
            return Err(WorkspaceError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        let mut index = BTreeMap::new();
        let mut files = Vec::new();
        collect_markdown(root, &mut files)?;
        for abs in files {
            let text = fs::read_to_string(&abs).map_err(|e| WorkspaceError::ReadError {
                path: abs.clone(),
                source: e,
            })?;
            let rel = abs.strip_prefix(root).unwrap_or(&abs).to_path_buf();
            index.insert(rel.clone(), index_document(&rel, &text));
        }
        info!(root = %root.display(), documents = index.len(), "workspace loaded");
        Ok(Workspace {
            root: root.to_path_buf(),
            today: None,
            index: RwLock::new(index),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// Pin the date used for `completed:` fields
    pub fn with_today(mut self, today: Option<NaiveDate>) -> Self {
        self.today = today;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn list_tasks(
        &self,
        fetcher: &Fetcher,
        filters: &[TaskFilter],
        sorters: &[TaskSorter],
    ) -> Vec<Task> {
        let index = self.index.read().unwrap_or_else(PoisonError::into_inner);
        let tasks: Vec<Task> = match fetcher {
            Fetcher::All => index.values().flat_map(|d| d.tasks.iter().cloned()).collect(),
            Fetcher::File(path) => index
                .get(path)
                .map(|d| d.tasks.clone())
                .unwrap_or_default(),
        };
        apply_task_query(tasks, filters, sorters)
    }

    pub fn list_projects(
        &self,
        fetcher: &Fetcher,
        filters: &[ProjectFilter],
        sorters: &[ProjectSorter],
    ) -> Vec<Project> {
        let index = self.index.read().unwrap_or_else(PoisonError::into_inner);
        let projects: Vec<Project> = match fetcher {
            Fetcher::All => index.values().filter_map(|d| d.project.clone()).collect(),
            Fetcher::File(path) => index
                .get(path)
                .and_then(|d| d.project.clone())
                .into_iter()
                .collect(),
        };
        apply_project_query(projects, filters, sorters)
    }

    /// Number of tasks still needing work
    pub fn task_summary(&self) -> usize {
        let index = self.index.read().unwrap_or_else(PoisonError::into_inner);
        index
            .values()
            .flat_map(|d| d.tasks.iter())
            .filter(|t| t.status.is_open())
            .count()
    }

    /// Register for change markers on `topic`. Dropping the receiver unsubscribes.
    pub fn subscribe(&self, topic: Topic) -> Receiver<DataChanged> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((topic, tx));
        rx
    }

    /// Append a new task to `file`, creating the file if needed. A task
    /// created as `Done` gets today's `completed:` date.
    pub fn create_task(
        &self,
        file: &Path,
        text: &str,
        status: TaskStatus,
    ) -> Result<(), WorkspaceError> {
        if text.trim().is_empty() {
            return Err(WorkspaceError::EmptyTask);
        }
        let rel = self.relative(file)?;
        let abs = self.root.join(&rel);
        let mut content = if abs.exists() {
            self.read(&abs)?
        } else {
            String::new()
        };
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        let line = format_task(text, status);
        content.push_str(&rewrite_status(&line, status, self.today()).unwrap_or(line));
        content.push('\n');
        self.write(&rel, &content)
    }

    /// Replace a task's text and status, keeping its place in the file
    pub fn update_task(
        &self,
        task: &Task,
        text: &str,
        status: TaskStatus,
    ) -> Result<(), WorkspaceError> {
        if text.trim().is_empty() {
            return Err(WorkspaceError::EmptyTask);
        }
        let today = self.today();
        self.edit_line(task, |line| rewrite_task(line, text, status, today))
    }

    /// Move a task's due and scheduled dates to `date`
    pub fn reschedule(&self, task: &Task, date: NaiveDate) -> Result<(), WorkspaceError> {
        self.edit_line(task, |line| rewrite_dates(line, date))
    }

    /// Start a new project document in the backlog. Existing files are
    /// never overwritten.
    pub fn create_project(&self, file: &Path, name: &str) -> Result<(), WorkspaceError> {
        let rel = self.relative(file)?;
        if !is_tracked(&rel) {
            return Err(WorkspaceError::NotMarkdown { path: rel });
        }
        if self.root.join(&rel).exists() {
            return Err(WorkspaceError::AlreadyExists { path: rel });
        }
        let content = format!(
            "+++\ntype = \"project\"\nstatus = \"backlog\"\n+++\n\n# {}\n",
            name.trim()
        );
        self.write(&rel, &content)
    }

    /// Change a task's checkbox state in place
    pub fn update_status(&self, task: &Task, status: TaskStatus) -> Result<(), WorkspaceError> {
        let today = self.today();
        self.edit_line(task, |line| rewrite_status(line, status, today))
    }

    pub fn delete_task(&self, task: &Task) -> Result<(), WorkspaceError> {
        self.edit_line(task, |_| None)
    }

    /// Re-index one file after it changed on disk. A missing file is forgotten.
    pub fn reload(&self, path: &Path) -> Result<(), WorkspaceError> {
        let rel = self.relative(path)?;
        if !is_tracked(&rel) {
            return Ok(());
        }
        let abs = self.root.join(&rel);
        if !abs.is_file() {
            return self.forget(&rel);
        }
        let text = self.read(&abs)?;
        self.store(&rel, &text);
        Ok(())
    }

    /// Drop a file from the index
    pub fn forget(&self, path: &Path) -> Result<(), WorkspaceError> {
        let rel = self.relative(path)?;
        let old = self
            .index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&rel);
        if let Some(old) = old {
            debug!(path = %rel.display(), "document removed");
            self.notify_diff(&old, &Document::default());
        }
        Ok(())
    }

    /// Replace the task's source line with `edit(line)`, or remove it when
    /// `edit` returns `None`.
    fn edit_line(
        &self,
        task: &Task,
        edit: impl FnOnce(&str) -> Option<String>,
    ) -> Result<(), WorkspaceError> {
        let rel = self.relative(&task.path)?;
        let abs = self.root.join(&rel);
        let content = self.read(&abs)?;
        let stale = || WorkspaceError::Stale {
            path: rel.clone(),
            line: task.line + 1,
        };

        let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
        let current = lines.get(task.line).ok_or_else(stale)?;
        let (body, cr) = match current.strip_suffix('\r') {
            Some(body) => (body, "\r"),
            None => (current.as_str(), ""),
        };
        if body != task.raw {
            return Err(stale());
        }
        match edit(body) {
            Some(new) => lines[task.line] = format!("{new}{cr}"),
            None => {
                lines.remove(task.line);
            }
        }
        self.write(&rel, &lines.join("\n"))
    }

    fn read(&self, abs: &Path) -> Result<String, WorkspaceError> {
        fs::read_to_string(abs).map_err(|e| WorkspaceError::ReadError {
            path: abs.to_path_buf(),
            source: e,
        })
    }

    /// Atomic write, then refresh the index from what was written
    fn write(&self, rel: &Path, content: &str) -> Result<(), WorkspaceError> {
        let abs = self.root.join(rel);
        let write_err = |e: std::io::Error| WorkspaceError::WriteError {
            path: abs.clone(),
            source: e,
        };
        let dir = abs.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir).map_err(write_err)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;
        tmp.persist(&abs).map_err(|e| write_err(e.error))?;
        debug!(path = %rel.display(), "document written");
        self.store(rel, content);
        Ok(())
    }

    fn store(&self, rel: &Path, text: &str) {
        let doc = index_document(rel, text);
        let old = self
            .index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(rel.to_path_buf(), doc.clone())
            .unwrap_or_default();
        self.notify_diff(&old, &doc);
    }

    fn notify_diff(&self, old: &Document, new: &Document) {
        if old.tasks != new.tasks {
            self.notify(Topic::Tasks);
        }
        if old.project != new.project {
            self.notify(Topic::Projects);
        }
    }

    fn notify(&self, topic: Topic) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|(t, tx)| *t != topic || tx.send(DataChanged).is_ok());
    }

    /// Normalize a path to be relative to the root, rejecting escapes
    fn relative(&self, path: &Path) -> Result<PathBuf, WorkspaceError> {
        let rel = if path.is_absolute() {
            path.strip_prefix(&self.root)
                .map_err(|_| WorkspaceError::OutsideWorkspace {
                    path: path.to_path_buf(),
                })?
                .to_path_buf()
        } else {
            path.to_path_buf()
        };
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(WorkspaceError::OutsideWorkspace {
                path: path.to_path_buf(),
            });
        }
        Ok(rel)
    }
}

fn index_document(rel: &Path, text: &str) -> Document {
    Document {
        tasks: parse_tasks(rel, text),
        project: parse_project(rel, text),
    }
}

/// Markdown files outside hidden directories
pub fn is_tracked(rel: &Path) -> bool {
    let hidden = rel
        .components()
        .any(|c| matches!(c, Component::Normal(n) if n.to_string_lossy().starts_with('.')));
    !hidden && rel.extension().is_some_and(|e| e == "md")
}

fn collect_markdown(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), WorkspaceError> {
    let entries = fs::read_dir(dir).map_err(|e| WorkspaceError::ReadError {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry in entries.flatten() {
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden {
            continue;
        }
        if path.is_dir() {
            collect_markdown(&path, out)?;
        } else if path.extension().is_some_and(|e| e == "md") {
            out.push(path);
        }
    }
    Ok(())
}
